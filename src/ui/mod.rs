pub mod charts;
pub mod heatmap;
pub mod panels;
pub mod pie;
pub mod tables;

use eframe::egui::Ui;

use insight_dash::state::AppState;

// ---------------------------------------------------------------------------
// Tabs (central panel)
// ---------------------------------------------------------------------------

/// "Order Information": filtered orders and the charts built from them.
pub fn orders_tab(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;

    ui.heading("Orders Overview");
    ui.label(format!(
        "{} orders · sales {:.2} · profit {:.2}",
        summary.order_count, summary.total_sales, summary.total_profit
    ));
    tables::orders_table(ui, &state.orders.orders, &state.visible_indices);
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("Sub-Category Sales");
        charts::category_bars(&mut cols[0], "sub_category_sales", &summary.sales_by_sub_category, "Sub-Category", "Sales");

        cols[1].heading("Sales by Shipping Method");
        charts::distribution_boxes(&mut cols[1], "ship_mode_sales", &summary.sales_by_ship_mode, "Ship Mode", "Sales");
    });
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("Market Profit");
        charts::category_bars(&mut cols[0], "market_profit", &summary.profit_by_market, "Market", "Profit");

        cols[1].heading("Relationship between Quantity and Profit");
        charts::quantity_profit_scatter(&mut cols[1], &summary.quantity_profit);
    });
    ui.separator();

    ui.heading("Sales Over Time");
    charts::monthly_bars(ui, &summary.monthly_sales);
    ui.separator();

    ui.heading("Sales Distribution by Segment");
    pie::pie_chart(ui, &summary.sales_by_segment);
}

/// "Market Basket Analysis": association rules, unaffected by the order filters.
pub fn rules_tab(ui: &mut Ui, state: &AppState) {
    let rules = &state.summary.rules;

    ui.heading("Market Basket Analysis - Association Rules");
    tables::rules_table(ui, &state.rules.rules);
    ui.separator();

    ui.heading("Heat Map of Association Rules");
    heatmap::lift_heatmap(ui, &rules.lift_pivot);
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("Top Antecedents by Support");
        charts::ranking_bars(&mut cols[0], "antecedent_support", &rules.support_by_antecedent, "support");

        cols[1].heading("Top Consequents by Support");
        charts::ranking_bars(&mut cols[1], "consequent_support", &rules.support_by_consequent, "support");
    });
    ui.separator();

    ui.heading("Lift Distribution of Antecedents");
    pie::pie_chart(ui, &rules.lift_by_antecedent);
    ui.separator();

    ui.heading("Lift Distribution of Consequents");
    pie::pie_chart(ui, &rules.lift_by_consequent);
}

use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use insight_dash::data::model::{AssociationRule, OrderRecord};

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 280.0;

/// Scrollable table of the filtered orders. Only visible rows are laid out.
pub fn orders_table(ui: &mut Ui, orders: &[OrderRecord], visible: &[usize]) {
    const HEADERS: [&str; 9] = [
        "Order Date",
        "Market",
        "Category",
        "Sub-Category",
        "Ship Mode",
        "Sales",
        "Profit",
        "Quantity",
        "Segment",
    ];

    ui.push_id("orders_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(TABLE_HEIGHT)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(70.0), HEADERS.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for title in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let o = &orders[visible[row.index()]];
                    let cells = [
                        o.order_date.to_string(),
                        o.market.clone(),
                        o.category.clone(),
                        o.sub_category.clone(),
                        o.ship_mode.clone(),
                        format!("{:.2}", o.sales),
                        format!("{:.2}", o.profit),
                        o.quantity.to_string(),
                        o.segment.clone(),
                    ];
                    for text in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

/// Scrollable table of every association rule.
pub fn rules_table(ui: &mut Ui, rules: &[AssociationRule]) {
    ui.push_id("rules_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(TABLE_HEIGHT)
            .column(Column::initial(220.0).at_least(80.0))
            .column(Column::initial(220.0).at_least(80.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder().at_least(70.0))
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for title in ["antecedents", "consequents", "support", "lift"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rules.len(), |mut row| {
                    let r = &rules[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(r.antecedents.label());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.consequents.label());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", r.support));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", r.lift));
                    });
                });
            });
    });
}

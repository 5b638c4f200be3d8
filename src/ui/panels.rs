use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use insight_dash::data::loader::{load_orders, load_rules};
use insight_dash::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

const ALL_MARKETS: &str = "All markets";

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.orders.is_empty() {
        ui.label("No orders loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the widgets.
    let markets = state.options.markets.clone();
    let mut categories = state.options.categories.clone();
    for selected in &state.selection.categories {
        if !categories.contains(selected) {
            categories.push(selected.clone());
        }
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date window ----
            ui.strong("Start Date");
            let mut start = state.selection.start;
            ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
            state.set_start_date(start);

            ui.strong("End Date");
            let mut end = state.selection.end;
            ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
            state.set_end_date(end);

            if state.selection.start > state.selection.end {
                ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
            }
            ui.separator();

            // ---- Market ----
            ui.strong("Market");
            let current = state.selection.market.clone();
            egui::ComboBox::from_id_salt("market")
                .selected_text(current.as_deref().unwrap_or(ALL_MARKETS))
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(current.is_none(), ALL_MARKETS).clicked() {
                        state.set_market(None);
                    }
                    for market in &markets {
                        let is_current = current.as_deref() == Some(market.as_str());
                        if ui.selectable_label(is_current, market).clicked() {
                            state.set_market(Some(market.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Categories ----
            let n_selected = state.selection.categories.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Category  ({n_selected}/{})", categories.len())).strong(),
            )
            .id_salt("categories")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                if ui.small_button("Clear").clicked() {
                    state.clear_categories();
                }
                for category in &categories {
                    let mut checked = state.selection.categories.contains(category);
                    if ui.checkbox(&mut checked, category).changed() {
                        state.toggle_category(category);
                    }
                }
            });
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open orders…").clicked() {
                open_file_dialog(state, TableKind::Orders);
                ui.close_menu();
            }
            if ui.button("Open association rules…").clicked() {
                open_file_dialog(state, TableKind::Rules);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Orders, "Order Information");
        ui.selectable_value(&mut state.tab, Tab::MarketBasket, "Market Basket Analysis");

        ui.separator();

        ui.label(format!(
            "{} orders loaded, {} visible · {} rules",
            state.orders.len(),
            state.visible_indices.len(),
            state.rules.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum TableKind {
    Orders,
    Rules,
}

/// Replace one of the tables. On failure the current table stays loaded.
pub fn open_file_dialog(state: &mut AppState, kind: TableKind) {
    let title = match kind {
        TableKind::Orders => "Open orders",
        TableKind::Rules => "Open association rules",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    let result = match kind {
        TableKind::Orders => load_orders(&path).map(|orders| state.set_orders(orders)),
        TableKind::Rules => load_rules(&path).map(|rules| state.set_rules(rules)),
    };
    if let Err(e) = result {
        log::error!("Failed to load {}: {e}", path.display());
        state.status_message = Some(format!("Error: {e}"));
    }
}

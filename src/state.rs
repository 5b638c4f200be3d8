use chrono::NaiveDate;

use crate::data::filter::{FilterOptions, FilterSelection, filtered_indices};
use crate::data::model::{OrderDataset, RuleSet};
use crate::report::{DashboardSummary, RuleSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which dashboard tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Orders,
    MarketBasket,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded orders; read-only until replaced wholesale.
    pub orders: OrderDataset,

    /// Loaded association rules; never filtered.
    pub rules: RuleSet,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Market / category choices inside the current date window.
    pub options: FilterOptions,

    /// Indices of orders passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Aggregates for the current selection.
    pub summary: DashboardSummary,

    /// Rule aggregates, recomputed only when the rules change.
    rule_summary: RuleSummary,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(orders: OrderDataset, rules: RuleSet) -> Self {
        let selection = FilterSelection::for_dataset(&orders);
        Self::with_selection(orders, rules, selection)
    }

    pub fn with_selection(orders: OrderDataset, rules: RuleSet, selection: FilterSelection) -> Self {
        let mut state = AppState {
            rule_summary: RuleSummary::compute(&rules),
            orders,
            rules,
            selection,
            ..Default::default()
        };
        state.refresh();
        state
    }

    /// Ingest a newly loaded orders table and reset the filters to its full range.
    pub fn set_orders(&mut self, orders: OrderDataset) {
        self.selection = FilterSelection::for_dataset(&orders);
        self.orders = orders;
        self.status_message = None;
        self.refresh();
    }

    /// Ingest a newly loaded rules table.
    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rule_summary = RuleSummary::compute(&rules);
        self.rules = rules;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the window options, visible indices and every aggregate.
    pub fn refresh(&mut self) {
        self.options = FilterOptions::within(&self.orders.orders, &self.selection);
        self.visible_indices = filtered_indices(&self.orders.orders, &self.selection);
        self.summary = DashboardSummary::from_visible(
            &self.orders,
            &self.visible_indices,
            self.rule_summary.clone(),
            &self.selection,
        );
        log::debug!(
            "Selection {:?} → {} of {} orders",
            self.selection,
            self.visible_indices.len(),
            self.orders.len()
        );
    }

    pub fn set_start_date(&mut self, start: NaiveDate) {
        if self.selection.start != start {
            self.selection.start = start;
            self.refresh();
        }
    }

    pub fn set_end_date(&mut self, end: NaiveDate) {
        if self.selection.end != end {
            self.selection.end = end;
            self.refresh();
        }
    }

    /// `None` selects every market.
    pub fn set_market(&mut self, market: Option<String>) {
        if self.selection.market != market {
            self.selection.market = market;
            self.refresh();
        }
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.refresh();
    }

    pub fn clear_categories(&mut self) {
        if !self.selection.categories.is_empty() {
            self.selection.categories.clear();
            self.refresh();
        }
    }

    /// Back to the full date range with no market or category constraint.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::for_dataset(&self.orders);
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::OrderRecord;

    fn order(d: &str, market: &str, category: &str) -> OrderRecord {
        OrderRecord {
            order_date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
            market: market.into(),
            category: category.into(),
            sub_category: format!("{category}-sub"),
            ship_mode: "Standard Class".into(),
            sales: 10.0,
            profit: 1.0,
            quantity: 1,
            segment: "Consumer".into(),
        }
    }

    fn state() -> AppState {
        AppState::new(
            OrderDataset::from_orders(vec![
                order("2023-01-01", "US", "Tech"),
                order("2023-02-01", "EU", "Tech"),
                order("2023-03-01", "EU", "Office"),
            ]),
            RuleSet::default(),
        )
    }

    #[test]
    fn starts_with_everything_visible() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.summary.order_count, 3);
        assert_eq!(s.options.markets, ["US", "EU"]);
    }

    #[test]
    fn every_change_recomputes() {
        let mut s = state();
        s.set_market(Some("EU".into()));
        assert_eq!(s.visible_indices, vec![1, 2]);
        s.toggle_category("Office");
        assert_eq!(s.visible_indices, vec![2]);
        assert_eq!(s.summary.order_count, 1);
        s.toggle_category("Office");
        assert_eq!(s.visible_indices, vec![1, 2]);
        s.set_end_date(NaiveDate::from_ymd_opt(2023, 2, 15).unwrap());
        assert_eq!(s.visible_indices, vec![1]);
        assert_eq!(s.options.categories, ["Tech"]);
        s.reset_filters();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn inverted_dates_empty_everything() {
        let mut s = state();
        s.set_start_date(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert!(s.visible_indices.is_empty());
        assert!(s.summary.monthly_sales.is_empty());
    }

    #[test]
    fn replacing_orders_resets_window() {
        let mut s = state();
        s.set_market(Some("US".into()));
        s.set_orders(OrderDataset::from_orders(vec![order("2024-06-01", "APAC", "Tech")]));
        assert_eq!(s.selection.market, None);
        assert_eq!(s.visible_indices, vec![0]);
    }
}

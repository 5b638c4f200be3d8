use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{OrderDataset, OrderRecord, distinct_in_order};

// ---------------------------------------------------------------------------
// Filter selection: date window plus market / category choice
// ---------------------------------------------------------------------------

/// What the user currently has selected in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `None` means every market.
    pub market: Option<String>,
    /// Empty means no category constraint.
    pub categories: BTreeSet<String>,
}

impl FilterSelection {
    /// A selection spanning `[start, end]` with no market or category constraint.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            market: None,
            categories: BTreeSet::new(),
        }
    }

    /// The widest selection for a dataset: its full date range, nothing else.
    pub fn for_dataset(dataset: &OrderDataset) -> Self {
        let (start, end) = dataset
            .date_range
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self::new(start, end)
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Whether a date falls inside the inclusive window.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for FilterSelection {
    /// Unbounded window, no constraints.
    fn default() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices of orders inside the date window, in source order.
pub fn date_window_indices(orders: &[OrderRecord], selection: &FilterSelection) -> Vec<usize> {
    orders
        .iter()
        .enumerate()
        .filter(|(_, o)| selection.contains_date(o.order_date))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of orders that pass the current selection.
///
/// The date window is applied first. On the windowed subset:
/// * market and categories → same market and category in the set
/// * market only → same market
/// * categories only → category in the set, or a sub-category that some
///   windowed order of a selected category carries
/// * neither → everything in the window
pub fn filtered_indices(orders: &[OrderRecord], selection: &FilterSelection) -> Vec<usize> {
    let windowed = date_window_indices(orders, selection);
    let categories = &selection.categories;

    match (selection.market.as_deref(), categories.is_empty()) {
        (Some(market), false) => windowed
            .into_iter()
            .filter(|&i| orders[i].market == market && categories.contains(&orders[i].category))
            .collect(),
        (Some(market), true) => windowed
            .into_iter()
            .filter(|&i| orders[i].market == market)
            .collect(),
        (None, false) => {
            // Sub-categories reachable from the chosen categories inside the window.
            let sub_categories: BTreeSet<&str> = windowed
                .iter()
                .map(|&i| &orders[i])
                .filter(|o| categories.contains(&o.category))
                .map(|o| o.sub_category.as_str())
                .collect();
            windowed
                .into_iter()
                .filter(|&i| {
                    let o = &orders[i];
                    categories.contains(&o.category)
                        || sub_categories.contains(o.sub_category.as_str())
                })
                .collect()
        }
        (None, true) => windowed,
    }
}

/// Copy out the orders that pass the selection. The source is left untouched.
pub fn apply_filters(orders: &[OrderRecord], selection: &FilterSelection) -> Vec<OrderRecord> {
    filtered_indices(orders, selection)
        .into_iter()
        .map(|i| orders[i].clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Widget options
// ---------------------------------------------------------------------------

/// Choices offered by the market and category widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub markets: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterOptions {
    /// Distinct markets and categories among orders inside the date window,
    /// in order of first appearance.
    pub fn within(orders: &[OrderRecord], selection: &FilterSelection) -> Self {
        let windowed: Vec<&OrderRecord> = orders
            .iter()
            .filter(|o| selection.contains_date(o.order_date))
            .collect();
        FilterOptions {
            markets: distinct_in_order(windowed.iter().map(|o| o.market.as_str())),
            categories: distinct_in_order(windowed.iter().map(|o| o.category.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn order(d: &str, market: &str, category: &str, sub_category: &str, sales: f64) -> OrderRecord {
        OrderRecord {
            order_date: date(d),
            market: market.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            ship_mode: "Second Class".into(),
            sales,
            profit: sales / 10.0,
            quantity: 2,
            segment: "Corporate".into(),
        }
    }

    fn sample() -> Vec<OrderRecord> {
        vec![
            order("2023-01-05", "US", "Tech", "Phones", 100.0),
            order("2023-01-07", "EU", "Office", "Binders", 20.0),
            order("2023-01-09", "EU", "Furniture", "Phones", 30.0),
            order("2023-01-12", "US", "Furniture", "Chairs", 40.0),
            order("2023-02-10", "EU", "Tech", "Phones", 50.0),
        ]
    }

    #[test]
    fn market_filter_inside_window() {
        let records = vec![
            order("2023-01-05", "US", "Tech", "Phones", 100.0),
            order("2023-02-10", "EU", "Tech", "Phones", 50.0),
        ];
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-01-31")).with_market("US");
        let out = apply_filters(&records, &sel);
        assert_eq!(out, vec![records[0].clone()]);
    }

    #[test]
    fn inverted_window_is_empty() {
        let sel = FilterSelection::new(date("2023-12-31"), date("2023-01-01"));
        assert!(filtered_indices(&sample(), &sel).is_empty());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let sel = FilterSelection::new(date("2023-01-05"), date("2023-01-12"));
        assert_eq!(filtered_indices(&sample(), &sel), vec![0, 1, 2, 3]);
    }

    #[test]
    fn market_and_categories() {
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-12-31"))
            .with_market("EU")
            .with_category("Tech");
        assert_eq!(filtered_indices(&sample(), &sel), vec![4]);
    }

    #[test]
    fn categories_only_widens_through_sub_categories() {
        // Tech carries "Phones", so the Furniture phone order is pulled in too.
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-01-31")).with_category("Tech");
        assert_eq!(filtered_indices(&sample(), &sel), vec![0, 2]);
    }

    #[test]
    fn widening_only_sees_the_date_window() {
        // Inside January only Furniture orders; "Phones" from February Tech must not leak in.
        let records = vec![
            order("2023-01-09", "EU", "Furniture", "Phones", 30.0),
            order("2023-01-10", "EU", "Office", "Phones", 10.0),
            order("2023-02-10", "EU", "Tech", "Phones", 50.0),
        ];
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-01-31")).with_category("Tech");
        assert!(filtered_indices(&records, &sel).is_empty());
    }

    #[test]
    fn no_constraint_keeps_window() {
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-01-31"));
        assert_eq!(filtered_indices(&sample(), &sel), vec![0, 1, 2, 3]);
    }

    #[test]
    fn apply_filters_leaves_source_untouched() {
        let records = sample();
        let before = records.clone();
        let sel = FilterSelection::new(date("2023-01-01"), date("2023-01-31")).with_market("US");
        let _ = apply_filters(&records, &sel);
        assert_eq!(records, before);
    }

    #[test]
    fn options_follow_the_window() {
        let sel = FilterSelection::new(date("2023-01-06"), date("2023-01-31"));
        let opts = FilterOptions::within(&sample(), &sel);
        assert_eq!(opts.markets, ["EU", "US"]);
        assert_eq!(opts.categories, ["Office", "Furniture"]);
    }

    #[test]
    fn empty_dataset_selection_matches_nothing() {
        let ds = OrderDataset::from_orders(Vec::new());
        let sel = FilterSelection::for_dataset(&ds);
        assert!(filtered_indices(&ds.orders, &sel).is_empty());
    }
}

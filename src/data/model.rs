use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// OrderRecord – one row of the orders table
// ---------------------------------------------------------------------------

/// A single order line. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_date: NaiveDate,
    pub market: String,
    pub category: String,
    pub sub_category: String,
    pub ship_mode: String,
    /// Currency amount.
    pub sales: f64,
    /// Currency amount, may be negative.
    pub profit: f64,
    pub quantity: i64,
    pub segment: String,
}

// ---------------------------------------------------------------------------
// ItemSet – one side of an association rule
// ---------------------------------------------------------------------------

/// The items on one side of an association rule, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemSet {
    items: Vec<String>,
}

impl ItemSet {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the textual form found in rule files.
    ///
    /// Accepts `frozenset({'a', 'b'})`, `{'a', 'b'}`, `['a', 'b']` and plain
    /// `a, b`. Quotes and surrounding whitespace are stripped from each item.
    pub fn parse(raw: &str) -> Self {
        let mut body = raw.trim();
        if let Some(inner) = body
            .strip_prefix("frozenset(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            body = inner.trim();
        }
        if let Some(inner) = body
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .or_else(|| body.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')))
        {
            body = inner;
        }

        let items = split_outside_quotes(body)
            .into_iter()
            .map(|tok| strip_quotes(tok.trim()))
            .filter(|tok| !tok.is_empty())
            .map(str::to_string)
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display label used as a chart / grouping key.
    pub fn label(&self) -> String {
        self.items.join(", ")
    }
}

/// Split on commas that are not inside a `'...'` or `"..."` run.
fn split_outside_quotes(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut open: Option<char> = None;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match (open, c) {
            (None, '\'' | '"') => open = Some(c),
            (Some(q), _) if c == q => open = None,
            (None, ',') => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn strip_quotes(s: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)) {
            return inner.trim();
        }
    }
    s
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// AssociationRule – one row of the rules table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    pub antecedents: ItemSet,
    pub consequents: ItemSet,
    /// Fraction of transactions containing both sides, in `[0, 1]`.
    pub support: f64,
    pub lift: f64,
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded orders table
// ---------------------------------------------------------------------------

/// All loaded orders plus the indices the filter widgets need.
#[derive(Debug, Clone, Default)]
pub struct OrderDataset {
    pub orders: Vec<OrderRecord>,
    /// Earliest and latest order date, `None` for an empty table.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Distinct markets in order of first appearance.
    pub markets: Vec<String>,
    /// Distinct categories in order of first appearance.
    pub categories: Vec<String>,
}

impl OrderDataset {
    /// Build the distinct-value indices from the loaded orders.
    pub fn from_orders(orders: Vec<OrderRecord>) -> Self {
        let date_range = orders
            .iter()
            .map(|o| o.order_date)
            .fold(None::<(NaiveDate, NaiveDate)>, |acc, d| {
                Some(match acc {
                    None => (d, d),
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                })
            });
        let markets = distinct_in_order(orders.iter().map(|o| o.market.as_str()));
        let categories = distinct_in_order(orders.iter().map(|o| o.category.as_str()));

        OrderDataset {
            orders,
            date_range,
            markets,
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RuleSet – the complete loaded rules table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<AssociationRule>,
}

impl RuleSet {
    pub fn from_rules(rules: Vec<AssociationRule>) -> Self {
        RuleSet { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Distinct values, keeping the position of each value's first occurrence.
pub(crate) fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(date: &str, market: &str, category: &str) -> OrderRecord {
        OrderRecord {
            order_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            market: market.into(),
            category: category.into(),
            sub_category: "Phones".into(),
            ship_mode: "Standard Class".into(),
            sales: 1.0,
            profit: 0.5,
            quantity: 1,
            segment: "Consumer".into(),
        }
    }

    #[test]
    fn parses_frozenset_labels() {
        let set = ItemSet::parse("frozenset({'whole milk', 'rolls/buns'})");
        assert_eq!(set.items(), ["whole milk", "rolls/buns"]);
        assert_eq!(set.label(), "whole milk, rolls/buns");
    }

    #[test]
    fn parses_plain_and_list_labels() {
        assert_eq!(ItemSet::parse("soda").items(), ["soda"]);
        assert_eq!(ItemSet::parse("[\"a\", \"b\"]").items(), ["a", "b"]);
        assert_eq!(ItemSet::parse(" {'yogurt'} ").label(), "yogurt");
        assert!(ItemSet::parse("frozenset({})").is_empty());
    }

    #[test]
    fn quoted_commas_stay_inside_one_item() {
        let set = ItemSet::parse("frozenset({'salt, fine', 'pepper'})");
        assert_eq!(set.items(), ["salt, fine", "pepper"]);
        assert_eq!(ItemSet::parse("[\"a,b\", 'c']").items(), ["a,b", "c"]);
    }

    #[test]
    fn date_range_spans_min_and_max_date() {
        let ds = OrderDataset::from_orders(vec![order("2023-05-02", "US", "Technology")]);
        let day = NaiveDate::from_ymd_opt(2023, 5, 2).unwrap();
        assert_eq!(ds.date_range, Some((day, day)));
    }

    #[test]
    fn dataset_indices_keep_first_appearance_order() {
        let ds = OrderDataset::from_orders(vec![
            order("2023-03-01", "EU", "Furniture"),
            order("2023-01-01", "US", "Technology"),
            order("2023-02-01", "EU", "Technology"),
        ]);
        assert_eq!(ds.markets, ["EU", "US"]);
        assert_eq!(ds.categories, ["Furniture", "Technology"]);
        let (lo, hi) = ds.date_range.unwrap();
        assert_eq!(lo.to_string(), "2023-01-01");
        assert_eq!(hi.to_string(), "2023-03-01");
    }

    #[test]
    fn empty_dataset_has_no_date_range() {
        let ds = OrderDataset::from_orders(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_range.is_none());
    }
}

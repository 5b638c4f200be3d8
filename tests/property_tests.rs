//! Property-based tests for the filter / aggregate pipeline using proptest
//!
//! Random order sets and selections are checked against a direct restatement
//! of the selection rules and against the conservation of summed measures.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use insight_dash::data::aggregate::{
    monthly_sales, profit_by_market, sales_by_segment, sales_by_sub_category,
};
use insight_dash::{FilterSelection, OrderRecord, apply_filters, filtered_indices};
use proptest::prelude::*;

const MARKETS: [&str; 3] = ["US", "EU", "APAC"];
const CATEGORIES: [&str; 3] = ["Technology", "Furniture", "Office Supplies"];
const SUB_CATEGORIES: [&str; 4] = ["Phones", "Chairs", "Paper", "Tables"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

fn order_strategy() -> impl Strategy<Value = OrderRecord> {
    (
        0u64..730,
        0..MARKETS.len(),
        0..CATEGORIES.len(),
        0..SUB_CATEGORIES.len(),
        0.0f64..1_000.0,
        -200.0f64..200.0,
        1i64..10,
    )
        .prop_map(|(day, m, c, s, sales, profit, quantity)| OrderRecord {
            order_date: base_date() + Days::new(day),
            market: MARKETS[m].to_string(),
            category: CATEGORIES[c].to_string(),
            sub_category: SUB_CATEGORIES[s].to_string(),
            ship_mode: "Standard Class".to_string(),
            sales,
            profit,
            quantity,
            segment: (if quantity % 2 == 0 { "Consumer" } else { "Corporate" }).to_string(),
        })
}

fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
    (
        0u64..730,
        0u64..730,
        proptest::option::of(0..MARKETS.len()),
        proptest::collection::btree_set(0..CATEGORIES.len(), 0..=2),
    )
        .prop_map(|(a, b, market, categories)| FilterSelection {
            start: base_date() + Days::new(a),
            end: base_date() + Days::new(b),
            market: market.map(|m| MARKETS[m].to_string()),
            categories: categories.into_iter().map(|c| CATEGORIES[c].to_string()).collect(),
        })
}

/// The selection rules restated record by record.
fn expected_pass(orders: &[OrderRecord], sel: &FilterSelection, o: &OrderRecord) -> bool {
    if !(sel.start <= o.order_date && o.order_date <= sel.end) {
        return false;
    }
    match (&sel.market, sel.categories.is_empty()) {
        (Some(m), false) => &o.market == m && sel.categories.contains(&o.category),
        (Some(m), true) => &o.market == m,
        (None, false) => {
            let reachable: BTreeSet<&String> = orders
                .iter()
                .filter(|x| sel.start <= x.order_date && x.order_date <= sel.end)
                .filter(|x| sel.categories.contains(&x.category))
                .map(|x| &x.sub_category)
                .collect();
            sel.categories.contains(&o.category) || reachable.contains(&o.sub_category)
        }
        (None, true) => true,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn membership_matches_predicate(
        orders in proptest::collection::vec(order_strategy(), 0..60),
        sel in selection_strategy(),
    ) {
        let kept: BTreeSet<usize> = filtered_indices(&orders, &sel).into_iter().collect();
        for (i, o) in orders.iter().enumerate() {
            prop_assert_eq!(kept.contains(&i), expected_pass(&orders, &sel, o), "order {}", i);
        }
    }

    #[test]
    fn inverted_window_is_always_empty(
        orders in proptest::collection::vec(order_strategy(), 0..60),
        sel in selection_strategy(),
    ) {
        let mut sel = sel;
        if sel.start <= sel.end {
            std::mem::swap(&mut sel.start, &mut sel.end);
            sel.start = sel.start + Days::new(1);
        }
        prop_assert!(apply_filters(&orders, &sel).is_empty());
    }

    #[test]
    fn indices_are_sorted_and_unique(
        orders in proptest::collection::vec(order_strategy(), 0..60),
        sel in selection_strategy(),
    ) {
        let idx = filtered_indices(&orders, &sel);
        prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn grouped_sums_conserve_totals(
        orders in proptest::collection::vec(order_strategy(), 0..60),
        sel in selection_strategy(),
    ) {
        let filtered = apply_filters(&orders, &sel);
        let sales: f64 = filtered.iter().map(|o| o.sales).sum();
        let profit: f64 = filtered.iter().map(|o| o.profit).sum();

        let by_sub: f64 = sales_by_sub_category(&filtered).iter().map(|g| g.total).sum();
        let by_segment: f64 = sales_by_segment(&filtered).iter().map(|g| g.total).sum();
        let by_month: f64 = monthly_sales(&filtered).iter().map(|m| m.total).sum();
        let by_market: f64 = profit_by_market(&filtered).iter().map(|g| g.total).sum();

        prop_assert!(close(by_sub, sales));
        prop_assert!(close(by_segment, sales));
        prop_assert!(close(by_month, sales));
        prop_assert!(close(by_market, profit));
    }

    #[test]
    fn monthly_series_is_ascending_by_label(
        orders in proptest::collection::vec(order_strategy(), 0..60),
    ) {
        let months = monthly_sales(&orders);
        prop_assert!(months.windows(2).all(|w| w[0].label < w[1].label));
        for m in &months {
            prop_assert_eq!(m.label.len(), "2022 : Jan".len());
        }
    }
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::aggregate::{
    self, Distribution, GroupTotal, LiftPivot, MonthlyTotal, ScatterPoint,
};
use crate::data::filter::{FilterSelection, filtered_indices};
use crate::data::model::{OrderDataset, OrderRecord, RuleSet};

/// Every derived aggregate for one filter selection.
///
/// Built from scratch on each selection change; nothing here is updated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub selection: SelectionEcho,
    pub order_count: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    pub sales_by_sub_category: Vec<GroupTotal>,
    pub profit_by_market: Vec<GroupTotal>,
    pub monthly_sales: Vec<MonthlyTotal>,
    pub sales_by_segment: Vec<GroupTotal>,
    pub sales_by_ship_mode: Vec<Distribution>,
    /// Every loaded order, independent of the selection.
    pub quantity_profit: Vec<ScatterPoint>,
    pub rules: RuleSummary,
}

/// The selection a summary was computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionEcho {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub market: Option<String>,
    pub categories: Vec<String>,
}

/// Rule-side aggregates. They do not depend on the order filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSummary {
    pub rule_count: usize,
    pub support_by_antecedent: Vec<GroupTotal>,
    pub support_by_consequent: Vec<GroupTotal>,
    pub lift_by_antecedent: Vec<GroupTotal>,
    pub lift_by_consequent: Vec<GroupTotal>,
    pub lift_pivot: LiftPivot,
}

impl RuleSummary {
    pub fn compute(rules: &RuleSet) -> Self {
        let rules = &rules.rules;
        RuleSummary {
            rule_count: rules.len(),
            support_by_antecedent: aggregate::support_by_antecedent(rules),
            support_by_consequent: aggregate::support_by_consequent(rules),
            lift_by_antecedent: aggregate::lift_by_antecedent(rules),
            lift_by_consequent: aggregate::lift_by_consequent(rules),
            lift_pivot: aggregate::lift_pivot(rules),
        }
    }
}

impl DashboardSummary {
    /// Filter the orders and aggregate everything the dashboard shows.
    pub fn compute(orders: &OrderDataset, rules: &RuleSet, selection: &FilterSelection) -> Self {
        let visible = filtered_indices(&orders.orders, selection);
        Self::from_visible(orders, &visible, RuleSummary::compute(rules), selection)
    }

    /// Aggregate an already-filtered index set.
    pub fn from_visible(
        orders: &OrderDataset,
        visible: &[usize],
        rules: RuleSummary,
        selection: &FilterSelection,
    ) -> Self {
        let rows: Vec<&OrderRecord> = visible.iter().map(|&i| &orders.orders[i]).collect();

        DashboardSummary {
            selection: SelectionEcho {
                start: Some(selection.start),
                end: Some(selection.end),
                market: selection.market.clone(),
                categories: selection.categories.iter().cloned().collect(),
            },
            order_count: rows.len(),
            total_sales: rows.iter().map(|o| o.sales).sum(),
            total_profit: rows.iter().map(|o| o.profit).sum(),
            sales_by_sub_category: aggregate::sales_by_sub_category(rows.iter().copied()),
            profit_by_market: aggregate::profit_by_market(rows.iter().copied()),
            monthly_sales: aggregate::monthly_sales(rows.iter().copied()),
            sales_by_segment: aggregate::sales_by_segment(rows.iter().copied()),
            sales_by_ship_mode: aggregate::sales_by_ship_mode(rows.iter().copied()),
            quantity_profit: aggregate::quantity_profit_points(&orders.orders),
            rules,
        }
    }

    /// Pretty JSON, as printed by `--summary`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AssociationRule, ItemSet};

    fn dataset() -> OrderDataset {
        let order = |d: &str, market: &str, sales: f64| OrderRecord {
            order_date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
            market: market.into(),
            category: "Tech".into(),
            sub_category: "Phones".into(),
            ship_mode: "Standard Class".into(),
            sales,
            profit: sales / 2.0,
            quantity: 1,
            segment: "Consumer".into(),
        };
        OrderDataset::from_orders(vec![
            order("2023-01-05", "US", 100.0),
            order("2023-02-10", "EU", 50.0),
        ])
    }

    fn rules() -> RuleSet {
        RuleSet::from_rules(vec![AssociationRule {
            antecedents: ItemSet::new(["milk"]),
            consequents: ItemSet::new(["bread"]),
            support: 0.2,
            lift: 1.5,
        }])
    }

    #[test]
    fn january_us_summary() {
        let sel = FilterSelection::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        )
        .with_market("US");
        let summary = DashboardSummary::compute(&dataset(), &rules(), &sel);
        assert_eq!(summary.order_count, 1);
        let sub_total: f64 = summary.sales_by_sub_category.iter().map(|g| g.total).sum();
        assert_eq!(sub_total, 100.0);
        assert_eq!(summary.monthly_sales.len(), 1);
        assert_eq!(summary.monthly_sales[0].label, "2023 : Jan");
        assert_eq!(summary.rules.rule_count, 1);
    }

    #[test]
    fn empty_selection_has_empty_aggregates() {
        let sel = FilterSelection::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        let summary = DashboardSummary::compute(&dataset(), &RuleSet::default(), &sel);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.total_sales, 0.0);
        assert!(summary.sales_by_sub_category.is_empty());
        assert!(summary.profit_by_market.is_empty());
        assert!(summary.monthly_sales.is_empty());
        assert!(summary.sales_by_segment.is_empty());
        assert!(summary.sales_by_ship_mode.is_empty());
        assert_eq!(summary.quantity_profit.len(), 2);
        assert!(summary.rules.lift_pivot.is_empty());
    }

    #[test]
    fn scatter_ignores_the_filters() {
        let ds = dataset();
        let everything = DashboardSummary::compute(&ds, &rules(), &FilterSelection::for_dataset(&ds));
        let us_only = DashboardSummary::compute(
            &ds,
            &rules(),
            &FilterSelection::for_dataset(&ds).with_market("US"),
        );
        assert_eq!(us_only.order_count, 1);
        assert_eq!(us_only.quantity_profit.len(), everything.quantity_profit.len());
        assert_eq!(us_only.quantity_profit.len(), 2);
    }

    #[test]
    fn summary_serializes() {
        let sel = FilterSelection::for_dataset(&dataset());
        let json = DashboardSummary::compute(&dataset(), &rules(), &sel).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["order_count"], 2);
        assert_eq!(value["rules"]["support_by_antecedent"][0]["key"], "milk");
        assert_eq!(value["selection"]["start"], "2023-01-05");
    }
}

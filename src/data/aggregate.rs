//! Group-and-sum helpers feeding each chart.
//!
//! Every function takes the already-filtered rows and returns fresh vectors;
//! an empty input always yields an empty output.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::Serialize;

use super::model::{AssociationRule, OrderRecord};

// ---------------------------------------------------------------------------
// Grouped sums
// ---------------------------------------------------------------------------

/// One bar / slice: a group key and its summed measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// Sum `measure` per `key`, returned in ascending key order.
pub fn sum_by<'a, T, I, K, M>(rows: I, key: K, measure: M) -> Vec<GroupTotal>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Fn(&'a T) -> &'a str,
    M: Fn(&'a T) -> f64,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(key(row)).or_insert(0.0) += measure(row);
    }
    totals
        .into_iter()
        .map(|(key, total)| GroupTotal {
            key: key.to_string(),
            total,
        })
        .collect()
}

pub fn sales_by_sub_category<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<GroupTotal> {
    sum_by(orders, |o| o.sub_category.as_str(), |o| o.sales)
}

pub fn profit_by_market<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<GroupTotal> {
    sum_by(orders, |o| o.market.as_str(), |o| o.profit)
}

pub fn sales_by_segment<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<GroupTotal> {
    sum_by(orders, |o| o.segment.as_str(), |o| o.sales)
}

// ---------------------------------------------------------------------------
// Monthly series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    /// `"YYYY : Mon"`, e.g. `"2023 : Jan"`.
    pub label: String,
    pub total: f64,
}

/// Sales per calendar month, ordered by the `"YYYY : Mon"` label text.
///
/// Months within a year come out alphabetically: `Apr`, `Aug`, `Dec`, ...
pub fn monthly_sales<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<String, (i32, u32, f64)> = BTreeMap::new();
    for o in orders {
        let d = o.order_date;
        totals
            .entry(d.format("%Y : %b").to_string())
            .or_insert((d.year(), d.month(), 0.0))
            .2 += o.sales;
    }
    totals
        .into_iter()
        .map(|(label, (year, month, total))| MonthlyTotal {
            year,
            month,
            label,
            total,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot spreads
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub key: String,
    /// Raw values, sorted ascending.
    pub values: Vec<f64>,
    pub spread: Spread,
    /// Values beyond the whiskers.
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of an ascending slice. `p` in `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

impl Distribution {
    /// Summarize a group of raw values. `None` when `values` is empty.
    pub fn from_values(key: impl Into<String>, mut values: Vec<f64>) -> Option<Self> {
        values.sort_by(f64::total_cmp);
        let q1 = quantile(&values, 0.25)?;
        let median = quantile(&values, 0.5)?;
        let q3 = quantile(&values, 0.75)?;
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = || values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside().fold(f64::INFINITY, f64::min).min(q1);
        let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max).max(q3);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(Distribution {
            key: key.into(),
            spread: Spread {
                lower_whisker,
                q1,
                median,
                q3,
                upper_whisker,
            },
            values,
            outliers,
        })
    }
}

/// Sales values per ship mode, ascending by ship mode.
pub fn sales_by_ship_mode<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<Distribution> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for o in orders {
        groups.entry(o.ship_mode.as_str()).or_default().push(o.sales);
    }
    groups
        .into_iter()
        .filter_map(|(key, values)| Distribution::from_values(key, values))
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub quantity: i64,
    pub profit: f64,
    /// Drives the marker size.
    pub sales: f64,
}

pub fn quantity_profit_points<'a>(orders: impl IntoIterator<Item = &'a OrderRecord>) -> Vec<ScatterPoint> {
    orders
        .into_iter()
        .map(|o| ScatterPoint {
            quantity: o.quantity,
            profit: o.profit,
            sales: o.sales,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Association rules
// ---------------------------------------------------------------------------

/// Order by descending total, ties by key.
fn ranked(mut totals: Vec<GroupTotal>) -> Vec<GroupTotal> {
    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    totals
}

fn sum_rules(rules: &[AssociationRule], key: impl Fn(&AssociationRule) -> String, measure: impl Fn(&AssociationRule) -> f64) -> Vec<GroupTotal> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for rule in rules {
        *totals.entry(key(rule)).or_insert(0.0) += measure(rule);
    }
    totals
        .into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect()
}

/// Support summed per antecedent label, highest first.
pub fn support_by_antecedent(rules: &[AssociationRule]) -> Vec<GroupTotal> {
    ranked(sum_rules(rules, |r| r.antecedents.label(), |r| r.support))
}

/// Support summed per consequent label, highest first.
pub fn support_by_consequent(rules: &[AssociationRule]) -> Vec<GroupTotal> {
    ranked(sum_rules(rules, |r| r.consequents.label(), |r| r.support))
}

pub fn lift_by_antecedent(rules: &[AssociationRule]) -> Vec<GroupTotal> {
    sum_rules(rules, |r| r.antecedents.label(), |r| r.lift)
}

pub fn lift_by_consequent(rules: &[AssociationRule]) -> Vec<GroupTotal> {
    sum_rules(rules, |r| r.consequents.label(), |r| r.lift)
}

/// Mean lift per antecedent × consequent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiftPivot {
    /// Antecedent labels, ascending.
    pub rows: Vec<String>,
    /// Consequent labels, ascending.
    pub columns: Vec<String>,
    /// `cells[row][column]`, `None` where no rule links the pair.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl LiftPivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    /// Smallest and largest populated cell.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| {
                Some(match acc {
                    None => (v, v),
                    Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
                })
            })
    }
}

pub fn lift_pivot(rules: &[AssociationRule]) -> LiftPivot {
    let mut sums: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    let mut rows = BTreeSet::new();
    let mut columns = BTreeSet::new();
    for rule in rules {
        let (a, c) = (rule.antecedents.label(), rule.consequents.label());
        rows.insert(a.clone());
        columns.insert(c.clone());
        let cell = sums.entry((a, c)).or_insert((0.0, 0));
        cell.0 += rule.lift;
        cell.1 += 1;
    }

    let rows: Vec<String> = rows.into_iter().collect();
    let columns: Vec<String> = columns.into_iter().collect();
    let cells = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| {
                    sums.get(&(r.clone(), c.clone()))
                        .map(|&(sum, n)| sum / n as f64)
                })
                .collect()
        })
        .collect();

    LiftPivot {
        rows,
        columns,
        cells,
    }
}

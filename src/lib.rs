//! Sales and market-basket analytics: load order and association-rule tables,
//! filter the orders by date / market / category and aggregate them for the
//! dashboard charts.

pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod report;
pub mod state;

pub use data::filter::{FilterSelection, apply_filters, filtered_indices};
pub use data::loader::{load_orders, load_rules};
pub use data::model::{AssociationRule, ItemSet, OrderDataset, OrderRecord, RuleSet};
pub use error::DataError;
pub use report::DashboardSummary;

/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate schema, parse rows → OrderDataset / RuleSet
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ OrderDataset  │  Vec<OrderRecord>, date range, distinct markets/categories
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date window, then market / category predicate → indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  grouped sums, monthly series, spreads, lift pivot
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

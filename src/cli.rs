// Command-line interface definitions and parsing for insight-dash

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::FilterSelection;
use crate::data::loader::parse_date;
use crate::data::model::OrderDataset;

pub const DEFAULT_ORDERS_FILE: &str = "orders_cleaned.csv";
pub const DEFAULT_RULES_FILE: &str = "association_rules_results.csv";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // Inputs
    /// Orders table (.csv, .json or .parquet)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ORDERS_FILE, help_heading = "Inputs")]
    pub orders: PathBuf,

    /// Association rules table (.csv, .json or .parquet)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_RULES_FILE, help_heading = "Inputs")]
    pub rules: PathBuf,

    // Initial filters
    /// First order date to include (default: earliest in the data)
    #[arg(long, value_name = "DATE", value_parser = parse_cli_date, help_heading = "Filters")]
    pub start: Option<NaiveDate>,

    /// Last order date to include (default: latest in the data)
    #[arg(long, value_name = "DATE", value_parser = parse_cli_date, help_heading = "Filters")]
    pub end: Option<NaiveDate>,

    /// Only orders from this market
    #[arg(long, value_name = "NAME", help_heading = "Filters")]
    pub market: Option<String>,

    /// Only orders from this category (repeatable)
    #[arg(long = "category", value_name = "NAME", help_heading = "Filters")]
    pub categories: Vec<String>,

    // Output
    /// Print the aggregates as JSON instead of opening the dashboard
    #[arg(long, help_heading = "Output")]
    pub summary: bool,
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a date (expected YYYY-MM-DD)"))
}

impl Cli {
    /// Initial selection: command-line values over the dataset's full range.
    pub fn selection(&self, orders: &OrderDataset) -> FilterSelection {
        let mut selection = FilterSelection::for_dataset(orders);
        if let Some(start) = self.start {
            selection.start = start;
        }
        if let Some(end) = self.end {
            selection.end = end;
        }
        selection.market = self.market.clone();
        selection.categories = self.categories.iter().cloned().collect();
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::OrderRecord;

    #[test]
    fn defaults_point_at_cleaned_exports() {
        let cli = Cli::try_parse_from(["insight-dash"]).unwrap();
        assert_eq!(cli.orders, PathBuf::from(DEFAULT_ORDERS_FILE));
        assert_eq!(cli.rules, PathBuf::from(DEFAULT_RULES_FILE));
        assert!(!cli.summary);
        assert!(cli.categories.is_empty());
    }

    #[test]
    fn parses_filters() {
        let cli = Cli::try_parse_from([
            "insight-dash",
            "--summary",
            "--start",
            "2023-01-01",
            "--market",
            "US",
            "--category",
            "Technology",
            "--category",
            "Furniture",
        ])
        .unwrap();
        assert!(cli.summary);
        assert_eq!(cli.start, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(cli.categories, ["Technology", "Furniture"]);
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["insight-dash", "--end", "soon"]).is_err());
    }

    #[test]
    fn selection_fills_gaps_from_dataset() {
        let ds = OrderDataset::from_orders(vec![OrderRecord {
            order_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            market: "EU".into(),
            category: "Office Supplies".into(),
            sub_category: "Paper".into(),
            ship_mode: "Same Day".into(),
            sales: 12.0,
            profit: 3.0,
            quantity: 2,
            segment: "Home Office".into(),
        }]);
        let cli = Cli::try_parse_from(["insight-dash", "--end", "2022-12-31", "--market", "EU"]).unwrap();
        let sel = cli.selection(&ds);
        assert_eq!(sel.start, NaiveDate::from_ymd_opt(2022, 5, 1).unwrap());
        assert_eq!(sel.end, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
        assert_eq!(sel.market.as_deref(), Some("EU"));
    }
}

use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{AssociationRule, ItemSet, OrderDataset, OrderRecord, RuleSet};
use crate::error::{DataError, Result};

/// Columns every orders table must carry, in the order rows are assembled.
pub const ORDER_COLUMNS: [&str; 9] = [
    "Order Date",
    "Market",
    "Category",
    "Sub-Category",
    "Ship Mode",
    "Sales",
    "Profit",
    "Quantity",
    "Segment",
];

/// Columns every association-rules table must carry.
pub const RULE_COLUMNS: [&str; 4] = ["antecedents", "consequents", "support", "lift"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the orders table. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least [`ORDER_COLUMNS`]
/// * `.json`    – `[{ "Order Date": "2023-01-05", "Market": "US", ... }, ...]`
/// * `.parquet` – one column per field; dates may be `Date32`, `Date64`,
///   `Timestamp` or text
pub fn load_orders(path: &Path) -> Result<OrderDataset> {
    let rows = read_table(path, "Orders", &ORDER_COLUMNS)?;
    let orders = rows
        .into_iter()
        .enumerate()
        .map(|(row, cells)| order_from_cells(row, cells))
        .collect::<Result<Vec<_>>>()?;

    let dataset = OrderDataset::from_orders(orders);
    log::info!(
        "Loaded {} orders from {} ({} markets, {} categories)",
        dataset.len(),
        path.display(),
        dataset.markets.len(),
        dataset.categories.len()
    );
    Ok(dataset)
}

/// Load the association-rules table. Same formats as [`load_orders`].
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let rows = read_table(path, "Association rules", &RULE_COLUMNS)?;
    let rules = rows
        .into_iter()
        .enumerate()
        .map(|(row, cells)| rule_from_cells(row, cells))
        .collect::<Result<Vec<_>>>()?;

    log::info!("Loaded {} association rules from {}", rules.len(), path.display());
    Ok(RuleSet::from_rules(rules))
}

// ---------------------------------------------------------------------------
// Format-independent row assembly
// ---------------------------------------------------------------------------

/// One cell of a required column, as read from any of the formats.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Null,
}

impl Cell {
    fn into_text(self) -> String {
        match self {
            Cell::Text(s) => s,
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.to_string(),
            Cell::Null => String::new(),
        }
    }

    fn to_f64(&self, row: usize, column: &str) -> Result<f64> {
        match self {
            Cell::Number(n) => Ok(*n),
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid_number(row, column, s)),
            other => Err(invalid_number(row, column, &format!("{other:?}"))),
        }
    }

    fn to_i64(&self, row: usize, column: &str) -> Result<i64> {
        if let Cell::Text(s) = self {
            if let Ok(i) = s.trim().parse::<i64>() {
                return Ok(i);
            }
        }
        let v = self.to_f64(row, column)?;
        if v.fract() == 0.0 && v.is_finite() {
            Ok(v as i64)
        } else {
            Err(invalid_number(row, column, &v.to_string()))
        }
    }

    fn to_date(&self, row: usize) -> Result<NaiveDate> {
        match self {
            Cell::Date(d) => Ok(*d),
            Cell::Text(s) => parse_date(s).ok_or_else(|| DataError::InvalidDate {
                row,
                value: s.clone(),
            }),
            other => Err(DataError::InvalidDate {
                row,
                value: format!("{other:?}"),
            }),
        }
    }
}

fn invalid_number(row: usize, column: &str, value: &str) -> DataError {
    DataError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Parse the date formats seen in exported order tables.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// `cells` follow [`ORDER_COLUMNS`].
fn order_from_cells(row: usize, cells: Vec<Cell>) -> Result<OrderRecord> {
    let [date, market, category, sub_category, ship_mode, sales, profit, quantity, segment]: [Cell; 9] =
        cells.try_into().map_err(|_| DataError::MissingColumns {
            table: "Orders",
            missing: Vec::new(),
        })?;

    Ok(OrderRecord {
        order_date: date.to_date(row)?,
        sales: sales.to_f64(row, ORDER_COLUMNS[5])?,
        profit: profit.to_f64(row, ORDER_COLUMNS[6])?,
        quantity: quantity.to_i64(row, ORDER_COLUMNS[7])?,
        market: market.into_text(),
        category: category.into_text(),
        sub_category: sub_category.into_text(),
        ship_mode: ship_mode.into_text(),
        segment: segment.into_text(),
    })
}

/// `cells` follow [`RULE_COLUMNS`].
fn rule_from_cells(row: usize, cells: Vec<Cell>) -> Result<AssociationRule> {
    let [antecedents, consequents, support, lift]: [Cell; 4] =
        cells.try_into().map_err(|_| DataError::MissingColumns {
            table: "Association rules",
            missing: Vec::new(),
        })?;

    Ok(AssociationRule {
        support: support.to_f64(row, RULE_COLUMNS[2])?,
        lift: lift.to_f64(row, RULE_COLUMNS[3])?,
        antecedents: ItemSet::parse(&antecedents.into_text()),
        consequents: ItemSet::parse(&consequents.into_text()),
    })
}

/// Position of each required column in `available`, or every missing name.
fn resolve_columns(table: &'static str, available: &[String], required: &[&str]) -> Result<Vec<usize>> {
    let mut positions = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match available.iter().position(|h| h.trim() == *name) {
            Some(i) => positions.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(DataError::MissingColumns { table, missing })
    }
}

/// Read the required columns of a table, one `Vec<Cell>` per row.
fn read_table(path: &Path, table: &'static str, required: &[&str]) -> Result<Vec<Vec<Cell>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path, table, required),
        "json" => read_json(path, table, required),
        "parquet" | "pq" => read_parquet(path, table, required),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, table: &'static str, required: &[&str]) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let positions = resolve_columns(table, &headers, required)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            positions
                .iter()
                .map(|&i| Cell::Text(record.get(i).unwrap_or("").to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape `df.to_json(orient='records')` writes.
fn read_json(path: &Path, table: &'static str, required: &[&str]) -> Result<Vec<Vec<Cell>>> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    if let Some(first) = records.first() {
        let keys: Vec<String> = first.keys().cloned().collect();
        resolve_columns(table, &keys, required)?;
    }

    records
        .iter()
        .enumerate()
        .map(|(row, obj)| {
            required
                .iter()
                .map(|name| match obj.get(*name) {
                    Some(val) => Ok(json_to_cell(val)),
                    None => Err(DataError::MissingField {
                        row,
                        column: name.to_string(),
                    }),
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map_or_else(|| Cell::Text(n.to_string()), Cell::Number),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path, table: &'static str, required: &[&str]) -> Result<Vec<Vec<Cell>>> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let positions = resolve_columns(table, &names, required)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns = positions
            .iter()
            .map(|&i| normalize_column(batch.column(i)))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .zip(required)
                .map(|(col, name)| arrow_cell(col, row, rows.len(), name))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }
    Ok(rows)
}

/// Cast to one of the three physical types [`arrow_cell`] understands:
/// `Utf8`, `Float64` and `Date32`.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Utf8 | DataType::Float64 | DataType::Date32 | DataType::Null => return Ok(col.clone()),
        DataType::Date64 | DataType::Timestamp(_, _) => DataType::Date32,
        DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(_, _) => DataType::Utf8,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float16
        | DataType::Float32 => DataType::Float64,
        _ => return Ok(col.clone()),
    };
    Ok(cast(col, &target)?)
}

fn arrow_cell(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Cell::Text(col.as_string::<i32>().value(row).to_string())),
        DataType::Float64 => Ok(Cell::Number(col.as_primitive::<Float64Type>().value(row))),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(Cell::Date)
            .ok_or_else(|| DataError::InvalidDate {
                row: row_no,
                value: col.as_primitive::<Date32Type>().value(row).to_string(),
            }),
        other => Err(DataError::UnsupportedColumnType {
            row: row_no,
            column: name.to_string(),
            data_type: format!("{other:?}"),
        }),
    }
}

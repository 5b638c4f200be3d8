use std::path::PathBuf;

/// Everything that can go wrong while loading an order or rule table.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{table} table is missing required column(s): {}", .missing.join(", "))]
    MissingColumns {
        table: &'static str,
        missing: Vec<String>,
    },

    #[error("Row {row}: required column '{column}' is absent")]
    MissingField { row: usize, column: String },

    #[error("Row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}, column '{column}': '{value}' is not a valid number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}, column '{column}': unsupported column type {data_type}")]
    UnsupportedColumnType {
        row: usize,
        column: String,
        data_type: String,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;

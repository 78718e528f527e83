//! qs-results: result tables, timestamp indexing and columnar run storage.

pub mod assemble;
pub mod index;
pub mod phase;
pub mod store;
pub mod table;
pub mod types;

pub use assemble::{POWER_PREFIX, assemble_run, assemble_series};
pub use index::index_tables;
pub use phase::{POWER_LABELS, PhaseLayout};
pub use store::{RunLayout, RunStore, TIMESTAMP_COLUMN};
pub use table::{Column, ResultTable, TimestampedTable};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Unexpected measurement width {width} for '{entity}' at row {row}")]
    Shape {
        entity: String,
        width: usize,
        row: usize,
    },

    #[error("Result name '{name}' is produced twice")]
    DuplicateName { name: String },

    #[error("Table '{name}' has {rows} rows, expected {expected}")]
    RowCountMismatch {
        name: String,
        rows: usize,
        expected: usize,
    },

    #[error("Table '{name}' is malformed: {what}")]
    MalformedTable { name: String, what: String },

    #[error("Run not found: {}", path.display())]
    RunNotFound { path: std::path::PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

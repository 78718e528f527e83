//! Query helpers for stored runs.

use std::path::Path;

use chrono::NaiveDateTime;
use qs_results::{RunManifest, RunStore};

use crate::error::{AppError, AppResult};

/// Row and column overview of one stored table.
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
}

/// A stored run: its manifest plus what is actually on disk.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub manifest: RunManifest,
    pub tables: Vec<TableSummary>,
}

/// Read a stored run back and summarize its tables.
pub fn summarize_run(run_dir: &Path) -> AppResult<RunSummary> {
    let manifest = RunStore::load_manifest(run_dir)?;
    let tables = RunStore::load_run(run_dir)?
        .into_iter()
        .map(|(name, table)| TableSummary {
            rows: table.row_count(),
            columns: table.labels().into_iter().map(str::to_string).collect(),
            time_range: table.index.first().copied().zip(table.index.last().copied()),
            name,
        })
        .collect();
    Ok(RunSummary { manifest, tables })
}

/// List the tables stored in a run.
pub fn list_tables(run_dir: &Path) -> AppResult<Vec<String>> {
    Ok(RunStore::list_tables(run_dir)?)
}

/// Extract one column of a stored table as `(timestamp, value)` pairs.
pub fn extract_series(
    run_dir: &Path,
    table: &str,
    column: &str,
) -> AppResult<Vec<(NaiveDateTime, f64)>> {
    let data = RunStore::load_table(run_dir, table)?;
    let values = data.column(column).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Unknown column '{}' in table '{}' (available: {})",
            column,
            table,
            data.labels().join(", ")
        ))
    })?;
    Ok(data
        .index
        .iter()
        .copied()
        .zip(values.values.iter().copied())
        .collect())
}

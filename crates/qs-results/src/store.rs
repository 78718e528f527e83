//! Run storage: one Parquet file per table plus a JSON manifest.
//!
//! Runs live under `<root>/<year>/<scenario>/<scope>/run_<date>_<days>_days/`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use qs_core::{CircuitScope, STEP_MINUTES, SimulationWindow};

use crate::table::{Column, TimestampedTable};
use crate::types::{RunManifest, TableEntry};
use crate::{ResultsError, ResultsResult};

/// Name of the time index column in stored tables.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

const TABLE_EXTENSION: &str = "parquet";
const MANIFEST_FILE: &str = "manifest.json";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where a run is stored, relative to the results root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    pub window: SimulationWindow,
    pub scenario: String,
    pub scope: String,
}

impl RunLayout {
    pub fn new(window: SimulationWindow, scenario: impl Into<String>, scope: &CircuitScope) -> Self {
        Self {
            window,
            scenario: scenario.into(),
            scope: scope.name().to_string(),
        }
    }

    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(self.window.year().to_string())
            .join(&self.scenario)
            .join(&self.scope)
            .join(self.window.label())
    }
}

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    /// The root is only created once a run is saved.
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, layout: &RunLayout) -> PathBuf {
        self.root_dir.join(layout.relative_dir())
    }

    /// Write every table as `<name>.parquet` plus the manifest, replacing
    /// files of the same names. An empty mapping writes nothing.
    pub fn save_run(
        &self,
        layout: &RunLayout,
        tables: &BTreeMap<String, TimestampedTable>,
    ) -> ResultsResult<PathBuf> {
        let run_dir = self.run_dir(layout);
        if tables.is_empty() {
            tracing::warn!(dir = %run_dir.display(), "no result tables to save");
            return Ok(run_dir);
        }
        for name in tables.keys() {
            check_table_name(name)?;
        }
        fs::create_dir_all(&run_dir)?;

        let mut entries = Vec::with_capacity(tables.len());
        for (name, table) in tables {
            let file = format!("{name}.{TABLE_EXTENSION}");
            write_table(&run_dir.join(&file), name, table)?;
            tracing::debug!(table = %name, rows = table.row_count(), "table written");
            entries.push(TableEntry {
                name: name.clone(),
                file,
                rows: table.row_count(),
                columns: table.labels().into_iter().map(str::to_string).collect(),
                first_timestamp: table.index.first().map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
                last_timestamp: table.index.last().map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            });
        }

        let window = &layout.window;
        let manifest = RunManifest {
            scenario: layout.scenario.clone(),
            scope: layout.scope.clone(),
            year: window.year(),
            start_date: window.start_date().format("%Y-%m-%d").to_string(),
            days: window.day_count(),
            start_hour_of_year: window.start_hour_of_year(),
            step_minutes: STEP_MINUTES,
            step_count: window.step_count(),
            created: chrono::Utc::now().to_rfc3339(),
            tables: entries,
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        tracing::info!(dir = %run_dir.display(), tables = tables.len(), "run saved");
        Ok(run_dir)
    }

    pub fn load_manifest(run_dir: &Path) -> ResultsResult<RunManifest> {
        let manifest_path = run_dir.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                path: run_dir.to_path_buf(),
            });
        }
        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Table names stored in `run_dir`, sorted.
    pub fn list_tables(run_dir: &Path) -> ResultsResult<Vec<String>> {
        if !run_dir.is_dir() {
            return Err(ResultsError::RunNotFound {
                path: run_dir.to_path_buf(),
            });
        }
        let suffix = format!(".{TABLE_EXTENSION}");
        let mut names = Vec::new();
        for entry in fs::read_dir(run_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(name) = file_name.strip_suffix(&suffix) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load_table(run_dir: &Path, name: &str) -> ResultsResult<TimestampedTable> {
        check_table_name(name)?;
        let path = run_dir.join(format!("{name}.{TABLE_EXTENSION}"));
        if !path.exists() {
            return Err(ResultsError::RunNotFound { path });
        }
        read_table(&path, name)
    }

    pub fn load_run(run_dir: &Path) -> ResultsResult<BTreeMap<String, TimestampedTable>> {
        let mut tables = BTreeMap::new();
        for name in Self::list_tables(run_dir)? {
            let table = Self::load_table(run_dir, &name)?;
            tables.insert(name, table);
        }
        Ok(tables)
    }
}

fn malformed(name: &str, what: impl Into<String>) -> ResultsError {
    ResultsError::MalformedTable {
        name: name.to_string(),
        what: what.into(),
    }
}

/// Table names become file stems inside the run directory.
fn check_table_name(name: &str) -> ResultsResult<()> {
    if qs_core::is_file_safe_name(name) {
        Ok(())
    } else {
        Err(malformed(name, "name is not usable as a file name"))
    }
}

fn write_table(path: &Path, name: &str, table: &TimestampedTable) -> ResultsResult<()> {
    check_table_name(name)?;
    if table.columns.iter().any(|c| c.values.len() != table.row_count()) {
        return Err(malformed(name, "column length differs from index length"));
    }

    let mut fields = vec![Field::new(
        TIMESTAMP_COLUMN,
        DataType::Timestamp(TimeUnit::Millisecond, None),
        false,
    )];
    let millis: Vec<i64> = table
        .index
        .iter()
        .map(|t| t.and_utc().timestamp_millis())
        .collect();
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(TimestampMillisecondArray::from(millis))];

    for column in &table.columns {
        fields.push(Field::new(column.label.as_str(), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(column.values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn read_table(path: &Path, name: &str) -> ResultsResult<TimestampedTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let fields = schema.fields();
    match fields.first() {
        Some(field) if field.name() == TIMESTAMP_COLUMN => {}
        _ => return Err(malformed(name, "missing timestamp column")),
    }

    let mut index = Vec::new();
    let mut columns: Vec<Column> = fields
        .iter()
        .skip(1)
        .map(|f| Column::new(f.name().as_str(), Vec::new()))
        .collect();

    for batch in reader {
        let batch = batch?;
        let stamps = batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .ok_or_else(|| malformed(name, "timestamp column is not millisecond precision"))?;
        for millis in stamps.values().iter() {
            let ts = DateTime::from_timestamp_millis(*millis)
                .ok_or_else(|| malformed(name, format!("timestamp {millis} out of range")))?;
            index.push(ts.naive_utc());
        }

        for (i, column) in columns.iter_mut().enumerate() {
            let values = batch
                .column(i + 1)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| malformed(name, format!("column '{}' is not Float64", column.label)))?;
            column.values.extend(values.values().iter().copied());
        }
    }

    Ok(TimestampedTable { index, columns })
}

//! Persisted run metadata.

use serde::{Deserialize, Serialize};

/// Description of a saved run, stored as `manifest.json` beside its tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub scenario: String,
    pub scope: String,
    pub year: i32,
    pub start_date: String,
    pub days: u32,
    pub start_hour_of_year: u32,
    pub step_minutes: i64,
    pub step_count: usize,
    pub created: String,
    pub tables: Vec<TableEntry>,
}

/// One stored table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableEntry {
    pub name: String,
    pub file: String,
    pub rows: usize,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<String>,
}

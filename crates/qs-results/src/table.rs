//! Result table types.

use chrono::NaiveDateTime;

/// One labelled column of floating point values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Phase-labelled table with one row per solved step, indexed by step ordinal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl ResultTable {
    /// Table without columns or rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from columns of equal length. Returns `None` on ragged columns.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let row_count = columns.first().map_or(0, |c| c.values.len());
        if columns.iter().any(|c| c.values.len() != row_count) {
            return None;
        }
        Some(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A [`ResultTable`] whose rows are indexed by absolute timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedTable {
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl TimestampedTable {
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }
}

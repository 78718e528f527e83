//! Raw per-entity measurement series accumulated by the step loop.

/// One step's reading for one entity. The width encodes the phase count.
pub type MeasurementTuple = Vec<f64>;

/// What a series measures; selects the column layout downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Voltage magnitude/angle pairs per phase.
    Voltage,
    /// Real/reactive power pairs per phase.
    Power,
}

/// Ordered step-by-step readings for one named entity.
///
/// Row `i` is the reading taken right after solve number `i`; rows are only
/// ever appended.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    name: String,
    kind: SeriesKind,
    rows: Vec<MeasurementTuple>,
}

impl RawSeries {
    pub fn new(name: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rows: Vec::new(),
        }
    }

    pub fn with_capacity(name: impl Into<String>, kind: SeriesKind, capacity: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: MeasurementTuple) {
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn rows(&self) -> &[MeasurementTuple] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the first row, if any.
    pub fn first_width(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }
}

/// Whether `name` can be used as a result file stem: non-empty, not `.` or
/// `..`, and free of path separators and NUL.
pub fn is_file_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

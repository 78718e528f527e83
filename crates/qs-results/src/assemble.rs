//! Result assembly: raw per-step tuples into phase-labelled tables.

use std::collections::BTreeMap;

use qs_core::{RawSeries, SeriesKind};

use crate::phase::{POWER_LABELS, PhaseLayout};
use crate::table::{Column, ResultTable};
use crate::{ResultsError, ResultsResult};

/// Prefix keeping source power tables apart from bus tables.
pub const POWER_PREFIX: &str = "power_";

fn shape_error(series: &RawSeries, width: usize, row: usize) -> ResultsError {
    ResultsError::Shape {
        entity: series.name().to_string(),
        width,
        row,
    }
}

/// Turn one raw series into a table.
///
/// The first row fixes the layout: voltage series must be 2, 4 or 6 wide,
/// power series exactly 6 wide. Any row disagreeing with that width is a
/// shape fault; nothing is padded or truncated. An empty series yields an
/// empty table.
pub fn assemble_series(series: &RawSeries) -> ResultsResult<ResultTable> {
    let Some(first_width) = series.first_width() else {
        return Ok(ResultTable::empty());
    };

    let labels: &[&str] = match series.kind() {
        SeriesKind::Voltage => PhaseLayout::from_width(first_width)
            .ok_or_else(|| shape_error(series, first_width, 0))?
            .labels(),
        SeriesKind::Power => {
            if first_width != POWER_LABELS.len() {
                return Err(shape_error(series, first_width, 0));
            }
            &POWER_LABELS
        }
    };

    let width = labels.len();
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(series.len()); width];
    for (row_idx, row) in series.rows().iter().enumerate() {
        if row.len() != width {
            return Err(shape_error(series, row.len(), row_idx));
        }
        for (column, value) in values.iter_mut().zip(row) {
            column.push(*value);
        }
    }

    let columns = labels
        .iter()
        .zip(values)
        .map(|(label, v)| Column::new(*label, v))
        .collect();
    ResultTable::from_columns(columns).ok_or_else(|| ResultsError::MalformedTable {
        name: series.name().to_string(),
        what: "ragged columns".to_string(),
    })
}

/// Assemble every bus and source series into one mapping.
///
/// Bus tables are keyed by bus name, source tables by `power_<source>`.
pub fn assemble_run(
    buses: &[RawSeries],
    sources: &[RawSeries],
) -> ResultsResult<BTreeMap<String, ResultTable>> {
    let mut tables = BTreeMap::new();

    let named = buses
        .iter()
        .map(|s| (s.name().to_string(), s))
        .chain(
            sources
                .iter()
                .map(|s| (format!("{POWER_PREFIX}{}", s.name()), s)),
        );

    for (name, series) in named {
        let table = assemble_series(series)?;
        tracing::debug!(
            table = %name,
            rows = table.row_count(),
            columns = table.columns().len(),
            "assembled result table"
        );
        if tables.insert(name.clone(), table).is_some() {
            return Err(ResultsError::DuplicateName { name });
        }
    }

    Ok(tables)
}

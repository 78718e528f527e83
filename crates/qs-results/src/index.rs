//! Timestamp indexing of assembled tables.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use qs_core::timestamp_sequence;

use crate::table::{ResultTable, TimestampedTable};
use crate::{ResultsError, ResultsResult};

/// Bookkeeping columns some result sources carry; never part of the output.
const BOOKKEEPING_COLUMNS: [&str; 2] = ["Hour", "sec"];

/// Attach wall-clock timestamps to every table.
///
/// Row `i` gets `start_date 00:15 + i * 15 min`. All non-empty tables must
/// share one row count. Column labels are trimmed and bookkeeping columns
/// dropped. Empty tables stay empty.
pub fn index_tables(
    tables: BTreeMap<String, ResultTable>,
    start_date: NaiveDate,
) -> ResultsResult<BTreeMap<String, TimestampedTable>> {
    if tables.is_empty() {
        tracing::warn!("no result tables to index");
        return Ok(BTreeMap::new());
    }

    let expected = tables
        .values()
        .find(|t| !t.is_empty())
        .map_or(0, ResultTable::row_count);
    let index = timestamp_sequence(start_date, expected);

    let mut out = BTreeMap::new();
    for (name, table) in tables {
        if table.is_empty() {
            tracing::debug!(table = %name, "empty table left unindexed");
            out.insert(
                name,
                TimestampedTable {
                    index: Vec::new(),
                    columns: Vec::new(),
                },
            );
            continue;
        }
        if table.row_count() != expected {
            return Err(ResultsError::RowCountMismatch {
                name,
                rows: table.row_count(),
                expected,
            });
        }

        let columns = table
            .into_columns()
            .into_iter()
            .filter(|c| !BOOKKEEPING_COLUMNS.contains(&c.label.trim()))
            .map(|mut c| {
                c.label = c.label.trim().to_string();
                c
            })
            .collect();
        out.insert(
            name,
            TimestampedTable {
                index: index.clone(),
                columns,
            },
        );
    }

    Ok(out)
}

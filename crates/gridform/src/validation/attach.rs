//! Error attachment: failures kept in a side-table keyed by row identity.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::{Record, Row, RowId};

use super::failure::ValidationFailure;

/// Failures per row. Rows without failures have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTable {
    entries: HashMap<RowId, Vec<ValidationFailure>>,
}

impl ErrorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a row's failures; an empty list removes the entry.
    pub fn set(&mut self, row: RowId, failures: Vec<ValidationFailure>) {
        if failures.is_empty() {
            self.entries.remove(&row);
        } else {
            self.entries.insert(row, failures);
        }
    }

    /// All failures for a row.
    pub fn failures(&self, row: RowId) -> &[ValidationFailure] {
        self.entries.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Failures whose path is exactly `/<field>`.
    pub fn failures_for_cell(&self, row: RowId, field: &str) -> Vec<&ValidationFailure> {
        self.failures(row)
            .iter()
            .filter(|f| f.is_for_field(field))
            .collect()
    }

    /// Per-field lookup for one row.
    pub fn field_lookup(&self, row: RowId) -> IndexMap<String, Vec<&ValidationFailure>> {
        field_lookup(self.failures(row))
    }

    /// Whether any row has failures.
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of rows with at least one failure.
    pub fn rows_with_errors(&self) -> usize {
        self.entries.len()
    }

    /// Number of failures across all rows.
    pub fn total_failures(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }}

/// Group failures by the top-level field they point at.
///
/// Record-level failures (and paths deeper than one segment) are not
/// included; they remain in the flat list.
pub fn field_lookup(failures: &[ValidationFailure]) -> IndexMap<String, Vec<&ValidationFailure>> {
    let mut lookup: IndexMap<String, Vec<&ValidationFailure>> = IndexMap::new();
    for failure in failures {
        if let Some(field) = failure.field() {
            lookup.entry(field).or_default().push(failure);
        }
    }
    lookup
}

/// Record the failures for `row` and return its annotated view.
pub fn attach(table: &mut ErrorTable, row: &Row, failures: Vec<ValidationFailure>) -> AnnotatedRow {
    table.set(row.id, failures);
    AnnotatedRow::from_row(row, table)
}

/// A row joined with its failures, as handed to the grid.
///
/// `error` is the flat failure list; consumers filter it per cell. It never
/// feeds back into validation: the edit path reads rows as [`EditedRow`]s,
/// which have no `error` member.
///
/// [`EditedRow`]: crate::pipeline::EditedRow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Row identity (the grid's row key).
    pub id: RowId,
    /// Field values.
    pub values: Record,
    /// Every failure for this row.
    #[serde(default)]
    pub error: Vec<ValidationFailure>,
}

impl AnnotatedRow {
    /// Join a row with its entry in the table.
    pub fn from_row(row: &Row, table: &ErrorTable) -> Self {
        Self {
            id: row.id,
            values: row.values.clone(),
            error: table.failures(row.id).to_vec(),
        }
    }

    /// Failures for one cell.
    pub fn failures_for(&self, field: &str) -> Vec<&ValidationFailure> {
        self.error.iter().filter(|f| f.is_for_field(field)).collect()
    }

    /// Whether the row has no failures.
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }

    /// Drop the annotation and return the plain row.
    pub fn strip(&self) -> Row {
        Row::new(self.id, self.values.clone())
    }
}

/// Build annotated views for a whole snapshot.
pub fn annotate(rows: &[Row], table: &ErrorTable) -> Vec<AnnotatedRow> {
    rows.iter().map(|row| AnnotatedRow::from_row(row, table)).collect()
}

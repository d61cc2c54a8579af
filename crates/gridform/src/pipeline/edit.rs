//! Edit pass: re-coerce and re-validate the full replacement row set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coerce::coerce_record;
use crate::record::{Record, Row, RowId, RowIdAllocator, Snapshot};
use crate::schema::FieldDescriptor;
use crate::validation::{AnnotatedRow, ErrorTable, Validation};

/// A row as the grid hands it back after an edit.
///
/// There is no `error` member: an [`AnnotatedRow`] deserialized as an
/// `EditedRow` loses its annotation, so stale failures never reach the
/// validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedRow {
    /// Id of the row this came from; absent for rows added in the grid.
    #[serde(default)]
    pub id: Option<RowId>,
    /// Field values, typed or raw text.
    pub values: Record,
}

impl EditedRow {
    /// A new row with no identity yet.
    pub fn new(values: Record) -> Self {
        Self { id: None, values }
    }

    /// An edited version of an existing row.
    pub fn existing(id: RowId, values: Record) -> Self {
        Self {
            id: Some(id),
            values,
        }
    }
}

impl From<Row> for EditedRow {
    fn from(row: Row) -> Self {
        Self::existing(row.id, row.values)
    }
}

impl From<AnnotatedRow> for EditedRow {
    fn from(row: AnnotatedRow) -> Self {
        Self::existing(row.id, row.values)
    }
}

/// Output of an edit pass.
#[derive(Debug, Clone)]
pub struct EditOutput {
    /// The new live snapshot.
    pub rows: Snapshot,
    /// Failures for the new snapshot, rebuilt from scratch.
    pub errors: ErrorTable,
}

/// Run coerce → validate → attach over every row of the replacement set.
///
/// Rows keep their id when it was issued by `ids` and is not repeated within
/// this set; every other row gets a fresh id.
pub fn edit_all(
    rows: Vec<EditedRow>,
    fields: &[FieldDescriptor],
    validation: &Validation,
    ids: &mut RowIdAllocator,
) -> EditOutput {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut snapshot = Vec::with_capacity(rows.len());
    let mut errors = ErrorTable::new();

    for edited in rows {
        let id = match edited.id {
            Some(id) if ids.issued(id) && seen.insert(id) => id,
            Some(id) => {
                let fresh = ids.allocate();
                tracing::debug!(%id, %fresh, "row id unknown or repeated; assigned a new one");
                seen.insert(fresh);
                fresh
            }
            None => {
                let fresh = ids.allocate();
                seen.insert(fresh);
                fresh
            }
        };

        let mut values = edited.values;
        coerce_record(fields, &mut values);
        let outcome = validation.validate(&values);
        errors.set(id, outcome.errors);
        snapshot.push(Row::new(id, values));
    }

    tracing::debug!(
        rows = snapshot.len(),
        rows_with_errors = errors.rows_with_errors(),
        failures = errors.total_failures(),
        "re-validated edited rows"
    );

    EditOutput {
        rows: snapshot,
        errors,
    }
}

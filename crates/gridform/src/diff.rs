//! Structural diff between the ingested baseline and the edited snapshot.
//!
//! Diffs are computed fresh on every call; nothing is cached between calls.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::record::{Record, Row, RowId};
use crate::validation::AnnotatedRow;

/// Text rendered for an empty diff.
pub const NO_CHANGES: &str = "no changes";

/// A change to one field of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldChange {
    /// Field present only in the current row.
    Added { field: String, value: Value },
    /// Field present only in the baseline row.
    Removed { field: String, value: Value },
    /// Field present in both with different values.
    Changed {
        field: String,
        before: Value,
        after: Value,
    },
}

/// A change to one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowChange {
    /// Row only in the baseline.
    Removed { id: RowId, values: Record },
    /// Row only in the current snapshot.
    Added { id: RowId, values: Record },
    /// Row in both with field changes.
    Modified { id: RowId, fields: Vec<FieldChange> },
}

/// Kind of a rendered diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Row header for a modified row.
    Row,
    /// Removed row or old field value.
    Removed,
    /// Added row or new field value.
    Added,
}

/// One rendered line of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: LineKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// Structural diff of two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotDiff {
    /// Baseline rows in order (removed or modified), then added rows.
    pub changes: Vec<RowChange>,
}

impl SnapshotDiff {
    /// Whether the snapshots are equal.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of added rows.
    pub fn added_count(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Added { .. }))
    }

    /// Number of removed rows.
    pub fn removed_count(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Removed { .. }))
    }

    /// Number of modified rows.
    pub fn modified_count(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Modified { .. }))
    }

    fn count(&self, pred: impl Fn(&RowChange) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }

    /// Render as lines; each starts with `-`, `+` or `~`.
    pub fn lines(&self) -> Vec<DiffLine> {
        let mut lines = Vec::new();
        for change in &self.changes {
            match change {
                RowChange::Removed { id, values } => {
                    lines.push(DiffLine::new(LineKind::Removed, format!("- row {}", id)));
                    for (field, value) in values {
                        lines.push(DiffLine::new(LineKind::Removed, format!("-   {}: {}", field, value)));
                    }
                }
                RowChange::Added { id, values } => {
                    lines.push(DiffLine::new(LineKind::Added, format!("+ row {}", id)));
                    for (field, value) in values {
                        lines.push(DiffLine::new(LineKind::Added, format!("+   {}: {}", field, value)));
                    }
                }
                RowChange::Modified { id, fields } => {
                    lines.push(DiffLine::new(LineKind::Row, format!("~ row {}", id)));
                    for field in fields {
                        match field {
                            FieldChange::Removed { field, value } => lines.push(DiffLine::new(
                                LineKind::Removed,
                                format!("-   {}: {}", field, value),
                            )),
                            FieldChange::Added { field, value } => lines.push(DiffLine::new(
                                LineKind::Added,
                                format!("+   {}: {}", field, value),
                            )),
                            FieldChange::Changed {
                                field,
                                before,
                                after,
                            } => {
                                lines.push(DiffLine::new(
                                    LineKind::Removed,
                                    format!("-   {}: {}", field, before),
                                ));
                                lines.push(DiffLine::new(
                                    LineKind::Added,
                                    format!("+   {}: {}", field, after),
                                ));
                            }
                        }
                    }
                }
            }
        }
        lines
    }
}

impl fmt::Display for SnapshotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}", NO_CHANGES);
        }
        let lines = self.lines();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.text)?;
        }
        Ok(())
    }
}

/// Diff two snapshots, aligning rows by [`RowId`].
pub fn diff_rows(original: &[Row], current: &[Row]) -> SnapshotDiff {
    let current_by_id: HashMap<RowId, &Row> = current.iter().map(|r| (r.id, r)).collect();
    let original_ids: HashSet<RowId> = original.iter().map(|r| r.id).collect();

    let mut changes = Vec::new();

    for before in original {
        match current_by_id.get(&before.id) {
            None => changes.push(RowChange::Removed {
                id: before.id,
                values: before.values.clone(),
            }),
            Some(after) => {
                let fields = diff_fields(&before.values, &after.values);
                if !fields.is_empty() {
                    changes.push(RowChange::Modified {
                        id: before.id,
                        fields,
                    });
                }
            }
        }
    }

    for after in current.iter().filter(|r| !original_ids.contains(&r.id)) {
        changes.push(RowChange::Added {
            id: after.id,
            values: after.values.clone(),
        });
    }

    SnapshotDiff { changes }
}

/// Diff annotated snapshots; `error` is stripped first so validation churn
/// never shows up as a change.
pub fn diff_annotated(original: &[AnnotatedRow], current: &[AnnotatedRow]) -> SnapshotDiff {
    let original: Vec<Row> = original.iter().map(AnnotatedRow::strip).collect();
    let current: Vec<Row> = current.iter().map(AnnotatedRow::strip).collect();
    diff_rows(&original, &current)
}

/// Diff plain record sequences, aligning by position.
pub fn diff_records(original: &[Record], current: &[Record]) -> SnapshotDiff {
    let to_rows = |records: &[Record]| -> Vec<Row> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| Row::new(RowId(i as u64), r.clone()))
            .collect()
    };
    diff_rows(&to_rows(original), &to_rows(current))
}

fn diff_fields(before: &Record, after: &Record) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for (field, old) in before {
        match after.get(field) {
            None => changes.push(FieldChange::Removed {
                field: field.clone(),
                value: old.clone(),
            }),
            Some(new) if new != old => changes.push(FieldChange::Changed {
                field: field.clone(),
                before: old.clone(),
                after: new.clone(),
            }),
            Some(_) => {}
        }
    }

    for (field, new) in after {
        if !before.contains_key(field) {
            changes.push(FieldChange::Added {
                field: field.clone(),
                value: new.clone(),
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationFailure;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn row(id: u64, pairs: &[(&str, Value)]) -> Row {
        Row::new(RowId(id), record(pairs))
    }

    #[test]
    fn test_identical_snapshots() {
        let rows = vec![row(0, &[("foo", json!(12)), ("bar", json!("ab"))])];
        let diff = diff_rows(&rows, &rows);
        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), NO_CHANGES);
    }

    #[test]
    fn test_modified_field() {
        let before = vec![row(0, &[("foo", json!(12)), ("bar", json!("ab"))])];
        let after = vec![row(0, &[("foo", json!(12)), ("bar", json!("abcdef"))])];
        let diff = diff_rows(&before, &after);

        assert_eq!(diff.modified_count(), 1);
        assert_eq!(
            diff.to_string(),
            "~ row 0\n-   bar: \"ab\"\n+   bar: \"abcdef\""
        );
    }

    #[test]
    fn test_removed_and_added_rows_align_by_id() {
        let before = vec![
            row(0, &[("foo", json!(1))]),
            row(1, &[("foo", json!(2))]),
            row(2, &[("foo", json!(3))]),
        ];
        // Row 1 deleted, row 3 appended: rows 0 and 2 must not show as changed.
        let after = vec![
            row(0, &[("foo", json!(1))]),
            row(2, &[("foo", json!(3))]),
            row(3, &[("foo", json!(4))]),
        ];
        let diff = diff_rows(&before, &after);

        assert_eq!(diff.removed_count(), 1);
        assert_eq!(diff.added_count(), 1);
        assert_eq!(diff.modified_count(), 0);
        assert_eq!(diff.to_string(), "- row 1\n-   foo: 2\n+ row 3\n+   foo: 4");
    }

    #[test]
    fn test_field_added_and_removed() {
        let before = vec![row(0, &[("a", json!("x"))])];
        let after = vec![row(0, &[("b", json!("y"))])];
        let diff = diff_rows(&before, &after);
        match &diff.changes[0] {
            RowChange::Modified { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert!(matches!(fields[0], FieldChange::Removed { .. }));
                assert!(matches!(fields[1], FieldChange::Added { .. }));
            }
            other => panic!("unexpected change {:?}", other),
        }
    }

    #[test]
    fn test_error_only_differences_are_not_changes() {
        let base = row(0, &[("bar", json!("ab"))]);
        let clean = vec![AnnotatedRow {
            id: base.id,
            values: base.values.clone(),
            error: Vec::new(),
        }];
        let failing = vec![AnnotatedRow {
            id: base.id,
            values: base.values.clone(),
            error: vec![ValidationFailure::new("/bar", "/properties/bar/minLength", "too short")],
        }];
        assert_eq!(diff_annotated(&clean, &failing).to_string(), NO_CHANGES);
    }

    #[test]
    fn test_positional_record_diff() {
        let before = vec![record(&[("foo", json!("12"))])];
        let after = vec![record(&[("foo", json!("12"))]), record(&[("foo", json!("13"))])];
        let diff = diff_records(&before, &after);
        assert_eq!(diff.added_count(), 1);
        assert!(diff_records(&after, &after).is_empty());
    }

    #[test]
    fn test_line_kinds() {
        let before = vec![row(0, &[("a", json!(1))])];
        let after = vec![row(0, &[("a", json!(2))])];
        let kinds: Vec<_> = diff_rows(&before, &after).lines().into_iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Row, LineKind::Removed, LineKind::Added]);
    }
}

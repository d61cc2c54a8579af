//! Summary statistics for the live snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Row;
use crate::validation::ErrorTable;

/// Counts over the live snapshot and its failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Number of rows.
    pub total_rows: usize,
    /// Number of field columns (selection column excluded).
    pub total_columns: usize,
    /// Rows with at least one failure.
    pub rows_with_errors: usize,
    /// Failures across all rows.
    pub total_failures: usize,
    /// Failures per field, in first-seen order.
    pub failures_by_field: IndexMap<String, usize>,
    /// Failures not tied to a single field (`required`, `additionalProperties`).
    pub record_level_failures: usize,
    /// Whether a schema was available to validate against.
    pub validated: bool,
}

impl IngestSummary {
    /// Compute the summary for a snapshot.
    pub fn compute(rows: &[Row], total_columns: usize, errors: &ErrorTable, validated: bool) -> Self {
        let mut summary = IngestSummary {
            total_rows: rows.len(),
            total_columns,
            validated,
            ..Default::default()
        };

        for row in rows {
            let failures = errors.failures(row.id);
            if failures.is_empty() {
                continue;
            }
            summary.rows_with_errors += 1;
            summary.total_failures += failures.len();
            for failure in failures {
                match failure.field() {
                    Some(field) => *summary.failures_by_field.entry(field).or_insert(0) += 1,
                    None => summary.record_level_failures += 1,
                }
            }
        }

        summary
    }

    /// Share of rows without failures (1.0 for an empty snapshot).
    pub fn valid_ratio(&self) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }
        (self.total_rows - self.rows_with_errors) as f64 / self.total_rows as f64
    }
}

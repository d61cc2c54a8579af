//! Pre-submit check over the live snapshot.

use serde::{Deserialize, Serialize};

use crate::record::Row;
use crate::validation::ErrorTable;

/// Result of scanning the live snapshot before submission.
///
/// Submission itself is up to the caller; this only reports whether a
/// warning should be shown first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitCheck {
    /// Rows in the snapshot.
    pub total_rows: usize,
    /// Rows with at least one failure.
    pub rows_with_errors: usize,
    /// Failures across all rows.
    pub total_failures: usize,
    /// Single aggregate warning, present when any row has failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SubmitCheck {
    /// Whether the snapshot can be submitted without a warning.
    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }
}

/// Scan `rows` for failures.
pub fn check_submit(rows: &[Row], errors: &ErrorTable) -> SubmitCheck {
    let mut rows_with_errors = 0;
    let mut total_failures = 0;
    for row in rows {
        let failures = errors.failures(row.id);
        if !failures.is_empty() {
            rows_with_errors += 1;
            total_failures += failures.len();
        }
    }

    let warning = (rows_with_errors > 0).then(|| {
        format!(
            "{} of {} rows have validation errors ({} in total). Submit anyway?",
            rows_with_errors,
            rows.len(),
            total_failures
        )
    });

    SubmitCheck {
        total_rows: rows.len(),
        rows_with_errors,
        total_failures,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RowId};
    use crate::validation::ValidationFailure;

    fn rows(n: u64) -> Vec<Row> {
        (0..n).map(|i| Row::new(RowId(i), Record::new())).collect()
    }

    #[test]
    fn test_clean_snapshot() {
        let check = check_submit(&rows(3), &ErrorTable::new());
        assert!(check.is_clean());
        assert_eq!(check.total_rows, 3);
    }

    #[test]
    fn test_single_aggregate_warning() {
        let mut errors = ErrorTable::new();
        errors.set(RowId(0), vec![ValidationFailure::new("/a", "", "x")]);
        errors.set(
            RowId(2),
            vec![
                ValidationFailure::new("/a", "", "x"),
                ValidationFailure::new("/b", "", "y"),
            ],
        );

        let check = check_submit(&rows(3), &errors);
        assert_eq!(check.rows_with_errors, 2);
        assert_eq!(check.total_failures, 3);
        assert_eq!(
            check.warning.as_deref(),
            Some("2 of 3 rows have validation errors (3 in total). Submit anyway?")
        );
    }

    #[test]
    fn test_failures_of_deleted_rows_ignored() {
        let mut errors = ErrorTable::new();
        errors.set(RowId(9), vec![ValidationFailure::new("/a", "", "x")]);
        assert!(check_submit(&rows(2), &errors).is_clean());
    }
}

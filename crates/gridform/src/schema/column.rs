//! Grid column descriptors.

use serde::{Deserialize, Serialize};

use crate::record::{display_value, Row};
use crate::validation::ValidationFailure;

/// Key of the leading row-selection column.
pub const SELECT_COLUMN_KEY: &str = "select-row";

/// Marker placed between a cell value and each of its failure messages.
pub const ERROR_SUFFIX_MARKER: &str = " ⚠ ";

/// What a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Row selection checkbox; never edited, never validated.
    Selection,
    /// A field from the parsed header.
    Field,
}

/// One grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Record key the column reads.
    pub key: String,
    /// Header text.
    pub name: String,
    /// Column kind.
    pub kind: ColumnKind,
    /// Whether the grid offers a text editor for the cell.
    pub editable: bool,
}

impl ColumnDescriptor {
    /// The fixed selection column.
    pub fn selection() -> Self {
        Self {
            key: SELECT_COLUMN_KEY.to_string(),
            name: String::new(),
            kind: ColumnKind::Selection,
            editable: false,
        }
    }

    /// An editable column for a header field.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            kind: ColumnKind::Field,
            editable: true,
        }
    }

    /// Render hook: cell text with every failure for this column appended.
    ///
    /// `failures` is the row's full list; matching is by exact `/<key>` path.
    pub fn render_cell(&self, row: &Row, failures: &[ValidationFailure]) -> String {
        if self.kind == ColumnKind::Selection {
            return String::new();
        }

        let mut text = row.get(&self.key).map(display_value).unwrap_or_default();
        for failure in failures.iter().filter(|f| f.is_for_field(&self.key)) {
            text.push_str(ERROR_SUFFIX_MARKER);
            text.push_str(&failure.message);
        }
        text
    }
}

/// Selection column followed by one column per header field, in header order.
pub fn columns_for_fields<S: AsRef<str>>(fields: &[S]) -> Vec<ColumnDescriptor> {
    std::iter::once(ColumnDescriptor::selection())
        .chain(fields.iter().map(|f| ColumnDescriptor::field(f.as_ref())))
        .collect()
}

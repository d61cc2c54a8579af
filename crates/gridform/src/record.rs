//! Record and row types shared by every pipeline stage.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed row exactly as it appeared in the file: header field → cell text.
pub type RawRecord = IndexMap<String, String>;

/// A row's field values after lifting to JSON (and, usually, coercion).
pub type Record = IndexMap<String, Value>;

/// Synthetic row identity assigned at ingestion.
///
/// Ids are stable across edits and never reused within one ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record together with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Row identity.
    pub id: RowId,
    /// Field values in header order.
    pub values: Record,
}

impl Row {
    /// Create a row.
    pub fn new(id: RowId, values: Record) -> Self {
        Self { id, values }
    }

    /// Key used by the grid to track this row across edits.
    pub fn key(&self) -> RowId {
        self.id
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// Lift a raw record into a [`Record`] of JSON strings.
pub fn lift(raw: &RawRecord) -> Record {
    raw.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Text shown for a value in a cell or a diff line.
///
/// Strings are shown without quotes; everything else uses its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// An ordered sequence of rows.
pub type Snapshot = Vec<Row>;

/// Hands out row ids for one ingestion generation.
#[derive(Debug, Clone, Default)]
pub struct RowIdAllocator {
    next: u64,
}

impl RowIdAllocator {
    /// Start a fresh generation at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused id.
    pub fn allocate(&mut self) -> RowId {
        let id = RowId(self.next);
        self.next += 1;
        id
    }

    /// Whether `id` was handed out by this allocator.
    pub fn issued(&self, id: RowId) -> bool {
        id.0 < self.next
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u64 {
        self.next
    }
}

//! Validation failure reported for one record.

use serde::{Deserialize, Serialize};

/// A single reason a record does not satisfy the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// JSON pointer to the offending value; `/bar` for field `bar`, empty for
    /// record-level failures such as `required`.
    pub instance_path: String,
    /// JSON pointer into the schema to the failing keyword.
    pub schema_path: String,
    /// The failing keyword (`minLength`, `type`, `required`, ...).
    pub keyword: String,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationFailure {
    /// Create a failure; the keyword is the last segment of `schema_path`.
    pub fn new(
        instance_path: impl Into<String>,
        schema_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let schema_path = schema_path.into();
        let keyword = schema_path
            .rsplit('/')
            .next()
            .map(unescape)
            .unwrap_or_default();
        Self {
            instance_path: instance_path.into(),
            schema_path,
            keyword,
            message: message.into(),
        }
    }

    /// Top-level field this failure points at, if it points at exactly one.
    pub fn field(&self) -> Option<String> {
        let rest = self.instance_path.strip_prefix('/')?;
        if rest.contains('/') {
            return None;
        }
        Some(unescape(rest))
    }

    /// Whether the path is exactly `/<name>`.
    pub fn is_for_field(&self, name: &str) -> bool {
        self.field().as_deref() == Some(name)
    }

    /// Whether the failure concerns the record as a whole.
    pub fn is_record_level(&self) -> bool {
        self.instance_path.is_empty()
    }
}

/// Undo JSON pointer escaping (`~1` → `/`, `~0` → `~`).
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

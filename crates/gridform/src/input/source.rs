//! Parsed input and its metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RawRecord;

/// Metadata about one ingested source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Name the source was dropped/uploaded under.
    pub name: String,
    /// SHA-256 hash of the source contents.
    pub hash: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header and blank lines).
    pub row_count: usize,
    /// Number of header fields.
    pub column_count: usize,
    /// When the source was ingested.
    pub ingested_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has just been parsed.
    pub fn new(
        name: impl Into<String>,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            ingested_at: Utc::now(),
        }
    }
}

/// Result of parsing delimited text: the header fields and one raw record per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    /// Header fields, in file order.
    pub fields: Vec<String>,
    /// Data rows keyed by header field.
    pub data: Vec<RawRecord>,
}

impl ParsedTable {
    /// Create a parsed table.
    pub fn new(fields: Vec<String>, data: Vec<RawRecord>) -> Self {
        Self { fields, data }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Number of header fields.
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }}

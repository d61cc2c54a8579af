//! Ingestion: parse → coerce → validate → attach, for every row of every file.

use std::fs;
use std::path::Path;

use crate::coerce::coerce_raw;
use crate::error::{GridformError, Result};
use crate::input::{Parser, SourceMetadata};
use crate::record::{lift, RawRecord, Row, RowIdAllocator, Snapshot};
use crate::schema::{columns_for_fields, ColumnDescriptor, FieldDescriptor};
use crate::validation::{annotate, AnnotatedRow, ErrorTable, Validation};

/// One dropped/uploaded file.
#[derive(Debug, Clone)]
pub struct IngestSource {
    /// File name, for diagnostics and metadata.
    pub name: String,
    /// Raw delimited text.
    pub text: String,
}

impl IngestSource {
    /// Create a source from in-memory text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a source from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GridformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, text))
    }
}

/// Everything one ingestion produces.
#[derive(Debug, Clone)]
pub struct IngestOutput {
    /// Selection column plus one column per header field.
    pub columns: Vec<ColumnDescriptor>,
    /// Rows exactly as parsed; the diff baseline.
    pub original_rows: Snapshot,
    /// Coerced rows; the live snapshot.
    pub current_rows: Snapshot,
    /// Failures for the live snapshot.
    pub errors: ErrorTable,
    /// One entry per source.
    pub sources: Vec<SourceMetadata>,
    /// Id allocator positioned after the ingested rows.
    pub ids: RowIdAllocator,
}

impl IngestOutput {
    /// Live snapshot joined with its failures.
    pub fn annotated_rows(&self) -> Vec<AnnotatedRow> {
        annotate(&self.current_rows, &self.errors)
    }
}

/// Ingest one or more sources.
///
/// Every source is parsed before any row is processed, so a malformed file
/// fails the whole call without producing partial output.
pub fn ingest(
    parser: &Parser,
    sources: &[IngestSource],
    fields: &[FieldDescriptor],
    validation: &Validation,
) -> Result<IngestOutput> {
    if sources.is_empty() {
        return Err(GridformError::EmptyData("No files to ingest".to_string()));
    }

    let mut parsed = Vec::with_capacity(sources.len());
    for source in sources {
        let (table, metadata) = parser.parse_str(&source.name, &source.text)?;
        parsed.push((table, metadata));
    }

    // Header fields across all files, first occurrence wins the position.
    let mut header: Vec<String> = Vec::new();
    for (table, _) in &parsed {
        for field in &table.fields {
            if !header.contains(field) {
                header.push(field.clone());
            }
        }
    }

    let mut ids = RowIdAllocator::new();
    let mut original_rows = Vec::new();
    let mut current_rows = Vec::new();
    let mut errors = ErrorTable::new();
    let mut metadata = Vec::with_capacity(parsed.len());

    for (table, meta) in parsed {
        for raw in &table.data {
            let raw = pad_to_header(&header, raw);
            let id = ids.allocate();
            let coerced = coerce_raw(fields, &raw);
            let outcome = validation.validate(&coerced);
            errors.set(id, outcome.errors);

            original_rows.push(Row::new(id, lift(&raw)));
            current_rows.push(Row::new(id, coerced));
        }
        metadata.push(meta);
    }

    tracing::debug!(
        files = metadata.len(),
        rows = current_rows.len(),
        rows_with_errors = errors.rows_with_errors(),
        failures = errors.total_failures(),
        validated = validation.is_enabled(),
        "ingested rows"
    );

    Ok(IngestOutput {
        columns: columns_for_fields(&header),
        original_rows,
        current_rows,
        errors,
        sources: metadata,
        ids,
    })
}

/// Every row carries every header field, in header order; missing cells are empty.
fn pad_to_header(header: &[String], raw: &RawRecord) -> RawRecord {
    header
        .iter()
        .map(|field| (field.clone(), raw.get(field).cloned().unwrap_or_default()))
        .collect()
}

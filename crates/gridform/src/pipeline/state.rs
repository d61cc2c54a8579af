//! The pipeline state every handler operates on.

use std::collections::HashMap;

use serde_json::Value;

use crate::coerce::coerce_record;
use crate::diff::{diff_rows, SnapshotDiff};
use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::record::{display_value, Record, Row, RowId, RowIdAllocator, Snapshot};
use crate::schema::{ColumnDescriptor, ColumnKind, FieldDescriptor, FieldType, FormSchema};
use crate::validation::{annotate, AnnotatedRow, ErrorTable, Validation, ValidatorCache, ValidatorOptions};

use super::edit::{edit_all, EditedRow};
use super::ingest::{ingest, IngestSource};
use super::submit::{check_submit, SubmitCheck};
use super::summary::IngestSummary;

/// Configuration for a pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Validator compilation options.
    pub validator: ValidatorOptions,
}

/// Schema, compiled validator and the snapshot pair.
///
/// `original` is written once per ingestion. `current` and the error table
/// are replaced wholesale by every ingestion and every edit. Without a schema
/// the pipeline still ingests and edits but annotates nothing.
#[derive(Debug)]
pub struct PipelineState {
    parser: Parser,
    schema: Option<FormSchema>,
    validators: ValidatorCache,
    original: Snapshot,
    current: Snapshot,
    errors: ErrorTable,
    columns: Vec<ColumnDescriptor>,
    sources: Vec<SourceMetadata>,
    ids: RowIdAllocator,
    generation: u64,
}

impl PipelineState {
    /// Create an empty pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create an empty pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            schema: None,
            validators: ValidatorCache::new(config.validator),
            original: Vec::new(),
            current: Vec::new(),
            errors: ErrorTable::new(),
            columns: vec![ColumnDescriptor::selection()],
            sources: Vec::new(),
            ids: RowIdAllocator::new(),
            generation: 0,
        }
    }

    /// Install a schema, replacing any previous one.
    ///
    /// The schema is compiled up front; if that fails the previous schema
    /// stays in place. Rows already loaded are re-validated.
    pub fn set_schema(&mut self, schema: FormSchema) -> Result<()> {
        self.validators.invalidate();
        self.validators.get_or_compile(&schema)?;

        for field in schema.fields() {
            if let FieldType::Other(name) = &field.field_type {
                tracing::warn!(field = %field.name, field_type = %name, "field type has no coercion rule");
            }
        }

        tracing::info!(version = %schema.version(), fields = schema.fields().len(), "schema installed");
        let previous = coercible(self.fields());
        self.schema = Some(schema);
        self.revalidate(&previous);
        Ok(())
    }

    /// Handle the outcome of the one-time schema fetch.
    ///
    /// A failed fetch leaves validation disabled; it is not an error.
    pub fn apply_schema_fetch(&mut self, fetched: Result<FormSchema>) -> bool {
        match fetched.and_then(|schema| self.set_schema(schema)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "schema unavailable; validation disabled");
                false
            }
        }
    }

    /// The loaded schema, if any.
    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    /// Field descriptors of the loaded schema (empty without one).
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.schema.as_ref().map(FormSchema::fields).unwrap_or(&[])
    }

    /// Whether rows are validated.
    pub fn validation_enabled(&self) -> bool {
        self.schema.is_some()
    }

    fn validation(&mut self) -> Validation {
        let Some(schema) = &self.schema else {
            return Validation::Disabled;
        };
        match self.validators.get_or_compile(schema) {
            Ok(validator) => Validation::Enabled(validator),
            Err(e) => {
                tracing::warn!(error = %e, "schema failed to compile; validation disabled");
                Validation::Disabled
            }
        }
    }

    /// Ingest dropped files, replacing both snapshots.
    ///
    /// On any parse failure nothing changes and the error is returned.
    pub fn ingest(&mut self, sources: &[IngestSource]) -> Result<Vec<AnnotatedRow>> {
        let validation = self.validation();
        if !validation.is_enabled() {
            tracing::warn!("no schema loaded; rows ingested without validation");
        }

        let output = match ingest(&self.parser, sources, self.fields(), &validation) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "ingestion failed; keeping previous data");
                return Err(e);
            }
        };

        self.original = output.original_rows;
        self.current = output.current_rows;
        self.errors = output.errors;
        self.columns = output.columns;
        self.sources = output.sources;
        self.ids = output.ids;
        self.generation += 1;

        tracing::info!(
            generation = self.generation,
            rows = self.current.len(),
            rows_with_errors = self.errors.rows_with_errors(),
            "ingestion complete"
        );

        Ok(self.annotated_rows())
    }

    /// Ingest a single in-memory text.
    pub fn ingest_text(&mut self, name: &str, text: &str) -> Result<Vec<AnnotatedRow>> {
        self.ingest(&[IngestSource::new(name, text)])
    }

    /// Replace the live snapshot with an edited row set and re-validate all of it.
    pub fn edit_all(&mut self, rows: Vec<EditedRow>) -> Vec<AnnotatedRow> {
        let validation = self.validation();
        let fields = self.fields().to_vec();
        let output = edit_all(rows, &fields, &validation, &mut self.ids);
        self.current = output.rows;
        self.errors = output.errors;
        self.annotated_rows()
    }

    /// Re-run the live snapshot through a new schema.
    ///
    /// Values are put back into text first so the new field types decide the
    /// coercion. A value still equal to the baseline under the `previous`
    /// coercion gets its exact source text back; edited values are rendered.
    fn revalidate(&mut self, previous: &[FieldDescriptor]) {
        if self.current.is_empty() {
            return;
        }

        let baseline: HashMap<RowId, &Record> =
            self.original.iter().map(|row| (row.id, &row.values)).collect();

        let rows: Vec<EditedRow> = self
            .current
            .iter()
            .map(|row| {
                let source = baseline.get(&row.id).copied();
                let before = source.map(|values| {
                    let mut values = values.clone();
                    coerce_record(previous, &mut values);
                    values
                });

                let values: Record = row
                    .values
                    .iter()
                    .map(|(key, value)| {
                        let untouched = before.as_ref().and_then(|b| b.get(key)) == Some(value);
                        let text = match source.and_then(|s| s.get(key)) {
                            Some(raw) if untouched => raw.clone(),
                            _ => as_text(value),
                        };
                        (key.clone(), text)
                    })
                    .collect();

                EditedRow::existing(row.id, values)
            })
            .collect();

        self.edit_all(rows);
    }

    /// Diff the baseline against the live snapshot.
    ///
    /// The baseline is run through the same coercion first, so converting
    /// `"12"` to `12` is not reported as an edit.
    pub fn diff(&self) -> SnapshotDiff {
        let coercible = coercible(self.fields());

        let baseline: Vec<Row> = self
            .original
            .iter()
            .map(|row| {
                let mut values = row.values.clone();
                coerce_record(&coercible, &mut values);
                Row::new(row.id, values)
            })
            .collect();

        diff_rows(&baseline, &self.current)
    }

    /// Check the live snapshot before submission.
    pub fn check_submit(&self) -> SubmitCheck {
        check_submit(&self.current, &self.errors)
    }

    /// Summary of the live snapshot.
    pub fn summary(&self) -> IngestSummary {
        let field_columns = self
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Field)
            .count();
        IngestSummary::compute(&self.current, field_columns, &self.errors, self.validation_enabled())
    }

    /// Live snapshot joined with its failures.
    pub fn annotated_rows(&self) -> Vec<AnnotatedRow> {
        annotate(&self.current, &self.errors)
    }

    /// Grid columns from the last ingestion.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Baseline snapshot.
    pub fn original(&self) -> &[Row] {
        &self.original
    }

    /// Live snapshot.
    pub fn current(&self) -> &[Row] {
        &self.current
    }

    /// Failures for the live snapshot.
    pub fn errors(&self) -> &ErrorTable {
        &self.errors
    }

    /// Metadata of the sources behind the current snapshot.
    pub fn sources(&self) -> &[SourceMetadata] {
        &self.sources
    }

    /// Number of successful ingestions so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Fields with a coercion rule.
fn coercible(fields: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .filter(|f| !matches!(f.field_type, FieldType::Other(_)))
        .cloned()
        .collect()
}

/// Numbers and booleans go back to their text form; everything else is kept.
fn as_text(value: &Value) -> Value {
    match value {
        Value::Number(_) | Value::Bool(_) => Value::String(display_value(value)),
        other => other.clone(),
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

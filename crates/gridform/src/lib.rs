//! Gridform: schema-checked editing of tabular data.
//!
//! Delimited text is parsed into rows, coerced to the types a JSON Schema
//! declares, validated, and annotated with the failures the validator
//! reports. Edited rows go through the same pass, and the live snapshot can
//! be diffed against what was originally ingested.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the ingested baseline is never modified
//! - **Failures are data**: validation failures sit next to rows, never inside them
//! - **Schema optional**: without a schema everything is accepted
//!
//! # Example
//!
//! ```
//! use gridform::{FormSchema, PipelineState};
//! use serde_json::json;
//!
//! let schema = FormSchema::new(json!({
//!     "type": "object",
//!     "properties": {
//!         "foo": { "type": "integer" },
//!         "bar": { "type": "string", "minLength": 5 }
//!     },
//!     "required": ["foo"]
//! }))
//! .unwrap();
//!
//! let mut state = PipelineState::new();
//! state.set_schema(schema).unwrap();
//!
//! let rows = state.ingest_text("forms.csv", "foo,bar\n12,ab\n").unwrap();
//! assert_eq!(rows[0].values["foo"], json!(12));
//! assert_eq!(rows[0].error[0].instance_path, "/bar");
//! assert_eq!(state.diff().to_string(), "no changes");
//! ```

pub mod coerce;
pub mod diff;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod validation;

pub use diff::{diff_rows, SnapshotDiff};
pub use error::{GridformError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use pipeline::{EditedRow, IngestSource, IngestSummary, PipelineConfig, PipelineState, SubmitCheck};
pub use record::{Record, Row, RowId};
pub use schema::{ColumnDescriptor, FieldDescriptor, FieldType, FormSchema};
pub use validation::{AnnotatedRow, ErrorTable, ValidationFailure, Validation, ValidatorOptions};

//! Form schema, field descriptors and grid columns.

mod column;
mod document;
mod source;
mod types;

pub use column::{columns_for_fields, ColumnDescriptor, ColumnKind, ERROR_SUFFIX_MARKER, SELECT_COLUMN_KEY};
pub use document::{FieldDescriptor, FormSchema, SchemaVersion};
pub use source::{fetch_schema, fetch_schema_with, forms_url, FormsData, FormsResponse, FORMS_PATH};
pub use types::FieldType;

//! The loaded JSON Schema document and the field descriptors derived from it.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{GridformError, Result};

use super::source::FormsResponse;
use super::types::FieldType;

/// A schema property and its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name.
    pub name: String,
    /// Declared primitive type.
    pub field_type: FieldType,
}

impl FieldDescriptor {
    /// Create a field descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Stable identity of a schema document: SHA-256 of its canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    fn of(document: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(document, &mut canonical);

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }
}

/// Compact JSON with object keys sorted at every level, independent of the
/// map ordering serde_json was built with.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell schemas apart in logs.
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}

/// An object-typed JSON Schema describing one form row.
///
/// Field descriptors are built once here; nothing downstream re-inspects the
/// raw document to discover fields.
#[derive(Debug, Clone)]
pub struct FormSchema {
    document: Value,
    fields: Vec<FieldDescriptor>,
    version: SchemaVersion,
}

impl FormSchema {
    /// Build from a bare schema document.
    pub fn new(document: Value) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| GridformError::InvalidSchema("schema must be a JSON object".to_string()))?;

        let fields = match object.get("properties") {
            None => Vec::new(),
            Some(Value::Object(properties)) => properties
                .iter()
                .map(|(name, property)| FieldDescriptor::new(name, FieldType::from_property(property)))
                .collect(),
            Some(_) => {
                return Err(GridformError::InvalidSchema(
                    "'properties' must be an object".to_string(),
                ));
            }
        };

        let version = SchemaVersion::of(&document);

        Ok(Self {
            document,
            fields,
            version,
        })
    }

    /// Parse JSON text holding either a bare schema or a `{data: {schema}}` envelope.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if value.pointer("/data/schema").is_some() {
            let envelope: FormsResponse = serde_json::from_value(value)?;
            return Self::new(envelope.data.schema);
        }
        Self::new(value)
    }

    /// Load a schema file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GridformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    /// The raw schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Field descriptors, one per property.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema declares this property.
    pub fn has_property(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names listed under `required`.
    pub fn required(&self) -> Vec<&str> {
        self.document
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Stable identity used to key compiled validators.
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }
}

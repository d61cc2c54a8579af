//! Declared field types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive type a schema declares for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text values.
    String,
    /// Whole numbers.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// A type the coercer does not handle (object, array, null, unions, missing).
    Other(String),
}

impl FieldType {
    /// Read the `type` keyword of a property schema.
    pub fn from_property(property: &Value) -> Self {
        match property.get("type") {
            Some(Value::String(name)) => Self::from_name(name),
            Some(Value::Array(names)) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| n.as_str().unwrap_or("?").to_string())
                    .collect();
                FieldType::Other(names.join("|"))
            }
            Some(other) => FieldType::Other(other.to_string()),
            None => FieldType::Other("unspecified".to_string()),
        }
    }

    /// Map a JSON Schema type name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "integer" => FieldType::Integer,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Other(name) => write!(f, "{}", name),
        }
    }
}

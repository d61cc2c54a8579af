//! Type coercion of raw cell text to schema-declared types.
//!
//! The policy is deliberately narrow and never fails: a value that cannot be
//! converted stays a string, and the validator reports it as a type failure.

use serde_json::{Number, Value};

use crate::record::{lift, RawRecord, Record};
use crate::schema::{FieldDescriptor, FieldType};

/// Coerce every schema field present in `record`, in place.
///
/// Only string values are touched; values already converted by an earlier
/// pass, and fields the schema does not declare, pass through unchanged.
pub fn coerce_record(fields: &[FieldDescriptor], record: &mut Record) {
    for field in fields {
        let Some(value) = record.get_mut(&field.name) else {
            continue;
        };
        let Value::String(raw) = value else {
            continue;
        };

        match coerce_str(&field.field_type, raw) {
            Coerced::Converted(converted) => *value = converted,
            Coerced::Unchanged => {}
            Coerced::Unhandled => {
                tracing::warn!(
                    field = %field.name,
                    field_type = %field.field_type,
                    "no coercion for declared type; value left as text"
                );
            }
        }
    }
}

/// Lift a raw record to JSON strings and coerce it.
pub fn coerce_raw(fields: &[FieldDescriptor], raw: &RawRecord) -> Record {
    let mut record = lift(raw);
    coerce_record(fields, &mut record);
    record
}

/// Outcome of coercing a single string.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// The string was converted to this value.
    Converted(Value),
    /// The string stays as it is (string type, or not convertible).
    Unchanged,
    /// The declared type has no coercion rule.
    Unhandled,
}

/// Coerce one string according to a declared type.
pub fn coerce_str(field_type: &FieldType, raw: &str) -> Coerced {
    match field_type {
        FieldType::String => Coerced::Unchanged,
        FieldType::Integer | FieldType::Number => match parse_number(raw) {
            Some(number) => Coerced::Converted(Value::Number(number)),
            None => Coerced::Unchanged,
        },
        FieldType::Boolean => match raw {
            "false" | "0" => Coerced::Converted(Value::Bool(false)),
            "true" | "1" => Coerced::Converted(Value::Bool(true)),
            _ => Coerced::Unchanged,
        },
        FieldType::Other(_) => Coerced::Unhandled,
    }
}

/// Integers stay integers so `"12"` satisfies `type: integer`; anything else
/// finite becomes a float, which `type: integer` then rejects unless whole.
fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

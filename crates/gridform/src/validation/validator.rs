//! Record validation against the compiled form schema.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridformError, Result};
use crate::record::Record;
use crate::schema::{FormSchema, SchemaVersion};

use super::failure::ValidationFailure;

/// Options applied when compiling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Enforce `format` keywords (`email`, `date`, ...) instead of treating
    /// them as annotations.
    pub validate_formats: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
        }
    }
}

/// Result of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when `errors` is empty.
    pub valid: bool,
    /// Every failure found.
    pub errors: Vec<ValidationFailure>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<ValidationFailure>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Outcome for a record that was not checked.
    pub fn unchecked() -> Self {
        Self::from_errors(Vec::new())
    }
}

/// A schema compiled once and applied to many records.
pub struct RecordValidator {
    inner: jsonschema::Validator,
    version: SchemaVersion,
}

impl RecordValidator {
    /// Compile a schema.
    pub fn compile(schema: &FormSchema, options: &ValidatorOptions) -> Result<Self> {
        let inner = jsonschema::options()
            .should_validate_formats(options.validate_formats)
            .build(schema.document())
            .map_err(|e| GridformError::InvalidSchema(e.to_string()))?;

        Ok(Self {
            inner,
            version: schema.version().clone(),
        })
    }

    /// Validate a record, collecting every failure rather than stopping at the first.
    pub fn validate(&self, record: &Record) -> ValidationOutcome {
        let instance = Value::Object(
            record
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        );

        let errors = self
            .inner
            .iter_errors(&instance)
            .map(|e| {
                ValidationFailure::new(
                    e.instance_path.to_string(),
                    e.schema_path.to_string(),
                    e.to_string(),
                )
            })
            .collect();

        ValidationOutcome::from_errors(errors)
    }

    /// Version of the schema this validator was compiled from.
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }
}

impl std::fmt::Debug for RecordValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordValidator")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// The validator a pipeline pass runs with.
///
/// `Disabled` stands in while no schema is loaded: every record is accepted.
#[derive(Debug, Clone, Default)]
pub enum Validation {
    #[default]
    Disabled,
    Enabled(Arc<RecordValidator>),
}

impl Validation {
    /// Validate, or accept everything when disabled.
    pub fn validate(&self, record: &Record) -> ValidationOutcome {
        match self {
            Validation::Disabled => ValidationOutcome::unchecked(),
            Validation::Enabled(validator) => validator.validate(record),
        }
    }

    /// Whether records are actually checked.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Validation::Enabled(_))
    }
}

/// Memoizes the compiled validator by schema version.
#[derive(Debug, Default)]
pub struct ValidatorCache {
    options: ValidatorOptions,
    entry: Option<Arc<RecordValidator>>,
    compilations: usize,
}

impl ValidatorCache {
    /// Create an empty cache.
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            entry: None,
            compilations: 0,
        }
    }

    /// Return the cached validator for this schema, compiling it if the
    /// schema version differs from the cached one.
    pub fn get_or_compile(&mut self, schema: &FormSchema) -> Result<Arc<RecordValidator>> {
        if let Some(cached) = &self.entry {
            if cached.version() == schema.version() {
                return Ok(Arc::clone(cached));
            }
        }

        let validator = Arc::new(RecordValidator::compile(schema, &self.options)?);
        self.compilations += 1;
        tracing::debug!(version = %schema.version(), "compiled record validator");
        self.entry = Some(Arc::clone(&validator));
        Ok(validator)
    }

    /// Drop the cached validator; called when the schema is replaced.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of compilations performed so far.
    pub fn compilations(&self) -> usize {
        self.compilations
    }}

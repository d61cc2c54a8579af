//! Error types for the gridform library.
//!
//! Only faults live here. Validation failures are ordinary data and are kept
//! in the [`ErrorTable`](crate::validation::ErrorTable) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gridform operations.
#[derive(Debug, Error)]
pub enum GridformError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing delimited data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to ingest.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The header row names the same field twice.
    #[error("Duplicate header field: '{0}'")]
    DuplicateHeader(String),

    /// The schema could not be fetched from its source.
    #[error("Schema fetch failed: {0}")]
    SchemaFetch(String),

    /// The schema document is not usable (not an object, fails to compile).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GridformError {
    /// Whether this error came from reading the input file rather than the schema.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GridformError::Io { .. }
                | GridformError::Parse { .. }
                | GridformError::Csv(_)
                | GridformError::EmptyData(_)
                | GridformError::DuplicateHeader(_)
        )
    }
}

/// Result type alias for gridform operations.
pub type Result<T> = std::result::Result<T, GridformError>;

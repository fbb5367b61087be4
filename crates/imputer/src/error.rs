//! Error types for the imputer library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::DataType;
use crate::stats::CleaningMode;

/// Main error type for imputer operations.
#[derive(Debug, Error)]
pub enum ImputerError {
    /// Invalid estimator configuration (column arity, mode, custom value).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced column does not exist in the dataset schema.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// The cleaning mode cannot be applied to the column's declared type.
    #[error("Column '{column}' has type {data_type}, which is not supported by {mode} imputation")]
    UnsupportedType {
        column: String,
        data_type: DataType,
        mode: CleaningMode,
    },

    /// A statistic was requested over a column with no non-null values.
    #[error("Surrogate cannot be computed: all values in column '{column}' are null")]
    NoObservedValues { column: String },

    /// A statistic overflowed or otherwise came out infinite or NaN.
    #[error("Surrogate for column '{column}' is not finite ({value})")]
    NonFiniteSurrogate { column: String, value: f64 },

    /// A replacement value does not fit the target column type.
    #[error("Cannot fill column '{column}' of type {expected} with a {found} value")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: &'static str,
    },

    /// Persisted artifact already exists and overwrite was not requested.
    #[error("Path '{0}' already exists; save with overwrite to replace it")]
    AlreadyExists(String),

    /// A required artifact component is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A persisted component exists but cannot be decoded or verified.
    #[error("Corrupt artifact component '{path}': {message}")]
    Corrupt { path: String, message: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Inconsistent dataset construction (lengths, duplicate names, cell types).
    #[error("Schema error: {0}")]
    Schema(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImputerError {
    /// Shorthand for a `Corrupt` error on a given component path.
    pub(crate) fn corrupt(path: impl Into<String>, message: impl ToString) -> Self {
        ImputerError::Corrupt {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for imputer operations.
pub type Result<T> = std::result::Result<T, ImputerError>;

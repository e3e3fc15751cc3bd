//! Error types for the Tabula library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tabula operations.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed source data (ragged rows, empty input).
    #[error("Format error: {0}")]
    Format(String),

    /// Duplicate, unknown or missing column name.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A column does not have the table's row count.
    #[error("Shape error: column '{column}' has {actual} values, expected {expected}")]
    Shape {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A cell could not be read as the numeric value an operation needs.
    #[error("Cannot convert '{value}' in column '{column}' at row {row} to a number")]
    ValueConversion {
        column: String,
        row: usize,
        value: String,
    },

    /// Structurally invalid argument (bad window size, empty statistic input, ...).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Join key inference found zero or several candidate columns.
    #[error("Join ambiguity: {0}")]
    JoinAmbiguity(String),

    /// A pseudo natural query matched no known template.
    #[error("Could not parse query near '{fragment}'")]
    QueryParse { fragment: String },

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl TabulaError {
    /// Error for a column name that is not in the schema.
    pub fn unknown_column(name: &str) -> Self {
        TabulaError::Schema(format!("unknown column '{}'", name))
    }

    /// Error for a column name that already exists in the schema.
    pub fn duplicate_column(name: &str) -> Self {
        TabulaError::Schema(format!("column '{}' already exists", name))
    }
}

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;

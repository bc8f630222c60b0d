//! Error types for star-schema normalization.

use thiserror::Error;

/// Errors that abort a normalization run.
///
/// Every variant is fatal: no partial star schema is ever returned.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NormalizeError {
    /// A required input column is absent.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// An admission date could not be interpreted as a calendar date.
    #[error("cannot parse {column} value '{value}' at row {row} as a date")]
    DateParse {
        /// Input column holding the date.
        column: String,
        /// Zero-based input row.
        row: usize,
        /// Raw value as read.
        value: String,
    },

    /// Resolving a dimension did not yield exactly one key per fact row.
    #[error("join against {dimension} produced {actual} rows, expected {expected}")]
    JoinCardinality {
        dimension: String,
        expected: usize,
        actual: usize,
    },

    /// More distinct values or rows than the surrogate key type can number.
    #[error("surrogate key {position} is outside the u32 key range")]
    KeyOverflow { position: usize },

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;

//! Error types for the catalog crate.
//!
//! Load errors always carry the artifact they came from so a failed
//! startup tells the operator which file to regenerate.

use thiserror::Error;

/// Errors that can occur while loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Artifact file could not be found
    #[error("Missing {artifact} artifact: {path}")]
    FileNotFound { artifact: String, path: String },

    /// I/O error occurred while reading an artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON artifact could not be decoded
    #[error("Malformed JSON in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Line in a text artifact couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Artifact extension is not one we know how to decode
    #[error("Unsupported {artifact} format: {path}")]
    UnsupportedFormat { artifact: String, path: String },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Similarity matrix shape disagrees with the catalog
    #[error("Similarity matrix is {rows}x{cols} but catalog has {movies} movies")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        movies: usize,
    },

    /// Title lookup failed (exact, case-sensitive)
    #[error("Movie not found in catalog: {0}")]
    TitleNotFound(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;

//! Error types for STL loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL loading.
pub type StlResult<T> = Result<T, StlError>;

/// Errors that can occur while reading STL data.
#[derive(Debug, Error)]
pub enum StlError {
    /// The file could not be read.
    #[error("cannot read file")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither ASCII STL nor long enough for a binary header.
    #[error("file too small to be a valid STL ({len} bytes)")]
    TooShort { len: usize },

    /// The binary facet count promises more data than is present.
    #[error("binary STL truncated: header announces {expected} facets, data holds {found}")]
    Truncated { expected: usize, found: usize },

    /// Malformed ASCII STL.
    #[error("ASCII STL syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
}

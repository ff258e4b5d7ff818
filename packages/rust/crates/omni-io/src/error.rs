//! Error types for file I/O operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for file I/O operations.
///
/// Each variant represents a specific failure mode in the I/O pipeline.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// Directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// File could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Target file path.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}

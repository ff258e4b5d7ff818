//! Error types for replace and mirror operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use omni_io::IoError;
use thiserror::Error;

/// Error types for replace operations.
///
/// `Config` and `Traversal` abort a run. `File` is recorded per file and
/// never escapes the mirror.
#[derive(Error, Debug)]
pub enum ReplaceError {
    /// Invalid configuration: rules, path lists or options.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule pattern failed to compile.
    #[error("Invalid pattern in rule {index} ({pattern:?}): {source}")]
    Pattern {
        /// Zero-based position of the rule in the rule list.
        index: usize,
        /// The offending pattern.
        pattern: String,
        /// Compilation error from the regex engine.
        #[source]
        source: regex::Error,
    },

    /// A directory could not be listed or created.
    #[error("Traversal failed at {dir}: {source}")]
    Traversal {
        /// Directory being walked.
        dir: String,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },

    /// Reading, transforming or writing a single file failed.
    #[error("{path}: {source}")]
    File {
        /// Source file path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },
}

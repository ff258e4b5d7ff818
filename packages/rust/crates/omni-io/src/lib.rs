#![allow(clippy::doc_markdown)]

//! omni-io - Safe and efficient file I/O for Omni DevEnv
//!
//! File reading and writing primitives used by the replace/mirror pipeline.
//!
//! # Features
//!
//! - **Safety**: Binary detection & Size limits
//! - **Streaming**: Line-aligned chunk reader for large files
//! - **Output**: Idempotent directory creation, writes, optional backups
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection
//! ├── sync.rs     # Size-limited reads, text/binary classification
//! ├── chunks.rs   # Line-aligned chunked reading
//! └── write.rs    # Directory creation, writes, backups
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_io::{FileContent, read_file_safe, write_file};
//!
//! if let FileContent::Text(text) = read_file_safe("file.txt", 1024 * 1024)? {
//!     write_file("out/file.txt", text.as_bytes())?;
//! }
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod chunks;
mod detect;
mod error;
mod sync;
mod write;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use chunks::{DEFAULT_CHUNK_SIZE, LineChunks};
pub use error::IoError;
pub use sync::{FileContent, file_size, read_file_safe};
pub use write::{BACKUP_SUFFIX, backup_existing, create_writer, ensure_dir, write_file};

// Re-export detection utilities for advanced use
pub use detect::{BINARY_SNIFF_LEN, is_binary};

//! Synchronous file reads.
//!
//! Every read is guarded by a size limit; content is classified as text or
//! binary before it reaches callers. Bytes are never re-encoded.

use std::fs as std_fs;
use std::io::{self, Read};
use std::path::Path;

use crate::detect::is_binary;
use crate::error::IoError;

/// File content classified by [`read_file_safe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Valid UTF-8 text.
    Text(String),
    /// Text in some other encoding (GBK, Latin-1, ...), kept as raw bytes.
    NonUtf8(Vec<u8>),
    /// Raw bytes of a file that contains NULL bytes.
    Binary(Vec<u8>),
}

/// Size of the file at `path`, following symlinks.
///
/// # Errors
/// `NotFound` when nothing exists at `path` (including dangling links),
/// `System` carrying the OS error for every other failure.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64, IoError> {
    let path = path.as_ref();
    std_fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IoError::NotFound(path.to_string_lossy().to_string()),
            _ => IoError::System(e),
        })
}

/// Read a file with a size check, returning text or raw bytes.
///
/// # Errors
/// See [`file_size`]; `TooLarge` above `max_bytes`, `System` for read
/// failures.
pub fn read_file_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<FileContent, IoError> {
    let buffer = read_bytes_limited(path.as_ref(), max_bytes)?;
    if is_binary(&buffer) {
        return Ok(FileContent::Binary(buffer));
    }
    Ok(match String::from_utf8(buffer) {
        Ok(text) => FileContent::Text(text),
        Err(e) => FileContent::NonUtf8(e.into_bytes()),
    })
}

fn read_bytes_limited(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IoError> {
    let size = file_size(path)?;
    if size > max_bytes {
        return Err(IoError::TooLarge(size, max_bytes));
    }

    let mut file = std_fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

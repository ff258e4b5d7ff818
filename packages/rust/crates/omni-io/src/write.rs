//! Directory creation and file writes for mirrored output.

use std::fs as std_fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Suffix appended to a target path when backing it up.
pub const BACKUP_SUFFIX: &str = "bak";

/// Create a directory and its parents. Succeeds if it already exists.
///
/// # Errors
/// `CreateDir` when the directory cannot be created.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), IoError> {
    let path = path.as_ref();
    std_fs::create_dir_all(path).map_err(|source| IoError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

/// Write bytes to `path`, replacing any existing file.
///
/// The parent directory must already exist.
///
/// # Errors
/// `Write` when the file cannot be created or written.
pub fn write_file<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), IoError> {
    let path = path.as_ref();
    std_fs::write(path, contents).map_err(|source| IoError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Open `path` for buffered streaming writes, truncating existing content.
///
/// # Errors
/// `Write` when the file cannot be created.
pub fn create_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<std_fs::File>, IoError> {
    let path = path.as_ref();
    let file = std_fs::File::create(path).map_err(|source| IoError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Copy an existing file to `<path>.bak` before it gets overwritten.
///
/// Returns the backup path, or `None` when there was nothing to back up.
///
/// # Errors
/// `Write` when the copy fails.
pub fn backup_existing<P: AsRef<Path>>(path: P) -> Result<Option<PathBuf>, IoError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(".");
    backup.push(BACKUP_SUFFIX);
    let backup = PathBuf::from(backup);

    std_fs::copy(path, &backup).map_err(|source| IoError::Write {
        path: backup.display().to_string(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        backup = %backup.display(),
        "backed up existing file"
    );
    Ok(Some(backup))
}

//! Run orchestration: pairs source roots with output roots and mirrors each
//! pair in order into a shared statistics accumulator.

use std::path::{Component, Path, PathBuf};

use crate::error::ReplaceError;
use crate::mirror::{MirrorOptions, PreviewSink, TreeMirror};
use crate::rules::RuleSet;
use crate::stats::RunStats;

/// A source root and the output root it is mirrored into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPair {
    /// File or directory to read from.
    pub source: PathBuf,
    /// Directory to write into.
    pub output: PathBuf,
}

/// Zip parallel source/output lists into pairs.
///
/// # Errors
/// `ReplaceError::Config` when the lists are empty, differ in length, or an
/// output entry is empty.
pub fn pair_roots(sources: &[PathBuf], outputs: &[PathBuf]) -> Result<Vec<MirrorPair>, ReplaceError> {
    if sources.len() != outputs.len() {
        return Err(ReplaceError::Config(format!(
            "sources and outputs must have the same length ({} vs {})",
            sources.len(),
            outputs.len()
        )));
    }
    if sources.is_empty() {
        return Err(ReplaceError::Config("no source paths configured".to_string()));
    }
    sources
        .iter()
        .zip(outputs)
        .enumerate()
        .map(|(idx, (source, output))| {
            if output.as_os_str().is_empty() {
                return Err(ReplaceError::Config(format!("outputs[{idx}] is not configured")));
            }
            if source.as_os_str().is_empty() {
                return Err(ReplaceError::Config(format!("sources[{idx}] is not configured")));
            }
            Ok(MirrorPair {
                source: source.clone(),
                output: output.clone(),
            })
        })
        .collect()
}

/// Check every pair before anything is written.
///
/// Sources must exist, and an output root may not be (or lie inside) its
/// source directory, which would rewrite sources or mirror output into itself.
/// Paths are compared after resolving `..` and symlinks.
///
/// # Errors
/// `ReplaceError::Config` describing the first invalid pair.
pub fn validate_pairs(pairs: &[MirrorPair]) -> Result<(), ReplaceError> {
    for pair in pairs {
        let meta = std::fs::metadata(&pair.source).map_err(|e| {
            ReplaceError::Config(format!("source {} is not accessible: {e}", pair.source.display()))
        })?;
        let output = resolve(&pair.output)?;
        if meta.is_dir() {
            if output.starts_with(resolve(&pair.source)?) {
                return Err(ReplaceError::Config(format!(
                    "output {} is inside source {}",
                    pair.output.display(),
                    pair.source.display()
                )));
            }
        } else if output == resolve(pair.source.parent().unwrap_or(Path::new(".")))? {
            return Err(ReplaceError::Config(format!(
                "output {} would overwrite source {}",
                pair.output.display(),
                pair.source.display()
            )));
        }
    }
    Ok(())
}

/// Canonical form of `path`, which need not exist yet.
///
/// The longest existing ancestor is canonicalized; the missing tail is
/// appended with `.` and `..` folded, matching what creating it would do.
fn resolve(path: &Path) -> Result<PathBuf, ReplaceError> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = std::path::absolute(path)
        .map_err(|e| ReplaceError::Config(format!("cannot resolve {}: {e}", path.display())))?;

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    let mut resolved = loop {
        if let Ok(canonical) = std::fs::canonicalize(existing) {
            break canonical;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                missing.push(last);
                existing = parent;
            }
            _ => break existing.to_path_buf(),
        }
    };
    for component in missing.into_iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

/// Mirror every pair in order, accumulating into `stats`.
///
/// Pairs are validated up front. Per-file failures are only counted; the
/// first traversal failure stops the run. Either way `stats` holds what was
/// done, so callers can report it.
///
/// # Errors
/// `Config` for invalid pairs or options, `Traversal` for unlistable
/// directories.
pub fn run(
    pairs: &[MirrorPair],
    rules: &RuleSet,
    options: &MirrorOptions,
    sink: &dyn PreviewSink,
    stats: &RunStats,
) -> Result<(), ReplaceError> {
    validate_pairs(pairs)?;
    let mirror = TreeMirror::new(rules, options, sink)?;

    for (idx, pair) in pairs.iter().enumerate() {
        tracing::info!(
            pair = idx,
            source = %pair.source.display(),
            output = %pair.output.display(),
            dry_run = options.dry_run,
            "mirroring"
        );
        mirror.mirror(&pair.source, &pair.output, stats)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_roots_length_mismatch() {
        let err = pair_roots(&[PathBuf::from("a"), PathBuf::from("b")], &[PathBuf::from("x")])
            .unwrap_err();
        assert!(err.to_string().contains("2 vs 1"));
    }

    #[test]
    fn test_pair_roots_empty_output_entry() {
        let err = pair_roots(&[PathBuf::from("a")], &[PathBuf::new()]).unwrap_err();
        assert!(err.to_string().contains("outputs[0]"));
    }

    #[test]
    fn test_pair_roots_requires_sources() {
        assert!(pair_roots(&[], &[]).is_err());
    }

    #[test]
    fn test_output_inside_source_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let pairs = vec![MirrorPair {
            source: dir.path().to_path_buf(),
            output: dir.path().join("mirror"),
        }];
        assert!(matches!(validate_pairs(&pairs), Err(ReplaceError::Config(_))));
    }

    #[test]
    fn test_output_reaching_source_through_parent_dirs_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("src");
        std::fs::create_dir(&source).unwrap();
        let pairs = vec![MirrorPair {
            source,
            output: dir.path().join("missing/../src/out"),
        }];
        assert!(matches!(validate_pairs(&pairs), Err(ReplaceError::Config(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_reaching_source_through_symlink_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("src");
        std::fs::create_dir(&source).unwrap();
        std::os::unix::fs::symlink(&source, dir.path().join("alias")).unwrap();
        let pairs = vec![MirrorPair {
            source,
            output: dir.path().join("alias/out"),
        }];
        assert!(matches!(validate_pairs(&pairs), Err(ReplaceError::Config(_))));
    }

    #[test]
    fn test_sibling_output_is_accepted() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("src");
        std::fs::create_dir(&source).unwrap();
        let pairs = vec![MirrorPair {
            source,
            output: dir.path().join("src-mirror/./out/.."),
        }];
        assert!(validate_pairs(&pairs).is_ok());
    }

    #[test]
    fn test_file_source_into_own_directory_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        let pairs = vec![MirrorPair {
            source: file,
            output: dir.path().to_path_buf(),
        }];
        assert!(validate_pairs(&pairs).is_err());
    }
}

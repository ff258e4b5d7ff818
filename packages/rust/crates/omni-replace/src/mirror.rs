//! Tree mirroring.
//!
//! Walks a source root with an explicit worklist, recreates its directory
//! structure under an output root and writes every regular file through the
//! substitution engine.
//!
//! A directory's output directory is created when the directory is
//! discovered, before any file beneath it is scheduled. Files of one
//! directory may run in parallel on a bounded rayon pool; previews are
//! delivered one file at a time.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use omni_io::{
    DEFAULT_CHUNK_SIZE, FileContent, IoError, backup_existing, create_writer, ensure_dir,
    file_size, read_file_safe, write_file,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diff::compute_diff;
use crate::engine::{apply, apply_bytes, apply_streaming};
use crate::error::ReplaceError;
use crate::preview::{DEFAULT_CONTEXT_LINES, Preview, PreviewMode, render_preview};
use crate::rules::RuleSet;
use crate::stats::RunStats;

/// Receives rendered previews. Calls are serialized by the mirror.
pub trait PreviewSink: Send + Sync {
    /// Show the preview for `file` (its source path).
    ///
    /// # Errors
    /// A failed preview is logged; it does not fail the file.
    fn show(&self, file: &Path, preview: &Preview) -> io::Result<()>;
}

impl<F> PreviewSink for F
where
    F: Fn(&Path, &Preview) -> io::Result<()> + Send + Sync,
{
    fn show(&self, file: &Path, preview: &Preview) -> io::Result<()> {
        self(file, preview)
    }
}

/// Sink that discards previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreview;

impl PreviewSink for NoPreview {
    fn show(&self, _file: &Path, _preview: &Preview) -> io::Result<()> {
        Ok(())
    }
}

/// Options controlling how files are mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorOptions {
    /// Preview mode for changed files.
    pub preview: PreviewMode,
    /// Context lines around change blocks in windowed previews.
    pub context_lines: usize,
    /// Worker threads per directory batch (1 = sequential).
    pub workers: usize,
    /// Chunk size for streamed files.
    pub chunk_size: usize,
    /// Files larger than this are streamed when no preview is requested.
    pub stream_threshold: u64,
    /// Files larger than this fail instead of being processed.
    pub max_file_size: u64,
    /// Transform and preview without creating or writing anything.
    pub dry_run: bool,
    /// Copy an existing target to `<target>.bak` before overwriting it.
    pub backup: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            preview: PreviewMode::Off,
            context_lines: DEFAULT_CONTEXT_LINES,
            workers: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream_threshold: 4 * 1024 * 1024, // 4MB
            max_file_size: 256 * 1024 * 1024,  // 256MB
            dry_run: false,
            backup: false,
        }
    }
}

/// One regular file scheduled for mirroring.
#[derive(Debug, Clone)]
struct FileJob {
    source: PathBuf,
    target: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct FileOutcome {
    replacements: usize,
    binary: bool,
}

/// Mirrors source trees into output trees using one rule set.
pub struct TreeMirror<'a> {
    rules: &'a RuleSet,
    options: &'a MirrorOptions,
    sink: &'a dyn PreviewSink,
    preview_lock: Mutex<()>,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> TreeMirror<'a> {
    /// Build a mirror. A worker pool is created when `options.workers > 1`.
    ///
    /// # Errors
    /// `ReplaceError::Config` when the worker pool cannot be created.
    pub fn new(
        rules: &'a RuleSet,
        options: &'a MirrorOptions,
        sink: &'a dyn PreviewSink,
    ) -> Result<Self, ReplaceError> {
        let pool = if options.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.workers)
                .thread_name(|idx| format!("omni-replace-{idx}"))
                .build()
                .map_err(|e| ReplaceError::Config(format!("cannot start worker pool: {e}")))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            rules,
            options,
            sink,
            preview_lock: Mutex::new(()),
            pool,
        })
    }

    /// Mirror `source_root` into `output_root`, accumulating into `stats`.
    ///
    /// A file source is mirrored to `output_root/<file name>`. Per-file
    /// failures are recorded in `stats`; only traversal failures return.
    ///
    /// # Errors
    /// `Config` when the source is missing or not a file/directory,
    /// `Traversal` when a directory cannot be listed or created.
    pub fn mirror(
        &self,
        source_root: &Path,
        output_root: &Path,
        stats: &RunStats,
    ) -> Result<(), ReplaceError> {
        let metadata = fs::metadata(source_root).map_err(|e| {
            ReplaceError::Config(format!(
                "source {} is not accessible: {e}",
                source_root.display()
            ))
        })?;

        if metadata.is_file() {
            return self.mirror_file(source_root, output_root, stats);
        }
        if !metadata.is_dir() {
            return Err(ReplaceError::Config(format!(
                "source {} is neither a file nor a directory",
                source_root.display()
            )));
        }

        self.create_dir(output_root)?;
        let mut pending = vec![source_root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let (jobs, subdirs) = self.scan_dir(&dir, source_root, output_root, stats)?;
            self.process_batch(&jobs, stats);
            // Reverse so the stack pops subdirectories in name order.
            pending.extend(subdirs.into_iter().rev());
        }
        Ok(())
    }

    fn mirror_file(
        &self,
        source: &Path,
        output_root: &Path,
        stats: &RunStats,
    ) -> Result<(), ReplaceError> {
        let name = source.file_name().ok_or_else(|| {
            ReplaceError::Config(format!("source {} has no file name", source.display()))
        })?;
        self.create_dir(output_root)?;
        stats.record_discovered();
        self.process_file(
            &FileJob {
                source: source.to_path_buf(),
                target: output_root.join(name),
            },
            stats,
        );
        Ok(())
    }

    /// List `dir`, create output directories for its subdirectories and
    /// collect its files.
    fn scan_dir(
        &self,
        dir: &Path,
        source_root: &Path,
        output_root: &Path,
        stats: &RunStats,
    ) -> Result<(Vec<FileJob>, Vec<PathBuf>), ReplaceError> {
        let mut entries = fs::read_dir(dir)
            .and_then(|iter| iter.collect::<io::Result<Vec<_>>>())
            .map_err(|e| traversal_error(dir, e))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut jobs = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let relative = path.strip_prefix(source_root).unwrap_or(&path);
            let target = output_root.join(relative);
            let file_type = entry.file_type().map_err(|e| traversal_error(&path, e))?;

            let is_dir = if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_dir() => {
                        tracing::warn!(path = %path.display(), "skipping symlinked directory");
                        continue;
                    }
                    Ok(meta) if !meta.is_file() => {
                        tracing::debug!(path = %path.display(), "skipping special file");
                        continue;
                    }
                    // Dangling links fall through and fail on read.
                    _ => false,
                }
            } else if file_type.is_dir() {
                true
            } else if file_type.is_file() {
                false
            } else {
                tracing::debug!(path = %path.display(), "skipping special file");
                continue;
            };

            if is_dir {
                self.create_dir(&target)?;
                subdirs.push(path);
            } else {
                stats.record_discovered();
                jobs.push(FileJob {
                    source: path,
                    target,
                });
            }
        }
        Ok((jobs, subdirs))
    }

    fn create_dir(&self, dir: &Path) -> Result<(), ReplaceError> {
        if self.options.dry_run {
            return Ok(());
        }
        ensure_dir(dir).map_err(|source| {
            tracing::error!(dir = %dir.display(), error = %source, "failed to create output directory");
            ReplaceError::Traversal {
                dir: dir.display().to_string(),
                source,
            }
        })
    }

    fn process_batch(&self, jobs: &[FileJob], stats: &RunStats) {
        match &self.pool {
            Some(pool) if jobs.len() > 1 => {
                pool.install(|| jobs.par_iter().for_each(|job| self.process_file(job, stats)));
            }
            _ => jobs.iter().for_each(|job| self.process_file(job, stats)),
        }
    }

    fn process_file(&self, job: &FileJob, stats: &RunStats) {
        let seq = stats.record_processing();
        match self.transform(job) {
            Ok(outcome) => {
                stats.record_success(outcome.replacements);
                tracing::info!(
                    path = %job.source.display(),
                    target = %job.target.display(),
                    replacements = outcome.replacements,
                    binary = outcome.binary,
                    seq,
                    discovered = stats.discovered(),
                    "processed file"
                );
            }
            Err(source) => {
                tracing::error!(
                    path = %job.source.display(),
                    target = %job.target.display(),
                    error = %source,
                    "failed to process file"
                );
                let error = ReplaceError::File {
                    path: job.source.display().to_string(),
                    source,
                };
                stats.record_failure(&job.source, &error);
            }
        }
    }

    fn transform(&self, job: &FileJob) -> Result<FileOutcome, IoError> {
        let size = file_size(&job.source)?;
        if size > self.options.max_file_size {
            return Err(IoError::TooLarge(size, self.options.max_file_size));
        }
        if !self.options.preview.is_enabled() && size > self.options.stream_threshold {
            return self.transform_streaming(job);
        }

        match read_file_safe(&job.source, self.options.max_file_size)? {
            FileContent::Binary(bytes) => {
                tracing::debug!(path = %job.source.display(), "copying binary file unchanged");
                self.commit(job, &bytes)?;
                Ok(FileOutcome {
                    replacements: 0,
                    binary: true,
                })
            }
            FileContent::Text(original) => {
                let substitution = apply(&original, self.rules);
                if substitution.changed() && self.options.preview.is_enabled() {
                    self.show_preview(&job.source, &original, &substitution.modified);
                }
                self.commit(job, substitution.modified.as_bytes())?;
                Ok(FileOutcome {
                    replacements: substitution.count,
                    binary: false,
                })
            }
            FileContent::NonUtf8(original) => {
                let (modified, count) = apply_bytes(&original, self.rules);
                if count > 0 && self.options.preview.is_enabled() {
                    // Previews are for reading only; the written bytes are exact.
                    self.show_preview(
                        &job.source,
                        &String::from_utf8_lossy(&original),
                        &String::from_utf8_lossy(&modified),
                    );
                }
                self.commit(job, &modified)?;
                Ok(FileOutcome {
                    replacements: count,
                    binary: false,
                })
            }
        }
    }

    fn transform_streaming(&self, job: &FileJob) -> Result<FileOutcome, IoError> {
        tracing::debug!(path = %job.source.display(), "streaming large file");
        let reader = fs::File::open(&job.source)?;
        let chunk_size = self.options.chunk_size;

        let summary = if self.options.dry_run {
            apply_streaming(reader, &mut io::sink(), self.rules, chunk_size)?
        } else {
            self.prepare_target(job)?;
            let mut writer = create_writer(&job.target)?;
            let summary = apply_streaming(reader, &mut writer, self.rules, chunk_size)?;
            writer.flush().map_err(|source| IoError::Write {
                path: job.target.display().to_string(),
                source,
            })?;
            summary
        };
        Ok(FileOutcome {
            replacements: summary.count,
            binary: summary.binary,
        })
    }

    fn commit(&self, job: &FileJob, contents: &[u8]) -> Result<(), IoError> {
        if self.options.dry_run {
            return Ok(());
        }
        self.prepare_target(job)?;
        write_file(&job.target, contents)
    }

    fn prepare_target(&self, job: &FileJob) -> Result<(), IoError> {
        if let Some(parent) = job.target.parent() {
            ensure_dir(parent)?;
        }
        if self.options.backup {
            backup_existing(&job.target)?;
        }
        Ok(())
    }

    fn show_preview(&self, file: &Path, original: &str, modified: &str) {
        let unit = compute_diff(original, modified);
        let preview = render_preview(
            &unit,
            self.options.context_lines,
            self.options.preview == PreviewMode::Full,
        );
        let _guard = self
            .preview_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.sink.show(file, &preview) {
            tracing::warn!(path = %file.display(), error = %e, "failed to show preview");
        }
    }
}

fn traversal_error(dir: &Path, source: io::Error) -> ReplaceError {
    tracing::error!(dir = %dir.display(), error = %source, "failed to list directory");
    ReplaceError::Traversal {
        dir: dir.display().to_string(),
        source: IoError::System(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use tempfile::TempDir;

    fn rules() -> RuleSet {
        RuleSet::new(vec![Rule::literal("foo", "bar")]).unwrap()
    }

    #[test]
    fn test_single_file_source() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let file = src.path().join("only.txt");
        fs::write(&file, "foo foo").unwrap();
        fs::write(src.path().join("other.txt"), "foo").unwrap();

        let rules = rules();
        let options = MirrorOptions::default();
        let mirror = TreeMirror::new(&rules, &options, &NoPreview).unwrap();
        let stats = RunStats::new();
        mirror.mirror(&file, out.path(), &stats).unwrap();

        assert_eq!(fs::read_to_string(out.path().join("only.txt")).unwrap(), "bar bar");
        assert!(!out.path().join("other.txt").exists());
        assert_eq!(stats.finish().replacements, 2);
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let out = TempDir::new().unwrap();
        let rules = rules();
        let options = MirrorOptions::default();
        let mirror = TreeMirror::new(&rules, &options, &NoPreview).unwrap();
        let err = mirror
            .mirror(Path::new("/nonexistent/source"), out.path(), &RunStats::new())
            .unwrap_err();
        assert!(matches!(err, ReplaceError::Config(_)));
    }

    #[test]
    fn test_large_file_is_streamed() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let content = "foo line\n".repeat(1000);
        fs::write(src.path().join("big.txt"), &content).unwrap();

        let rules = rules();
        let options = MirrorOptions {
            stream_threshold: 64,
            chunk_size: 100,
            ..MirrorOptions::default()
        };
        let mirror = TreeMirror::new(&rules, &options, &NoPreview).unwrap();
        let stats = RunStats::new();
        mirror.mirror(src.path(), out.path(), &stats).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("big.txt")).unwrap(),
            content.replace("foo", "bar")
        );
        assert_eq!(stats.finish().replacements, 1000);
    }

    #[test]
    fn test_oversized_file_fails_alone() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(src.path().join("huge.txt"), "foo".repeat(100)).unwrap();
        fs::write(src.path().join("small.txt"), "foo").unwrap();

        let rules = rules();
        let options = MirrorOptions {
            max_file_size: 10,
            ..MirrorOptions::default()
        };
        let mirror = TreeMirror::new(&rules, &options, &NoPreview).unwrap();
        let stats = RunStats::new();
        mirror.mirror(src.path(), out.path(), &stats).unwrap();

        let report = stats.finish();
        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(fs::read_to_string(out.path().join("small.txt")).unwrap(), "bar");
    }
}

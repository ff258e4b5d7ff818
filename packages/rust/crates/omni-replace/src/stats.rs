//! Run statistics.
//!
//! [`RunStats`] is the live accumulator shared by every worker of a run;
//! [`RunStats::finish`] freezes it into a [`RunReport`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Serialize, Serializer};

use crate::error::ReplaceError;

/// Live counters for one run. Safe to update from many threads.
#[derive(Debug)]
pub struct RunStats {
    discovered: AtomicUsize,
    processed: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    changed: AtomicUsize,
    replacements: AtomicUsize,
    errors: DashMap<String, String>,
    started: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Start a new run clock with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            discovered: AtomicUsize::new(0),
            processed: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            changed: AtomicUsize::new(0),
            replacements: AtomicUsize::new(0),
            errors: DashMap::new(),
            started: Instant::now(),
        }
    }

    pub(crate) fn record_discovered(&self) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processing(&self) -> usize {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_success(&self, replacements: usize) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        if replacements > 0 {
            self.changed.fetch_add(1, Ordering::Relaxed);
            self.replacements.fetch_add(replacements, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_failure(&self, path: &Path, error: &ReplaceError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.errors
            .insert(path.display().to_string(), error.to_string());
    }

    /// Files discovered so far.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.discovered.load(Ordering::Relaxed)
    }

    /// Copy the current counters without ending the run.
    #[must_use]
    pub fn snapshot(&self) -> RunReport {
        RunReport {
            discovered: self.discovered.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            changed: self.changed.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
            errors: self
                .errors
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        }
    }

    /// End the run and freeze the counters.
    #[must_use]
    pub fn finish(self) -> RunReport {
        self.snapshot()
    }
}

/// Final, read-only outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Regular files found under the source roots.
    pub discovered: usize,
    /// Files for which processing started.
    pub processed: usize,
    /// Files written (or, in a dry run, transformed) successfully.
    pub succeeded: usize,
    /// Files that failed to read, transform or write.
    pub failed: usize,
    /// Files with at least one replacement.
    pub changed: usize,
    /// Total replacements across all files.
    pub replacements: usize,
    /// Wall time from run start to finish.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Failure message per source file.
    pub errors: BTreeMap<String, String>,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

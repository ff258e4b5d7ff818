#![allow(clippy::doc_markdown)]

//! omni-replace - Rule-driven tree mirroring for Omni DevEnv
//!
//! Mirrors a source directory tree into an output tree while applying an
//! ordered list of text substitution rules to every file, with a diff
//! preview of each change.
//!
//! # Features
//!
//! - **Ordered Rules**: Literal by default, regex on opt-in; each rule sees the previous rule's output
//! - **Tree Mirror**: Worklist traversal, idempotent directory creation, per-file failure isolation
//! - **Streaming**: Line-aligned chunked substitution for large files
//! - **Diff Preview**: Full or context-windowed previews with merged ranges
//! - **Parallel**: Optional bounded rayon pool per directory
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-replace/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # ReplaceError enum (thiserror)
//! ├── rules.rs    # Rule, RuleSet
//! ├── engine.rs   # Substitution (whole text + streaming)
//! ├── diff.rs     # DiffUnit line diff
//! ├── preview.rs  # Windowed / full preview rendering
//! ├── stats.rs    # RunStats accumulator, RunReport
//! ├── mirror.rs   # TreeMirror
//! ├── config.rs   # Config file loading
//! ├── run.rs      # Multi-root orchestration
//! └── main.rs     # CLI binary
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_replace::{MirrorOptions, NoPreview, Rule, RuleSet, RunStats, TreeMirror};
//!
//! let rules = RuleSet::new(vec![Rule::literal("old_api", "new_api")])?;
//! let options = MirrorOptions::default();
//! let stats = RunStats::new();
//! TreeMirror::new(&rules, &options, &NoPreview)?.mirror(src, out, &stats)?;
//! let report = stats.finish();
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod config;
mod diff;
mod engine;
mod error;
mod mirror;
mod preview;
mod rules;
mod run;
mod stats;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::ReplaceError;
pub use rules::{Rule, RuleSet};

pub use engine::{StreamSummary, Substitution, apply, apply_bytes, apply_streaming};

// Diff + preview
pub use diff::{DiffLine, DiffUnit, LineTag, compute_diff};
pub use preview::{
    DEFAULT_CONTEXT_LINES, Preview, PreviewLine, PreviewMode, preview_ranges, render_preview,
};

// Mirroring
pub use mirror::{MirrorOptions, NoPreview, PreviewSink, TreeMirror};
pub use run::{MirrorPair, pair_roots, run, validate_pairs};
pub use stats::{RunReport, RunStats};

pub use config::{ConfigFormat, ReplaceConfig, load_config, parse_config};

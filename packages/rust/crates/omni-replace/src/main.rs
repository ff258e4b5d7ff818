//! omni-replace CLI: mirror source trees into output trees with substitution rules.
//!
//! Rules (and optionally roots and options) come from a JSON/YAML config file
//! (default `replace-config.json`). `--source`/`--output` replace the config's
//! roots when given.
//!
//! Logging: set `RUST_LOG=omni_replace=debug` to see per-file logs on stderr.

mod cli;
mod prompt;
mod render;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_replace::{RunStats, load_config, pair_roots, run, validate_pairs};

use crate::cli::Cli;
use crate::prompt::Prompter;
use crate::render::{TerminalPreview, write_report};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_replace=debug,omni_io=debug"
        } else {
            "omni_replace=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    let rules = config.rule_set().context("invalid rule set")?;

    let sources = if cli.sources.is_empty() {
        config.sources
    } else {
        cli.sources
    };
    let outputs = if cli.outputs.is_empty() {
        config.outputs
    } else {
        cli.outputs
    };
    let pairs = pair_roots(&sources, &outputs).context("invalid path configuration")?;
    validate_pairs(&pairs).context("invalid path configuration")?;

    let mut options = config.options;
    if let Some(context) = cli.context {
        options.context_lines = context;
    }
    if let Some(workers) = cli.workers {
        options.workers = workers.max(1);
    }
    options.dry_run |= cli.dry_run;
    options.backup |= cli.backup;

    let mut prompter = Prompter::stdio();
    if let Some(preview) = cli.preview {
        options.preview = preview.into();
    } else if prompter.is_interactive() {
        options.preview = prompter.choose_preview().context("failed to read answer")?;
    }

    if !options.dry_run && !cli.yes {
        if !prompter.is_interactive() {
            tracing::warn!("stdin is not a terminal; pass --yes to run without confirmation");
        }
        let question = format!(
            "About to write into {} output root(s). Source and output paths are correct?",
            pairs.len()
        );
        if !prompter.confirm(&question, false).context("failed to read answer")? {
            eprintln!("Cancelled; nothing was written.");
            return Ok(());
        }
    }

    let color = !cli.no_color && io::stdout().is_terminal();
    let sink = TerminalPreview::new(color);
    let stats = RunStats::new();
    let outcome = run(&pairs, &rules, &options, &sink, &stats);
    let report = stats.finish();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        write_report(&mut io::stdout().lock(), &report, color)?;
    }

    outcome.context("run aborted")?;
    Ok(())
}

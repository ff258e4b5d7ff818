use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use omni_replace::PreviewMode;

#[derive(Parser, Debug)]
#[command(name = "omni-replace")]
#[command(
    version,
    about = "Mirror source trees into output trees, applying ordered text substitution rules."
)]
pub(crate) struct Cli {
    /// Config file with `rules` (JSON, or YAML for .yaml/.yml).
    #[arg(long, short = 'c', value_name = "FILE", default_value = "replace-config.json")]
    pub(crate) config: PathBuf,

    /// Source root (repeatable; replaces `sources` from the config).
    #[arg(long = "source", short = 's', value_name = "PATH")]
    pub(crate) sources: Vec<PathBuf>,

    /// Output root, paired with `--source` by position (repeatable).
    #[arg(long = "output", short = 'o', value_name = "DIR")]
    pub(crate) outputs: Vec<PathBuf>,

    /// Preview mode; prompts when omitted on a terminal.
    #[arg(long, value_enum)]
    pub(crate) preview: Option<PreviewArg>,

    /// Context lines around changes in windowed previews.
    #[arg(long, value_name = "N")]
    pub(crate) context: Option<usize>,

    /// Worker threads per directory.
    #[arg(long, short = 'j', value_name = "N")]
    pub(crate) workers: Option<usize>,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,

    /// Compute and preview changes without writing anything.
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Back up existing output files to `<file>.bak` before overwriting.
    #[arg(long)]
    pub(crate) backup: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    pub(crate) json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub(crate) no_color: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(long, short = 'v')]
    pub(crate) verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PreviewArg {
    Off,
    Windowed,
    Full,
}

impl From<PreviewArg> for PreviewMode {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Off => Self::Off,
            PreviewArg::Windowed => Self::Windowed,
            PreviewArg::Full => Self::Full,
        }
    }
}

//! Terminal rendering of previews and the final report.

use std::io::{self, Write};
use std::path::Path;

use crossterm::style::Stylize;

use omni_replace::{LineTag, Preview, PreviewLine, PreviewSink, RunReport};

/// Writes previews to stdout, optionally colored.
pub(crate) struct TerminalPreview {
    color: bool,
}

impl TerminalPreview {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }
}

impl PreviewSink for TerminalPreview {
    fn show(&self, file: &Path, preview: &Preview) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write_preview(&mut out, file, preview, self.color)?;
        out.flush()
    }
}

fn write_preview<W: Write>(out: &mut W, file: &Path, preview: &Preview, color: bool) -> io::Result<()> {
    let header = format!("\n--- diff preview: {}", file.display());
    if color {
        writeln!(out, "{}", header.yellow())?;
    } else {
        writeln!(out, "{header}")?;
    }

    for line in preview.lines() {
        match line {
            PreviewLine::Ellipsis if color => writeln!(out, "{}", "  ...".dark_grey())?,
            PreviewLine::Ellipsis => writeln!(out, "  ...")?,
            PreviewLine::Line { number, tag, text } => {
                let body = format!("{number:>5} {}{text}", tag.sign());
                if !color {
                    writeln!(out, "{body}")?;
                    continue;
                }
                match tag {
                    LineTag::Added => writeln!(out, "{}", body.green().bold())?,
                    LineTag::Removed => writeln!(out, "{}", body.red().crossed_out())?,
                    LineTag::Context => writeln!(out, "{}", body.dark_grey())?,
                }
            }
        }
    }
    Ok(())
}

/// Print the report as a small tree.
pub(crate) fn write_report<W: Write>(out: &mut W, report: &RunReport, color: bool) -> io::Result<()> {
    let rows = [
        format!("├─ files discovered: {}", report.discovered),
        format!("├─ processed:        {}", report.processed),
        format!("├─ succeeded:        {}", report.succeeded),
        format!("├─ failed:           {}", report.failed),
        format!("├─ changed:          {}", report.changed),
        format!("├─ replacements:     {}", report.replacements),
        format!("└─ elapsed:          {:.1}s", report.elapsed.as_secs_f64()),
    ];

    let title = "\nReplace report:";
    if color {
        writeln!(out, "{}", title.cyan())?;
        for row in rows {
            writeln!(out, "{}", row.cyan())?;
        }
    } else {
        writeln!(out, "{title}")?;
        for row in rows {
            writeln!(out, "{row}")?;
        }
    }

    if !report.errors.is_empty() {
        writeln!(out, "\nFailed files:")?;
        for (path, error) in &report.errors {
            let row = format!("  {path}: {error}");
            if color {
                writeln!(out, "{}", row.red())?;
            } else {
                writeln!(out, "{row}")?;
            }
        }
    }
    Ok(())
}

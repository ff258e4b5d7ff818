//! Operator prompts on stdin/stdout.

use std::io::{self, BufRead, IsTerminal, Write};

use omni_replace::PreviewMode;

/// Asks yes/no questions. Without a terminal every question takes its default.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    pub(crate) fn stdio() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self {
            input: stdin.lock(),
            output: io::stderr(),
            interactive,
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    #[cfg(test)]
    fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: true,
        }
    }

    pub(crate) fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Ask a yes/no question; an empty answer picks `default`.
    pub(crate) fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        if !self.interactive {
            return Ok(default);
        }
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{question} {hint} ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(default);
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Ask whether to preview and, if so, in which mode.
    pub(crate) fn choose_preview(&mut self) -> io::Result<PreviewMode> {
        if !self.confirm("Preview differences?", true)? {
            return Ok(PreviewMode::Off);
        }
        if self.confirm("Show full files instead of changed regions?", false)? {
            Ok(PreviewMode::Full)
        } else {
            Ok(PreviewMode::Windowed)
        }
    }
}

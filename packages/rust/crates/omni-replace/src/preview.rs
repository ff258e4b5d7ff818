//! Preview rendering for a [`DiffUnit`].
//!
//! Full mode lists every line. Windowed mode shows each change block with
//! `context` lines around it; windows that overlap or touch are merged, and
//! each skipped gap becomes a single ellipsis marker.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::diff::{DiffUnit, LineTag};

/// Default number of context lines around a change block.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Whether and how differences are shown to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// No preview.
    #[default]
    Off,
    /// Change blocks with surrounding context.
    Windowed,
    /// Every line of the file.
    Full,
}

impl PreviewMode {
    /// Whether any preview is requested.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// A rendered preview line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewLine {
    /// A diff line with its 1-based position in the diff.
    Line {
        /// 1-based index into the diff's unified line sequence.
        number: usize,
        /// Added, removed or context.
        tag: LineTag,
        /// Line text without terminator.
        text: String,
    },
    /// Marker for skipped unchanged lines.
    Ellipsis,
}

/// Renderable preview of one file's changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preview {
    lines: Vec<PreviewLine>,
}

impl Preview {
    /// Rendered lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[PreviewLine] {
        &self.lines
    }

    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                PreviewLine::Line { number, tag, text } => {
                    writeln!(f, "{number:>5} {}{text}", tag.sign())?;
                }
                PreviewLine::Ellipsis => writeln!(f, "  ...")?,
            }
        }
        Ok(())
    }
}

/// Index ranges shown in windowed mode: each change block widened by
/// `context` on both sides, clipped to the diff, merged when overlapping or
/// adjacent. The result is sorted and disjoint.
#[must_use]
pub fn preview_ranges(unit: &DiffUnit, context: usize) -> Vec<Range<usize>> {
    let len = unit.len();
    let mut windows: Vec<Range<usize>> = unit
        .change_blocks()
        .into_iter()
        .map(|block| block.start.saturating_sub(context)..block.end.saturating_add(context).min(len))
        .collect();
    windows.sort_by_key(|range| range.start);
    merge_ranges(windows)
}

fn merge_ranges(sorted: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(current) if range.start <= current.end => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Render `unit` for display.
///
/// With `full` every line is listed. Otherwise only [`preview_ranges`] are
/// listed, with an ellipsis for each gap; a diff without changes renders as
/// an empty preview.
#[must_use]
pub fn render_preview(unit: &DiffUnit, context: usize, full: bool) -> Preview {
    if full {
        return Preview {
            lines: (0..unit.len()).map(|idx| line_at(unit, idx)).collect(),
        };
    }

    let mut lines = Vec::new();
    let mut cursor = 0;
    for range in preview_ranges(unit, context) {
        if range.start > cursor {
            lines.push(PreviewLine::Ellipsis);
        }
        lines.extend(range.clone().map(|idx| line_at(unit, idx)));
        cursor = range.end;
    }
    if !lines.is_empty() && cursor < unit.len() {
        lines.push(PreviewLine::Ellipsis);
    }
    Preview { lines }
}

fn line_at(unit: &DiffUnit, idx: usize) -> PreviewLine {
    let line = &unit.lines()[idx];
    PreviewLine::Line {
        number: idx + 1,
        tag: line.tag,
        text: line.content().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffLine;

    fn unit_with_changes(len: usize, changed: &[usize]) -> DiffUnit {
        (0..len)
            .map(|idx| DiffLine {
                tag: if changed.contains(&idx) {
                    LineTag::Added
                } else {
                    LineTag::Context
                },
                text: format!("line {idx}\n"),
            })
            .collect()
    }

    #[test]
    fn test_overlapping_windows_merge() {
        let unit = unit_with_changes(20, &[5, 10]);
        assert_eq!(preview_ranges(&unit, 3), vec![2..14]);
    }

    #[test]
    fn test_touching_windows_merge() {
        // [1,4) and [4,7): shared boundary
        let unit = unit_with_changes(20, &[2, 5]);
        assert_eq!(preview_ranges(&unit, 1), vec![1..7]);
    }

    #[test]
    fn test_separate_windows_keep_gap() {
        let unit = unit_with_changes(20, &[2, 12]);
        assert_eq!(preview_ranges(&unit, 2), vec![0..5, 10..15]);

        let preview = render_preview(&unit, 2, false);
        let ellipses = preview
            .lines()
            .iter()
            .filter(|l| matches!(l, PreviewLine::Ellipsis))
            .count();
        // between the windows and after the last one
        assert_eq!(ellipses, 2);
        assert!(matches!(preview.lines()[0], PreviewLine::Line { number: 1, .. }));
    }

    #[test]
    fn test_windows_clip_to_bounds() {
        let unit = unit_with_changes(4, &[0, 3]);
        assert_eq!(preview_ranges(&unit, 10), vec![0..4]);
        assert!(!render_preview(&unit, 10, false)
            .lines()
            .contains(&PreviewLine::Ellipsis));
    }

    #[test]
    fn test_full_mode_lists_everything() {
        let unit = unit_with_changes(8, &[4]);
        let preview = render_preview(&unit, 0, true);
        assert_eq!(preview.lines().len(), 8);
    }

    #[test]
    fn test_display_format() {
        let unit = unit_with_changes(3, &[1]);
        let text = render_preview(&unit, 0, false).to_string();
        assert_eq!(text, "  ...\n    2 +line 1\n  ...\n");
    }
}

//! Line-level diff between original and modified text.
//!
//! Uses the `similar` crate (Myers minimal edit script). Each record keeps its
//! line terminator, so joining the records back together reproduces the
//! inputs byte for byte.

use std::ops::Range;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Classification of a line in a [`DiffUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    /// Present only in the modified text.
    Added,
    /// Present only in the original text.
    Removed,
    /// Present in both.
    Context,
}

impl LineTag {
    /// Whether this line belongs to a change block.
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Context)
    }

    /// Unified-diff style prefix.
    #[must_use]
    pub fn sign(self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Context => ' ',
        }
    }
}

impl From<ChangeTag> for LineTag {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Insert => Self::Added,
            ChangeTag::Delete => Self::Removed,
            ChangeTag::Equal => Self::Context,
        }
    }
}

/// One line of a diff, including its terminator if it had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// Added, removed or context.
    pub tag: LineTag,
    /// Raw line text.
    pub text: String,
}

impl DiffLine {
    /// Line text without its trailing `\n` or `\r\n`.
    #[must_use]
    pub fn content(&self) -> &str {
        let text = self.text.strip_suffix('\n').unwrap_or(&self.text);
        text.strip_suffix('\r').unwrap_or(text)
    }
}

/// Ordered tagged lines comparing two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffUnit {
    lines: Vec<DiffLine>,
}

impl DiffUnit {
    /// All lines in diff order.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True for a diff of two empty texts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line was added or removed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|line| line.tag.is_change())
    }

    /// Count of added and removed lines.
    #[must_use]
    pub fn change_counts(&self) -> (usize, usize) {
        self.lines
            .iter()
            .fold((0, 0), |(added, removed), line| match line.tag {
                LineTag::Added => (added + 1, removed),
                LineTag::Removed => (added, removed + 1),
                LineTag::Context => (added, removed),
            })
    }

    /// Rebuild the original text from removed and context lines.
    #[must_use]
    pub fn original(&self) -> String {
        self.collect_without(LineTag::Added)
    }

    /// Rebuild the modified text from added and context lines.
    #[must_use]
    pub fn modified(&self) -> String {
        self.collect_without(LineTag::Removed)
    }

    /// Maximal runs of added/removed lines, as index ranges in ascending order.
    #[must_use]
    pub fn change_blocks(&self) -> Vec<Range<usize>> {
        let mut blocks = Vec::new();
        let mut start = None;
        for (idx, line) in self.lines.iter().enumerate() {
            match (line.tag.is_change(), start) {
                (true, None) => start = Some(idx),
                (false, Some(s)) => {
                    blocks.push(s..idx);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            blocks.push(s..self.lines.len());
        }
        blocks
    }

    fn collect_without(&self, skip: LineTag) -> String {
        self.lines
            .iter()
            .filter(|line| line.tag != skip)
            .map(|line| line.text.as_str())
            .collect()
    }
}

impl FromIterator<DiffLine> for DiffUnit {
    fn from_iter<I: IntoIterator<Item = DiffLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Compute the line diff between `original` and `modified`.
#[must_use]
pub fn compute_diff(original: &str, modified: &str) -> DiffUnit {
    let diff = TextDiff::from_lines(original, modified);
    diff.iter_all_changes()
        .map(|change| DiffLine {
            tag: change.tag().into(),
            text: change.value().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_diff() {
        let unit = compute_diff("line1\nold_text\nline3", "line1\nnew_text\nline3");
        let tags: Vec<LineTag> = unit.lines().iter().map(|l| l.tag).collect();
        assert_eq!(
            tags,
            vec![
                LineTag::Context,
                LineTag::Removed,
                LineTag::Added,
                LineTag::Context
            ]
        );
        assert_eq!(unit.change_blocks(), vec![1..3]);
    }

    #[test]
    fn test_no_changes() {
        let unit = compute_diff("unchanged\ncontent\n", "unchanged\ncontent\n");
        assert!(!unit.has_changes());
        assert!(unit.change_blocks().is_empty());
    }

    #[test]
    fn test_missing_trailing_newline_round_trips() {
        let original = "a\nb";
        let modified = "a\nb\nc";
        let unit = compute_diff(original, modified);
        assert_eq!(unit.original(), original);
        assert_eq!(unit.modified(), modified);
    }

    #[test]
    fn test_content_strips_crlf() {
        let line = DiffLine {
            tag: LineTag::Context,
            text: "windows\r\n".to_string(),
        };
        assert_eq!(line.content(), "windows");
    }
}

//! Substitution engine.
//!
//! Applies a [`RuleSet`] to text. Rules run in order and each one scans the
//! output of the rules before it, so `[(A -> B), (B -> C)]` turns `A` into `C`.

use std::borrow::Cow;
use std::io::{Read, Write};

use omni_io::{BINARY_SNIFF_LEN, IoError, LineChunks, is_binary};

use crate::rules::RuleSet;

/// Result of applying a rule set to a block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Text after every rule has been applied.
    pub modified: String,
    /// Total matches replaced, summed over all rules.
    pub count: usize,
}

impl Substitution {
    /// Whether any rule matched.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.count > 0
    }
}

/// Apply every rule to `content` in order.
///
/// Each match of each rule counts once, including zero-length matches.
///
/// # Example
///
/// ```rust
/// use omni_replace::{Rule, RuleSet, apply};
///
/// let rules = RuleSet::new(vec![Rule::literal("x", "y")]).unwrap();
/// let result = apply("xxx", &rules);
/// assert_eq!(result.modified, "yyy");
/// assert_eq!(result.count, 3);
/// ```
#[must_use]
pub fn apply(content: &str, rules: &RuleSet) -> Substitution {
    let mut modified = Cow::Borrowed(content);
    let mut count = 0;

    for rule in rules.compiled() {
        let (replaced, matches) = rule.replace_all(&modified);
        count += matches;
        if let Cow::Owned(next) = replaced {
            modified = Cow::Owned(next);
        }
    }

    Substitution {
        modified: modified.into_owned(),
        count,
    }
}

/// Apply every rule to raw bytes.
///
/// Valid UTF-8 goes through [`apply`]. Anything else (GBK, Latin-1, ...) is
/// matched byte-wise, so bytes outside the matches are kept exactly and an
/// input without matches comes back unchanged.
#[must_use]
pub fn apply_bytes(content: &[u8], rules: &RuleSet) -> (Vec<u8>, usize) {
    if let Ok(text) = std::str::from_utf8(content) {
        let substitution = apply(text, rules);
        return (substitution.modified.into_bytes(), substitution.count);
    }

    let mut modified = Cow::Borrowed(content);
    let mut count = 0;
    for rule in rules.compiled() {
        let (replaced, matches) = rule.replace_all_bytes(&modified);
        count += matches;
        if let Cow::Owned(next) = replaced {
            modified = Cow::Owned(next);
        }
    }
    (modified.into_owned(), count)
}

/// Summary of a streamed substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Total matches replaced.
    pub count: usize,
    /// Input was binary and copied through unchanged.
    pub binary: bool,
    /// Bytes consumed from the reader.
    pub bytes_read: u64,
}

/// Apply `rules` to `reader` chunk by chunk, writing the result to `writer`.
///
/// Chunks end on line breaks, so a chunk-safe rule set (see
/// [`RuleSet::is_chunk_safe`]) sees exactly the matches it would see on the
/// whole text. Otherwise the whole input is buffered and substituted in one
/// pass.
///
/// The first [`BINARY_SNIFF_LEN`] bytes decide whether the input is binary,
/// whatever the chunk size. Binary input is copied verbatim.
///
/// # Errors
/// Propagates read and write failures.
pub fn apply_streaming<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    rules: &RuleSet,
    chunk_size: usize,
) -> Result<StreamSummary, IoError> {
    let mut summary = StreamSummary::default();

    if !rules.is_chunk_safe() {
        tracing::debug!("rule set is not chunk safe; buffering whole input");
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        summary.binary = is_binary(&buffer);
        process_chunk(&buffer, writer, rules, &mut summary)?;
        return Ok(summary);
    }

    let mut chunks = LineChunks::new(reader, chunk_size);
    let mut head = Vec::new();
    let mut sniffed = 0;
    while sniffed < BINARY_SNIFF_LEN {
        let Some(chunk) = chunks.next() else { break };
        let chunk = chunk?;
        sniffed += chunk.len();
        head.push(chunk);
    }
    summary.binary = is_binary(&head.concat());

    for chunk in head.into_iter().map(Ok).chain(chunks) {
        process_chunk(&chunk?, writer, rules, &mut summary)?;
    }
    Ok(summary)
}

fn process_chunk<W: Write>(
    chunk: &[u8],
    writer: &mut W,
    rules: &RuleSet,
    summary: &mut StreamSummary,
) -> Result<(), IoError> {
    summary.bytes_read += chunk.len() as u64;
    if summary.binary {
        writer.write_all(chunk)?;
        return Ok(());
    }

    let (modified, count) = apply_bytes(chunk, rules);
    summary.count += count;
    writer.write_all(&modified)?;
    Ok(())
}

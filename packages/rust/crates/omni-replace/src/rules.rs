//! Substitution rules.
//!
//! A [`Rule`] is a pattern/replacement pair. Patterns are literal text unless
//! the rule opts into regex syntax with `regex: true`; literal patterns are
//! escaped before compilation so characters like `.` or `(` match themselves.
//!
//! A [`RuleSet`] compiles the rules once and is immutable afterwards. Cloning
//! it is cheap and shares the compiled matchers. Each rule is compiled twice:
//! once for UTF-8 text and once for raw bytes, so files in other encodings
//! are matched without being re-encoded.

use std::borrow::Cow;
use std::sync::Arc;

use regex::{Captures, Regex, bytes};
use serde::{Deserialize, Serialize};

use crate::error::ReplaceError;

/// A single pattern/replacement pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Text to search for (literal unless `regex` is set).
    pub pattern: String,
    /// Replacement text. With `regex` set, `$1` and `${name}` expand captures.
    pub replacement: String,
    /// Treat `pattern` as a regular expression.
    #[serde(default)]
    pub regex: bool,
}

impl Rule {
    /// Literal rule: every occurrence of `pattern` becomes `replacement`.
    pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            regex: false,
        }
    }

    /// Regex rule with capture expansion in the replacement.
    pub fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            regex: true,
        }
    }

    /// Whether a match of this rule could contain a line break.
    ///
    /// Regex rules are assumed to, since `\s` or `[^x]` can match `\n`.
    #[must_use]
    pub fn may_span_lines(&self) -> bool {
        self.regex || self.pattern.contains('\n')
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    rule: Rule,
    matcher: Regex,
    bytes_matcher: bytes::Regex,
}

impl CompiledRule {
    fn compile(index: usize, rule: Rule) -> Result<Self, ReplaceError> {
        let source = if rule.regex {
            Cow::Borrowed(rule.pattern.as_str())
        } else {
            Cow::Owned(regex::escape(&rule.pattern))
        };
        let invalid = |source: regex::Error| ReplaceError::Pattern {
            index,
            pattern: rule.pattern.clone(),
            source,
        };
        let matcher = Regex::new(&source).map_err(invalid)?;
        let bytes_matcher = bytes::Regex::new(&source).map_err(invalid)?;
        Ok(Self {
            rule,
            matcher,
            bytes_matcher,
        })
    }

    /// Whether the pattern matches the empty string.
    fn matches_empty(&self) -> bool {
        self.matcher.is_match("")
    }

    /// Replace every non-overlapping match in `text`, returning the match count.
    pub(crate) fn replace_all<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut count = 0usize;
        let replaced = self.matcher.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            if self.rule.regex {
                let mut expanded = String::new();
                caps.expand(&self.rule.replacement, &mut expanded);
                expanded
            } else {
                self.rule.replacement.clone()
            }
        });
        (replaced, count)
    }

    /// Byte-level [`Self::replace_all`] for text that is not valid UTF-8.
    pub(crate) fn replace_all_bytes<'t>(&self, text: &'t [u8]) -> (Cow<'t, [u8]>, usize) {
        let mut count = 0usize;
        let replaced = self
            .bytes_matcher
            .replace_all(text, |caps: &bytes::Captures<'_>| {
                count += 1;
                if self.rule.regex {
                    let mut expanded = Vec::new();
                    caps.expand(self.rule.replacement.as_bytes(), &mut expanded);
                    expanded
                } else {
                    self.rule.replacement.as_bytes().to_vec()
                }
            });
        (replaced, count)
    }
}

/// Ordered, compiled, immutable list of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Arc<[CompiledRule]>,
}

impl RuleSet {
    /// Compile `rules` in order.
    ///
    /// # Errors
    /// `ReplaceError::Pattern` for the first rule whose pattern does not compile.
    pub fn new(rules: Vec<Rule>) -> Result<Self, ReplaceError> {
        let compiled = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<Result<Vec<_>, _>>()?;
        if compiled.is_empty() {
            tracing::warn!("rule set is empty; files will be copied unchanged");
        }
        Ok(Self {
            rules: compiled.into(),
        })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Whether applying the rules to each line-aligned chunk of a text gives
    /// the same result as applying them to the whole text.
    ///
    /// False when a rule may match across lines, or when a rule matches the
    /// empty string (it would match once more at every chunk boundary).
    #[must_use]
    pub fn is_chunk_safe(&self) -> bool {
        self.rules
            .iter()
            .all(|compiled| !compiled.rule.may_span_lines() && !compiled.matches_empty())
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.rules
    }
}

//! Content normalization before comparison
//!
//! Generated code may carry documentation comments whose wording is not under test,
//! and whitespace at line ends or between blocks that carries no meaning. Both are
//! removed before actual and expected text are compared.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AssertionError, AssertionResult};

lazy_static! {
    static ref DOC_BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*\*/|/\*\*.*?\*/").unwrap();
    static ref LINE_START_WHITESPACE: Regex = Regex::new(r"(?:\n|^)\s*").unwrap();
}

/// Opening and closing markers of a comment span to strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDelimiter {
    /// Opening marker, e.g. `/**`
    pub open: String,
    /// Closing marker, e.g. `*/`
    pub close: String,
}

impl CommentDelimiter {
    /// Create a delimiter pair
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `/** ... */` documentation blocks
    pub fn doc_block() -> Self {
        Self::new("/**", "*/")
    }

    /// Alternation matching one comment span
    ///
    /// When the tail of `open` can also start `close`, as the `*` in `/**/`, the
    /// overlapping spans are tried first so the match stops at the first close.
    fn pattern(&self) -> String {
        let open = regex::escape(&self.open);
        let mut alternatives: Vec<String> = (1..self.close.len().min(self.open.len()))
            .rev()
            .filter(|&k| self.close.is_char_boundary(k) && self.open.ends_with(&self.close[..k]))
            .map(|k| format!("{}{}", open, regex::escape(&self.close[k..])))
            .collect();
        alternatives.push(format!("{}.*?{}", open, regex::escape(&self.close)));
        alternatives.join("|")
    }
}

/// Strips comments and insignificant whitespace from text
#[derive(Debug, Clone)]
pub struct ContentNormalizer {
    comments: Option<Regex>,
}

impl ContentNormalizer {
    /// Build a normalizer for the given comment delimiters
    ///
    /// An empty list disables comment stripping.
    pub fn new(delimiters: &[CommentDelimiter]) -> AssertionResult<Self> {
        if delimiters.is_empty() {
            return Ok(Self { comments: None });
        }

        if let Some(bad) = delimiters
            .iter()
            .find(|d| d.open.is_empty() || d.close.is_empty())
        {
            return Err(AssertionError::InvalidCommentDelimiter(format!(
                "empty marker in {:?}",
                bad
            )));
        }

        let alternation = delimiters
            .iter()
            .map(|d| format!("(?:{})", d.pattern()))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!("(?s){}", alternation))
            .map_err(|e| AssertionError::InvalidCommentDelimiter(e.to_string()))?;

        Ok(Self {
            comments: Some(regex),
        })
    }

    /// Normalize text for exact comparison
    ///
    /// Line endings become `\n`, comment spans are deleted, trailing whitespace is
    /// trimmed and whitespace-only lines are dropped. Indentation is kept.
    /// `normalize(normalize(x)) == normalize(x)` for every `x`.
    pub fn normalize(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        let stripped = self.strip_comments(&unified);

        stripped
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Delete comment spans until none remain
    ///
    /// Repeats because deleting one span can join the pieces of another.
    pub fn strip_comments(&self, text: &str) -> String {
        let Some(comments) = &self.comments else {
            return text.to_string();
        };

        let mut current = text.to_string();
        while comments.is_match(&current) {
            current = comments.replace_all(&current, "").into_owned();
        }
        current
    }

    /// Collapse every line break plus the whitespace after it to a single `\n`
    ///
    /// Used for containment checks so indentation and blank lines never decide the
    /// result.
    pub fn collapse_line_indentation(text: &str) -> String {
        LINE_START_WHITESPACE.replace_all(text, "\n").into_owned()
    }

    /// Whether normalized `fragment` occurs in normalized `text`, ignoring indentation
    pub fn contains(&self, text: &str, fragment: &str) -> bool {
        let text = Self::collapse_line_indentation(&self.normalize(text));
        let fragment = Self::collapse_line_indentation(&self.normalize(fragment));
        text.contains(&fragment)
    }
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self {
            comments: Some(DOC_BLOCK_COMMENT.clone()),
        }
    }
}

//! Reference scanning for the `$(NAME)` / `$(NAME[INDEX])` grammar.
//!
//! NAME is a run of word characters and whitespace, captured exactly as
//! written: whitespace inside the delimiters is part of the lookup key and is
//! never trimmed. INDEX is a non-negative decimal integer selecting one
//! element (0-based) from the named variable's values.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([\w\s]+?)(?:\[(\d+)\])?\)").unwrap());

/// A parsed reference inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The lookup key between the delimiters, untrimmed.
    pub name: String,

    /// The 0-based element index for `$(NAME[INDEX])` references.
    pub index: Option<usize>,

    /// Byte range of the whole token in the scanned string.
    pub span: Range<usize>,
}

impl Reference {
    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let token = caps.get(0)?;
        let name = caps.get(1)?.as_str().to_string();
        // A digit run too large for usize is simply out of range for any
        // real variable.
        let index = caps
            .get(2)
            .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX));
        Some(Self {
            name,
            index,
            span: token.range(),
        })
    }
}

/// Returns the first reference at or after byte offset `from`.
#[must_use]
pub fn find_reference(text: &str, from: usize) -> Option<Reference> {
    REFERENCE_RE
        .captures_at(text, from)
        .and_then(|caps| Reference::from_captures(&caps))
}

/// Returns every reference in `text`, left to right.
#[must_use]
pub fn parse_references(text: &str) -> Vec<Reference> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| Reference::from_captures(&caps))
        .collect()
}

/// Returns Some only when `text` is exactly one reference token and nothing
/// else (a bare reference).
#[must_use]
pub fn parse_bare_reference(text: &str) -> Option<Reference> {
    find_reference(text, 0).filter(|r| r.span == (0..text.len()))
}

/// True iff `text` contains no syntactically valid reference.
#[must_use]
pub fn is_resolved(text: &str) -> bool {
    !REFERENCE_RE.is_match(text)
}

/// Builds the reference token for a variable name.
#[must_use]
pub fn reference_for(name: &str) -> String {
    format!("$({name})")
}

//! Lexical matching of ingredient names against rule patterns and step text.
//!
//! Ingredients carry no canonical identity, so every decision the engine makes
//! (is this ingredient excluded, does this step mention it) is a string match.
//! The matching policy sits behind [`IngredientMatcher`] so the engine can run
//! with the plain substring policy or a stricter one.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

pub trait IngredientMatcher {
    /// Byte range in `text` of the first occurrence of `term`, if any.
    fn find(&self, text: &str, term: &str) -> Option<Range<usize>>;

    fn contains(&self, text: &str, term: &str) -> bool {
        self.find(text, term).is_some()
    }
}

/// Case-insensitive literal substring match.
///
/// Not word aware: "ham" is found inside "graham crackers".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstringMatcher;

impl IngredientMatcher for SubstringMatcher {
    fn find(&self, text: &str, term: &str) -> Option<Range<usize>> {
        find_ignore_case(text, term, 0)
    }
}

/// Case-insensitive match that must start and end on a word boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordBoundaryMatcher;

impl IngredientMatcher for WordBoundaryMatcher {
    fn find(&self, text: &str, term: &str) -> Option<Range<usize>> {
        let mut from = 0;
        while let Some(range) = find_ignore_case(text, term, from) {
            let before = text[..range.start].chars().next_back();
            let after = text[range.end..].chars().next();
            if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric) {
                return Some(range);
            }
            // advance one char past the rejected start
            from = range.start + text[range.start..].chars().next().map_or(1, char::len_utf8);
            if from > text.len() {
                return None;
            }
        }
        None
    }
}

/// Matching policy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    #[default]
    Substring,
    WordBoundary,
}

impl IngredientMatcher for MatchMode {
    fn find(&self, text: &str, term: &str) -> Option<Range<usize>> {
        match self {
            MatchMode::Substring => SubstringMatcher.find(text, term),
            MatchMode::WordBoundary => WordBoundaryMatcher.find(text, term),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "word-boundary" | "word_boundary" | "word" => Ok(MatchMode::WordBoundary),
            other => Err(format!(
                "unknown match mode '{}', expected 'substring' or 'word-boundary'",
                other
            )),
        }
    }
}

/// Finds `term` in `text` ignoring case, starting at byte offset `from`
/// (must be a char boundary). Folding is per char, so the returned range
/// always lands on char boundaries of the original text even when lowercasing
/// changes byte lengths.
fn find_ignore_case(text: &str, term: &str, from: usize) -> Option<Range<usize>> {
    let needle: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Some(from..from);
    }

    'starts: for (start, _) in text[from..].char_indices() {
        let start = from + start;
        let mut matched = 0;
        for (offset, ch) in text[start..].char_indices() {
            for lower in ch.to_lowercase() {
                if needle.get(matched) != Some(&lower) {
                    continue 'starts;
                }
                matched += 1;
            }
            if matched == needle.len() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
    }
    None
}

//! Term matcher: case-insensitive literal search with word boundaries
//!
//! Spans are UTF-8 byte ranges into the searched text. A candidate only
//! counts when the characters on both sides of it are non-word characters
//! (or the text ends there), so `incident` never matches inside
//! `incidental` while `$variable` or `C++` still match with their symbols.

use std::ops::Range;

use super::glossary::{GlossaryEntry, GlossaryTermSet};

/// An occurrence of a glossary source in some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'g> {
    pub entry: &'g GlossaryEntry,
    pub start: usize,
    pub end: usize,
    /// The literal text covered by the span, in whatever case it appeared.
    pub matched_text: String,
}

impl Match<'_> {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Letters, digits and the `_` connector.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn boundary_before(text: &str, start: usize) -> bool {
    text[..start].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn boundary_after(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_none_or(|c| !is_word_char(c))
}

/// Returns the end offset if `needle` matches at `start`, ignoring case.
fn match_at(text: &str, start: usize, needle: &[char]) -> Option<usize> {
    let mut chars = text[start..].char_indices();
    for &expected in needle {
        let (_, c) = chars.next()?;
        if !chars_eq_ignore_case(c, expected) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(offset, _)| start + offset))
}

/// All non-overlapping occurrences of `term` in `text`, ascending by start.
pub fn find_spans(text: &str, term: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = term.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut resume_at = 0;

    for (start, _) in text.char_indices() {
        if start < resume_at || !boundary_before(text, start) {
            continue;
        }
        if let Some(end) = match_at(text, start, &needle) {
            if boundary_after(text, end) {
                spans.push(start..end);
                resume_at = end;
            }
        }
    }

    spans
}

/// FindMatches: every occurrence of the entry's source in `text`.
pub fn find_matches<'g>(text: &str, entry: &'g GlossaryEntry) -> Vec<Match<'g>> {
    find_spans(text, entry.source())
        .into_iter()
        .map(|span| Match {
            entry,
            matched_text: text[span.clone()].to_string(),
            start: span.start,
            end: span.end,
        })
        .collect()
}

/// Entries whose source occurs at least once in `text`, in term-set order.
pub fn applicable_terms<'g>(text: &str, terms: &'g GlossaryTermSet) -> Vec<&'g GlossaryEntry> {
    terms
        .iter()
        .filter(|entry| !find_spans(text, entry.source()).is_empty())
        .collect()
}

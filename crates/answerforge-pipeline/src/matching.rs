//! Locating generated answers in source text

use std::ops::Range;

/// Prefix length used by the last-resort anchor match
const ANCHOR_CHARS: usize = 20;

/// Find the byte span of `answer` within `text`
///
/// Generated answers are quoted from the text by contract, but models drift
/// on case, whitespace, and punctuation. Three passes, cheapest first: exact
/// substring, a normalization-tolerant match, then a prefix anchor. Returns
/// `None` when the answer cannot be placed at all.
pub(crate) fn locate_answer(text: &str, answer: &str) -> Option<Range<usize>> {
    let needle = answer.trim();
    if needle.is_empty() {
        return None;
    }

    if let Some(start) = text.find(needle) {
        return Some(start..start + needle.len());
    }

    fuzzy_find(text, needle).or_else(|| anchor_find(text, needle))
}

/// Lowercased alphanumeric characters only, with a map from each normalized
/// byte back to the source byte of the character it came from
///
/// Dropping whitespace and punctuation entirely makes the match insensitive
/// to apostrophes, hyphenation, and line wrapping alike.
struct Normalized {
    text: String,
    map: Vec<usize>,
}

fn normalize(source: &str) -> Normalized {
    let mut text = String::new();
    let mut map = Vec::new();
    for (idx, ch) in source.char_indices() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                for _ in 0..lower.len_utf8() {
                    map.push(idx);
                }
                text.push(lower);
            }
        }
    }
    Normalized { text, map }
}

fn fuzzy_find(text: &str, needle: &str) -> Option<Range<usize>> {
    let hay = normalize(text);
    let ndl = normalize(needle);
    if ndl.text.is_empty() {
        return None;
    }
    let pos = hay.text.find(&ndl.text)?;
    let start = hay.map[pos];
    let last = hay.map[pos + ndl.text.len() - 1];
    let end = last + text[last..].chars().next().map_or(1, char::len_utf8);
    Some(start..end)
}

fn anchor_find(text: &str, needle: &str) -> Option<Range<usize>> {
    let anchor_end = needle
        .char_indices()
        .nth(ANCHOR_CHARS)
        .map_or(needle.len(), |(i, _)| i);
    let start = text.find(&needle[..anchor_end])?;
    let mut end = (start + needle.len()).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Some(start..end)
}

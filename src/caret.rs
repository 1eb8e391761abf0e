//! Caret-to-token resolution.
//!
//! Hosts rarely know exactly which token the caret is on: they hand over the
//! leaf element under the caret, which may be a single keystroke's worth of
//! text or the whole quoted attribute. [`resolve`] turns whatever they have
//! into a single best-guess token, degrading from exact text match through
//! containment to nearest-token guessing.
//!
//! Rules, first applicable wins:
//!
//! 1. Exact-text hint: first token equal to it, else first token containing it.
//! 2. Caret index from the narrowest candidate range overlapping the value
//!    (its start), else the midpoint of the narrowest range available.
//! 3. Clamp into the value; an empty value resolves to nothing.
//! 4. Token containing the caret.
//! 5. Token with the nearest center, leftmost on ties.
//! 6. With no tokens at all, whitespace fragments: equal to the hint,
//!    containing the hint, a known class, or simply the first one.

use crate::types::{CaretQuery, Token};
use std::ops::Range;

/// Resolve the single token a caret query refers to.
///
/// `tokens` must be [`tokenize`](crate::tokenize)`(value)`. `is_known_class`
/// is only consulted by the last-resort fragment fallback.
pub fn resolve<F>(
    value: &str,
    tokens: &[Token],
    query: &CaretQuery,
    is_known_class: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    if let Some(hint) = query.exact_text.as_deref().map(clean_hint) {
        if !hint.is_empty() {
            if let Some(token) = tokens
                .iter()
                .find(|t| t.text == hint)
                .or_else(|| tokens.iter().find(|t| t.text.contains(hint)))
            {
                return Some(token.text.clone());
            }
        }
    }

    let len = value.chars().count();
    if len == 0 {
        return None;
    }

    if tokens.is_empty() {
        return fallback_fragment(value, query.exact_text.as_deref(), is_known_class);
    }

    let caret = caret_index(query, len).min(len - 1);

    if let Some(token) = tokens.iter().find(|t| t.contains(caret)) {
        return Some(token.text.clone());
    }

    nearest_token(tokens, caret).map(|t| t.text.clone())
}

/// Caret position inside the value, before clamping to the last char.
///
/// Host ranges are mapped into value coordinates by subtracting
/// `query.value_offset`; positions before the value saturate to 0.
pub fn caret_index(query: &CaretQuery, value_len: usize) -> usize {
    let span = query.value_offset..query.value_offset + value_len;

    let narrow = query
        .ranges
        .iter()
        .filter(|r| overlaps(r, &span) && is_narrow(r, value_len))
        .min_by_key(|r| width(r));

    let host_pos = match narrow {
        Some(range) => range.start,
        None => match query.ranges.iter().min_by_key(|r| width(r)) {
            Some(range) => range.start + width(range) / 2,
            None => return 0,
        },
    };

    host_pos.saturating_sub(query.value_offset)
}

/// Token whose center is nearest to `caret`; leftmost wins ties.
pub fn nearest_token(tokens: &[Token], caret: usize) -> Option<&Token> {
    // Centers are (start + end) / 2; doubling keeps the comparison exact.
    tokens
        .iter()
        .min_by_key(|t| (2 * caret).abs_diff(t.start + t.end))
}

/// Strip surrounding whitespace and quotes from host element text.
pub fn clean_hint(text: &str) -> &str {
    text.trim().trim_matches(|c: char| c == '"' || c == '\'')
}

fn fallback_fragment<F>(value: &str, raw_hint: Option<&str>, is_known_class: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let fragments: Vec<&str> = value.split_whitespace().collect();

    if let Some(hint) = raw_hint {
        if let Some(fragment) = fragments.iter().find(|f| **f == hint) {
            return Some(fragment.to_string());
        }
        if let Some(fragment) = fragments.iter().find(|f| f.contains(hint)) {
            return Some(fragment.to_string());
        }
    }

    fragments
        .iter()
        .find(|f| is_known_class(**f))
        .or_else(|| fragments.iter().find(|f| !f.trim().is_empty()))
        .map(|f| f.to_string())
}

fn width(range: &Range<usize>) -> usize {
    range.end.saturating_sub(range.start)
}

// Touching counts, so a zero-width caret at either edge still overlaps.
fn overlaps(range: &Range<usize>, span: &Range<usize>) -> bool {
    range.start <= span.end && range.end >= span.start
}

fn is_narrow(range: &Range<usize>, value_len: usize) -> bool {
    width(range) == 0 || width(range) < value_len
}

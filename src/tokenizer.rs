//! Attribute value tokenizer.
//!
//! A token is a maximal run of `[A-Za-z0-9:_-]`. Everything else (whitespace,
//! quotes, punctuation, non-ASCII) separates tokens. Offsets are char
//! indices into the unquoted value so hover and reference ranges agree.

use crate::types::Token;

/// Whether a char can be part of a token.
pub fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, ':' | '_' | '-')
}

/// Split an attribute value into ordered, non-overlapping tokens.
pub fn tokenize(value: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (i, ch) in value.chars().enumerate() {
        if is_token_char(ch) {
            match current {
                Some((_, ref mut text)) => text.push(ch),
                None => current = Some((i, ch.to_string())),
            }
        } else if let Some((start, text)) = current.take() {
            tokens.push(Token::new(start, i, text));
        }
    }

    if let Some((start, text)) = current {
        let end = start + text.chars().count();
        tokens.push(Token::new(start, end, text));
    }

    tokens
}

/// Token whose half-open range contains `offset`.
pub fn token_at(tokens: &[Token], offset: usize) -> Option<&Token> {
    tokens.iter().find(|t| t.contains(offset))
}

//! Single-pass lexer for filter expressions.
//!
//! Produces a flat token stream. Whitespace is not a token; each token
//! records whether whitespace preceded it, which is all the parser needs to
//! enforce spacing around connectives.

use crate::error::{Expected, ValidationError};
use crate::vocab::Comparator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*`: a column or a connective keyword.
    Word,
    /// `[0-9]+(\.[0-9]+)?`
    Number,
    /// `'...'` or `"..."`, quotes included.
    Quoted,
    Comparator(Comparator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) text: &'a str,
    /// Byte offset in the input.
    pub(crate) start: usize,
    /// Whitespace immediately before this token.
    pub(crate) spaced: bool,
}

impl Token<'_> {
    pub(crate) const fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::Quoted)
    }

    pub(crate) const fn comparator(&self) -> Option<Comparator> {
        match self.kind {
            TokenKind::Comparator(cmp) => Some(cmp),
            _ => None,
        }
    }
}

/// Split a filter expression into tokens.
///
/// Fails on an unterminated quote ([`ValidationError::BadLiteral`]) or on a
/// character outside the grammar ([`ValidationError::Syntax`]).
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ValidationError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut spaced = false;
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        if b.is_ascii_whitespace() {
            spaced = true;
            i += 1;
            continue;
        }

        let start = i;
        let kind = match b {
            b'\'' | b'"' => {
                let Some(len) = bytes[i + 1..].iter().position(|&c| c == b) else {
                    return Err(ValidationError::BadLiteral {
                        literal: input[start..].to_string(),
                    });
                };
                i += len + 2;
                TokenKind::Quoted
            },
            b'0'..=b'9' => {
                i = scan_number(bytes, i);
                TokenKind::Number
            },
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                i = scan_word(bytes, i);
                TokenKind::Word
            },
            b'=' | b'!' | b'<' | b'>' => {
                let Some((cmp, len)) = Comparator::match_prefix(&input[i..]) else {
                    return Err(ValidationError::syntax(
                        start,
                        &input[start..=start],
                        Expected::Comparator,
                    ));
                };
                i += len;
                TokenKind::Comparator(cmp)
            },
            _ => {
                let found = input[start..].chars().next().map_or(0, char::len_utf8);
                return Err(ValidationError::syntax(
                    start,
                    &input[start..start + found],
                    Expected::Token,
                ));
            },
        };

        tokens.push(Token {
            kind,
            text: &input[start..i],
            start,
            spaced,
        });
        spaced = false;
    }

    Ok(tokens)
}

fn scan_word(bytes: &[u8], mut i: usize) -> usize {
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        i += 1;
    }
    i
}

fn scan_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

fn scan_number(bytes: &[u8], i: usize) -> usize {
    let end = scan_digits(bytes, i);
    // Fraction only when a digit follows the point
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        scan_digits(bytes, end + 1)
    } else {
        end
    }
}

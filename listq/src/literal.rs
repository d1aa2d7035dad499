//! Literal classification for the right-hand side of filter pairs.

use crate::constants::{MAX_FRACTION_DIGITS, MAX_INTEGER_DIGITS};
use crate::error::ValidationError;
use std::fmt;

/// A classified filter literal. Keeps the raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Literal {
    /// Single-quoted string, enclosing quotes included.
    QuotedString(String),
    /// Decimal or integer number text.
    Number(String),
}

/// Kind of a [`Literal`], without its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LiteralKind {
    /// Single-quoted string.
    QuotedString,
    /// Decimal or integer number.
    Number,
}

impl Literal {
    /// Kind of this literal.
    #[must_use]
    pub const fn kind(&self) -> LiteralKind {
        match self {
            Self::QuotedString(_) => LiteralKind::QuotedString,
            Self::Number(_) => LiteralKind::Number,
        }
    }

    /// Raw text as it appeared in the expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::QuotedString(s) | Self::Number(s) => s,
        }
    }

    /// Text to bind as a query parameter: strings lose their enclosing quotes.
    ///
    /// ```
    /// use listq::classify_literal;
    ///
    /// assert_eq!(classify_literal("'Alice'").unwrap().unquoted(), "Alice");
    /// assert_eq!(classify_literal("42.5").unwrap().unquoted(), "42.5");
    /// ```
    #[must_use]
    pub fn unquoted(&self) -> &str {
        match self {
            Self::QuotedString(s) => s
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(s),
            Self::Number(s) => s,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LiteralKind {
    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuotedString => "quoted string",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a literal token.
///
/// - `'...'` (at least two characters, no `'` inside) is a quoted string.
/// - Anything the standard library parses as an `i64` or a finite `f64` is a
///   number.
/// - Everything else is rejected with [`ValidationError::BadLiteral`].
///
/// ```
/// use listq::{classify_literal, LiteralKind};
///
/// assert_eq!(classify_literal("'Alice'").unwrap().kind(), LiteralKind::QuotedString);
/// assert_eq!(classify_literal("3.14").unwrap().kind(), LiteralKind::Number);
/// assert!(classify_literal("\"Alice\"").is_err());
/// assert!(classify_literal("'O'Brien'").is_err());
/// ```
pub fn classify_literal(token: &str) -> Result<Literal, ValidationError> {
    if is_quoted_string(token) {
        return Ok(Literal::QuotedString(token.to_string()));
    }
    if is_number(token) {
        return Ok(Literal::Number(token.to_string()));
    }
    Err(ValidationError::BadLiteral {
        literal: token.to_string(),
    })
}

/// Boolean form of [`classify_literal`].
#[inline]
#[must_use]
pub fn is_literal(token: &str) -> bool {
    is_quoted_string(token) || is_number(token)
}

fn is_quoted_string(token: &str) -> bool {
    token
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .is_some_and(|inner| !inner.contains('\''))
}

fn is_number(token: &str) -> bool {
    token.parse::<i64>().is_ok() || token.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whether `digits[.digits]` text stays within the numeric literal limits.
pub(crate) fn within_digit_limits(text: &str) -> bool {
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    int.len() <= MAX_INTEGER_DIGITS && frac.len() <= MAX_FRACTION_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            classify_literal("'Alice'"),
            Ok(Literal::QuotedString("'Alice'".into()))
        );
        assert!(is_literal("''"));
        assert!(is_literal("'with spaces'"));
        assert!(is_literal("'日本語'"));
        assert!(is_literal("'1'"));
    }

    #[test]
    fn test_quoted_string_edge_cases() {
        // A lone quote is not an enclosed string
        assert!(!is_literal("'"));
        // Unterminated
        assert!(!is_literal("'Alice"));
        assert!(!is_literal("Alice'"));
        // Embedded quote is rejected, no doubled-quote escaping
        assert!(!is_literal("'O'Brien'"));
        assert!(!is_literal("'it''s'"));
        // Double quotes are not string literals
        assert!(!is_literal("\"Alice\""));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(classify_literal("42"), Ok(Literal::Number("42".into())));
        assert!(is_literal("0"));
        assert!(is_literal("3.14"));
        assert!(is_literal("-7"));
        assert!(is_literal("1e3"));
        assert!(is_literal("123456789012345.123456789012345"));
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(!is_literal(""));
        assert!(!is_literal("Alice"));
        assert!(!is_literal("1.2.3"));
        assert!(!is_literal(" 42"));
        assert!(!is_literal("inf"));
        assert!(!is_literal("NaN"));
        assert!(!is_literal("infinity"));

        let err = classify_literal("Alice").unwrap_err();
        assert_eq!(
            err,
            ValidationError::BadLiteral {
                literal: "Alice".into()
            }
        );
    }

    #[test]
    fn test_unquoted() {
        assert_eq!(Literal::QuotedString("''".into()).unquoted(), "");
        assert_eq!(Literal::QuotedString("'x y'".into()).unquoted(), "x y");
        assert_eq!(Literal::Number("10".into()).unquoted(), "10");
    }

    #[test]
    fn test_digit_limits() {
        assert!(within_digit_limits("1"));
        assert!(within_digit_limits("123456789012345"));
        assert!(!within_digit_limits("1234567890123456"));
        assert!(within_digit_limits("1.123456789012345"));
        assert!(!within_digit_limits("1.1234567890123456"));
    }
}

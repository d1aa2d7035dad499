//! Fixed vocabularies: comparators, connectives and sort directions.
//!
//! The tables are process-wide constants. They are never rebuilt per call and
//! never mutated, so every validator can share them across threads.

use crate::literal::LiteralKind;
use std::fmt;

/// Comparison operator between a filter column and its literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Comparator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
}

/// Comparator symbols, two-character symbols first so `>=` wins over `>`.
const COMPARATORS: &[(&str, Comparator)] = &[
    (">=", Comparator::GreaterOrEqual),
    ("<=", Comparator::LessOrEqual),
    ("!=", Comparator::NotEqual),
    (">", Comparator::GreaterThan),
    ("<", Comparator::LessThan),
    ("=", Comparator::Equal),
];

impl Comparator {
    /// SQL symbol of the comparator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// Parse an exact comparator symbol.
    ///
    /// ```
    /// use listq::Comparator;
    ///
    /// assert_eq!(Comparator::from_symbol(">="), Some(Comparator::GreaterOrEqual));
    /// assert_eq!(Comparator::from_symbol("=="), None);
    /// ```
    #[must_use]
    pub fn from_symbol(s: &str) -> Option<Self> {
        COMPARATORS
            .iter()
            .find(|(symbol, _)| *symbol == s)
            .map(|&(_, cmp)| cmp)
    }

    /// Longest comparator at the start of `s`, with its byte length.
    pub(crate) fn match_prefix(s: &str) -> Option<(Self, usize)> {
        COMPARATORS
            .iter()
            .find(|(symbol, _)| s.starts_with(symbol))
            .map(|&(symbol, cmp)| (cmp, symbol.len()))
    }

    /// Whether the comparator may be applied to a literal of `kind`.
    ///
    /// Quoted strings only support equality (`=`, `!=`). Numbers support
    /// ordering and `=`, but not `!=`.
    #[must_use]
    pub const fn accepts(self, kind: LiteralKind) -> bool {
        match kind {
            LiteralKind::QuotedString => matches!(self, Self::Equal | Self::NotEqual),
            LiteralKind::Number => !matches!(self, Self::NotEqual),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connective joining two filter pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Connective {
    /// `AND`
    And,
    /// `OR`
    Or,
}

const CONNECTIVES: &[(&str, Connective)] = &[("AND", Connective::And), ("OR", Connective::Or)];

impl Connective {
    /// Keyword of the connective, upper case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Match a connective keyword, case-insensitively.
    ///
    /// ```
    /// use listq::Connective;
    ///
    /// assert_eq!(Connective::from_keyword("and"), Some(Connective::And));
    /// assert_eq!(Connective::from_keyword("Or"), Some(Connective::Or));
    /// assert_eq!(Connective::from_keyword("XOR"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        lookup_keyword(CONNECTIVES, s)
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SortDirection {
    /// `ASC`
    Ascending,
    /// `DESC`
    Descending,
}

const DIRECTIONS: &[(&str, SortDirection)] = &[
    ("ASC", SortDirection::Ascending),
    ("DESC", SortDirection::Descending),
];

impl SortDirection {
    /// Keyword of the direction, upper case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Match `ASC` or `DESC`, case-insensitively.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        lookup_keyword(DIRECTIONS, s)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lookup_keyword<T: Copy>(table: &[(&str, T)], s: &str) -> Option<T> {
    table
        .iter()
        .find(|(keyword, _)| keyword.eq_ignore_ascii_case(s))
        .map(|&(_, value)| value)
}

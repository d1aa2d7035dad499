//! Validation diagnostics.
//!
//! Every validator has a boolean fast path (`is_valid_*`) and a structured
//! variant (`validate_*`) returning [`ValidationError`]. Both agree on
//! accept/reject; the structured one also says why.

use crate::literal::LiteralKind;
use crate::vocab::Comparator;
use std::fmt;

/// Grammar class the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expected {
    /// A column name.
    Column,
    /// One of `=`, `!=`, `>`, `>=`, `<`, `<=`.
    Comparator,
    /// A quoted string or a number.
    Literal,
    /// `AND` or `OR`.
    Connective,
    /// Whitespace around a connective.
    Whitespace,
    /// Any token of the filter grammar.
    Token,
}

impl Expected {
    /// Short human-readable name of the grammar class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Comparator => "comparator",
            Self::Literal => "literal",
            Self::Connective => "AND or OR",
            Self::Whitespace => "whitespace around connective",
            Self::Token => "column, comparator, literal or connective",
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The resource has no columns to validate against.
    EmptyAllowList,
    /// Column is not in the allow-list.
    UnknownColumn {
        /// The offending column (may be empty).
        column: String,
        /// The allow-list the column was checked against.
        allowed: Vec<String>,
    },
    /// Sort direction is not `ASC` or `DESC`.
    UnknownDirection {
        /// Column the direction was attached to.
        column: String,
        /// The offending direction token.
        direction: String,
    },
    /// Comparator cannot be used with this kind of literal.
    BadComparator {
        /// Column of the filter pair.
        column: String,
        /// The comparator that was used.
        comparator: Comparator,
        /// Kind of the literal on the right-hand side.
        literal: LiteralKind,
    },
    /// Literal is neither a single-quoted string nor a number.
    BadLiteral {
        /// The offending literal text.
        literal: String,
    },
    /// Counts of structural elements disagree.
    CardinalityMismatch {
        /// What was counted (e.g. "connectives").
        counted: &'static str,
        /// How many were required.
        expected: usize,
        /// How many were found.
        found: usize,
    },
    /// Input does not follow the grammar.
    Syntax {
        /// Byte offset of the offending token.
        position: usize,
        /// The offending token, empty at end of input.
        found: String,
        /// What the grammar allowed at this position.
        expected: Expected,
    },
}

/// Reason category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`ValidationError::EmptyAllowList`].
    EmptyAllowList,
    /// See [`ValidationError::UnknownColumn`].
    UnknownColumn,
    /// See [`ValidationError::UnknownDirection`].
    UnknownDirection,
    /// See [`ValidationError::BadComparator`].
    BadComparator,
    /// See [`ValidationError::BadLiteral`].
    BadLiteral,
    /// See [`ValidationError::CardinalityMismatch`].
    CardinalityMismatch,
    /// See [`ValidationError::Syntax`].
    Syntax,
}

impl ErrorKind {
    /// Stable snake_case code, suitable for API error bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyAllowList => "empty_allow_list",
            Self::UnknownColumn => "unknown_column",
            Self::UnknownDirection => "unknown_direction",
            Self::BadComparator => "bad_comparator",
            Self::BadLiteral => "bad_literal",
            Self::CardinalityMismatch => "cardinality_mismatch",
            Self::Syntax => "syntax",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationError {
    /// Reason category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyAllowList => ErrorKind::EmptyAllowList,
            Self::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            Self::UnknownDirection { .. } => ErrorKind::UnknownDirection,
            Self::BadComparator { .. } => ErrorKind::BadComparator,
            Self::BadLiteral { .. } => ErrorKind::BadLiteral,
            Self::CardinalityMismatch { .. } => ErrorKind::CardinalityMismatch,
            Self::Syntax { .. } => ErrorKind::Syntax,
        }
    }

    /// The offending token, when there is one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnknownColumn { column, .. } => Some(column.as_str()),
            Self::UnknownDirection { direction, .. } => Some(direction.as_str()),
            Self::BadComparator { comparator, .. } => Some(comparator.as_str()),
            Self::BadLiteral { literal } => Some(literal.as_str()),
            Self::Syntax { found, .. } => Some(found.as_str()),
            Self::EmptyAllowList | Self::CardinalityMismatch { .. } => None,
        }
    }

    /// What would have been accepted in place of the offending token.
    #[must_use]
    pub const fn expected(&self) -> Option<&'static str> {
        match self {
            Self::UnknownColumn { .. } => Some("allowed column"),
            Self::UnknownDirection { .. } => Some("ASC or DESC"),
            Self::BadComparator { literal, .. } => Some(match literal {
                LiteralKind::QuotedString => "= or !=",
                LiteralKind::Number => "=, >, >=, < or <=",
            }),
            Self::BadLiteral { .. } => Some("single-quoted string or number"),
            Self::Syntax { expected, .. } => Some(expected.as_str()),
            Self::EmptyAllowList | Self::CardinalityMismatch { .. } => None,
        }
    }

    pub(crate) fn syntax(position: usize, found: &str, expected: Expected) -> Self {
        Self::Syntax {
            position,
            found: found.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAllowList => write!(f, "no columns are allowed for this resource"),
            Self::UnknownColumn { column, allowed } => {
                write!(
                    f,
                    "column `{}` is not allowed, allowed columns: {}",
                    column,
                    allowed.join(", ")
                )
            },
            Self::UnknownDirection { column, direction } => {
                write!(
                    f,
                    "sort direction `{direction}` for column `{column}` must be ASC or DESC"
                )
            },
            Self::BadComparator {
                column,
                comparator,
                literal,
            } => {
                write!(
                    f,
                    "comparator `{comparator}` cannot compare column `{column}` with a {literal}"
                )
            },
            Self::BadLiteral { literal } => {
                write!(
                    f,
                    "`{literal}` is neither a single-quoted string nor a number"
                )
            },
            Self::CardinalityMismatch {
                counted,
                expected,
                found,
            } => write!(f, "expected {expected} {counted}, found {found}"),
            Self::Syntax {
                position,
                found,
                expected,
            } => {
                if found.is_empty() {
                    write!(f, "expected {expected} at position {position}, found end of input")
                } else {
                    write!(f, "expected {expected} at position {position}, found `{found}`")
                }
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Flat, JSON-serializable view of a [`ValidationError`].
///
/// Intended as the body of a 400 response or a structured log field.
///
/// ```
/// use listq::{Diagnostic, validate_sort};
///
/// let err = validate_sort(&["id"], "id XSC").unwrap_err();
/// let diag = Diagnostic::from(&err);
/// assert_eq!(diag.kind, "unknown_direction");
/// assert_eq!(diag.token.as_deref(), Some("XSC"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, miniserde::Serialize)]
#[non_exhaustive]
pub struct Diagnostic {
    /// Reason code, see [`ErrorKind::as_str`].
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Query parameter the error belongs to, when known.
    pub param: Option<String>,
    /// Offending token.
    pub token: Option<String>,
    /// Expected grammar class.
    pub expected: Option<String>,
    /// Byte offset of the offending token.
    pub position: Option<usize>,
}

impl Diagnostic {
    /// Attach the query parameter name.
    #[must_use]
    pub fn with_param(mut self, param: &str) -> Self {
        self.param = Some(param.to_string());
        self
    }

    /// Render as a single-line JSON object.
    #[must_use]
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }
}

impl From<&ValidationError> for Diagnostic {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: err.kind().as_str().to_string(),
            message: err.to_string(),
            param: None,
            token: err.token().map(str::to_string),
            expected: err.expected().map(str::to_string),
            position: match err {
                ValidationError::Syntax { position, .. } => Some(*position),
                _ => None,
            },
        }
    }
}

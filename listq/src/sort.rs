//! Sort expressions: comma-separated `column ASC|DESC` keys.

use crate::column::check_column;
use crate::error::{Expected, ValidationError};
use crate::vocab::SortDirection;
use std::fmt;

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SortKey {
    /// Column to sort by.
    pub column: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Create a sort key.
    #[must_use]
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// A validated sort expression, keys in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct SortExpression {
    /// Sort keys in the order they were given.
    pub keys: Vec<SortKey>,
}

impl SortExpression {
    /// Whether there are no sort keys (empty `sort` parameter).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of sort keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl fmt::Display for SortExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// Validate a sort expression against an allow-list.
///
/// Every key needs an explicit direction: `id` alone is rejected even when
/// `id` is allowed.
///
/// ```
/// use listq::{SortDirection, validate_sort};
///
/// let sort = validate_sort(&["id", "created_at"], "id ASC, created_at desc").unwrap();
/// assert_eq!(sort.keys[1].direction, SortDirection::Descending);
///
/// assert!(validate_sort(&["id"], "id").is_err());
/// assert!(validate_sort(&["id"], "id XSC").is_err());
/// ```
pub fn validate_sort<S: AsRef<str>>(
    allow_list: &[S],
    raw: &str,
) -> Result<SortExpression, ValidationError> {
    if allow_list.is_empty() {
        return Err(ValidationError::EmptyAllowList);
    }
    if raw.is_empty() {
        return Ok(SortExpression::default());
    }

    let mut columns = Vec::new();
    let mut directions = Vec::new();
    for token in raw.split(',') {
        let (column, direction) = split_sort_token(token);
        columns.push(column);
        if let Some(direction) = direction {
            directions.push((column, direction));
        }
    }

    if columns.is_empty() {
        return Err(ValidationError::syntax(0, raw, Expected::Column));
    }
    for column in &columns {
        check_column(column, allow_list)?;
    }
    if directions.len() != columns.len() {
        return Err(ValidationError::CardinalityMismatch {
            counted: "sort directions",
            expected: columns.len(),
            found: directions.len(),
        });
    }

    let keys = directions
        .into_iter()
        .map(|(column, direction)| {
            SortDirection::from_keyword(direction)
                .map(|d| SortKey::new(column, d))
                .ok_or_else(|| ValidationError::UnknownDirection {
                    column: column.to_string(),
                    direction: direction.to_string(),
                })
        })
        .collect::<Result<_, _>>()?;

    Ok(SortExpression { keys })
}

/// Boolean form of [`validate_sort`].
#[inline]
#[must_use]
pub fn is_valid_sort<S: AsRef<str>>(allow_list: &[S], raw: &str) -> bool {
    validate_sort(allow_list, raw).is_ok()
}

/// Split one sort token on its first run of whitespace.
///
/// Leading whitespace is dropped; the direction part is everything after the
/// first run, trailing whitespace removed.
fn split_sort_token(token: &str) -> (&str, Option<&str>) {
    let token = token.trim_start();
    match token.split_once(char::is_whitespace) {
        Some((column, rest)) => {
            let rest = rest.trim();
            (column, (!rest.is_empty()).then_some(rest))
        },
        None => (token, None),
    }
}

//! Field projections: comma-separated column names.

use crate::column::check_column;
use crate::error::ValidationError;
use std::fmt;

/// A validated field projection. Order preserved, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct FieldsExpression {
    /// Requested columns.
    pub columns: Vec<String>,
}

impl FieldsExpression {
    /// Whether no projection was requested (empty `fields` parameter).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of requested columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Requested columns as string slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

impl fmt::Display for FieldsExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.columns.join(", "))
    }
}

/// Split on `,` and trim each piece.
///
/// Empty pieces are kept as empty strings; the column gate rejects them.
///
/// ```
/// use listq::tokenize_fields;
///
/// assert_eq!(tokenize_fields(" id , name"), vec!["id", "name"]);
/// assert_eq!(tokenize_fields("id,,name"), vec!["id", "", "name"]);
/// ```
#[must_use]
pub fn tokenize_fields(input: &str) -> Vec<String> {
    input.split(',').map(|t| t.trim().to_string()).collect()
}

/// Validate a field projection against an allow-list.
///
/// ```
/// use listq::validate_fields;
///
/// let fields = validate_fields(&["id", "name"], "id, name").unwrap();
/// assert_eq!(fields.columns, vec!["id", "name"]);
/// assert!(validate_fields(&["id", "name"], "id, bogus").is_err());
/// ```
pub fn validate_fields<S: AsRef<str>>(
    allow_list: &[S],
    raw: &str,
) -> Result<FieldsExpression, ValidationError> {
    if allow_list.is_empty() {
        return Err(ValidationError::EmptyAllowList);
    }
    if raw.is_empty() {
        return Ok(FieldsExpression::default());
    }

    let columns = tokenize_fields(raw);
    for column in &columns {
        check_column(column, allow_list)?;
    }
    Ok(FieldsExpression { columns })
}

/// Boolean form of [`validate_fields`].
#[inline]
#[must_use]
pub fn is_valid_fields<S: AsRef<str>>(allow_list: &[S], raw: &str) -> bool {
    validate_fields(allow_list, raw).is_ok()
}

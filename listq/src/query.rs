//! List query extraction: pull `fields`, `sort` and `filter` out of a URL
//! query string and validate them against a [`Resource`].
//!
//! ```
//! use listq::{ListQuery, Param, Resource};
//!
//! let users = Resource::new("users", &["id", "name", "age"]);
//! let query = ListQuery::from_query_string("/users?fields=id,name&filter=age%3E%3D18+AND+name%3D%27x%27").unwrap();
//!
//! let validated = query.validate(&users).unwrap();
//! assert_eq!(validated.filter.len(), 2);
//!
//! let err = ListQuery::new().with_sort("age").validate(&users).unwrap_err();
//! assert_eq!(err.param, Param::Sort);
//! ```

use crate::constants::max_query_len;
use crate::error::{Diagnostic, ValidationError};
use crate::fields::FieldsExpression;
use crate::filter::FilterExpression;
use crate::registry::Resource;
use crate::sort::SortExpression;
use std::fmt;

/// Error returned when URL decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Decoded output would exceed [`max_query_len`].
    TooLong,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(
                f,
                "query string exceeds maximum decoded length ({} bytes)",
                max_query_len()
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// URL decoding (`%XX` sequences and `+` as space).
///
/// Invalid escapes are kept verbatim and invalid UTF-8 is replaced with
/// U+FFFD.
///
/// # Errors
///
/// Returns [`DecodeError::TooLong`] if decoded output would exceed
/// [`max_query_len`].
///
/// ```
/// use listq::url_decode;
///
/// assert_eq!(url_decode("id%3D1+AND+name%3D%27x%27").unwrap(), "id=1 AND name='x'");
/// assert_eq!(url_decode("100%").unwrap(), "100%");
/// ```
pub fn url_decode(s: &str) -> Result<String, DecodeError> {
    let limit = max_query_len();
    let mut bytes = Vec::with_capacity(s.len().min(limit));
    let mut input = s.bytes();

    while let Some(b) = input.next() {
        match b {
            b'%' => {
                let h1 = input.next();
                let h2 = input.next();
                match (h1, h2) {
                    (Some(h1), Some(h2)) => match (hex_value(h1), hex_value(h2)) {
                        (Some(hi), Some(lo)) => bytes.push((hi << 4) | lo),
                        // Invalid escape, keep original bytes
                        _ => bytes.extend_from_slice(&[b'%', h1, h2]),
                    },
                    (Some(h1), None) => bytes.extend_from_slice(&[b'%', h1]),
                    _ => bytes.push(b'%'),
                }
            },
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }

        if bytes.len() > limit {
            return Err(DecodeError::TooLong);
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Drop a leading path or `?`.
///
/// Text before the first `?` is a path only when it holds no `=` or `&`;
/// otherwise the `?` belongs to a value of a bare query.
fn strip_path(qs: &str) -> &str {
    match qs.split_once('?') {
        Some((path, query)) if !path.contains(['=', '&']) => query,
        _ => qs,
    }
}

/// The list query parameters this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Param {
    /// `fields`: column projection.
    Fields,
    /// `sort`: ordering.
    Sort,
    /// `filter`: row predicate.
    Filter,
}

impl Param {
    /// Query-string key of this parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Sort => "sort",
            Self::Filter => "filter",
        }
    }

    /// Match a query-string key (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fields" => Some(Self::Fields),
            "sort" => Some(Self::Sort),
            "filter" => Some(Self::Filter),
            _ => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, not yet validated list query parameters.
///
/// An absent parameter validates like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ListQuery {
    /// Raw `fields` value.
    pub fields: Option<String>,
    /// Raw `sort` value.
    pub sort: Option<String>,
    /// Raw `filter` value.
    pub filter: Option<String>,
}

impl ListQuery {
    /// Create a query with no parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw `fields` value.
    #[must_use]
    pub fn with_fields(mut self, raw: impl Into<String>) -> Self {
        self.fields = Some(raw.into());
        self
    }

    /// Set the raw `sort` value.
    #[must_use]
    pub fn with_sort(mut self, raw: impl Into<String>) -> Self {
        self.sort = Some(raw.into());
        self
    }

    /// Set the raw `filter` value.
    #[must_use]
    pub fn with_filter(mut self, raw: impl Into<String>) -> Self {
        self.filter = Some(raw.into());
        self
    }

    /// Raw value of a parameter.
    #[must_use]
    pub fn get(&self, param: Param) -> Option<&str> {
        match param {
            Param::Fields => self.fields.as_deref(),
            Param::Sort => self.sort.as_deref(),
            Param::Filter => self.filter.as_deref(),
        }
    }

    fn set(&mut self, param: Param, value: String) {
        match param {
            Param::Fields => self.fields = Some(value),
            Param::Sort => self.sort = Some(value),
            Param::Filter => self.filter = Some(value),
        }
    }

    /// Extract the list parameters from a query string.
    ///
    /// Accepts a bare query (`a=1&b=2`), one with a leading `?`, or a path
    /// with a query (`/users?a=1`). A `?` inside a parameter value is kept.
    /// A `#fragment` is dropped. Keys and values
    /// are URL-decoded, the last occurrence of a parameter wins and unknown
    /// parameters are ignored. A key without `=` gets an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TooLong`] when the decoded parameters together
    /// exceed [`max_query_len`].
    pub fn from_query_string(qs: &str) -> Result<Self, DecodeError> {
        let qs = strip_path(qs);
        let qs = qs.split_once('#').map_or(qs, |(query, _)| query);

        let limit = max_query_len();
        let mut decoded_len = 0;
        let mut query = Self::default();

        for pair in qs.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = url_decode(key)?;
            let value = url_decode(value)?;

            decoded_len += key.len() + value.len();
            if decoded_len > limit {
                return Err(DecodeError::TooLong);
            }

            if let Some(param) = Param::from_name(&key) {
                query.set(param, value);
            }
        }
        Ok(query)
    }

    /// Validate all three parameters against a resource, in the order
    /// `fields`, `sort`, `filter`. The first rejection is returned.
    pub fn validate(&self, resource: &Resource) -> Result<ValidatedQuery, ListQueryError> {
        let reject = |param: Param, error: ValidationError| {
            crate::log::debug!(
                "rejected `{}` for resource `{}`: {} ({})",
                param,
                resource.name,
                error,
                error.kind()
            );
            ListQueryError { param, error }
        };

        let fields = resource
            .validate_fields(self.fields.as_deref().unwrap_or_default())
            .map_err(|e| reject(Param::Fields, e))?;
        let sort = resource
            .validate_sort(self.sort.as_deref().unwrap_or_default())
            .map_err(|e| reject(Param::Sort, e))?;
        let filter = resource
            .validate_filter(self.filter.as_deref().unwrap_or_default())
            .map_err(|e| reject(Param::Filter, e))?;

        Ok(ValidatedQuery {
            fields,
            sort,
            filter,
        })
    }

    /// Boolean form of [`ListQuery::validate`].
    #[must_use]
    pub fn is_valid(&self, resource: &Resource) -> bool {
        self.validate(resource).is_ok()
    }
}

/// A list query whose parameters all passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidatedQuery {
    /// Column projection (empty when not requested).
    pub fields: FieldsExpression,
    /// Ordering (empty when not requested).
    pub sort: SortExpression,
    /// Row predicate (empty when not requested).
    pub filter: FilterExpression,
}

/// A rejected list query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ListQueryError {
    /// The parameter that was rejected.
    pub param: Param,
    /// Why it was rejected.
    pub error: ValidationError,
}

impl ListQueryError {
    /// Diagnostic with the parameter name attached.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::from(&self.error).with_param(self.param.as_str())
    }
}

impl fmt::Display for ListQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid `{}` parameter: {}", self.param, self.error)
    }
}

impl std::error::Error for ListQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

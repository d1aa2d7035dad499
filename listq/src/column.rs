//! Column gate: allow-list membership and identifier checks.

use crate::constants::MAX_IDENTIFIER_LENGTH;
use crate::error::ValidationError;

/// Check a candidate column against the caller's allow-list.
///
/// Exact, case-sensitive membership. The allow-list is scanned linearly; it
/// is bounded by the number of columns on one resource.
///
/// ```
/// use listq::is_allowed_column;
///
/// let allowed = ["id", "first_name", "email"];
/// assert!(is_allowed_column("email", &allowed));
/// assert!(!is_allowed_column("Email", &allowed));
/// assert!(!is_allowed_column("", &allowed));
/// ```
#[inline]
#[must_use]
pub fn is_allowed_column<S: AsRef<str>>(name: &str, allow_list: &[S]) -> bool {
    allow_list.iter().any(|allowed| allowed.as_ref() == name)
}

/// Structured form of [`is_allowed_column`].
pub fn check_column<S: AsRef<str>>(name: &str, allow_list: &[S]) -> Result<(), ValidationError> {
    if is_allowed_column(name, allow_list) {
        Ok(())
    } else {
        Err(ValidationError::UnknownColumn {
            column: name.to_string(),
            allowed: allow_list.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }
}

/// Whether `s` may be registered as a resource or column name.
///
/// Registry entries are compared byte for byte with client input, and
/// callers may splice an accepted column into SQL. Entries are therefore
/// held to plain ASCII identifiers: a letter or `_` first, then ASCII
/// alphanumerics or `_`, at most [`MAX_IDENTIFIER_LENGTH`] bytes. Client
/// input never goes through this check; it only has to match an entry.
///
/// ```
/// use listq::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("created_at"));
/// assert!(is_valid_sql_identifier("_version"));
///
/// assert!(!is_valid_sql_identifier("2fa_enabled"));
/// assert!(!is_valid_sql_identifier("users.email"));
/// assert!(!is_valid_sql_identifier("id; DROP TABLE users"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    let Some((&first, rest)) = s.as_bytes().split_first() else {
        return false;
    };
    s.len() <= MAX_IDENTIFIER_LENGTH
        && (first.is_ascii_alphabetic() || first == b'_')
        && rest.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Reject a registry entry defined in code.
///
/// `kind` names the entry in the panic message (`"resource"` or `"column"`).
///
/// # Panics
///
/// Panics when [`is_valid_sql_identifier`] rejects `s`. Entries loaded from
/// a registry file are reported as [`RegistryError`](crate::RegistryError)
/// instead.
///
/// ```should_panic
/// use listq::assert_valid_sql_identifier;
///
/// assert_valid_sql_identifier("first name", "column");
/// ```
#[inline]
pub fn assert_valid_sql_identifier(s: &str, kind: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {kind} name '{s}': registry entries must be ASCII identifiers \
         of at most {MAX_IDENTIFIER_LENGTH} bytes"
    );
}

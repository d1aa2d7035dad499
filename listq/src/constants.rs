//! Centralized constants for the listq crate.
//!
//! Grammar limits are fixed. The query-string limit can be tuned through the
//! environment:
//!
//! | Variable              | Default      | Description                              |
//! |-----------------------|--------------|------------------------------------------|
//! | `LISTQ_MAX_QUERY_LEN` | 8 KB (8192)  | Maximum decoded length of a query string |

use std::sync::OnceLock;

// ============================================================================
// GRAMMAR LIMITS
// ============================================================================

/// Maximum number of digits before the decimal point of a numeric literal.
pub const MAX_INTEGER_DIGITS: usize = 15;

/// Maximum number of digits after the decimal point of a numeric literal.
pub const MAX_FRACTION_DIGITS: usize = 15;

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

// ============================================================================
// QUERY STRING LIMITS
// ============================================================================

/// Default maximum decoded query-string length.
const DEFAULT_MAX_QUERY_LEN: usize = 8192;

static MAX_QUERY_LEN_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the maximum decoded length of a list query string in bytes.
///
/// Reads `LISTQ_MAX_QUERY_LEN` on first call and caches it for the lifetime of
/// the process. Falls back to 8192 when unset, zero or not a number.
#[inline]
pub fn max_query_len() -> usize {
    *MAX_QUERY_LEN_CACHE.get_or_init(|| {
        std::env::var("LISTQ_MAX_QUERY_LEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_MAX_QUERY_LEN)
    })
}

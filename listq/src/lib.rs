// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // ASC/DESC and grammar terms in docs
#![allow(clippy::missing_errors_doc)] // Error variants are documented on the enum
#![allow(clippy::missing_panics_doc)] // Only Resource::new panics, documented inline
#![allow(clippy::module_name_repetitions)] // FilterExpression in filter, etc.
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Intentional for clarity in some match expressions
// The lexer slices the input at offsets it has just scanned
#![allow(clippy::indexing_slicing)]

//! # listq - Validation for list query parameters
//!
//! Validates the three list parameters an HTTP collection endpoint accepts
//! against a per-resource column allow-list:
//!
//! | Parameter | Grammar | Example |
//! |-----------|---------|---------|
//! | `fields` | comma-separated columns | `id, name` |
//! | `sort` | comma-separated `column ASC\|DESC` | `created_at DESC, id ASC` |
//! | `filter` | `column op literal` joined by `AND`/`OR` | `age>=18 AND name='Ann'` |
//!
//! Every validator has a structured form returning the parsed expression or
//! a [`ValidationError`], and a boolean form for callers that only need
//! accept/reject.
//!
//! ## Quick Start
//!
//! ```
//! # use listq::prelude::*;
//! let allowed = ["id", "name", "created_at"];
//!
//! assert!(is_valid_fields(&allowed, "id, name"));
//! assert!(is_valid_sort(&allowed, "created_at DESC"));
//! assert!(is_valid_filter(&allowed, "id=1 OR name='Alice'"));
//!
//! // Unknown column, missing direction, ordering comparator on a string
//! assert!(!is_valid_fields(&allowed, "password"));
//! assert!(!is_valid_sort(&allowed, "id"));
//! assert!(!is_valid_filter(&allowed, "name>'A'"));
//! ```
//!
//! ## Comparators
//!
//! | Literal | Accepted comparators |
//! |---------|----------------------|
//! | `'quoted string'` | `=` `!=` |
//! | number (`42`, `3.14`) | `=` `>` `>=` `<` `<=` |
//!
//! ## Diagnostics
//!
//! ```
//! # use listq::prelude::*;
//! let err = validate_filter(&["id"], "id=1 AND").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::CardinalityMismatch);
//!
//! let json = Diagnostic::from(&err).with_param("filter").to_json();
//! assert!(json.contains(r#""kind":"cardinality_mismatch""#));
//! ```
//!
//! ## Resources and query strings
//!
//! ```
//! # use listq::prelude::*;
//! let registry = Registry::from_toml_str(r#"
//!     [resources.users]
//!     columns = ["id", "name"]
//! "#).unwrap();
//! let users = registry.resource("users").unwrap();
//!
//! let query = ListQuery::from_query_string("sort=name+ASC&filter=id%3E10").unwrap();
//! let validated = query.validate(users).unwrap();
//! assert_eq!(validated.sort.to_string(), "name ASC");
//! ```

mod column;
pub mod constants;
mod error;
mod fields;
mod filter;
mod lex;
mod literal;
pub mod log;
mod query;
mod registry;
mod sort;
mod vocab;

pub use column::{
    assert_valid_sql_identifier, check_column, is_allowed_column, is_valid_sql_identifier,
};
pub use error::{Diagnostic, ErrorKind, Expected, ValidationError};
pub use fields::{FieldsExpression, is_valid_fields, tokenize_fields, validate_fields};
pub use filter::{FilterExpression, FilterPair, is_valid_filter, parse_filter, validate_filter};
pub use literal::{Literal, LiteralKind, classify_literal, is_literal};
pub use query::{DecodeError, ListQuery, ListQueryError, Param, ValidatedQuery, url_decode};
pub use registry::{Registry, RegistryError, Resource};
pub use sort::{SortExpression, SortKey, is_valid_sort, validate_sort};
pub use vocab::{Comparator, Connective, SortDirection};

/// Prelude module for convenient imports.
///
/// ```
/// use listq::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Comparator, Connective, Diagnostic, ErrorKind, FieldsExpression, FilterExpression,
        FilterPair, ListQuery, ListQueryError, Literal, LiteralKind, Param, Registry, Resource,
        SortDirection, SortExpression, SortKey, ValidatedQuery, ValidationError, is_valid_fields,
        is_valid_filter, is_valid_sort, validate_fields, validate_filter, validate_sort,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

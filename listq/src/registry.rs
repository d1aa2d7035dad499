//! Resource registry: named column allow-lists, loaded from TOML.
//!
//! ```toml
//! [resources.users]
//! columns = ["id", "first_name", "email"]
//!
//! [resources.orders]
//! columns = ["id", "user_id", "amount", "created_at"]
//! ```
//!
//! Entries are checked on load: a resource needs at least one column, and
//! every resource and column name must be a plain SQL identifier.

use crate::column::{assert_valid_sql_identifier, is_allowed_column, is_valid_sql_identifier};
use crate::error::ValidationError;
use crate::fields::{FieldsExpression, validate_fields};
use crate::filter::{FilterExpression, validate_filter};
use crate::sort::{SortExpression, validate_sort};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A named resource and the columns its list endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Resource {
    /// Resource name (e.g. `users`).
    pub name: String,
    /// Allowed columns, in declaration order.
    pub columns: Vec<String>,
}

impl Resource {
    /// Define a resource in code.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty, or if the name or a column is not a
    /// valid SQL identifier. For allow-lists coming from configuration use
    /// [`Registry::from_toml_str`], which reports these as errors.
    ///
    /// ```
    /// use listq::Resource;
    ///
    /// let users = Resource::new("users", &["id", "name"]);
    /// assert!(users.is_valid_filter("id=1 OR name='x'"));
    /// ```
    #[must_use]
    pub fn new(name: &str, columns: &[&str]) -> Self {
        assert_valid_sql_identifier(name, "resource");
        assert!(!columns.is_empty(), "resource '{name}' has no columns");
        for column in columns {
            assert_valid_sql_identifier(column, "column");
        }
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Whether `column` is in this resource's allow-list.
    #[must_use]
    pub fn is_allowed(&self, column: &str) -> bool {
        is_allowed_column(column, &self.columns)
    }

    /// Validate a `fields` parameter against this resource.
    pub fn validate_fields(&self, raw: &str) -> Result<FieldsExpression, ValidationError> {
        validate_fields(&self.columns, raw)
    }

    /// Validate a `sort` parameter against this resource.
    pub fn validate_sort(&self, raw: &str) -> Result<SortExpression, ValidationError> {
        validate_sort(&self.columns, raw)
    }

    /// Validate a `filter` parameter against this resource.
    pub fn validate_filter(&self, raw: &str) -> Result<FilterExpression, ValidationError> {
        validate_filter(&self.columns, raw)
    }

    /// Boolean form of [`Resource::validate_fields`].
    #[must_use]
    pub fn is_valid_fields(&self, raw: &str) -> bool {
        self.validate_fields(raw).is_ok()
    }

    /// Boolean form of [`Resource::validate_sort`].
    #[must_use]
    pub fn is_valid_sort(&self, raw: &str) -> bool {
        self.validate_sort(raw).is_ok()
    }

    /// Boolean form of [`Resource::validate_filter`].
    #[must_use]
    pub fn is_valid_filter(&self, raw: &str) -> bool {
        self.validate_filter(raw).is_ok()
    }
}

/// Error loading or querying a [`Registry`].
#[derive(Debug)]
#[non_exhaustive]
pub enum RegistryError {
    /// The registry file could not be read.
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The registry file is not valid TOML or has the wrong shape.
    Toml(toml::de::Error),
    /// A resource declares no columns.
    EmptyColumns {
        /// The resource.
        resource: String,
    },
    /// A resource name is not a valid SQL identifier.
    InvalidResourceName {
        /// The offending name.
        resource: String,
    },
    /// A column name is not a valid SQL identifier.
    InvalidColumn {
        /// The resource declaring the column.
        resource: String,
        /// The offending column.
        column: String,
    },
    /// No resource with this name is registered.
    UnknownResource {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read registry `{path}`: {source}"),
            Self::Toml(err) => write!(f, "invalid registry file: {err}"),
            Self::EmptyColumns { resource } => {
                write!(f, "resource `{resource}` declares no columns")
            },
            Self::InvalidResourceName { resource } => {
                write!(f, "resource name `{resource}` is not a valid SQL identifier")
            },
            Self::InvalidColumn { resource, column } => {
                write!(
                    f,
                    "column `{column}` of resource `{resource}` is not a valid SQL identifier"
                )
            },
            Self::UnknownResource { name } => write!(f, "unknown resource `{name}`"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    resources: BTreeMap<String, ResourceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceEntry {
    columns: Vec<String>,
}

/// Resources by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    resources: BTreeMap<String, Resource>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource.
    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.insert(resource.name.clone(), resource);
        self
    }

    /// Parse a registry from TOML text.
    ///
    /// ```
    /// use listq::Registry;
    ///
    /// let registry = Registry::from_toml_str(r#"
    ///     [resources.users]
    ///     columns = ["id", "email"]
    /// "#).unwrap();
    ///
    /// let users = registry.resource("users").unwrap();
    /// assert!(users.is_valid_sort("email DESC"));
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(s).map_err(RegistryError::Toml)?;

        let mut resources = BTreeMap::new();
        for (name, entry) in file.resources {
            if !is_valid_sql_identifier(&name) {
                return Err(RegistryError::InvalidResourceName { resource: name });
            }
            if entry.columns.is_empty() {
                return Err(RegistryError::EmptyColumns { resource: name });
            }
            if let Some(column) = entry
                .columns
                .iter()
                .find(|c| !is_valid_sql_identifier(c))
            {
                return Err(RegistryError::InvalidColumn {
                    resource: name,
                    column: column.clone(),
                });
            }
            resources.insert(
                name.clone(),
                Resource {
                    name,
                    columns: entry.columns,
                },
            );
        }
        Ok(Self { resources })
    }

    /// Read and parse a registry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Look up a resource.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Look up a resource, failing with [`RegistryError::UnknownResource`].
    pub fn resource(&self, name: &str) -> Result<&Resource, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownResource {
            name: name.to_string(),
        })
    }

    /// Resource names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Resources in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resource is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
        [resources.users]
        columns = ["id", "first_name", "email"]

        [resources.orders]
        columns = ["id", "user_id", "amount", "created_at"]
    "#;

    #[test]
    fn test_from_toml_str() {
        let registry = Registry::from_toml_str(REGISTRY).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["orders", "users"]);

        let users = registry.get("users").unwrap();
        assert_eq!(users.columns, vec!["id", "first_name", "email"]);
        assert!(users.is_allowed("email"));
        assert!(!users.is_allowed("amount"));
    }

    #[test]
    fn test_resource_delegates_to_validators() {
        let registry = Registry::from_toml_str(REGISTRY).unwrap();
        let orders = registry.resource("orders").unwrap();

        assert!(orders.is_valid_fields("id, amount"));
        assert!(orders.is_valid_sort("created_at DESC, id ASC"));
        assert!(orders.is_valid_filter("amount>=10.5 AND user_id=7"));

        assert!(!orders.is_valid_fields("email"));
        assert!(!orders.is_valid_sort("amount"));
        assert!(!orders.is_valid_filter("amount!=10"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_resource() {
        let registry = Registry::from_toml_str(REGISTRY).unwrap();
        let err = registry.resource("payments").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownResource { ref name } if name == "payments"));
        assert_eq!(err.to_string(), "unknown resource `payments`");
    }

    #[test]
    fn test_rejects_empty_columns() {
        let err = Registry::from_toml_str("[resources.users]\ncolumns = []").unwrap_err();
        assert!(matches!(err, RegistryError::EmptyColumns { ref resource } if resource == "users"));
    }

    #[test]
    fn test_rejects_invalid_column() {
        let err = Registry::from_toml_str(
            "[resources.users]\ncolumns = [\"id\", \"name; DROP TABLE users\"]",
        )
        .unwrap_err();
        let RegistryError::InvalidColumn { resource, column } = err else {
            panic!("expected InvalidColumn, got different error variant")
        };
        assert_eq!(resource, "users");
        assert_eq!(column, "name; DROP TABLE users");
    }

    #[test]
    fn test_rejects_invalid_resource_name() {
        let err = Registry::from_toml_str("[resources.\"user list\"]\ncolumns = [\"id\"]")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResourceName { .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            Registry::from_toml_str("[resources.users]\ncolumns = \"id\""),
            Err(RegistryError::Toml(_))
        ));
        assert!(matches!(
            Registry::from_toml_str("[resources.users]\ncolumns = [\"id\"]\nextra = 1"),
            Err(RegistryError::Toml(_))
        ));
        assert!(matches!(
            Registry::from_toml_str("not toml ["),
            Err(RegistryError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Registry::load("/nonexistent/listq.toml").unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_code_defined_resources() {
        let registry = Registry::new()
            .with_resource(Resource::new("users", &["id", "name"]))
            .with_resource(Resource::new("tags", &["label"]));
        assert_eq!(registry.len(), 2);
        assert!(registry.resource("tags").unwrap().is_valid_filter("label='rust'"));
    }

    #[test]
    #[should_panic(expected = "Invalid SQL column name")]
    fn test_resource_new_rejects_bad_column() {
        let _ = Resource::new("users", &["first name"]);
    }

    #[test]
    #[should_panic(expected = "resource 'users' has no columns")]
    fn test_resource_new_rejects_empty_columns() {
        let _ = Resource::new("users", &[]);
    }
}

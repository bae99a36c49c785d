//! Client error types.

use mssql_types::{SqlType, TypeError};
use tds_protocol::TdsVersion;
use thiserror::Error;

/// Errors raised while resolving configuration, filling a table-valued
/// parameter or reading result metadata.
///
/// Every variant names the offending property or column.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A key matches no catalog entry or synonym.
    #[error("unrecognized connection property: {name}")]
    UnrecognizedProperty {
        /// Key as supplied.
        name: String,
    },

    /// A recognized property has a value that does not parse or is not
    /// one of its allowed values.
    #[error("invalid value {value:?} for connection property {name}: {reason}")]
    InvalidPropertyValue {
        /// Canonical property name.
        name: String,
        /// Offending value (redacted for secrets).
        value: String,
        /// What was expected.
        reason: String,
    },

    /// A required property has no value from any source.
    #[error("missing required connection property: {name}")]
    MissingRequiredProperty {
        /// Canonical property name.
        name: String,
    },

    /// Two properties are set to values that cannot be used together.
    #[error("connection properties {first} and {second} cannot be used together")]
    ConflictingProperties {
        /// First property.
        first: &'static str,
        /// Second property.
        second: &'static str,
    },

    /// A URL owned by this driver is malformed.
    #[error("invalid connection URL: {reason}")]
    InvalidUrl {
        /// What is wrong with it.
        reason: String,
    },

    /// A property catalog violates its own invariants.
    #[error("invalid property catalog: {0}")]
    InvalidCatalog(String),

    /// A row supplies more values than the table has columns.
    #[error("row has {supplied} values but the table has {columns} columns")]
    TooManyValues {
        /// Values supplied.
        supplied: usize,
        /// Columns declared.
        columns: usize,
    },

    /// A value cannot be coerced into its column.
    #[error("invalid value for column {position} ({name}): {source}")]
    InvalidColumnValue {
        /// 1-based column position.
        position: usize,
        /// Column name.
        name: String,
        /// Underlying parse or cast failure.
        #[source]
        source: TypeError,
    },

    /// A column name is already used by the table (case-insensitive).
    #[error("duplicate column name: {name}")]
    DuplicateColumnName {
        /// Rejected name.
        name: String,
    },

    /// A column's declared precision and scale cannot describe any value.
    #[error("invalid definition for column {name}: {reason}")]
    InvalidColumnDefinition {
        /// Column name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A column's declared type has no coercion rule.
    #[error("unsupported type {sql_type} for column {position} ({name})")]
    UnsupportedColumnType {
        /// 1-based column position.
        position: usize,
        /// Column name.
        name: String,
        /// Declared type.
        sql_type: SqlType,
    },

    /// The declared type needs a newer protocol version than the one in use.
    #[error("{sql_type} is not supported by {version}")]
    UnsupportedByProtocol {
        /// Declared type.
        sql_type: SqlType,
        /// Protocol version in use.
        version: TdsVersion,
    },

    /// A metadata accessor was called with an index outside `1..=count`.
    #[error("column index {index} out of range (result has {count} columns)")]
    ColumnIndexOutOfRange {
        /// Requested 1-based index.
        index: usize,
        /// Number of columns.
        count: usize,
    },
}

impl Error {
    /// Check if this error came from connection property resolution.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedProperty { .. }
                | Self::InvalidPropertyValue { .. }
                | Self::MissingRequiredProperty { .. }
                | Self::ConflictingProperties { .. }
                | Self::InvalidUrl { .. }
                | Self::InvalidCatalog(_)
        )
    }

    /// Check if this error came from filling a table-valued parameter.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyValues { .. }
                | Self::InvalidColumnValue { .. }
                | Self::DuplicateColumnName { .. }
                | Self::InvalidColumnDefinition { .. }
                | Self::UnsupportedColumnType { .. }
                | Self::UnsupportedByProtocol { .. }
        )
    }

    /// The property this error is about, if any.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::UnrecognizedProperty { name }
            | Self::InvalidPropertyValue { name, .. }
            | Self::MissingRequiredProperty { name } => Some(name),
            Self::ConflictingProperties { first, .. } => Some(first),
            _ => None,
        }
    }

    /// The 1-based column position this error is about, if any.
    #[must_use]
    pub fn column_position(&self) -> Option<usize> {
        match self {
            Self::InvalidColumnValue { position, .. }
            | Self::UnsupportedColumnType { position, .. } => Some(*position),
            Self::ColumnIndexOutOfRange { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_disjoint() {
        let config = Error::MissingRequiredProperty {
            name: "serverName".into(),
        };
        assert!(config.is_configuration_error());
        assert!(!config.is_data_error());

        let data = Error::TooManyValues {
            supplied: 3,
            columns: 2,
        };
        assert!(data.is_data_error());
        assert!(!data.is_configuration_error());

        let metadata = Error::ColumnIndexOutOfRange { index: 0, count: 1 };
        assert!(!metadata.is_data_error());
        assert!(!metadata.is_configuration_error());
    }

    #[test]
    fn test_column_value_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::InvalidColumnValue {
            position: 2,
            name: "amount".into(),
            source: TypeError::Parse {
                target: "INTEGER",
                value: "abc".into(),
            },
        };
        assert_eq!(err.column_position(), Some(2));
        assert!(err.to_string().contains("column 2 (amount)"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_messages_name_the_property() {
        let err = Error::InvalidPropertyValue {
            name: "packetSize".into(),
            value: "12".into(),
            reason: "expected -1, 0 or 512..=32767".into(),
        };
        assert_eq!(err.property_name(), Some("packetSize"));
        assert!(err.to_string().contains("packetSize"));
    }
}

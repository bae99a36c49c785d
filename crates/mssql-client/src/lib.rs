//! # mssql-client
//!
//! Client-side building blocks of a SQL Server driver that sit between an
//! application and the wire:
//!
//! - **Connection properties**: a closed catalog of recognized settings
//!   ([`PropertyCatalog`]), URL parsing, and a resolver that merges a URL,
//!   environment defaults and caller-supplied properties into a validated
//!   [`ResolvedConfiguration`] and then a typed [`LoginConfig`].
//! - **Table-valued parameters**: [`DataTable`] coerces application values
//!   into a declared column schema and widens precision, scale and length
//!   as rows arrive.
//! - **Result metadata**: [`ResultMetadata`] describes result columns,
//!   reading Always Encrypted columns through their real type.
//!
//! Nothing here performs I/O. The transport consumes the resolved
//! configuration and the table rows, and hands back parsed column
//! descriptors.
//!
//! ## Example
//!
//! ```rust
//! use mssql_client::{EnvironmentDefaults, LoginConfig, PropertyResolver, PropertySet};
//!
//! let supplied = PropertySet::new().with("password", "Password123");
//! let resolved = PropertyResolver::standard()
//!     .resolve(
//!         "jdbc:sqlserver://localhost:1433;databaseName=test;user=sa",
//!         &supplied,
//!         &EnvironmentDefaults::new().login_timeout(30),
//!     )
//!     .unwrap()
//!     .expect("a SQL Server URL");
//!
//! let config = LoginConfig::from_resolved(&resolved).unwrap();
//! assert_eq!(config.database.as_deref(), Some("test"));
//! assert_eq!(config.timeouts.login_timeout.as_secs(), 30);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod data_table;
pub mod error;
pub mod metadata;
pub mod properties;
pub mod resolver;
pub mod settings;
pub mod url;

pub use config::{EncryptionConfig, LoginConfig, PacketSize, Secret, TimeoutConfig};
pub use data_table::{DataColumn, DataTable, Row};
pub use error::{Error, Result};
pub use metadata::{Nullability, ResultMetadata};
pub use properties::{
    PropertyCatalog, PropertyKind, PropertySet, PropertyValue, RecognizedProperty, names,
};
pub use resolver::{EnvironmentDefaults, PropertyInfo, PropertyResolver, ResolvedConfiguration};
pub use settings::{
    ApplicationIntent, AuthenticationScheme, ColumnEncryptionSetting, KeyStoreAuthentication,
    ResponseBuffering, SelectMethod, Setting, SqlAuthentication, parse_setting,
};

// Re-export the type models callers need to build tables and metadata.
pub use mssql_types::{SqlDecimal, SqlType, SqlValue};
pub use tds_protocol::TdsVersion;

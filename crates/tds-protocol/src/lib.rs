//! # tds-protocol
//!
//! Column type model of the MS-TDS (Tabular Data Stream) protocol used by
//! Microsoft SQL Server.
//!
//! This crate describes what a column *is* on the wire: the raw type byte
//! ([`TypeId`]), the server type it denotes ([`SsType`]), the per-column
//! descriptor parsed from a COLMETADATA token ([`TypeInfo`], [`ColumnFlags`]),
//! the Always Encrypted overlay ([`CryptoMetadata`]) and the negotiated
//! protocol version ([`TdsVersion`]).
//!
//! ## Design Philosophy
//!
//! This crate is intentionally IO-agnostic. Packet framing and token parsing
//! are performed by the transport; it hands fully parsed descriptors to the
//! client layer, which only ever reads them.
//!
//! ## Example
//!
//! ```rust
//! use tds_protocol::{SsType, TypeInfo, TypeId};
//!
//! // BIGVARCHAR with the 0xFFFF length marker is VARCHAR(MAX)
//! let ss_type = SsType::from_wire(TypeId::BigVarChar, 0xFFFF).unwrap();
//! assert_eq!(ss_type, SsType::VarCharMax);
//!
//! let info = TypeInfo::decimal(18, 4);
//! assert_eq!(info.display_size, 20);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod column;
pub mod crypto;
pub mod error;
pub mod type_info;
pub mod types;
pub mod version;

pub use column::{ColumnData, TableName};
pub use crypto::{CryptoMetadata, EncryptionType};
pub use error::ProtocolError;
pub use type_info::TypeInfo;
pub use types::{ColumnFlags, SsType, TypeId, Updatability};
pub use version::TdsVersion;

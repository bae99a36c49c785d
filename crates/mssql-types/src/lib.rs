//! # mssql-types
//!
//! Client-side type model for SQL Server.
//!
//! This crate names the types an application declares for outgoing data
//! ([`SqlType`]), holds the loosely typed values it supplies ([`SqlValue`])
//! and converts one into the other ([`coerce`]), computing the room each
//! value needs so a column's declared shape can be widened to fit.
//!
//! ## Features
//!
//! - `chrono` (default): date/time values via chrono
//! - `uuid` (default): UNIQUEIDENTIFIER values via uuid
//!
//! ## Type Mappings
//!
//! | Declared type | Stored value |
//! |---------------|--------------|
//! | `BIT`, `BOOLEAN` | `bool` |
//! | `TINYINT` | `u8` |
//! | `SMALLINT` | `i16` |
//! | `INTEGER` | `i32` |
//! | `BIGINT` | `i64` |
//! | `REAL` | `f32` |
//! | `FLOAT`, `DOUBLE` | `f64` |
//! | `DECIMAL`, `NUMERIC`, `MONEY`, `SMALLMONEY` | `SqlDecimal` (`rust_decimal::Decimal` converts) |
//! | `CHAR` ... `LONGNVARCHAR` | `String` |
//! | `BINARY` ... `LONGVARBINARY` | `bytes::Bytes` |
//! | temporal types | `String` literal |
//!
//! ## Example
//!
//! ```rust
//! use mssql_types::{coerce, DecimalShape, Extent, SqlType, SqlValue};
//!
//! let coerced = coerce(SqlType::Decimal, &SqlValue::from("0.01")).unwrap();
//! assert_eq!(coerced.extent, Extent::Decimal(DecimalShape::new(3, 2)));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod coerce;
pub mod decimal;
pub mod error;
pub mod sql_type;
pub mod value;

pub use coerce::{Coerced, Extent, coerce};
pub use decimal::{DecimalShape, SqlDecimal, parse_decimal};
pub use error::TypeError;
pub use sql_type::{SqlType, TypeCategory};
pub use value::SqlValue;

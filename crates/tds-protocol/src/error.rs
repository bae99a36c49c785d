//! Protocol error types.

use thiserror::Error;

/// Errors raised while interpreting wire-level column descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The type byte does not name a known TDS type.
    #[error("unknown TDS type id 0x{0:02X}")]
    UnknownTypeId(u8),

    /// The type byte is known but the length does not fit it.
    #[error("invalid length {length} for TDS type {type_id:?}")]
    InvalidTypeLength {
        /// Raw type id.
        type_id: crate::types::TypeId,
        /// Declared length.
        length: u32,
    },

    /// A field carried a value outside its defined domain.
    #[error("invalid value {value} for field {field}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: u32,
    },
}

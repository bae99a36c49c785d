//! Type conversion error types.

use thiserror::Error;

/// Errors raised while coercing a value into a declared column type.
///
/// Text that does not parse and values of the wrong shape are both reported
/// here, so a caller handling a failed coercion sees a single error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TypeError {
    /// The value's text form is not valid for the target type.
    #[error("cannot parse {value:?} as {target}")]
    Parse {
        /// Target type name.
        target: &'static str,
        /// Offending text.
        value: String,
    },

    /// The value parsed but does not fit the target type.
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// Target type name.
        target: &'static str,
        /// Offending text.
        value: String,
    },

    /// The value is of a kind the target type cannot be built from.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Accepted value kinds.
        expected: &'static str,
        /// Kind of the supplied value.
        actual: &'static str,
    },

    /// Widening a decimal column would exceed the server's maximum precision.
    #[error("decimal precision {precision} exceeds the maximum of {max}")]
    PrecisionOverflow {
        /// Required precision.
        precision: u32,
        /// Largest precision the server accepts.
        max: u32,
    },

    /// No coercion is defined for the target type.
    #[error("no value coercion is defined for {sql_type}")]
    UnsupportedType {
        /// Target type name.
        sql_type: &'static str,
    },
}

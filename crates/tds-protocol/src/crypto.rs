//! Always Encrypted column metadata.
//!
//! When a result column is encrypted, COLMETADATA describes it twice: the
//! outer TYPE_INFO is the ciphertext carrier (always `varbinary`), and a
//! CryptoMetadata block that follows carries the column's real type plus
//! the key and algorithm references needed to decrypt it.
//!
//! ```text
//! CryptoMetadata (per encrypted column):
//! ┌─────────────────────────────────────────────┐
//! │ CEK Table Ordinal (2 bytes)                 │
//! │ Base TYPE_INFO (user type, flags, type)     │
//! │ Algorithm ID (1 byte)                       │
//! │ Algorithm Name (B_VARCHAR, custom only)     │
//! │ Encryption Type (1 byte)                    │
//! │ Normalization Version (1 byte)              │
//! └─────────────────────────────────────────────┘
//! ```

use crate::error::ProtocolError;
use crate::type_info::TypeInfo;

/// Algorithm ID for a custom, provider-named algorithm.
pub const ALGORITHM_CUSTOM: u8 = 0;

/// Algorithm ID for AEAD_AES_256_CBC_HMAC_SHA256.
pub const ALGORITHM_AEAD_AES_256_CBC_HMAC_SHA256: u8 = 2;

/// Current normalization rule version.
pub const NORMALIZATION_RULE_VERSION: u8 = 1;

/// How an encrypted column's ciphertext was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EncryptionType {
    /// Same plaintext always yields the same ciphertext; supports equality lookups.
    Deterministic = 1,
    /// Ciphertext is salted per value.
    Randomized = 2,
}

impl EncryptionType {
    /// Create from the wire value.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            1 => Ok(Self::Deterministic),
            2 => Ok(Self::Randomized),
            other => Err(ProtocolError::InvalidField {
                field: "encryption type",
                value: u32::from(other),
            }),
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Per-column encryption metadata.
///
/// `base_type` is the plaintext column type. Every descriptive property of
/// an encrypted column comes from it, never from the ciphertext carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoMetadata {
    /// Plaintext type of the column.
    pub base_type: TypeInfo,
    /// Index into the result set's CEK table (0-based).
    pub cek_table_ordinal: u16,
    /// Encryption algorithm ID.
    pub algorithm_id: u8,
    /// Algorithm name, present only for [`ALGORITHM_CUSTOM`].
    pub algorithm_name: Option<String>,
    /// Deterministic or randomized.
    pub encryption_type: EncryptionType,
    /// Normalization rule version.
    pub normalization_version: u8,
}

impl CryptoMetadata {
    /// Metadata for a column encrypted with AEAD_AES_256_CBC_HMAC_SHA256.
    #[must_use]
    pub fn aead_aes_256(base_type: TypeInfo, encryption_type: EncryptionType) -> Self {
        Self {
            base_type,
            cek_table_ordinal: 0,
            algorithm_id: ALGORITHM_AEAD_AES_256_CBC_HMAC_SHA256,
            algorithm_name: None,
            encryption_type,
            normalization_version: NORMALIZATION_RULE_VERSION,
        }
    }

    /// Select the CEK table entry.
    #[must_use]
    pub fn with_cek_table_ordinal(mut self, ordinal: u16) -> Self {
        self.cek_table_ordinal = ordinal;
        self
    }

    /// Whether the column uses AEAD_AES_256_CBC_HMAC_SHA256.
    #[must_use]
    pub fn is_aead_aes_256(&self) -> bool {
        self.algorithm_id == ALGORITHM_AEAD_AES_256_CBC_HMAC_SHA256
    }

    /// Whether equality comparisons work on the ciphertext.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.encryption_type == EncryptionType::Deterministic
    }
}

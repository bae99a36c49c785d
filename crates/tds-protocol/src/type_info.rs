//! Per-column type descriptor.
//!
//! A [`TypeInfo`] is the fully resolved shape of one column as the server
//! described it: the server type, its precision/scale/length and the
//! column flags. Constructors fill in the defaults SQL Server reports for
//! each type, so a descriptor built from a bare type already answers
//! precision and display-size queries correctly.

use crate::types::{ColumnFlags, MAX_LENGTH_MARKER, SsType, Updatability};

/// Precision reported for `varchar(max)`, `varbinary(max)`, `text` and `image`.
pub const MAX_BYTE_PRECISION: u32 = 2_147_483_647;

/// Precision reported for `nvarchar(max)`, `ntext` and `xml`.
pub const MAX_CHAR_PRECISION: u32 = 1_073_741_823;

/// Largest fractional-second scale for `time`, `datetime2` and `datetimeoffset`.
pub const MAX_TEMPORAL_SCALE: u8 = 7;

/// Largest precision of a `decimal`/`numeric` column.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Resolved type descriptor of a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Server type.
    pub ss_type: SsType,
    /// Precision: total digits for numeric types, characters or bytes for
    /// string and binary types, characters of the literal for temporal types.
    pub precision: u32,
    /// Digits after the decimal point, or fractional-second digits.
    pub scale: u8,
    /// Storage size in bytes ([`MAX_LENGTH_MARKER`] for `(MAX)` types).
    pub max_length: u32,
    /// Maximum width in characters of the value's text form.
    pub display_size: u32,
    /// Column flags.
    pub flags: ColumnFlags,
    /// Assembly-qualified type name of a CLR user-defined type.
    pub udt_type_name: Option<String>,
}

impl TypeInfo {
    /// Descriptor with the defaults SQL Server reports for `ss_type`.
    ///
    /// Sized types default to a length of one; use [`TypeInfo::sized`],
    /// [`TypeInfo::decimal`] or [`TypeInfo::temporal`] to pick another shape.
    #[must_use]
    pub fn new(ss_type: SsType) -> Self {
        let (precision, scale, max_length, display_size) = match ss_type {
            SsType::Bit => (1, 0, 1, 1),
            SsType::TinyInt => (3, 0, 1, 3),
            SsType::SmallInt => (5, 0, 2, 6),
            SsType::Int => (10, 0, 4, 11),
            SsType::BigInt => (19, 0, 8, 20),
            SsType::Real => (7, 0, 4, 13),
            SsType::Float => (15, 0, 8, 22),
            SsType::SmallMoney => (10, 4, 4, 12),
            SsType::Money => (19, 4, 8, 21),
            SsType::Decimal | SsType::Numeric => return Self::decimal_of(ss_type, 18, 0),
            SsType::SmallDateTime => (16, 0, 4, 16),
            SsType::DateTime => (23, 3, 8, 23),
            SsType::Date => (10, 0, 3, 10),
            SsType::Time | SsType::DateTime2 | SsType::DateTimeOffset => {
                return Self::temporal(ss_type, MAX_TEMPORAL_SCALE);
            }
            SsType::Char
            | SsType::VarChar
            | SsType::NChar
            | SsType::NVarChar
            | SsType::Binary
            | SsType::VarBinary => return Self::sized(ss_type, 1),
            SsType::VarCharMax | SsType::VarBinaryMax => (
                MAX_BYTE_PRECISION,
                0,
                MAX_LENGTH_MARKER,
                MAX_BYTE_PRECISION,
            ),
            SsType::NVarCharMax => (
                MAX_CHAR_PRECISION,
                0,
                MAX_LENGTH_MARKER,
                MAX_CHAR_PRECISION,
            ),
            SsType::Text | SsType::Image => (
                MAX_BYTE_PRECISION,
                0,
                MAX_BYTE_PRECISION,
                MAX_BYTE_PRECISION,
            ),
            SsType::NText => (
                MAX_CHAR_PRECISION,
                0,
                MAX_BYTE_PRECISION - 1,
                MAX_CHAR_PRECISION,
            ),
            SsType::Xml => (MAX_CHAR_PRECISION, 0, MAX_LENGTH_MARKER, MAX_CHAR_PRECISION),
            SsType::Guid => (36, 0, 16, 36),
            SsType::SqlVariant => (8000, 0, 8016, 8000),
            SsType::Udt => (
                MAX_BYTE_PRECISION,
                0,
                MAX_LENGTH_MARKER,
                MAX_BYTE_PRECISION,
            ),
        };

        Self {
            ss_type,
            precision,
            scale,
            max_length,
            display_size,
            flags: ColumnFlags::NULLABLE,
            udt_type_name: None,
        }
    }

    /// `decimal(precision, scale)`.
    ///
    /// Precision is clamped to `1..=38` and scale to `0..=precision`.
    #[must_use]
    pub fn decimal(precision: u8, scale: u8) -> Self {
        Self::decimal_of(SsType::Decimal, precision, scale)
    }

    /// `numeric(precision, scale)`.
    #[must_use]
    pub fn numeric(precision: u8, scale: u8) -> Self {
        Self::decimal_of(SsType::Numeric, precision, scale)
    }

    fn decimal_of(ss_type: SsType, precision: u8, scale: u8) -> Self {
        let precision = precision.clamp(1, MAX_DECIMAL_PRECISION);
        let scale = scale.min(precision);
        let max_length = match precision {
            1..=9 => 5,
            10..=19 => 9,
            20..=28 => 13,
            _ => 17,
        };

        Self {
            ss_type,
            precision: u32::from(precision),
            scale,
            max_length,
            // sign and decimal point
            display_size: u32::from(precision) + 2,
            flags: ColumnFlags::NULLABLE,
            udt_type_name: None,
        }
    }

    /// A character or binary type of the given declared length.
    ///
    /// `length` is in characters for character types and bytes for binary
    /// types. National character types occupy two bytes per character.
    /// Types without a declared length fall back to [`TypeInfo::new`].
    #[must_use]
    pub fn sized(ss_type: SsType, length: u32) -> Self {
        let (max_length, display_size) = match ss_type {
            SsType::Char | SsType::VarChar => (length, length),
            SsType::NChar | SsType::NVarChar => (length.saturating_mul(2), length),
            // two hex digits per byte
            SsType::Binary | SsType::VarBinary => (length, length.saturating_mul(2)),
            _ => return Self::new(ss_type),
        };

        Self {
            ss_type,
            precision: length,
            scale: 0,
            max_length,
            display_size,
            flags: ColumnFlags::NULLABLE,
            udt_type_name: None,
        }
    }

    /// `time`, `datetime2` or `datetimeoffset` with the given fractional-second scale.
    ///
    /// Scale is clamped to `0..=7`. Other types fall back to [`TypeInfo::new`].
    #[must_use]
    pub fn temporal(ss_type: SsType, scale: u8) -> Self {
        let scale = scale.min(MAX_TEMPORAL_SCALE);
        let (base_chars, extra_bytes) = match ss_type {
            // hh:mm:ss
            SsType::Time => (8, 0),
            // yyyy-mm-dd hh:mm:ss
            SsType::DateTime2 => (19, 3),
            // yyyy-mm-dd hh:mm:ss +hh:mm
            SsType::DateTimeOffset => (26, 5),
            _ => return Self::new(ss_type),
        };
        let fraction_chars = if scale > 0 { u32::from(scale) + 1 } else { 0 };
        let time_bytes = match scale {
            0..=2 => 3,
            3..=4 => 4,
            _ => 5,
        };
        let precision = base_chars + fraction_chars;

        Self {
            ss_type,
            precision,
            scale,
            max_length: time_bytes + extra_bytes,
            display_size: precision,
            flags: ColumnFlags::NULLABLE,
            udt_type_name: None,
        }
    }

    /// Replace the column flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set or clear nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.flags.set(ColumnFlags::NULLABLE, nullable);
        self
    }

    /// Set the updatability field.
    #[must_use]
    pub fn with_updatability(mut self, updatability: Updatability) -> Self {
        self.flags = self.flags.with_updatability(updatability);
        self
    }

    /// Mark the column as an identity column.
    #[must_use]
    pub fn with_identity(mut self, identity: bool) -> Self {
        self.flags.set(ColumnFlags::IDENTITY, identity);
        self
    }

    /// Mark the column collation as case-sensitive.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.flags.set(ColumnFlags::CASE_SENSITIVE, case_sensitive);
        self
    }

    /// Attach the CLR type name of a user-defined type.
    #[must_use]
    pub fn with_udt_type_name(mut self, name: impl Into<String>) -> Self {
        self.udt_type_name = Some(name.into());
        self
    }

    /// Whether the column allows NULL.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(ColumnFlags::NULLABLE)
    }

    /// Whether the server could not determine nullability.
    #[must_use]
    pub fn is_nullable_unknown(&self) -> bool {
        self.flags.contains(ColumnFlags::NULLABLE_UNKNOWN)
    }

    /// Whether the collation is case-sensitive.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.flags.contains(ColumnFlags::CASE_SENSITIVE)
    }

    /// Whether this is an identity column.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.flags.contains(ColumnFlags::IDENTITY)
    }

    /// Whether this is the sparse column set of its table.
    #[must_use]
    pub fn is_sparse_column_set(&self) -> bool {
        self.flags.contains(ColumnFlags::SPARSE_COLUMN_SET)
    }

    /// Updatability of the column.
    #[must_use]
    pub fn updatability(&self) -> Updatability {
        self.flags.updatability()
    }
}

impl From<SsType> for TypeInfo {
    fn from(ss_type: SsType) -> Self {
        Self::new(ss_type)
    }
}

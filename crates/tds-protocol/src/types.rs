//! TDS data type definitions.
//!
//! Two layers are modelled here. [`TypeId`] is the raw type byte sent in
//! column metadata; several bytes denote the same server type and some
//! (`INTN`, `BIGVARCHAR`, ...) only become a concrete type once the declared
//! length is known. [`SsType`] is the resolved SQL Server type that callers
//! reason about.

use bitflags::bitflags;

use crate::error::ProtocolError;

/// Length marker announcing a `(MAX)` variable-length type.
pub const MAX_LENGTH_MARKER: u32 = 0xFFFF;

/// TDS data type identifiers.
///
/// These correspond to the type bytes sent in column metadata and parameter definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    // Fixed-length types (no length prefix)
    /// Null type.
    Null = 0x1F,
    /// 8-bit unsigned integer.
    Int1 = 0x30,
    /// Bit (boolean).
    Bit = 0x32,
    /// 16-bit signed integer.
    Int2 = 0x34,
    /// 32-bit signed integer.
    Int4 = 0x38,
    /// 64-bit signed integer.
    Int8 = 0x7F,
    /// Variable-length datetime (4 or 8 bytes).
    DateTimeN = 0x6F,
    /// 32-bit floating point.
    Float4 = 0x3B,
    /// 64-bit floating point.
    Float8 = 0x3E,
    /// 8-byte money.
    Money = 0x3C,
    /// 4-byte money.
    Money4 = 0x7A,
    /// 8-byte datetime.
    DateTime = 0x3D,
    /// 4-byte small datetime.
    DateTime4 = 0x3A,

    // Variable-length types (with length prefix)
    /// Variable-length GUID.
    Guid = 0x24,
    /// Variable-length integer.
    IntN = 0x26,
    /// Legacy decimal.
    Decimal = 0x37,
    /// Legacy numeric.
    Numeric = 0x3F,
    /// Variable-length bit.
    BitN = 0x68,
    /// Variable-length decimal.
    DecimalN = 0x6A,
    /// Variable-length numeric.
    NumericN = 0x6C,
    /// Variable-length float.
    FloatN = 0x6D,
    /// Variable-length money.
    MoneyN = 0x6E,

    // Byte-counted types
    /// Fixed-length character.
    Char = 0x2F,
    /// Variable-length character.
    VarChar = 0x27,
    /// Fixed-length binary.
    Binary = 0x2D,
    /// Variable-length binary.
    VarBinary = 0x25,

    // Counted types with 2-byte length
    /// Large variable-length character.
    BigVarChar = 0xA7,
    /// Large variable-length binary.
    BigVarBinary = 0xA5,
    /// Large fixed-length character.
    BigChar = 0xAF,
    /// Large fixed-length binary.
    BigBinary = 0xAD,

    // Unicode types
    /// Fixed-length Unicode character.
    NChar = 0xEF,
    /// Variable-length Unicode character.
    NVarChar = 0xE7,

    // Large object types
    /// Text (deprecated, use varchar(max)).
    Text = 0x23,
    /// Image (deprecated, use varbinary(max)).
    Image = 0x22,
    /// NText (deprecated, use nvarchar(max)).
    NText = 0x63,

    // Date/time types (SQL Server 2008+)
    /// Date (3 bytes).
    Date = 0x28,
    /// Time with variable precision.
    Time = 0x29,
    /// DateTime2 with variable precision.
    DateTime2 = 0x2A,
    /// DateTimeOffset with variable precision.
    DateTimeOffset = 0x2B,

    // Special types
    /// SQL Variant.
    Variant = 0x62,
    /// User-defined type.
    Udt = 0xF0,
    /// XML type.
    Xml = 0xF1,
    /// Table-valued parameter.
    Tvp = 0xF3,
}

impl TypeId {
    /// Create a type ID from a raw byte.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        let id = match value {
            0x1F => Self::Null,
            0x30 => Self::Int1,
            0x32 => Self::Bit,
            0x34 => Self::Int2,
            0x38 => Self::Int4,
            0x7F => Self::Int8,
            0x6F => Self::DateTimeN,
            0x3B => Self::Float4,
            0x3E => Self::Float8,
            0x3C => Self::Money,
            0x7A => Self::Money4,
            0x3D => Self::DateTime,
            0x3A => Self::DateTime4,
            0x24 => Self::Guid,
            0x26 => Self::IntN,
            0x37 => Self::Decimal,
            0x3F => Self::Numeric,
            0x68 => Self::BitN,
            0x6A => Self::DecimalN,
            0x6C => Self::NumericN,
            0x6D => Self::FloatN,
            0x6E => Self::MoneyN,
            0x2F => Self::Char,
            0x27 => Self::VarChar,
            0x2D => Self::Binary,
            0x25 => Self::VarBinary,
            0xA7 => Self::BigVarChar,
            0xA5 => Self::BigVarBinary,
            0xAF => Self::BigChar,
            0xAD => Self::BigBinary,
            0xEF => Self::NChar,
            0xE7 => Self::NVarChar,
            0x23 => Self::Text,
            0x22 => Self::Image,
            0x63 => Self::NText,
            0x28 => Self::Date,
            0x29 => Self::Time,
            0x2A => Self::DateTime2,
            0x2B => Self::DateTimeOffset,
            0x62 => Self::Variant,
            0xF0 => Self::Udt,
            0xF1 => Self::Xml,
            0xF3 => Self::Tvp,
            other => return Err(ProtocolError::UnknownTypeId(other)),
        };
        Ok(id)
    }

    /// Check if this is a fixed-length type.
    #[must_use]
    pub const fn is_fixed_length(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Int1
                | Self::Bit
                | Self::Int2
                | Self::Int4
                | Self::Int8
                | Self::Float4
                | Self::Float8
                | Self::Money
                | Self::Money4
                | Self::DateTime
                | Self::DateTime4
        )
    }

    /// Check if this is a Unicode type.
    #[must_use]
    pub const fn is_unicode(&self) -> bool {
        matches!(self, Self::NChar | Self::NVarChar | Self::NText)
    }
}

/// A SQL Server data type as reported to callers.
///
/// Unlike [`TypeId`], each variant names exactly one server type: the
/// `(MAX)` variants are distinct from their bounded counterparts, and the
/// nullable `*N` wire forms are folded into the type they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SsType {
    /// BIT.
    Bit,
    /// TINYINT.
    TinyInt,
    /// SMALLINT.
    SmallInt,
    /// INT.
    Int,
    /// BIGINT.
    BigInt,
    /// REAL.
    Real,
    /// FLOAT.
    Float,
    /// SMALLMONEY.
    SmallMoney,
    /// MONEY.
    Money,
    /// DECIMAL.
    Decimal,
    /// NUMERIC.
    Numeric,
    /// SMALLDATETIME.
    SmallDateTime,
    /// DATETIME.
    DateTime,
    /// DATETIME2.
    DateTime2,
    /// DATE.
    Date,
    /// TIME.
    Time,
    /// DATETIMEOFFSET.
    DateTimeOffset,
    /// CHAR.
    Char,
    /// VARCHAR.
    VarChar,
    /// VARCHAR(MAX).
    VarCharMax,
    /// NCHAR.
    NChar,
    /// NVARCHAR.
    NVarChar,
    /// NVARCHAR(MAX).
    NVarCharMax,
    /// TEXT.
    Text,
    /// NTEXT.
    NText,
    /// BINARY.
    Binary,
    /// VARBINARY.
    VarBinary,
    /// VARBINARY(MAX).
    VarBinaryMax,
    /// IMAGE.
    Image,
    /// UNIQUEIDENTIFIER.
    Guid,
    /// SQL_VARIANT.
    SqlVariant,
    /// CLR user-defined type.
    Udt,
    /// XML.
    Xml,
}

impl SsType {
    /// Resolve the server type from a raw type byte and its declared length.
    ///
    /// `max_length` is the length field of the TYPE_INFO (byte length for
    /// fixed-size `*N` types, [`MAX_LENGTH_MARKER`] for `(MAX)` types). It is
    /// ignored for types whose identity does not depend on it.
    pub fn from_wire(type_id: TypeId, max_length: u32) -> Result<Self, ProtocolError> {
        let invalid_length = || ProtocolError::InvalidTypeLength {
            type_id,
            length: max_length,
        };

        let ss_type = match type_id {
            TypeId::Int1 => Self::TinyInt,
            TypeId::Bit | TypeId::BitN => Self::Bit,
            TypeId::Int2 => Self::SmallInt,
            TypeId::Int4 => Self::Int,
            TypeId::Int8 => Self::BigInt,
            TypeId::IntN => match max_length {
                1 => Self::TinyInt,
                2 => Self::SmallInt,
                4 => Self::Int,
                8 => Self::BigInt,
                _ => return Err(invalid_length()),
            },
            TypeId::Float4 => Self::Real,
            TypeId::Float8 => Self::Float,
            TypeId::FloatN => match max_length {
                4 => Self::Real,
                8 => Self::Float,
                _ => return Err(invalid_length()),
            },
            TypeId::Money => Self::Money,
            TypeId::Money4 => Self::SmallMoney,
            TypeId::MoneyN => match max_length {
                4 => Self::SmallMoney,
                8 => Self::Money,
                _ => return Err(invalid_length()),
            },
            TypeId::DateTime => Self::DateTime,
            TypeId::DateTime4 => Self::SmallDateTime,
            TypeId::DateTimeN => match max_length {
                4 => Self::SmallDateTime,
                8 => Self::DateTime,
                _ => return Err(invalid_length()),
            },
            TypeId::Decimal | TypeId::DecimalN => Self::Decimal,
            TypeId::Numeric | TypeId::NumericN => Self::Numeric,
            TypeId::Guid => Self::Guid,
            TypeId::Char | TypeId::BigChar => Self::Char,
            TypeId::VarChar => Self::VarChar,
            TypeId::BigVarChar if max_length == MAX_LENGTH_MARKER => Self::VarCharMax,
            TypeId::BigVarChar => Self::VarChar,
            TypeId::NChar => Self::NChar,
            TypeId::NVarChar if max_length == MAX_LENGTH_MARKER => Self::NVarCharMax,
            TypeId::NVarChar => Self::NVarChar,
            TypeId::Binary | TypeId::BigBinary => Self::Binary,
            TypeId::VarBinary => Self::VarBinary,
            TypeId::BigVarBinary if max_length == MAX_LENGTH_MARKER => Self::VarBinaryMax,
            TypeId::BigVarBinary => Self::VarBinary,
            TypeId::Text => Self::Text,
            TypeId::NText => Self::NText,
            TypeId::Image => Self::Image,
            TypeId::Date => Self::Date,
            TypeId::Time => Self::Time,
            TypeId::DateTime2 => Self::DateTime2,
            TypeId::DateTimeOffset => Self::DateTimeOffset,
            TypeId::Variant => Self::SqlVariant,
            TypeId::Udt => Self::Udt,
            TypeId::Xml => Self::Xml,
            TypeId::Null | TypeId::Tvp => {
                return Err(ProtocolError::InvalidField {
                    field: "column type",
                    value: type_id as u32,
                });
            }
        };
        Ok(ss_type)
    }

    /// Server-side type name as it appears in DDL.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Real => "real",
            Self::Float => "float",
            Self::SmallMoney => "smallmoney",
            Self::Money => "money",
            Self::Decimal => "decimal",
            Self::Numeric => "numeric",
            Self::SmallDateTime => "smalldatetime",
            Self::DateTime => "datetime",
            Self::DateTime2 => "datetime2",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTimeOffset => "datetimeoffset",
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::VarCharMax => "varchar(max)",
            Self::NChar => "nchar",
            Self::NVarChar => "nvarchar",
            Self::NVarCharMax => "nvarchar(max)",
            Self::Text => "text",
            Self::NText => "ntext",
            Self::Binary => "binary",
            Self::VarBinary => "varbinary",
            Self::VarBinaryMax => "varbinary(max)",
            Self::Image => "image",
            Self::Guid => "uniqueidentifier",
            Self::SqlVariant => "sql_variant",
            Self::Udt => "udt",
            Self::Xml => "xml",
        }
    }

    /// The bounded or modern type reported in place of this one by servers
    /// that support the SQL Server 2008 type system.
    ///
    /// Types outside the canonicalization table map to themselves.
    #[must_use]
    pub const fn canonical(self) -> Self {
        match self {
            Self::VarCharMax => Self::VarChar,
            Self::NVarCharMax => Self::NVarChar,
            Self::VarBinaryMax => Self::VarBinary,
            Self::DateTime | Self::SmallDateTime => Self::DateTime2,
            Self::Money | Self::SmallMoney => Self::Decimal,
            Self::Guid => Self::Char,
            other => other,
        }
    }

    /// Whether values of this type may appear in a WHERE clause comparison.
    #[must_use]
    pub const fn is_searchable(self) -> bool {
        !matches!(
            self,
            Self::Image | Self::Text | Self::NText | Self::Udt | Self::Xml
        )
    }

    /// Whether this is a currency type.
    #[must_use]
    pub const fn is_currency(self) -> bool {
        matches!(self, Self::Money | Self::SmallMoney)
    }

    /// Whether this is one of the `(MAX)` large value types.
    #[must_use]
    pub const fn is_max(self) -> bool {
        matches!(self, Self::VarCharMax | Self::NVarCharMax | Self::VarBinaryMax)
    }

    /// Whether this type stores UTF-16 character data.
    #[must_use]
    pub const fn is_unicode(self) -> bool {
        matches!(self, Self::NChar | Self::NVarChar | Self::NVarCharMax | Self::NText)
    }
}

impl core::fmt::Display for SsType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Column flags from COLMETADATA (MS-TDS 2.2.7.4).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u16 {
        /// Column is nullable.
        const NULLABLE = 0x0001;
        /// Column uses a case-sensitive collation.
        const CASE_SENSITIVE = 0x0002;
        /// Two-bit updatability field; see [`ColumnFlags::updatability`].
        const UPDATEABLE_MASK = 0x000C;
        /// Column is an identity column.
        const IDENTITY = 0x0010;
        /// Column is computed.
        const COMPUTED = 0x0020;
        /// Column has a fixed-length CLR type.
        const FIXED_LEN_CLR_TYPE = 0x0100;
        /// Column is the sparse column set of its table.
        const SPARSE_COLUMN_SET = 0x0400;
        /// Column is encrypted (Always Encrypted).
        const ENCRYPTED = 0x0800;
        /// Column is hidden.
        const HIDDEN = 0x2000;
        /// Column is part of a key.
        const KEY = 0x4000;
        /// Nullability is unknown.
        const NULLABLE_UNKNOWN = 0x8000;
    }
}

/// Update mode for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Updatability {
    /// Column is read-only.
    #[default]
    ReadOnly,
    /// Column is read-write.
    ReadWrite,
    /// Updatability unknown.
    Unknown,
}

impl ColumnFlags {
    /// Decode the two-bit updatability field.
    #[must_use]
    pub const fn updatability(self) -> Updatability {
        match (self.bits() >> 2) & 0x03 {
            0 => Updatability::ReadOnly,
            1 => Updatability::ReadWrite,
            _ => Updatability::Unknown,
        }
    }

    /// Replace the updatability field.
    #[must_use]
    pub const fn with_updatability(self, updatability: Updatability) -> Self {
        let field = match updatability {
            Updatability::ReadOnly => 0,
            Updatability::ReadWrite => 1 << 2,
            Updatability::Unknown => 2 << 2,
        };
        Self::from_bits_retain((self.bits() & !Self::UPDATEABLE_MASK.bits()) | field)
    }
}

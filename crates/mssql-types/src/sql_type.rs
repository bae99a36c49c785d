//! Client-declared column types.
//!
//! [`SqlType`] is the vocabulary an application uses to declare a column it
//! is about to send, and the vocabulary result metadata is reported in.
//! Each variant carries the standard JDBC/ODBC numeric type code, with the
//! SQL Server specific types using the vendor range below `-140`.

use tds_protocol::SsType;

/// Broad coercion family of a [`SqlType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Signed or unsigned integers.
    Integer,
    /// BIT / BOOLEAN.
    Boolean,
    /// DECIMAL, NUMERIC and the money types.
    FixedPoint,
    /// REAL, FLOAT, DOUBLE.
    FloatingPoint,
    /// Dates, times and timestamps.
    Temporal,
    /// Byte strings.
    Binary,
    /// Character strings.
    Character,
    /// Everything without a value coercion.
    Other,
}

/// A declared SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SqlType {
    /// BIT.
    Bit,
    /// BOOLEAN.
    Boolean,
    /// TINYINT (unsigned on SQL Server).
    TinyInt,
    /// SMALLINT.
    SmallInt,
    /// INTEGER.
    Integer,
    /// BIGINT.
    BigInt,
    /// REAL (single precision).
    Real,
    /// FLOAT (double precision on SQL Server).
    Float,
    /// DOUBLE.
    Double,
    /// DECIMAL.
    Decimal,
    /// NUMERIC.
    Numeric,
    /// SQL Server MONEY.
    Money,
    /// SQL Server SMALLMONEY.
    SmallMoney,
    /// DATE.
    Date,
    /// TIME.
    Time,
    /// TIMESTAMP (SQL Server `datetime2`).
    Timestamp,
    /// SQL Server legacy DATETIME.
    DateTime,
    /// SQL Server SMALLDATETIME.
    SmallDateTime,
    /// SQL Server DATETIMEOFFSET.
    DateTimeOffset,
    /// TIME WITH TIME ZONE.
    TimeWithTimezone,
    /// TIMESTAMP WITH TIME ZONE.
    TimestampWithTimezone,
    /// CHAR.
    Char,
    /// VARCHAR.
    VarChar,
    /// LONGVARCHAR.
    LongVarChar,
    /// NCHAR.
    NChar,
    /// NVARCHAR.
    NVarChar,
    /// LONGNVARCHAR.
    LongNVarChar,
    /// BINARY.
    Binary,
    /// VARBINARY.
    VarBinary,
    /// LONGVARBINARY.
    LongVarBinary,
    /// SQL Server UNIQUEIDENTIFIER.
    Guid,
    /// SQL Server SQL_VARIANT.
    SqlVariant,
    /// SQL Server table-valued parameter.
    Structured,
    /// SQLXML.
    SqlXml,
    /// BLOB.
    Blob,
    /// CLOB.
    Clob,
    /// NCLOB.
    NClob,
    /// ARRAY.
    Array,
    /// STRUCT.
    Struct,
    /// ROWID.
    RowId,
    /// NULL.
    Null,
    /// OTHER.
    Other,
}

/// Every declared type, in type-code table order.
const ALL: &[SqlType] = &[
    SqlType::Bit,
    SqlType::Boolean,
    SqlType::TinyInt,
    SqlType::SmallInt,
    SqlType::Integer,
    SqlType::BigInt,
    SqlType::Real,
    SqlType::Float,
    SqlType::Double,
    SqlType::Decimal,
    SqlType::Numeric,
    SqlType::Money,
    SqlType::SmallMoney,
    SqlType::Date,
    SqlType::Time,
    SqlType::Timestamp,
    SqlType::DateTime,
    SqlType::SmallDateTime,
    SqlType::DateTimeOffset,
    SqlType::TimeWithTimezone,
    SqlType::TimestampWithTimezone,
    SqlType::Char,
    SqlType::VarChar,
    SqlType::LongVarChar,
    SqlType::NChar,
    SqlType::NVarChar,
    SqlType::LongNVarChar,
    SqlType::Binary,
    SqlType::VarBinary,
    SqlType::LongVarBinary,
    SqlType::Guid,
    SqlType::SqlVariant,
    SqlType::Structured,
    SqlType::SqlXml,
    SqlType::Blob,
    SqlType::Clob,
    SqlType::NClob,
    SqlType::Array,
    SqlType::Struct,
    SqlType::RowId,
    SqlType::Null,
    SqlType::Other,
];

impl SqlType {
    /// Numeric type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::Boolean => 16,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Real => 7,
            Self::Float => 6,
            Self::Double => 8,
            Self::Decimal => 3,
            Self::Numeric => 2,
            Self::Money => -148,
            Self::SmallMoney => -146,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
            Self::DateTime => -151,
            Self::SmallDateTime => -150,
            Self::DateTimeOffset => -155,
            Self::TimeWithTimezone => 2013,
            Self::TimestampWithTimezone => 2014,
            Self::Char => 1,
            Self::VarChar => 12,
            Self::LongVarChar => -1,
            Self::NChar => -15,
            Self::NVarChar => -9,
            Self::LongNVarChar => -16,
            Self::Binary => -2,
            Self::VarBinary => -3,
            Self::LongVarBinary => -4,
            Self::Guid => -145,
            Self::SqlVariant => -156,
            Self::Structured => -153,
            Self::SqlXml => 2009,
            Self::Blob => 2004,
            Self::Clob => 2005,
            Self::NClob => 2011,
            Self::Array => 2003,
            Self::Struct => 2002,
            Self::RowId => -8,
            Self::Null => 0,
            Self::Other => 1111,
        }
    }

    /// Look up a type by its numeric code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Upper-case type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::Boolean => "BOOLEAN",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Money => "MONEY",
            Self::SmallMoney => "SMALLMONEY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::DateTime => "DATETIME",
            Self::SmallDateTime => "SMALLDATETIME",
            Self::DateTimeOffset => "DATETIMEOFFSET",
            Self::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            Self::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::LongVarChar => "LONGVARCHAR",
            Self::NChar => "NCHAR",
            Self::NVarChar => "NVARCHAR",
            Self::LongNVarChar => "LONGNVARCHAR",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::LongVarBinary => "LONGVARBINARY",
            Self::Guid => "GUID",
            Self::SqlVariant => "SQL_VARIANT",
            Self::Structured => "STRUCTURED",
            Self::SqlXml => "SQLXML",
            Self::Blob => "BLOB",
            Self::Clob => "CLOB",
            Self::NClob => "NCLOB",
            Self::Array => "ARRAY",
            Self::Struct => "STRUCT",
            Self::RowId => "ROWID",
            Self::Null => "NULL",
            Self::Other => "OTHER",
        }
    }

    /// Coercion family.
    #[must_use]
    pub const fn category(self) -> TypeCategory {
        match self {
            Self::TinyInt | Self::SmallInt | Self::Integer | Self::BigInt => TypeCategory::Integer,
            Self::Bit | Self::Boolean => TypeCategory::Boolean,
            Self::Decimal | Self::Numeric | Self::Money | Self::SmallMoney => {
                TypeCategory::FixedPoint
            }
            Self::Real | Self::Float | Self::Double => TypeCategory::FloatingPoint,
            Self::Date
            | Self::Time
            | Self::Timestamp
            | Self::DateTime
            | Self::SmallDateTime
            | Self::DateTimeOffset
            | Self::TimeWithTimezone
            | Self::TimestampWithTimezone => TypeCategory::Temporal,
            Self::Binary | Self::VarBinary | Self::LongVarBinary => TypeCategory::Binary,
            Self::Char
            | Self::VarChar
            | Self::LongVarChar
            | Self::NChar
            | Self::NVarChar
            | Self::LongNVarChar => TypeCategory::Character,
            _ => TypeCategory::Other,
        }
    }

    /// Whether a row value can be coerced into this type.
    #[must_use]
    pub const fn is_coercible(self) -> bool {
        !matches!(self.category(), TypeCategory::Other)
    }

    /// Whether values carry a UTC offset, which needs SQL Server 2008 or later.
    #[must_use]
    pub const fn is_offset_aware(self) -> bool {
        matches!(
            self,
            Self::DateTimeOffset | Self::TimeWithTimezone | Self::TimestampWithTimezone
        )
    }

    /// Whether character data is stored as UTF-16.
    #[must_use]
    pub const fn is_national(self) -> bool {
        matches!(self, Self::NChar | Self::NVarChar | Self::LongNVarChar | Self::NClob)
    }

    /// Whether values of this type are signed numbers.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::SmallInt
                | Self::Integer
                | Self::BigInt
                | Self::Real
                | Self::Float
                | Self::Double
                | Self::Decimal
                | Self::Numeric
                | Self::Money
                | Self::SmallMoney
        )
    }

    /// Rust type a value of this type decodes into.
    #[must_use]
    pub const fn rust_type_name(self) -> &'static str {
        match self {
            Self::Bit | Self::Boolean => "bool",
            Self::TinyInt => "u8",
            Self::SmallInt => "i16",
            Self::Integer => "i32",
            Self::BigInt => "i64",
            Self::Real => "f32",
            Self::Float | Self::Double => "f64",
            Self::Decimal | Self::Numeric | Self::Money | Self::SmallMoney => {
                "mssql_types::SqlDecimal"
            }
            Self::Date => "chrono::NaiveDate",
            Self::Time => "chrono::NaiveTime",
            Self::Timestamp | Self::DateTime | Self::SmallDateTime => "chrono::NaiveDateTime",
            Self::DateTimeOffset | Self::TimestampWithTimezone => {
                "chrono::DateTime<chrono::FixedOffset>"
            }
            Self::Char
            | Self::VarChar
            | Self::LongVarChar
            | Self::NChar
            | Self::NVarChar
            | Self::LongNVarChar
            | Self::TimeWithTimezone
            | Self::Clob
            | Self::NClob
            | Self::SqlXml => "String",
            Self::Binary | Self::VarBinary | Self::LongVarBinary | Self::Blob | Self::RowId => {
                "bytes::Bytes"
            }
            Self::Guid => "uuid::Uuid",
            _ => "mssql_types::SqlValue",
        }
    }

    /// Type reported for a server column type.
    #[must_use]
    pub const fn from_server_type(ss_type: SsType) -> Self {
        match ss_type {
            SsType::Bit => Self::Bit,
            SsType::TinyInt => Self::TinyInt,
            SsType::SmallInt => Self::SmallInt,
            SsType::Int => Self::Integer,
            SsType::BigInt => Self::BigInt,
            SsType::Real => Self::Real,
            SsType::Float => Self::Double,
            SsType::SmallMoney => Self::SmallMoney,
            SsType::Money => Self::Money,
            SsType::Decimal => Self::Decimal,
            SsType::Numeric => Self::Numeric,
            SsType::SmallDateTime => Self::SmallDateTime,
            SsType::DateTime => Self::DateTime,
            SsType::DateTime2 => Self::Timestamp,
            SsType::Date => Self::Date,
            SsType::Time => Self::Time,
            SsType::DateTimeOffset => Self::DateTimeOffset,
            SsType::Char => Self::Char,
            SsType::VarChar => Self::VarChar,
            SsType::VarCharMax | SsType::Text => Self::LongVarChar,
            SsType::NChar => Self::NChar,
            SsType::NVarChar => Self::NVarChar,
            SsType::NVarCharMax | SsType::NText | SsType::Xml => Self::LongNVarChar,
            SsType::Binary => Self::Binary,
            SsType::VarBinary => Self::VarBinary,
            SsType::VarBinaryMax | SsType::Image | SsType::Udt => Self::LongVarBinary,
            SsType::Guid => Self::Guid,
            SsType::SqlVariant => Self::SqlVariant,
            _ => Self::Other,
        }
    }
}

impl core::fmt::Display for SqlType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

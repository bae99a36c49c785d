//! Type-directed coercion of application values.
//!
//! [`coerce`] turns an arbitrary [`SqlValue`] into the value stored for a
//! column of a declared [`SqlType`], and reports the [`Extent`] the value
//! needs so the caller can widen the column's declared shape.
//!
//! Numeric and boolean columns parse the value's text form, so `"42"`,
//! `42i64` and `42.0f32` are all candidates for an `INTEGER` column (the
//! last one fails: `"42"` parses, `"42.0"` does not). Character, binary and
//! temporal columns instead require a value of the matching kind.

use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use crate::decimal::{DecimalShape, parse_decimal};
use crate::error::TypeError;
use crate::sql_type::{SqlType, TypeCategory};
use crate::value::SqlValue;

/// Room a coerced value needs in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Fixed-size type or NULL; nothing to widen.
    Fixed,
    /// Decimal precision and scale.
    Decimal(DecimalShape),
    /// Length in storage units (bytes for binary, UTF-16 code units for
    /// character data, doubled for national character types).
    Length(u32),
}

/// A value ready to be stored in a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    /// Stored value.
    pub value: SqlValue,
    /// Room the value needs.
    pub extent: Extent,
}

impl Coerced {
    fn fixed(value: SqlValue) -> Self {
        Self {
            value,
            extent: Extent::Fixed,
        }
    }
}

/// Coerce `value` into a column declared as `sql_type`.
///
/// NULL is accepted by every coercible type. Types without a coercion rule
/// fail with [`TypeError::UnsupportedType`] even for NULL.
pub fn coerce(sql_type: SqlType, value: &SqlValue) -> Result<Coerced, TypeError> {
    let category = sql_type.category();
    if category == TypeCategory::Other {
        return Err(TypeError::UnsupportedType {
            sql_type: sql_type.name(),
        });
    }
    if value.is_null() {
        return Ok(Coerced::fixed(SqlValue::Null));
    }

    match category {
        TypeCategory::Integer => coerce_integer(sql_type, value).map(Coerced::fixed),
        TypeCategory::Boolean => {
            let text = text_of(value, "BIT")?;
            parse_bool(&text).map(|b| Coerced::fixed(SqlValue::Bool(b)))
        }
        TypeCategory::FixedPoint => {
            let decimal = match value {
                SqlValue::Decimal(d) => d.clone(),
                other => parse_decimal(&text_of(other, sql_type.name())?)?,
            };
            Ok(Coerced {
                extent: Extent::Decimal(DecimalShape::of(&decimal)),
                value: SqlValue::Decimal(decimal),
            })
        }
        TypeCategory::FloatingPoint => {
            let text = text_of(value, sql_type.name())?;
            if sql_type == SqlType::Real {
                parse_float::<f32>(&text, "REAL").map(|v| Coerced::fixed(SqlValue::Float(v)))
            } else {
                parse_float::<f64>(&text, sql_type.name())
                    .map(|v| Coerced::fixed(SqlValue::Double(v)))
            }
        }
        TypeCategory::Temporal => temporal_text(value).map(|s| Coerced::fixed(SqlValue::String(s))),
        TypeCategory::Binary => match value {
            SqlValue::Binary(bytes) => Ok(Coerced {
                extent: Extent::Length(saturating_u32(bytes.len())),
                value: SqlValue::Binary(bytes.clone()),
            }),
            other => Err(TypeError::TypeMismatch {
                expected: "binary",
                actual: other.type_name(),
            }),
        },
        TypeCategory::Character => {
            let text = character_text(value)?;
            let units = saturating_u32(text.encode_utf16().count());
            let length = if sql_type.is_national() {
                units.saturating_mul(2)
            } else {
                units
            };
            Ok(Coerced {
                value: SqlValue::String(text),
                extent: Extent::Length(length),
            })
        }
        TypeCategory::Other => Err(TypeError::UnsupportedType {
            sql_type: sql_type.name(),
        }),
    }
}

fn coerce_integer(sql_type: SqlType, value: &SqlValue) -> Result<SqlValue, TypeError> {
    let text = text_of(value, sql_type.name())?;
    let target = sql_type.name();
    let coerced = match sql_type {
        SqlType::TinyInt => SqlValue::TinyInt(parse_int(&text, target)?),
        SqlType::SmallInt => SqlValue::SmallInt(parse_int(&text, target)?),
        SqlType::Integer => SqlValue::Int(parse_int(&text, target)?),
        _ => SqlValue::BigInt(parse_int(&text, target)?),
    };
    Ok(coerced)
}

fn text_of(value: &SqlValue, target: &'static str) -> Result<String, TypeError> {
    value.string_form().ok_or_else(|| TypeError::TypeMismatch {
        expected: target,
        actual: value.type_name(),
    })
}

fn parse_int<T>(text: &str, target: &'static str) -> Result<T, TypeError>
where
    T: FromStr<Err = ParseIntError>,
{
    text.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => TypeError::OutOfRange {
            target,
            value: text.to_owned(),
        },
        _ => TypeError::Parse {
            target,
            value: text.to_owned(),
        },
    })
}

fn parse_float<T: FromStr>(text: &str, target: &'static str) -> Result<T, TypeError> {
    text.trim().parse::<T>().map_err(|_| TypeError::Parse {
        target,
        value: text.to_owned(),
    })
}

/// `true`/`false` in any case, or `1`/`0`.
fn parse_bool(text: &str) -> Result<bool, TypeError> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Ok(false)
    } else {
        Err(TypeError::Parse {
            target: "BIT",
            value: text.to_owned(),
        })
    }
}

fn temporal_text(value: &SqlValue) -> Result<String, TypeError> {
    match value {
        SqlValue::String(s) => Ok(s.clone()),
        #[cfg(feature = "chrono")]
        SqlValue::Date(_)
        | SqlValue::Time(_)
        | SqlValue::DateTime(_)
        | SqlValue::DateTimeOffset(_) => text_of(value, "date/time"),
        other => Err(TypeError::TypeMismatch {
            expected: "string or date/time",
            actual: other.type_name(),
        }),
    }
}

fn character_text(value: &SqlValue) -> Result<String, TypeError> {
    match value {
        SqlValue::String(s) => Ok(s.clone()),
        #[cfg(feature = "uuid")]
        SqlValue::Uuid(id) => Ok(id.to_string()),
        other => Err(TypeError::TypeMismatch {
            expected: "string",
            actual: other.type_name(),
        }),
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::decimal::SqlDecimal;
    use rust_decimal::Decimal;

    fn value_of(sql_type: SqlType, value: impl Into<SqlValue>) -> SqlValue {
        coerce(sql_type, &value.into()).unwrap().value
    }

    #[test]
    fn test_integers_parse_text_form() {
        assert_eq!(value_of(SqlType::Integer, "42"), SqlValue::Int(42));
        assert_eq!(value_of(SqlType::BigInt, 7i32), SqlValue::BigInt(7));
        assert_eq!(value_of(SqlType::SmallInt, -5i64), SqlValue::SmallInt(-5));
        assert_eq!(value_of(SqlType::TinyInt, "255"), SqlValue::TinyInt(255));
    }

    #[test]
    fn test_integer_failures() {
        assert!(matches!(
            coerce(SqlType::Integer, &"abc".into()),
            Err(TypeError::Parse { target: "INTEGER", .. })
        ));
        assert!(matches!(
            coerce(SqlType::TinyInt, &"256".into()),
            Err(TypeError::OutOfRange { target: "TINYINT", .. })
        ));
        assert!(matches!(
            coerce(SqlType::TinyInt, &"-1".into()),
            Err(TypeError::Parse { .. } | TypeError::OutOfRange { .. })
        ));
        assert!(coerce(SqlType::Integer, &2.5f64.into()).is_err());
        assert!(matches!(
            coerce(SqlType::BigInt, &SqlValue::from(vec![1u8])),
            Err(TypeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bool_is_strict() {
        assert_eq!(value_of(SqlType::Bit, "TRUE"), SqlValue::Bool(true));
        assert_eq!(value_of(SqlType::Boolean, "0"), SqlValue::Bool(false));
        assert_eq!(value_of(SqlType::Bit, true), SqlValue::Bool(true));
        assert!(coerce(SqlType::Bit, &"yes".into()).is_err());
        assert!(coerce(SqlType::Bit, &2i32.into()).is_err());
    }

    #[test]
    fn test_decimal_extent() {
        let coerced = coerce(SqlType::Decimal, &"0.01".into()).unwrap();
        assert_eq!(coerced.value, SqlValue::from(Decimal::new(1, 2)));
        assert_eq!(coerced.extent, Extent::Decimal(DecimalShape::new(3, 2)));

        let coerced = coerce(SqlType::Numeric, &SqlValue::from(Decimal::new(-12345, 3))).unwrap();
        assert_eq!(coerced.extent, Extent::Decimal(DecimalShape::new(5, 3)));

        let wide: SqlDecimal = "12345678901234567890123456789012345678".parse().unwrap();
        let coerced = coerce(SqlType::Decimal, &SqlValue::Decimal(wide.clone())).unwrap();
        assert_eq!(coerced.value, SqlValue::Decimal(wide));
        assert_eq!(coerced.extent, Extent::Decimal(DecimalShape::new(38, 0)));

        let coerced = coerce(SqlType::Decimal, &123i32.into()).unwrap();
        assert_eq!(coerced.extent, Extent::Decimal(DecimalShape::new(3, 0)));
    }

    #[test]
    fn test_floats_use_matching_width() {
        assert_eq!(value_of(SqlType::Real, "1.5"), SqlValue::Float(1.5));
        assert_eq!(value_of(SqlType::Float, "1.5"), SqlValue::Double(1.5));
        assert_eq!(value_of(SqlType::Double, " 2.25 "), SqlValue::Double(2.25));
        // 0.1 survives as the nearest f64, not a widened f32
        assert_eq!(value_of(SqlType::Double, "0.1"), SqlValue::Double(0.1));
        assert!(coerce(SqlType::Double, &"1,5".into()).is_err());
    }

    #[test]
    fn test_character_length_units() {
        let coerced = coerce(SqlType::VarChar, &"héllo".into()).unwrap();
        assert_eq!(coerced.extent, Extent::Length(5));

        let coerced = coerce(SqlType::NVarChar, &"héllo".into()).unwrap();
        assert_eq!(coerced.extent, Extent::Length(10));

        // surrogate pair
        let coerced = coerce(SqlType::NChar, &"😀".into()).unwrap();
        assert_eq!(coerced.extent, Extent::Length(4));

        assert!(matches!(
            coerce(SqlType::VarChar, &42i32.into()),
            Err(TypeError::TypeMismatch { expected: "string", .. })
        ));
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_uuid_into_character_column() {
        let id = uuid::Uuid::nil();
        let coerced = coerce(SqlType::Char, &id.into()).unwrap();
        assert_eq!(
            coerced.value,
            SqlValue::String("00000000-0000-0000-0000-000000000000".into())
        );
        assert_eq!(coerced.extent, Extent::Length(36));
    }

    #[test]
    fn test_binary_requires_bytes() {
        let coerced = coerce(SqlType::VarBinary, &SqlValue::Binary(Bytes::from_static(b"abc"))).unwrap();
        assert_eq!(coerced.extent, Extent::Length(3));
        assert!(coerce(SqlType::Binary, &"abc".into()).is_err());
    }

    #[test]
    fn test_temporal_passthrough() {
        assert_eq!(
            value_of(SqlType::Date, "2024-02-29"),
            SqlValue::String("2024-02-29".into())
        );
        assert!(coerce(SqlType::Timestamp, &1i64.into()).is_err());
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_temporal_from_chrono() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(value_of(SqlType::Date, date), SqlValue::String("2024-02-29".into()));

        let dt = date.and_hms_opt(13, 5, 0).unwrap();
        assert_eq!(
            value_of(SqlType::Timestamp, dt),
            SqlValue::String("2024-02-29 13:05:00".into())
        );
    }

    #[test]
    fn test_null_and_unsupported() {
        let coerced = coerce(SqlType::VarChar, &SqlValue::Null).unwrap();
        assert!(coerced.value.is_null());
        assert_eq!(coerced.extent, Extent::Fixed);

        assert_eq!(
            coerce(SqlType::Blob, &SqlValue::Null),
            Err(TypeError::UnsupportedType { sql_type: "BLOB" })
        );
    }
}

//! Decimal precision as SQL Server counts it.
//!
//! SQL Server precision is the total number of digits a `decimal(p, s)`
//! column holds, and every such column reserves at least one digit left of
//! the decimal point. That differs from the digit count of the unscaled
//! mantissa: `0.01` has a one-digit mantissa but needs `decimal(3, 2)`.
//!
//! Values are kept as [`SqlDecimal`], an exact decimal of any size, so a
//! value too wide for `decimal(38)` is reported by [`DecimalShape::widen`]
//! rather than lost while parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Largest precision SQL Server accepts for `decimal`/`numeric`.
pub const MAX_PRECISION: u32 = 38;

/// Digits beyond which decimal text is refused outright.
const MAX_TEXT_DIGITS: usize = 4096;

/// An exact decimal number of arbitrary precision.
///
/// Stored as a sign, the unscaled digits and a non-negative scale, so the
/// scale is kept as written: `100.00` and `100` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlDecimal {
    negative: bool,
    /// ASCII digits without leading zeros; `"0"` for zero.
    digits: String,
    scale: u32,
}

impl SqlDecimal {
    /// Parse decimal text.
    ///
    /// Accepts an optional sign, digits with an optional fraction, and an
    /// optional exponent (`-12.500`, `.5`, `1.25e2`). Whitespace, digit
    /// separators and non-finite words are rejected.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::Parse {
            target: "DECIMAL",
            value: text.to_owned(),
        };

        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty())
            || !all_digits(integer)
            || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let exponent: i64 = match exponent {
            None => 0,
            Some(exp) => {
                let unsigned = exp.strip_prefix(['+', '-']).unwrap_or(exp);
                if unsigned.is_empty() || unsigned.len() > 10 || !all_digits(unsigned) {
                    return Err(invalid());
                }
                exp.parse::<i64>().map_err(|_| invalid())?
            }
        };

        let mut digits = String::with_capacity(integer.len() + fraction.len());
        digits.push_str(integer);
        digits.push_str(fraction);

        // Scale after applying the exponent; negative means trailing zeros.
        let scale = i64::try_from(fraction.len()).map_err(|_| invalid())? - exponent;
        let scale = if scale < 0 {
            let zeros = usize::try_from(scale.unsigned_abs()).map_err(|_| invalid())?;
            if zeros > MAX_TEXT_DIGITS {
                return Err(invalid());
            }
            digits.extend(std::iter::repeat_n('0', zeros));
            0
        } else {
            u32::try_from(scale)
                .ok()
                .filter(|&s| s as usize <= MAX_TEXT_DIGITS)
                .ok_or_else(invalid)?
        };
        if digits.len() > MAX_TEXT_DIGITS {
            return Err(invalid());
        }

        Ok(Self::from_parts(negative, &digits, scale))
    }

    fn from_parts(negative: bool, digits: &str, scale: u32) -> Self {
        let trimmed = digits.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Self {
            negative: negative && digits != "0",
            digits: digits.to_owned(),
            scale,
        }
    }

    /// Whether the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Digits after the decimal point, as written.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Number of digits in the unscaled value.
    #[must_use]
    pub fn unscaled_digits(&self) -> u32 {
        u32::try_from(self.digits.len()).unwrap_or(u32::MAX)
    }

    /// Convert to a [`rust_decimal::Decimal`] when the value fits one.
    #[must_use]
    pub fn to_decimal(&self) -> Option<rust_decimal::Decimal> {
        rust_decimal::Decimal::from_str_exact(&self.to_string()).ok()
    }
}

impl FromStr for SqlDecimal {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SqlDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&self.digits);
        }
        if self.digits.len() <= scale {
            f.write_str("0.")?;
            for _ in self.digits.len()..scale {
                f.write_str("0")?;
            }
            return f.write_str(&self.digits);
        }
        let (integer, fraction) = self.digits.split_at(self.digits.len() - scale);
        write!(f, "{integer}.{fraction}")
    }
}

impl From<rust_decimal::Decimal> for SqlDecimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self::from_parts(
            value.is_sign_negative(),
            &value.mantissa().unsigned_abs().to_string(),
            value.scale(),
        )
    }
}

impl From<i64> for SqlDecimal {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, &value.unsigned_abs().to_string(), 0)
    }
}

/// Precision and scale of a value or of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecimalShape {
    /// Total digits.
    pub precision: u32,
    /// Digits after the decimal point.
    pub scale: u32,
}

impl DecimalShape {
    /// Create a shape from a declared precision and scale.
    #[must_use]
    pub const fn new(precision: u32, scale: u32) -> Self {
        Self { precision, scale }
    }

    /// The smallest `decimal(p, s)` that stores `value` exactly.
    ///
    /// The sign never counts, and trailing zeros after the point are kept as
    /// written (`100.00` is `decimal(5, 2)`).
    #[must_use]
    pub fn of(value: &SqlDecimal) -> Self {
        let scale = value.scale();
        let digits = value.unscaled_digits();
        let integer_digits = digits.saturating_sub(scale).max(1);

        Self {
            precision: integer_digits + scale,
            scale,
        }
    }

    /// Digits left of the decimal point.
    #[must_use]
    pub const fn integer_digits(self) -> u32 {
        self.precision.saturating_sub(self.scale)
    }

    /// The narrowest shape that holds every value either shape holds.
    ///
    /// Neither precision nor scale ever decreases. Fails when the result
    /// would exceed [`MAX_PRECISION`].
    pub fn widen(self, other: Self) -> Result<Self, TypeError> {
        let scale = self.scale.max(other.scale);
        let integer_digits = self.integer_digits().max(other.integer_digits());
        let precision = (integer_digits + scale)
            .max(self.precision)
            .max(other.precision);

        if precision > MAX_PRECISION {
            return Err(TypeError::PrecisionOverflow {
                precision,
                max: MAX_PRECISION,
            });
        }

        Ok(Self { precision, scale })
    }
}

/// Parse decimal text, keeping the scale as written.
///
/// Accepts plain (`-12.500`) and scientific (`1.25e2`) notation.
pub fn parse_decimal(text: &str) -> Result<SqlDecimal, TypeError> {
    SqlDecimal::parse(text)
}

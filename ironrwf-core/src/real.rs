/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Scaled decimal numeric type.
//!
//! A [`Real`] is a signed 64-bit mantissa paired with a [`RealHint`] that
//! selects a power-of-ten exponent (10^-14 .. 10^7), a binary fraction
//! denominator (1/1 .. 1/256), or a sentinel (NaN, +Inf, -Inf). A separate
//! blank flag marks an unset value.
//!
//! Conversions to and from `f64`, `f32`, strings and [`Decimal`] report
//! overflow and malformed input as [`CodecError::InvalidArgument`], never by
//! truncating.

use crate::error::CodecError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact powers of ten representable in both `i64` and `f64`.
const POW10_I64: [i64; 15] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
];

/// 2^63 as a double, the first value past `i64::MAX`.
const I64_LIMIT_F64: f64 = 9_223_372_036_854_775_808.0;

/// Largest number of fractional digits an exponent hint can carry.
const MAX_FRACTION_DIGITS: usize = 14;

/// Scale selector of a [`Real`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum RealHint {
    /// Divide by 10^14.
    ExponentMinus14 = 0,
    /// Divide by 10^13.
    ExponentMinus13 = 1,
    /// Divide by 10^12.
    ExponentMinus12 = 2,
    /// Divide by 10^11.
    ExponentMinus11 = 3,
    /// Divide by 10^10.
    ExponentMinus10 = 4,
    /// Divide by 10^9.
    ExponentMinus9 = 5,
    /// Divide by 10^8.
    ExponentMinus8 = 6,
    /// Divide by 10^7.
    ExponentMinus7 = 7,
    /// Divide by 10^6.
    ExponentMinus6 = 8,
    /// Divide by 10^5.
    ExponentMinus5 = 9,
    /// Divide by 10^4.
    ExponentMinus4 = 10,
    /// Divide by 10^3.
    ExponentMinus3 = 11,
    /// Divide by 10^2.
    ExponentMinus2 = 12,
    /// Divide by 10.
    ExponentMinus1 = 13,
    /// Mantissa as is.
    Exponent0 = 14,
    /// Multiply by 10.
    Exponent1 = 15,
    /// Multiply by 10^2.
    Exponent2 = 16,
    /// Multiply by 10^3.
    Exponent3 = 17,
    /// Multiply by 10^4.
    Exponent4 = 18,
    /// Multiply by 10^5.
    Exponent5 = 19,
    /// Multiply by 10^6.
    Exponent6 = 20,
    /// Multiply by 10^7.
    Exponent7 = 21,
    /// Fraction with denominator 1.
    Fraction1 = 22,
    /// Fraction with denominator 2.
    Fraction2 = 23,
    /// Fraction with denominator 4.
    Fraction4 = 24,
    /// Fraction with denominator 8.
    Fraction8 = 25,
    /// Fraction with denominator 16.
    Fraction16 = 26,
    /// Fraction with denominator 32.
    Fraction32 = 27,
    /// Fraction with denominator 64.
    Fraction64 = 28,
    /// Fraction with denominator 128.
    Fraction128 = 29,
    /// Fraction with denominator 256.
    Fraction256 = 30,
    /// Positive infinity.
    Infinity = 33,
    /// Negative infinity.
    NegInfinity = 34,
    /// Not a number.
    NotANumber = 35,
}

impl RealHint {
    /// Creates a hint from its wire code.
    ///
    /// # Returns
    /// `None` for the reserved codes 31 and 32 and anything above 35.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Creates an exponent hint from a power of ten in -14..=7.
    #[must_use]
    pub fn from_exponent(exponent: i32) -> Option<Self> {
        if (-14..=7).contains(&exponent) {
            Self::from_code((exponent + 14) as u8)
        } else {
            None
        }
    }

    /// Creates a fraction hint from a denominator in 1, 2, 4 .. 256.
    #[must_use]
    pub fn from_denominator(denominator: u64) -> Option<Self> {
        if denominator == 0 || denominator > 256 || !denominator.is_power_of_two() {
            return None;
        }
        Self::from_code(22 + denominator.trailing_zeros() as u8)
    }

    /// Returns the power of ten for exponent hints.
    #[inline]
    #[must_use]
    pub const fn exponent(self) -> Option<i32> {
        let code = self as u8;
        if code <= 21 {
            Some(code as i32 - 14)
        } else {
            None
        }
    }

    /// Returns the denominator for fraction hints.
    #[inline]
    #[must_use]
    pub const fn denominator(self) -> Option<u64> {
        let code = self as u8;
        if code >= 22 && code <= 30 {
            Some(1u64 << (code - 22))
        } else {
            None
        }
    }

    /// Returns true for the NaN and infinity hints.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Self::Infinity | Self::NegInfinity | Self::NotANumber)
    }
}

/// Scaled decimal value.
///
/// # Example
///
/// ```rust
/// use ironrwf_core::{Real, RealHint};
///
/// let price: Real = "555.000".parse().unwrap();
/// assert_eq!(price.mantissa(), 555_000);
/// assert_eq!(price.hint(), RealHint::ExponentMinus3);
/// assert_eq!(price.to_string(), "555.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Real {
    mantissa: i64,
    hint: RealHint,
    blank: bool,
}

impl Real {
    /// Creates a value from a mantissa and hint.
    #[inline]
    #[must_use]
    pub const fn new(mantissa: i64, hint: RealHint) -> Self {
        Self {
            mantissa,
            hint,
            blank: false,
        }
    }

    /// Returns the blank value.
    #[inline]
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            mantissa: 0,
            hint: RealHint::Exponent0,
            blank: true,
        }
    }

    /// Returns the not-a-number sentinel.
    #[inline]
    #[must_use]
    pub const fn nan() -> Self {
        Self::new(0, RealHint::NotANumber)
    }

    /// Returns the positive infinity sentinel.
    #[inline]
    #[must_use]
    pub const fn infinity() -> Self {
        Self::new(0, RealHint::Infinity)
    }

    /// Returns the negative infinity sentinel.
    #[inline]
    #[must_use]
    pub const fn neg_infinity() -> Self {
        Self::new(0, RealHint::NegInfinity)
    }

    /// Creates a value from a mantissa and a raw hint code.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` for reserved or unknown codes.
    pub fn from_parts(mantissa: i64, code: u8) -> Result<Self, CodecError> {
        RealHint::from_code(code)
            .map(|hint| Self::new(mantissa, hint))
            .ok_or_else(|| CodecError::InvalidArgument(format!("invalid real hint {code}")))
    }

    /// Returns the mantissa.
    #[inline]
    #[must_use]
    pub const fn mantissa(&self) -> i64 {
        self.mantissa
    }

    /// Returns the mantissa as a long integer.
    #[inline]
    #[must_use]
    pub const fn to_i64(&self) -> i64 {
        self.mantissa
    }

    /// Returns the hint.
    #[inline]
    #[must_use]
    pub const fn hint(&self) -> RealHint {
        self.hint
    }

    /// Returns true if the value is unset.
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.blank
    }

    /// Returns true for NaN and infinities.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        !self.blank && self.hint.is_sentinel()
    }

    /// Converts a double using the scale selected by `hint`.
    ///
    /// NaN and infinities map to their sentinels whatever the hint. Finite
    /// values are scaled and rounded half up.
    ///
    /// # Arguments
    /// * `value` - The value to convert
    /// * `hint` - An exponent or fraction hint
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if `hint` is a sentinel or the
    /// rounded mantissa does not fit in an `i64`.
    pub fn from_f64(value: f64, hint: RealHint) -> Result<Self, CodecError> {
        if value.is_nan() {
            return Ok(Self::nan());
        }
        if value.is_infinite() {
            return Ok(if value > 0.0 {
                Self::infinity()
            } else {
                Self::neg_infinity()
            });
        }

        let scaled = if let Some(exponent) = hint.exponent() {
            if exponent <= 0 {
                value * POW10_I64[exponent.unsigned_abs() as usize] as f64
            } else {
                value / POW10_I64[exponent as usize] as f64
            }
        } else if let Some(denominator) = hint.denominator() {
            value * denominator as f64
        } else {
            return Err(CodecError::InvalidArgument(format!(
                "{hint:?} is not a scaling hint"
            )));
        };

        let rounded = (scaled + 0.5).floor();
        if !(-I64_LIMIT_F64..I64_LIMIT_F64).contains(&rounded) {
            return Err(CodecError::InvalidArgument(format!(
                "{value} does not fit a 64-bit mantissa with hint {hint:?}"
            )));
        }
        Ok(Self::new(rounded as i64, hint))
    }

    /// Converts a float using the scale selected by `hint`.
    ///
    /// # Errors
    /// Same as [`Real::from_f64`].
    pub fn from_f32(value: f32, hint: RealHint) -> Result<Self, CodecError> {
        Self::from_f64(f64::from(value), hint)
    }

    /// Converts an exact decimal, using its scale as the exponent.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if the scale exceeds 14 digits
    /// after normalisation or the mantissa does not fit in an `i64`.
    pub fn from_decimal(value: Decimal) -> Result<Self, CodecError> {
        let value = if value.scale() as usize > MAX_FRACTION_DIGITS {
            value.normalize()
        } else {
            value
        };
        let scale = value.scale();
        let hint = RealHint::from_exponent(-(scale as i32)).ok_or_else(|| {
            CodecError::InvalidArgument(format!("decimal scale {scale} exceeds 14 digits"))
        })?;
        let mantissa = i64::try_from(value.mantissa()).map_err(|_| {
            CodecError::InvalidArgument(format!("decimal {value} does not fit a 64-bit mantissa"))
        })?;
        Ok(Self::new(mantissa, hint))
    }

    /// Returns the approximate double value.
    ///
    /// Sentinels map to NaN and the infinities; blank maps to 0.0.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        if self.blank {
            return 0.0;
        }
        match self.hint {
            RealHint::NotANumber => f64::NAN,
            RealHint::Infinity => f64::INFINITY,
            RealHint::NegInfinity => f64::NEG_INFINITY,
            hint => {
                let mantissa = self.mantissa as f64;
                if let Some(exponent) = hint.exponent() {
                    if exponent < 0 {
                        mantissa / POW10_I64[exponent.unsigned_abs() as usize] as f64
                    } else {
                        mantissa * POW10_I64[exponent as usize] as f64
                    }
                } else {
                    mantissa / hint.denominator().unwrap_or(1) as f64
                }
            }
        }
    }

    /// Returns the approximate float value.
    #[must_use]
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Returns the exact decimal value.
    ///
    /// # Returns
    /// `None` for blank values, sentinels and values beyond the decimal range.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.blank || self.hint.is_sentinel() {
            return None;
        }
        if let Some(exponent) = self.hint.exponent() {
            if exponent < 0 {
                Some(Decimal::new(self.mantissa, exponent.unsigned_abs()))
            } else {
                Decimal::from(self.mantissa)
                    .checked_mul(Decimal::from(POW10_I64[exponent as usize]))
            }
        } else {
            let denominator = self.hint.denominator()?;
            Decimal::from(self.mantissa).checked_div(Decimal::from(denominator))
        }
    }

    fn from_digits(
        magnitude: u128,
        negative: bool,
        explicit_plus: bool,
        mut exponent: i32,
    ) -> Result<Self, CodecError> {
        if explicit_plus && magnitude == 0 {
            return Ok(Self::blank());
        }
        let mut magnitude = magnitude;
        let fits = |m: u128| {
            if negative {
                m <= i64::MIN.unsigned_abs() as u128
            } else {
                m <= i64::MAX as u128
            }
        };
        while !fits(magnitude) && magnitude % 10 == 0 && exponent < 7 {
            magnitude /= 10;
            exponent += 1;
        }
        if !fits(magnitude) {
            return Err(CodecError::InvalidArgument(
                "value does not fit a 64-bit mantissa".to_string(),
            ));
        }
        let hint = RealHint::from_exponent(exponent).ok_or_else(|| {
            CodecError::InvalidArgument(format!("exponent {exponent} out of range"))
        })?;
        Ok(Self::new(signed(magnitude, negative), hint))
    }

    fn parse_fraction(
        whole: Option<&str>,
        fraction: &str,
        negative: bool,
        explicit_plus: bool,
    ) -> Result<Self, CodecError> {
        let (numerator, denominator) = fraction
            .split_once('/')
            .ok_or_else(|| invalid_text(fraction))?;
        let numerator = parse_digits(numerator).ok_or_else(|| invalid_text(fraction))?;
        let denominator = parse_digits(denominator).ok_or_else(|| invalid_text(fraction))?;
        let hint = u64::try_from(denominator)
            .ok()
            .and_then(RealHint::from_denominator)
            .ok_or_else(|| {
                CodecError::InvalidArgument(format!("invalid fraction denominator {denominator}"))
            })?;

        let whole = match whole {
            Some(text) => parse_digits(text).ok_or_else(|| invalid_text(text))?,
            None => 0,
        };
        let magnitude = whole
            .checked_mul(denominator)
            .and_then(|w| w.checked_add(numerator))
            .ok_or_else(|| invalid_text(fraction))?;

        if explicit_plus && magnitude == 0 {
            return Ok(Self::blank());
        }
        let limit = if negative {
            i64::MIN.unsigned_abs() as u128
        } else {
            i64::MAX as u128
        };
        if magnitude > limit {
            return Err(CodecError::InvalidArgument(
                "fraction does not fit a 64-bit mantissa".to_string(),
            ));
        }
        Ok(Self::new(signed(magnitude, negative), hint))
    }

    fn parse_decimal(body: &str, negative: bool, explicit_plus: bool) -> Result<Self, CodecError> {
        let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid_text(body));
        }
        let mut fraction = fraction;
        while fraction.len() > MAX_FRACTION_DIGITS && fraction.ends_with('0') {
            fraction = &fraction[..fraction.len() - 1];
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(CodecError::InvalidArgument(format!(
                "more than {MAX_FRACTION_DIGITS} fractional digits in '{body}'"
            )));
        }

        let mut magnitude: u128 = 0;
        for part in [integer, fraction] {
            if !part.is_empty() {
                let digits = parse_digits(part).ok_or_else(|| invalid_text(body))?;
                magnitude = 10u128
                    .checked_pow(part.len() as u32)
                    .and_then(|scale| magnitude.checked_mul(scale))
                    .and_then(|m| m.checked_add(digits))
                    .ok_or_else(|| invalid_text(body))?;
            }
        }
        Self::from_digits(magnitude, negative, explicit_plus, -(fraction.len() as i32))
    }
}

impl Default for Real {
    fn default() -> Self {
        Self::blank()
    }
}

impl FromStr for Real {
    type Err = CodecError;

    /// Parses decimal (`"-12.50"`), integer, fraction (`"3/8"`) and mixed
    /// (`"12 1/4"`) forms plus `"Inf"`, `"-Inf"` and `"NaN"`.
    ///
    /// Empty text yields a blank value, as does a `+`-prefixed zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text {
            "" => return Ok(Self::blank()),
            "Inf" => return Ok(Self::infinity()),
            "-Inf" => return Ok(Self::neg_infinity()),
            "NaN" => return Ok(Self::nan()),
            _ => {}
        }

        let (negative, explicit_plus, body) = if let Some(rest) = text.strip_prefix('-') {
            (true, false, rest)
        } else if let Some(rest) = text.strip_prefix('+') {
            (false, true, rest)
        } else {
            (false, false, text)
        };

        let mut parts = body.split_ascii_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(first), None, None) if first.contains('/') => {
                Self::parse_fraction(None, first, negative, explicit_plus)
            }
            (Some(first), None, None) => Self::parse_decimal(first, negative, explicit_plus),
            (Some(whole), Some(fraction), None) => {
                Self::parse_fraction(Some(whole), fraction, negative, explicit_plus)
            }
            _ => Err(invalid_text(text)),
        }
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blank {
            return Ok(());
        }
        match self.hint {
            RealHint::Infinity => return f.write_str("Inf"),
            RealHint::NegInfinity => return f.write_str("-Inf"),
            RealHint::NotANumber => return f.write_str("NaN"),
            _ => {}
        }

        let magnitude = self.mantissa.unsigned_abs();
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let mut buf = itoa::Buffer::new();

        if let Some(denominator) = self.hint.denominator() {
            let whole = magnitude / denominator;
            let numerator = magnitude % denominator;
            if numerator == 0 {
                return f.write_str(buf.format(whole));
            }
            if whole != 0 {
                f.write_str(buf.format(whole))?;
                f.write_str(" ")?;
            }
            f.write_str(buf.format(numerator))?;
            f.write_str("/")?;
            return f.write_str(buf.format(denominator));
        }

        let exponent = self.hint.exponent().unwrap_or(0);
        let digits = buf.format(magnitude);
        if exponent >= 0 {
            f.write_str(digits)?;
            if magnitude != 0 {
                for _ in 0..exponent {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }

        let places = exponent.unsigned_abs() as usize;
        if digits.len() > places {
            let (integer, fraction) = digits.split_at(digits.len() - places);
            write!(f, "{integer}.{fraction}")
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..places {
                f.write_str("0")?;
            }
            f.write_str(digits)
        }
    }
}

fn parse_digits(text: &str) -> Option<u128> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
    })
}

fn signed(magnitude: u128, negative: bool) -> i64 {
    if negative {
        (magnitude as i128).wrapping_neg() as i64
    } else {
        magnitude as i64
    }
}

fn invalid_text(text: &str) -> CodecError {
    CodecError::InvalidArgument(format!("cannot parse '{text}' as a real"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Real {
        text.parse().unwrap()
    }

    #[test]
    fn test_hint_codes() {
        assert_eq!(RealHint::from_code(14), Some(RealHint::Exponent0));
        assert_eq!(RealHint::from_code(30), Some(RealHint::Fraction256));
        assert_eq!(RealHint::from_code(31), None);
        assert_eq!(RealHint::from_code(32), None);
        assert_eq!(RealHint::from_code(36), None);
        assert_eq!(RealHint::from_exponent(-3), Some(RealHint::ExponentMinus3));
        assert_eq!(RealHint::from_exponent(8), None);
        assert_eq!(RealHint::from_denominator(64), Some(RealHint::Fraction64));
        assert_eq!(RealHint::from_denominator(3), None);
        assert_eq!(RealHint::Fraction8.denominator(), Some(8));
        assert_eq!(RealHint::Exponent7.exponent(), Some(7));
        assert_eq!(RealHint::NotANumber.exponent(), None);
    }

    #[test]
    fn test_from_parts_rejects_reserved() {
        assert!(Real::from_parts(1, 31).is_err());
        assert!(Real::from_parts(1, 40).is_err());
        assert_eq!(
            Real::from_parts(5, 12).unwrap(),
            Real::new(5, RealHint::ExponentMinus2)
        );
    }

    #[test]
    fn test_parse_keeps_trailing_zeros() {
        let real = parse("555.000");
        assert_eq!(real.mantissa(), 555_000);
        assert_eq!(real.hint(), RealHint::ExponentMinus3);
        assert_eq!(real.to_string(), "555.000");
    }

    #[test]
    fn test_parse_integer_boundaries() {
        let max = parse("9223372036854775807");
        assert_eq!(max.mantissa(), i64::MAX);
        assert_eq!(max.hint(), RealHint::Exponent0);

        let min = parse("-9223372036854775808");
        assert_eq!(min.mantissa(), i64::MIN);

        assert!(matches!(
            "9223372036854775808".parse::<Real>(),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_moves_trailing_zeros_into_exponent() {
        let real = parse("92233720368547758070");
        assert_eq!(real.mantissa(), i64::MAX);
        assert_eq!(real.hint(), RealHint::Exponent1);
        assert_eq!(real.to_string(), "92233720368547758070");
    }

    #[test]
    fn test_parse_blank_forms() {
        assert!(parse("").is_blank());
        assert!(parse("   ").is_blank());
        assert!(parse("+0").is_blank());
        assert!(parse("+0.0").is_blank());
        assert!(parse("+0.0000000000000").is_blank());
        assert!(!parse("0.0").is_blank());
        assert!(!parse("-0.0").is_blank());
        assert!(parse("").to_decimal().is_none());
    }

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(parse("Inf").hint(), RealHint::Infinity);
        assert_eq!(parse("-Inf").hint(), RealHint::NegInfinity);
        assert_eq!(parse("NaN").hint(), RealHint::NotANumber);
        assert!("NaNx".parse::<Real>().is_err());
        assert!("Inf 1".parse::<Real>().is_err());
    }

    #[test]
    fn test_parse_fractions() {
        let mixed = parse("12 1/4");
        assert_eq!(mixed.mantissa(), 49);
        assert_eq!(mixed.hint(), RealHint::Fraction4);
        assert_eq!(mixed.to_string(), "12 1/4");

        let negative = parse("-3/8");
        assert_eq!(negative.mantissa(), -3);
        assert_eq!(negative.to_string(), "-3/8");

        assert!("1/3".parse::<Real>().is_err());
        assert!("1/512".parse::<Real>().is_err());
        assert!("1 2".parse::<Real>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["abc", "1.2.3", "--1", "1e5", ".", "12.5x", "1 1/2 3"] {
            assert!(text.parse::<Real>().is_err(), "{text} should fail");
        }
    }

    #[test]
    fn test_parse_fraction_digit_limit() {
        let real = parse("0.00000000000001");
        assert_eq!(real.hint(), RealHint::ExponentMinus14);
        assert!("0.000000000000001".parse::<Real>().is_err());
        let trimmed = parse("1.000000000000000000");
        assert_eq!(trimmed.hint(), RealHint::ExponentMinus14);
    }

    #[test]
    fn test_display_exponents() {
        assert_eq!(Real::new(-5, RealHint::ExponentMinus2).to_string(), "-0.05");
        assert_eq!(Real::new(12, RealHint::Exponent2).to_string(), "1200");
        assert_eq!(Real::new(0, RealHint::Exponent3).to_string(), "0");
        assert_eq!(Real::new(7, RealHint::Fraction1).to_string(), "7");
        assert_eq!(Real::blank().to_string(), "");
        assert_eq!(Real::neg_infinity().to_string(), "-Inf");
    }

    #[test]
    fn test_from_f64_rounding() {
        let real = Real::from_f64(1.2345, RealHint::ExponentMinus4).unwrap();
        assert_eq!(real.mantissa(), 12_345);
        assert_eq!(real.to_f64(), 1.2345);

        let half = Real::from_f64(2.5, RealHint::Exponent0).unwrap();
        assert_eq!(half.mantissa(), 3);
        let negative_half = Real::from_f64(-2.5, RealHint::Exponent0).unwrap();
        assert_eq!(negative_half.mantissa(), -2);

        let scaled_down = Real::from_f64(1.0e8, RealHint::Exponent7).unwrap();
        assert_eq!(scaled_down.mantissa(), 10);

        let fraction = Real::from_f64(3.25, RealHint::Fraction4).unwrap();
        assert_eq!(fraction.mantissa(), 13);
        assert_eq!(fraction.to_f64(), 3.25);
    }

    #[test]
    fn test_from_f64_overflow_boundary() {
        assert!(Real::from_f64(i64::MAX as f64, RealHint::Exponent0).is_err());
        let below = Real::from_f64(9_223_372_036_854_774_784.0, RealHint::Exponent0).unwrap();
        assert_eq!(below.mantissa(), 9_223_372_036_854_774_784);
        let min = Real::from_f64(i64::MIN as f64, RealHint::Exponent0).unwrap();
        assert_eq!(min.mantissa(), i64::MIN);
        assert!(Real::from_f64(1.0e5, RealHint::ExponentMinus14).is_err());
    }

    #[test]
    fn test_from_f64_sentinels() {
        let nan = Real::from_f64(f64::NAN, RealHint::Exponent0).unwrap();
        assert_eq!(nan.hint(), RealHint::NotANumber);
        assert!(nan.to_f64().is_nan());
        let inf = Real::from_f64(f64::INFINITY, RealHint::ExponentMinus2).unwrap();
        assert_eq!(inf.to_f64(), f64::INFINITY);
        let neg = Real::from_f64(f64::NEG_INFINITY, RealHint::Fraction2).unwrap();
        assert_eq!(neg.to_f64(), f64::NEG_INFINITY);
        assert!(Real::from_f64(1.0, RealHint::Infinity).is_err());
    }

    #[test]
    fn test_from_f32() {
        let real = Real::from_f32(0.5, RealHint::Fraction2).unwrap();
        assert_eq!(real.mantissa(), 1);
        assert!(Real::from_f32(f32::MAX, RealHint::Exponent0).is_err());
        assert!(Real::from_f32(f32::NAN, RealHint::Exponent0).unwrap().to_f32().is_nan());
    }

    #[test]
    fn test_from_f32_overflow_boundary() {
        assert!(Real::from_f32(9_223_372_036_854_775_808.0, RealHint::Exponent0).is_err());
        let below = Real::from_f32(9_223_371_487_098_961_920.0, RealHint::Exponent0).unwrap();
        assert_eq!(below.mantissa(), 9_223_371_487_098_961_920);
        let min = Real::from_f32(-9_223_372_036_854_775_808.0, RealHint::Exponent0).unwrap();
        assert_eq!(min.mantissa(), i64::MIN);
        assert!(Real::from_f32(-1.0e19, RealHint::Exponent0).is_err());
    }

    #[test]
    fn test_decimal_conversions() {
        let real = parse("-12.340");
        assert_eq!(real.to_decimal(), Some(Decimal::new(-12_340, 3)));
        assert_eq!(Real::from_decimal(Decimal::new(-12_340, 3)).unwrap(), real);

        let fraction = Real::new(1, RealHint::Fraction256);
        assert_eq!(fraction.to_decimal(), Some(Decimal::new(390_625, 8)));

        let positive = Real::new(15, RealHint::Exponent3);
        assert_eq!(positive.to_decimal(), Some(Decimal::from(15_000)));

        assert!(Real::nan().to_decimal().is_none());
        assert!(Real::infinity().to_decimal().is_none());
    }

    #[test]
    fn test_blank_to_f64() {
        assert_eq!(Real::blank().to_f64(), 0.0);
        assert_eq!(Real::default(), Real::blank());
    }
}

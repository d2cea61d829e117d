/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Primitive value and length-prefix codecs.
//!
//! Encoders write into any [`BufMut`]. Decoders take the content bytes of a
//! single value (its length is given by the enclosing entry) or, for the
//! framing helpers, a slice and an offset that is advanced past what was read.

use bytes::BufMut;
use ironrwf_core::{CodecError, DataType, Date, Real, RealHint};

use crate::container::Value;

/// Largest value a `u15rb` length can carry.
pub const U15RB_MAX: u16 = 0x7FFF;

/// Largest value a `u30rb` count can carry.
pub const U30RB_MAX: u32 = 0x3FFF_FFFF;

/// Marker byte introducing a two-byte `u16ob` length.
pub const U16OB_LONG: u8 = 0xFE;

/// Writes a 15-bit length in one or two bytes.
///
/// # Errors
/// Returns `CodecError::InvalidArgument` if `value` exceeds [`U15RB_MAX`].
pub fn put_u15rb(out: &mut impl BufMut, value: u16) -> Result<(), CodecError> {
    if value > U15RB_MAX {
        return Err(CodecError::InvalidArgument(format!(
            "{value} exceeds u15rb range"
        )));
    }
    if value < 0x80 {
        out.put_u8(value as u8);
    } else {
        out.put_u16(value | 0x8000);
    }
    Ok(())
}

/// Returns the encoded size of a `u15rb` value.
#[inline]
#[must_use]
pub const fn u15rb_len(value: u16) -> usize {
    if value < 0x80 { 1 } else { 2 }
}

/// Writes a 16-bit length in one byte, or [`U16OB_LONG`] plus two bytes.
pub fn put_u16ob(out: &mut impl BufMut, value: u16) {
    if value < u16::from(U16OB_LONG) {
        out.put_u8(value as u8);
    } else {
        out.put_u8(U16OB_LONG);
        out.put_u16(value);
    }
}

/// Returns the encoded size of a `u16ob` value.
#[inline]
#[must_use]
pub const fn u16ob_len(value: u16) -> usize {
    if value < U16OB_LONG as u16 { 1 } else { 3 }
}

/// Returns the encoded size of a `u30rb` value.
#[inline]
#[must_use]
pub const fn u30rb_len(value: u32) -> usize {
    match value {
        0..0x40 => 1,
        0x40..0x4000 => 2,
        0x4000..0x40_0000 => 3,
        _ => 4,
    }
}

/// Writes a 30-bit count in one to four bytes.
///
/// # Errors
/// Returns `CodecError::InvalidArgument` if `value` exceeds [`U30RB_MAX`].
pub fn put_u30rb(out: &mut impl BufMut, value: u32) -> Result<(), CodecError> {
    match value {
        0..0x40 => out.put_u8(value as u8),
        0x40..0x4000 => out.put_u16(0x4000 | value as u16),
        0x4000..0x40_0000 => {
            let bytes = (0x80_0000 | value).to_be_bytes();
            out.put_slice(&bytes[1..]);
        }
        0x40_0000..=U30RB_MAX => out.put_u32(0xC000_0000 | value),
        _ => {
            return Err(CodecError::InvalidArgument(format!(
                "{value} exceeds u30rb range"
            )));
        }
    }
    Ok(())
}

/// Reads one byte.
///
/// # Errors
/// Returns `CodecError::IncompleteData` if no byte is left.
pub fn read_u8(data: &[u8], offset: &mut usize) -> Result<u8, CodecError> {
    let byte = *data.get(*offset).ok_or(CodecError::IncompleteData)?;
    *offset += 1;
    Ok(byte)
}

/// Reads a big-endian `u16`.
///
/// # Errors
/// Returns `CodecError::IncompleteData` if fewer than two bytes are left.
pub fn read_u16(data: &[u8], offset: &mut usize) -> Result<u16, CodecError> {
    let bytes = read_slice(data, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Reads a `u15rb` length.
///
/// # Errors
/// Returns `CodecError::IncompleteData` on truncation.
pub fn read_u15rb(data: &[u8], offset: &mut usize) -> Result<u16, CodecError> {
    let first = read_u8(data, offset)?;
    if first & 0x80 == 0 {
        return Ok(u16::from(first));
    }
    let second = read_u8(data, offset)?;
    Ok(u16::from_be_bytes([first & 0x7F, second]))
}

/// Reads a `u16ob` length.
///
/// # Errors
/// Returns `CodecError::IncompleteData` on truncation.
pub fn read_u16ob(data: &[u8], offset: &mut usize) -> Result<u16, CodecError> {
    let first = read_u8(data, offset)?;
    if first == U16OB_LONG {
        read_u16(data, offset)
    } else {
        Ok(u16::from(first))
    }
}

/// Reads a `u30rb` count.
///
/// # Errors
/// Returns `CodecError::IncompleteData` on truncation.
pub fn read_u30rb(data: &[u8], offset: &mut usize) -> Result<u32, CodecError> {
    let first = read_u8(data, offset)?;
    let extra = usize::from(first >> 6);
    let mut value = u32::from(first & 0x3F);
    for &byte in read_slice(data, offset, extra)? {
        value = (value << 8) | u32::from(byte);
    }
    Ok(value)
}

/// Reads `len` bytes.
///
/// # Errors
/// Returns `CodecError::IncompleteData` if fewer than `len` bytes are left.
pub fn read_slice<'a>(
    data: &'a [u8],
    offset: &mut usize,
    len: usize,
) -> Result<&'a [u8], CodecError> {
    let end = offset.checked_add(len).ok_or(CodecError::IncompleteData)?;
    let slice = data.get(*offset..end).ok_or(CodecError::IncompleteData)?;
    *offset = end;
    Ok(slice)
}

/// Writes a signed integer as minimal big-endian two's complement.
pub fn encode_int(out: &mut impl BufMut, value: i64) {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    out.put_slice(&bytes[start..]);
}

/// Writes an unsigned integer as minimal big-endian bytes.
pub fn encode_uint(out: &mut impl BufMut, value: u64) {
    let bytes = value.to_be_bytes();
    let start = (value.leading_zeros() as usize / 8).min(7);
    out.put_slice(&bytes[start..]);
}

/// Decodes a signed integer; empty content is blank.
///
/// # Errors
/// Returns `CodecError::InvalidData` for content longer than 8 bytes.
pub fn decode_int(data: &[u8]) -> Result<Option<i64>, CodecError> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() > 8 {
        return Err(CodecError::InvalidData(format!(
            "{} byte integer",
            data.len()
        )));
    }
    let seed: i64 = if data[0] & 0x80 != 0 { -1 } else { 0 };
    Ok(Some(
        data.iter()
            .fold(seed, |acc, &byte| (acc << 8) | i64::from(byte)),
    ))
}

/// Decodes an unsigned integer; empty content is blank.
///
/// # Errors
/// Returns `CodecError::InvalidData` for content longer than 8 bytes.
pub fn decode_uint(data: &[u8]) -> Result<Option<u64>, CodecError> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() > 8 {
        return Err(CodecError::InvalidData(format!(
            "{} byte unsigned integer",
            data.len()
        )));
    }
    Ok(Some(
        data.iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)),
    ))
}

/// Decodes an enumerated value; empty content is blank.
///
/// # Errors
/// Returns `CodecError::InvalidData` for content longer than 2 bytes.
pub fn decode_enum(data: &[u8]) -> Result<Option<u16>, CodecError> {
    if data.len() > 2 {
        return Err(CodecError::InvalidData(format!(
            "{} byte enum",
            data.len()
        )));
    }
    Ok(decode_uint(data)?.map(|value| value as u16))
}

/// Writes a [`Real`]: nothing for blank, a single hint byte for sentinels,
/// otherwise the hint byte followed by a minimal mantissa.
pub fn encode_real(out: &mut impl BufMut, value: &Real) {
    if value.is_blank() {
        return;
    }
    out.put_u8(value.hint().code());
    if !value.hint().is_sentinel() {
        encode_int(out, value.mantissa());
    }
}

/// Decodes a [`Real`].
///
/// Arbitrary content never panics: unknown or reserved hints yield an error.
///
/// # Errors
/// Returns `CodecError::InvalidArgument` for a reserved hint or content longer
/// than 9 bytes.
pub fn decode_real(data: &[u8]) -> Result<Real, CodecError> {
    match data.len() {
        0 => Ok(Real::blank()),
        1 => match RealHint::from_code(data[0] & 0x3F) {
            Some(hint) if hint.is_sentinel() => Ok(Real::new(0, hint)),
            _ => Ok(Real::blank()),
        },
        2..=9 => {
            if data[0] & 0x20 != 0 {
                return Ok(Real::blank());
            }
            let mantissa = decode_int(&data[1..])?.unwrap_or(0);
            Real::from_parts(mantissa, data[0] & 0x1F)
        }
        len => Err(CodecError::InvalidArgument(format!(
            "{len} bytes is too long for a real"
        ))),
    }
}

/// Writes a [`Date`] as day, month and big-endian year; blank writes nothing.
pub fn encode_date(out: &mut impl BufMut, value: &Date) {
    if value.is_blank() {
        return;
    }
    out.put_u8(value.day);
    out.put_u8(value.month);
    out.put_u16(value.year);
}

/// Decodes a [`Date`].
///
/// # Errors
/// Returns `CodecError::InvalidData` unless the content is empty or 4 bytes.
pub fn decode_date(data: &[u8]) -> Result<Date, CodecError> {
    match data {
        [] => Ok(Date::blank()),
        [day, month, year_hi, year_lo] => Ok(Date::new(
            u16::from_be_bytes([*year_hi, *year_lo]),
            *month,
            *day,
        )),
        _ => Err(CodecError::InvalidData(format!(
            "{} byte date",
            data.len()
        ))),
    }
}

/// Writes an integer in exactly `width` bytes.
///
/// # Errors
/// Returns `CodecError::InvalidArgument` if the value kind does not match the
/// signedness or the value does not fit.
pub fn encode_fixed(
    out: &mut impl BufMut,
    value: &Value<'_>,
    width: usize,
    signed: bool,
) -> Result<(), CodecError> {
    let bits = (width * 8) as u32;
    let mismatch = || {
        CodecError::InvalidArgument(format!(
            "{value:?} cannot be written as a {width} byte {} integer",
            if signed { "signed" } else { "unsigned" }
        ))
    };
    let raw = if signed {
        let Value::Int(v) = value else {
            return Err(mismatch());
        };
        if bits < 64 && !(-(1i64 << (bits - 1))..(1i64 << (bits - 1))).contains(v) {
            return Err(out_of_range(*v, width));
        }
        *v as u64
    } else {
        let v = value.as_unsigned().ok_or_else(mismatch)?;
        if bits < 64 && v >= (1u64 << bits) {
            return Err(out_of_range(v, width));
        }
        v
    };
    out.put_slice(&raw.to_be_bytes()[8 - width..]);
    Ok(())
}

fn out_of_range(value: impl std::fmt::Display, width: usize) -> CodecError {
    CodecError::InvalidArgument(format!("{value} does not fit in {width} bytes"))
}

/// Writes `value` in its variable-length form for `data_type`.
///
/// # Errors
/// Returns `CodecError::InvalidArgument` if the value kind does not match
/// the data type, or `CodecError::UnsupportedDataType` for types this codec
/// does not carry.
pub fn encode_value(
    out: &mut impl BufMut,
    value: &Value<'_>,
    data_type: DataType,
) -> Result<(), CodecError> {
    match (data_type.primitive_base(), value) {
        (_, Value::Blank) if !data_type.is_container() => {}
        (DataType::Int, Value::Int(v)) => encode_int(out, *v),
        (DataType::Uint, Value::Uint(v)) => encode_uint(out, *v),
        (DataType::Enum, Value::Enum(v)) => encode_uint(out, u64::from(*v)),
        (DataType::Real, Value::Real(v)) => encode_real(out, v),
        (DataType::Date, Value::Date(v)) => encode_date(out, v),
        (
            DataType::AsciiString | DataType::Utf8String | DataType::RmtesString | DataType::Buffer,
            Value::Ascii(text),
        ) => out.put_slice(text.as_bytes()),
        (
            DataType::AsciiString | DataType::Utf8String | DataType::RmtesString | DataType::Buffer,
            Value::Buffer(bytes),
        ) => out.put_slice(bytes),
        (
            DataType::Int
            | DataType::Uint
            | DataType::Enum
            | DataType::Real
            | DataType::Date
            | DataType::AsciiString
            | DataType::Utf8String
            | DataType::RmtesString
            | DataType::Buffer,
            _,
        ) => {
            return Err(CodecError::InvalidArgument(format!(
                "{value:?} does not match data type {data_type}"
            )));
        }
        _ => return Err(CodecError::UnsupportedDataType(data_type.code())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_bytes(value: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_int(&mut out, value);
        out
    }

    #[test]
    fn test_encode_int_minimal() {
        assert_eq!(int_bytes(0), vec![0x00]);
        assert_eq!(int_bytes(127), vec![0x7F]);
        assert_eq!(int_bytes(128), vec![0x00, 0x80]);
        assert_eq!(int_bytes(-1), vec![0xFF]);
        assert_eq!(int_bytes(-129), vec![0xFF, 0x7F]);
        assert_eq!(int_bytes(i64::MIN).len(), 8);
    }

    #[test]
    fn test_decode_int_sign_extends() {
        assert_eq!(decode_int(&[0xFF, 0x7F]).unwrap(), Some(-129));
        assert_eq!(decode_int(&[0x00, 0x80]).unwrap(), Some(128));
        assert_eq!(decode_int(&[]).unwrap(), None);
        assert!(decode_int(&[0; 9]).is_err());
        assert_eq!(
            decode_int(&int_bytes(i64::MAX)).unwrap(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_uint_and_enum() {
        let mut out = Vec::new();
        encode_uint(&mut out, 0);
        assert_eq!(out, vec![0x00]);
        out.clear();
        encode_uint(&mut out, 0x1234);
        assert_eq!(out, vec![0x12, 0x34]);
        assert_eq!(decode_uint(&out).unwrap(), Some(0x1234));
        assert_eq!(decode_enum(&out).unwrap(), Some(0x1234));
        assert!(decode_enum(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_length_prefixes() {
        let mut out = Vec::new();
        put_u15rb(&mut out, 0x7F).unwrap();
        put_u15rb(&mut out, 0x1234).unwrap();
        put_u16ob(&mut out, 0xFD);
        put_u16ob(&mut out, 0x0100);
        put_u30rb(&mut out, 0x3F).unwrap();
        put_u30rb(&mut out, 0x1234).unwrap();
        put_u30rb(&mut out, 0x12_3456).unwrap();
        put_u30rb(&mut out, 0x1234_5678).unwrap();
        assert!(put_u15rb(&mut Vec::new(), 0x8000).is_err());
        assert!(put_u30rb(&mut Vec::new(), 0x4000_0000).is_err());

        let mut offset = 0;
        assert_eq!(read_u15rb(&out, &mut offset).unwrap(), 0x7F);
        assert_eq!(read_u15rb(&out, &mut offset).unwrap(), 0x1234);
        assert_eq!(read_u16ob(&out, &mut offset).unwrap(), 0xFD);
        assert_eq!(read_u16ob(&out, &mut offset).unwrap(), 0x0100);
        assert_eq!(read_u30rb(&out, &mut offset).unwrap(), 0x3F);
        assert_eq!(read_u30rb(&out, &mut offset).unwrap(), 0x1234);
        assert_eq!(read_u30rb(&out, &mut offset).unwrap(), 0x12_3456);
        assert_eq!(read_u30rb(&out, &mut offset).unwrap(), 0x1234_5678);
        assert_eq!(offset, out.len());
        assert_eq!(
            read_u16(&out, &mut offset),
            Err(CodecError::IncompleteData)
        );
    }

    #[test]
    fn test_real_wire_forms() {
        let mut out = Vec::new();
        encode_real(&mut out, &Real::new(-5, RealHint::ExponentMinus2));
        assert_eq!(out, vec![12, 0xFB]);
        assert_eq!(
            decode_real(&out).unwrap(),
            Real::new(-5, RealHint::ExponentMinus2)
        );

        out.clear();
        encode_real(&mut out, &Real::blank());
        assert!(out.is_empty());
        assert!(decode_real(&out).unwrap().is_blank());

        out.clear();
        encode_real(&mut out, &Real::nan());
        assert_eq!(out, vec![35]);
        assert_eq!(decode_real(&out).unwrap().hint(), RealHint::NotANumber);

        out.clear();
        encode_real(&mut out, &Real::new(0, RealHint::Exponent0));
        assert_eq!(out, vec![14, 0x00]);
        assert!(!decode_real(&out).unwrap().is_blank());
    }

    #[test]
    fn test_decode_real_rejects_reserved_hints() {
        assert!(matches!(
            decode_real(&[31, 0x01]),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(decode_real(&[0x20 | 3, 0x01]).unwrap().is_blank());
        assert!(decode_real(&[14]).unwrap().is_blank());
        assert!(decode_real(&[0; 10]).is_err());
    }

    #[test]
    fn test_exponent_hints_keep_mantissa() {
        for code in 0..=21u8 {
            let hint = RealHint::from_code(code).unwrap();
            let value = Real::new(123_456_789, hint);
            let mut out = Vec::new();
            encode_real(&mut out, &value);
            let decoded = decode_real(&out).unwrap();
            assert_eq!(decoded.to_i64(), 123_456_789);
            assert_eq!(decoded.hint(), hint);
        }
    }

    #[test]
    fn test_date_bytes_as_real_never_panic() {
        for day in 0..=31u8 {
            for month in [1u8, 6, 12] {
                let mut out = Vec::new();
                encode_date(&mut out, &Date::new(2013, month, day));
                let result = decode_real(&out);
                if day == 31 {
                    assert!(matches!(result, Err(CodecError::InvalidArgument(_))));
                }
            }
        }
    }

    #[test]
    fn test_date_round_trip() {
        let mut out = Vec::new();
        encode_date(&mut out, &Date::new(2024, 12, 25));
        assert_eq!(out, vec![25, 12, 0x07, 0xE8]);
        assert_eq!(decode_date(&out).unwrap(), Date::new(2024, 12, 25));
        assert!(decode_date(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_encode_fixed_ranges() {
        let mut out = Vec::new();
        encode_fixed(&mut out, &Value::Int(-2), 2, true).unwrap();
        assert_eq!(out, vec![0xFF, 0xFE]);
        out.clear();
        encode_fixed(&mut out, &Value::Uint(200), 1, false).unwrap();
        assert_eq!(out, vec![200]);
        assert!(encode_fixed(&mut out, &Value::Int(40_000), 2, true).is_err());
        assert!(encode_fixed(&mut out, &Value::Uint(256), 1, false).is_err());
        assert!(encode_fixed(&mut out, &Value::Ascii("x"), 1, false).is_err());
    }

    #[test]
    fn test_encode_value_type_checks() {
        let mut out = Vec::new();
        encode_value(&mut out, &Value::Ascii("BID"), DataType::AsciiString).unwrap();
        assert_eq!(out, b"BID".to_vec());
        assert!(encode_value(&mut out, &Value::Int(1), DataType::AsciiString).is_err());
        assert!(matches!(
            encode_value(&mut out, &Value::Int(1), DataType::Qos),
            Err(CodecError::UnsupportedDataType(12))
        ));
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core wire types for RWF operations.
//!
//! This module provides the enumerations and small value types shared by the
//! codec and the dictionary:
//! - [`DataType`]: Wire data type codes (primitives, set types, containers)
//! - [`MfFieldType`]: Legacy display field type of a dictionary entry
//! - [`Verbosity`]: Dictionary encode detail level
//! - [`DictionaryType`]: Which half of the dictionary a payload carries
//! - [`Date`]: Calendar date primitive

use chrono::{Datelike, NaiveDate};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RWF data type code.
///
/// Codes below 64 are primitives, 64..128 are the fixed-width forms only
/// allowed inside set definitions, and 128 and above are containers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Unknown or unset.
    Unknown = 0,
    /// Signed integer.
    Int = 3,
    /// Unsigned integer.
    Uint = 4,
    /// 4-byte IEEE float.
    Float = 5,
    /// 8-byte IEEE double.
    Double = 6,
    /// Scaled decimal.
    Real = 8,
    /// Calendar date.
    Date = 9,
    /// Time of day.
    Time = 10,
    /// Date and time.
    DateTime = 11,
    /// Quality of service.
    Qos = 12,
    /// Stream and data state.
    State = 13,
    /// Enumerated value.
    Enum = 14,
    /// Array of primitives.
    Array = 15,
    /// Opaque byte buffer.
    Buffer = 16,
    /// ASCII string.
    AsciiString = 17,
    /// UTF-8 string.
    Utf8String = 18,
    /// RMTES string.
    RmtesString = 19,
    /// 1-byte signed integer (set definitions only).
    Int1 = 64,
    /// 1-byte unsigned integer (set definitions only).
    Uint1 = 65,
    /// 2-byte signed integer (set definitions only).
    Int2 = 66,
    /// 2-byte unsigned integer (set definitions only).
    Uint2 = 67,
    /// 4-byte signed integer (set definitions only).
    Int4 = 68,
    /// 4-byte unsigned integer (set definitions only).
    Uint4 = 69,
    /// 8-byte signed integer (set definitions only).
    Int8 = 70,
    /// 8-byte unsigned integer (set definitions only).
    Uint8 = 71,
    /// 4-byte float (set definitions only).
    Float4 = 72,
    /// 8-byte double (set definitions only).
    Double8 = 73,
    /// Real with 4-byte mantissa (set definitions only).
    Real4Rb = 74,
    /// Real with 8-byte mantissa (set definitions only).
    Real8Rb = 75,
    /// 4-byte date (set definitions only).
    Date4 = 76,
    /// 3-byte time (set definitions only).
    Time3 = 77,
    /// 5-byte time (set definitions only).
    Time5 = 78,
    /// 7-byte date time (set definitions only).
    DateTime7 = 79,
    /// 9-byte date time (set definitions only).
    DateTime9 = 80,
    /// 11-byte date time (set definitions only).
    DateTime11 = 81,
    /// 12-byte date time (set definitions only).
    DateTime12 = 82,
    /// 7-byte time (set definitions only).
    Time7 = 83,
    /// 8-byte time (set definitions only).
    Time8 = 84,
    /// Empty container.
    NoData = 128,
    /// Opaque container.
    Opaque = 130,
    /// XML container.
    Xml = 131,
    /// Field list container.
    FieldList = 132,
    /// Element list container.
    ElementList = 133,
    /// ANSI page container.
    AnsiPage = 134,
    /// Filter list container.
    FilterList = 135,
    /// Vector container.
    Vector = 136,
    /// Map container.
    Map = 137,
    /// Series container.
    Series = 138,
    /// Nested message.
    Msg = 141,
    /// JSON container.
    Json = 142,
}

impl DataType {
    /// Creates a data type from its wire code.
    ///
    /// # Returns
    /// `Some(DataType)` if the code is known, `None` otherwise.
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

    /// Returns true for container types.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        (self as u8) >= 128
    }

    /// Returns true for fixed-width set-definition types.
    #[inline]
    #[must_use]
    pub const fn is_set_type(self) -> bool {
        let code = self as u8;
        code >= 64 && code < 128
    }

    /// Maps a set-definition type to the primitive it carries.
    ///
    /// Non-set types are returned unchanged.
    #[must_use]
    pub const fn primitive_base(self) -> Self {
        match self {
            Self::Int1 | Self::Int2 | Self::Int4 | Self::Int8 => Self::Int,
            Self::Uint1 | Self::Uint2 | Self::Uint4 | Self::Uint8 => Self::Uint,
            Self::Float4 => Self::Float,
            Self::Double8 => Self::Double,
            Self::Real4Rb | Self::Real8Rb => Self::Real,
            Self::Date4 => Self::Date,
            Self::Time3 | Self::Time5 | Self::Time7 | Self::Time8 => Self::Time,
            Self::DateTime7 | Self::DateTime9 | Self::DateTime11 | Self::DateTime12 => {
                Self::DateTime
            }
            other => other,
        }
    }

    /// Returns the raw byte width of a fixed-width integer set type.
    ///
    /// Other set types are written length-prefixed and return `None`.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Int1 | Self::Uint1 => Some(1),
            Self::Int2 | Self::Uint2 => Some(2),
            Self::Int4 | Self::Uint4 => Some(4),
            Self::Int8 | Self::Uint8 => Some(8),
            _ => None,
        }
    }

    /// Returns the name used in dictionary files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Int | Self::Int1 | Self::Int2 | Self::Int4 | Self::Int8 => "INT",
            Self::Uint | Self::Uint1 | Self::Uint2 | Self::Uint4 | Self::Uint8 => "UINT",
            Self::Float | Self::Float4 => "FLOAT",
            Self::Double | Self::Double8 => "DOUBLE",
            Self::Real | Self::Real4Rb | Self::Real8Rb => "REAL",
            Self::Date | Self::Date4 => "DATE",
            Self::Time | Self::Time3 | Self::Time5 | Self::Time7 | Self::Time8 => "TIME",
            Self::DateTime
            | Self::DateTime7
            | Self::DateTime9
            | Self::DateTime11
            | Self::DateTime12 => "DATETIME",
            Self::Qos => "QOS",
            Self::State => "STATE",
            Self::Enum => "ENUM",
            Self::Array => "ARRAY",
            Self::Buffer => "BUFFER",
            Self::AsciiString => "ASCII_STRING",
            Self::Utf8String => "UTF8_STRING",
            Self::RmtesString => "RMTES_STRING",
            Self::NoData => "NO_DATA",
            Self::Opaque => "OPAQUE",
            Self::Xml => "XML",
            Self::FieldList => "FIELD_LIST",
            Self::ElementList => "ELEMENT_LIST",
            Self::AnsiPage => "ANSI_PAGE",
            Self::FilterList => "FILTER_LIST",
            Self::Vector => "VECTOR",
            Self::Map => "MAP",
            Self::Series => "SERIES",
            Self::Msg => "MSG",
            Self::Json => "JSON",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for DataType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(value)
    }
}

/// Legacy display field type of a dictionary entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(i8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MfFieldType {
    /// Time with seconds.
    TimeSeconds = -1,
    /// Integer.
    Integer = 0,
    /// Date.
    Date = 1,
    /// Price.
    Price = 2,
    /// Alphanumeric text.
    Alphanumeric = 3,
    /// Time of day.
    Time = 4,
    /// Enumerated.
    Enumerated = 5,
    /// Binary.
    Binary = 6,
    /// No type.
    #[default]
    None = 7,
}

impl MfFieldType {
    /// Creates a field type from its numeric code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::from_i64(code)
    }

    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Returns the name used in dictionary files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TimeSeconds => "TIME_SECONDS",
            Self::Integer => "INTEGER",
            Self::Date => "DATE",
            Self::Price => "PRICE",
            Self::Alphanumeric => "ALPHANUMERIC",
            Self::Time => "TIME",
            Self::Enumerated => "ENUMERATED",
            Self::Binary => "BINARY",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for MfFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dictionary encode detail level.
///
/// Levels are ordered: each one includes everything the lower ones carry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Summary tags only.
    Info = 0,
    /// Rows with the core columns.
    Minimal = 3,
    /// Rows with all columns.
    #[default]
    Normal = 7,
    /// Rows with all columns plus enum meanings.
    Verbose = 11,
}

impl Verbosity {
    /// Creates a verbosity from its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }
}

/// Which half of the dictionary a payload carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum DictionaryType {
    /// Field definitions.
    FieldDefinitions = 1,
    /// Enumerated type tables.
    EnumTables = 2,
}

impl DictionaryType {
    /// Creates a dictionary type from the value of a `Type` tag.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::from_i64(code)
    }

    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Calendar date primitive.
///
/// A date with every component zero is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Date {
    /// Year (0 = unset).
    pub year: u16,
    /// Month 1..=12 (0 = unset).
    pub month: u8,
    /// Day of month 1..=31 (0 = unset).
    pub day: u8,
}

impl Date {
    /// Creates a date from its components without validation.
    #[inline]
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns the blank date.
    #[inline]
    #[must_use]
    pub const fn blank() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns true if every component is zero.
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Converts to a chrono date.
    ///
    /// # Returns
    /// `None` for blank or calendar-invalid dates.
    #[must_use]
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, i32::from(u16::MAX)) as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return Ok(());
        }
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_from_code() {
        assert_eq!(DataType::from_code(8), Some(DataType::Real));
        assert_eq!(DataType::from_code(133), Some(DataType::ElementList));
        assert_eq!(DataType::from_code(1), None);
        assert_eq!(DataType::try_from(200), Err(200));
    }

    #[test]
    fn test_data_type_primitive_base() {
        assert_eq!(DataType::Int2.primitive_base(), DataType::Int);
        assert_eq!(DataType::Uint1.primitive_base(), DataType::Uint);
        assert_eq!(DataType::Real8Rb.primitive_base(), DataType::Real);
        assert_eq!(DataType::AsciiString.primitive_base(), DataType::AsciiString);
    }

    #[test]
    fn test_data_type_classes() {
        assert!(DataType::Series.is_container());
        assert!(!DataType::Enum.is_container());
        assert!(DataType::Int2.is_set_type());
        assert_eq!(DataType::Uint2.fixed_width(), Some(2));
        assert_eq!(DataType::Real4Rb.fixed_width(), None);
    }

    #[test]
    fn test_mf_field_type_codes() {
        assert_eq!(MfFieldType::from_code(-1), Some(MfFieldType::TimeSeconds));
        assert_eq!(MfFieldType::from_code(5), Some(MfFieldType::Enumerated));
        assert_eq!(MfFieldType::from_code(42), None);
        assert_eq!(MfFieldType::Price.code(), 2);
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Info < Verbosity::Minimal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert_eq!(Verbosity::from_code(7), Some(Verbosity::Normal));
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_dictionary_type_codes() {
        assert_eq!(
            DictionaryType::from_code(1),
            Some(DictionaryType::FieldDefinitions)
        );
        assert_eq!(DictionaryType::from_code(2), Some(DictionaryType::EnumTables));
        assert_eq!(DictionaryType::from_code(3), None);
    }

    #[test]
    fn test_date_chrono_conversion() {
        let date = Date::new(2024, 2, 29);
        let naive = date.to_naive_date();
        assert_eq!(naive, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(Date::from(naive.unwrap()), date);
        assert!(Date::new(2023, 2, 30).to_naive_date().is_none());
    }

    #[test]
    fn test_date_display() {
        assert_eq!(Date::new(2010, 3, 7).to_string(), "2010-03-07");
        assert_eq!(Date::blank().to_string(), "");
    }
}

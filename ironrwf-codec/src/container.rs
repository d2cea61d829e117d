/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Container descriptors and entry values.
//!
//! This module defines the headers handed to the encoder when a container is
//! opened:
//! - [`Series`]: Uniform list of entries with optional set definitions,
//!   summary data and a total count hint
//! - [`ElementList`]: Named, self-typed entries, optionally driven by a set
//!   definition
//! - [`Array`]: Homogeneous primitive items
//!
//! and the [`Value`] carried by element and array entries.

use ironrwf_core::{DataType, Date, Real};
use serde::{Deserialize, Serialize};

/// Result of encoding an element entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Entry written.
    Success,
    /// Entry written and it was the last one of the set definition.
    SetComplete,
}

/// Value of an element or array entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Blank value of any primitive type.
    Blank,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Enumerated value.
    Enum(u16),
    /// Scaled decimal.
    Real(Real),
    /// Calendar date.
    Date(Date),
    /// ASCII text.
    Ascii(&'a str),
    /// Raw bytes.
    Buffer(&'a [u8]),
}

impl Value<'_> {
    /// Returns the data type written for this value in standard entries.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Blank => DataType::Unknown,
            Self::Int(_) => DataType::Int,
            Self::Uint(_) => DataType::Uint,
            Self::Enum(_) => DataType::Enum,
            Self::Real(_) => DataType::Real,
            Self::Date(_) => DataType::Date,
            Self::Ascii(_) => DataType::AsciiString,
            Self::Buffer(_) => DataType::Buffer,
        }
    }

    /// Returns unsigned and enum values widened to `u64`.
    #[must_use]
    pub const fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Enum(v) => Some(*v as u64),
            _ => None,
        }
    }
}

/// Series header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Presence flags.
    pub flags: u8,
    /// Container type of every entry.
    pub container_type: DataType,
    /// Expected total number of entries across all parts.
    pub total_count_hint: u32,
}

impl Series {
    /// A local set-definition database follows the header.
    pub const HAS_SET_DEFS: u8 = 0x01;
    /// Summary data follows the set definitions.
    pub const HAS_SUMMARY_DATA: u8 = 0x02;
    /// A total count hint precedes the entries.
    pub const HAS_TOTAL_COUNT_HINT: u8 = 0x04;

    /// Creates a series header for entries of `container_type`.
    #[must_use]
    pub const fn new(container_type: DataType) -> Self {
        Self {
            flags: 0,
            container_type,
            total_count_hint: 0,
        }
    }

    /// Adds a local set-definition database.
    #[must_use]
    pub const fn with_set_defs(mut self) -> Self {
        self.flags |= Self::HAS_SET_DEFS;
        self
    }

    /// Adds summary data.
    #[must_use]
    pub const fn with_summary_data(mut self) -> Self {
        self.flags |= Self::HAS_SUMMARY_DATA;
        self
    }

    /// Adds a total count hint.
    #[must_use]
    pub const fn with_total_count_hint(mut self, hint: u32) -> Self {
        self.flags |= Self::HAS_TOTAL_COUNT_HINT;
        self.total_count_hint = hint;
        self
    }

    /// Returns true if set definitions are present.
    #[inline]
    #[must_use]
    pub const fn has_set_defs(&self) -> bool {
        self.flags & Self::HAS_SET_DEFS != 0
    }

    /// Returns true if summary data is present.
    #[inline]
    #[must_use]
    pub const fn has_summary_data(&self) -> bool {
        self.flags & Self::HAS_SUMMARY_DATA != 0
    }

    /// Returns true if a total count hint is present.
    #[inline]
    #[must_use]
    pub const fn has_total_count_hint(&self) -> bool {
        self.flags & Self::HAS_TOTAL_COUNT_HINT != 0
    }
}

/// Element list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementList {
    /// Presence flags.
    pub flags: u8,
    /// Application list number, written with `HAS_ELEMENT_LIST_INFO`.
    pub list_number: u16,
    /// Set definition driving the set data, written with `HAS_SET_ID`.
    pub set_id: u16,
}

impl ElementList {
    /// List info (list number) is present.
    pub const HAS_ELEMENT_LIST_INFO: u8 = 0x01;
    /// Set-defined data is present.
    pub const HAS_SET_DATA: u8 = 0x02;
    /// An explicit set id is present; otherwise set 0 is used.
    pub const HAS_SET_ID: u8 = 0x04;
    /// Standard named entries are present.
    pub const HAS_STANDARD_DATA: u8 = 0x08;

    /// Creates a list carrying standard entries only.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            flags: Self::HAS_STANDARD_DATA,
            list_number: 0,
            set_id: 0,
        }
    }

    /// Creates a list carrying set data for `set_id`.
    #[must_use]
    pub const fn set_data(set_id: u16) -> Self {
        Self {
            flags: Self::HAS_SET_DATA | Self::HAS_SET_ID,
            list_number: 0,
            set_id,
        }
    }

    /// Adds standard entries after the set data.
    #[must_use]
    pub const fn with_standard_data(mut self) -> Self {
        self.flags |= Self::HAS_STANDARD_DATA;
        self
    }

    /// Adds list info.
    #[must_use]
    pub const fn with_list_number(mut self, list_number: u16) -> Self {
        self.flags |= Self::HAS_ELEMENT_LIST_INFO;
        self.list_number = list_number;
        self
    }

    /// Returns true if set data is present.
    #[inline]
    #[must_use]
    pub const fn has_set_data(&self) -> bool {
        self.flags & Self::HAS_SET_DATA != 0
    }

    /// Returns true if standard data is present.
    #[inline]
    #[must_use]
    pub const fn has_standard_data(&self) -> bool {
        self.flags & Self::HAS_STANDARD_DATA != 0
    }
}

/// Array header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Array {
    /// Type of every item.
    pub primitive_type: DataType,
    /// Fixed item width in bytes, 0 for length-prefixed items.
    pub item_length: u8,
}

impl Array {
    /// Creates an array of length-prefixed items.
    #[must_use]
    pub const fn new(primitive_type: DataType) -> Self {
        Self {
            primitive_type,
            item_length: 0,
        }
    }

    /// Sets a fixed item width.
    #[must_use]
    pub const fn with_item_length(mut self, item_length: u8) -> Self {
        self.item_length = item_length;
        self
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field definitions.
//!
//! A [`DictionaryEntry`] describes one field id: its acronyms, legacy
//! display type, wire type and lengths, and the field it ripples to.

use ironrwf_core::{DataType, MfFieldType};
use serde::{Deserialize, Serialize};

/// Smallest field id.
pub const MIN_FID: i16 = i16::MIN;

/// Largest field id.
pub const MAX_FID: i16 = i16::MAX;

/// Definition of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Field id, never 0.
    pub fid: i16,
    /// Short field name.
    pub acronym: String,
    /// Long display name.
    pub dde_acronym: String,
    /// Legacy display type.
    pub field_type: MfFieldType,
    /// Display length.
    pub length: u16,
    /// Digits needed for the largest enum value, 0 if not enumerated.
    pub enum_length: u8,
    /// Wire type.
    pub rwf_type: DataType,
    /// Encoded length.
    pub rwf_length: u16,
    /// Field whose value moves here on a ripple, 0 for none.
    pub ripple_to_field: i16,
    /// Index of the enum table this field uses.
    pub(crate) enum_table: Option<usize>,
}

impl DictionaryEntry {
    /// Creates an entry.
    ///
    /// # Arguments
    /// * `fid` - Field id
    /// * `acronym` - Short field name
    /// * `rwf_type` - Wire type
    #[must_use]
    pub fn new(fid: i16, acronym: impl Into<String>, rwf_type: DataType) -> Self {
        Self {
            fid,
            acronym: acronym.into(),
            dde_acronym: String::new(),
            field_type: MfFieldType::None,
            length: 0,
            enum_length: 0,
            rwf_type,
            rwf_length: 0,
            ripple_to_field: 0,
            enum_table: None,
        }
    }

    /// Creates the entry an enum table makes for a fid not defined yet.
    pub(crate) fn placeholder(fid: i16, acronym: &str, enum_table: usize) -> Self {
        Self {
            enum_table: Some(enum_table),
            ..Self::new(fid, acronym, DataType::Unknown)
        }
    }

    /// Sets the long display name.
    #[must_use]
    pub fn with_dde_acronym(mut self, dde_acronym: impl Into<String>) -> Self {
        self.dde_acronym = dde_acronym.into();
        self
    }

    /// Sets the legacy display type.
    #[must_use]
    pub const fn with_field_type(mut self, field_type: MfFieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Sets the display length.
    #[must_use]
    pub const fn with_length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    /// Sets the enum length.
    #[must_use]
    pub const fn with_enum_length(mut self, enum_length: u8) -> Self {
        self.enum_length = enum_length;
        self
    }

    /// Sets the encoded length.
    #[must_use]
    pub const fn with_rwf_length(mut self, rwf_length: u16) -> Self {
        self.rwf_length = rwf_length;
        self
    }

    /// Sets the ripple target.
    #[must_use]
    pub const fn with_ripple_to_field(mut self, fid: i16) -> Self {
        self.ripple_to_field = fid;
        self
    }

    /// Returns true for an entry created by an enum table only.
    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.rwf_type == DataType::Unknown
    }

    /// Returns the index of the enum table this field uses.
    #[inline]
    #[must_use]
    pub const fn enum_table_index(&self) -> Option<usize> {
        self.enum_table
    }

    /// Copies the field columns of `other` into a placeholder, keeping its
    /// enum table reference.
    pub(crate) fn fill_from(&mut self, other: Self) {
        let enum_table = self.enum_table;
        *self = Self {
            enum_table,
            ..other
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let entry = DictionaryEntry::new(22, "BID", DataType::Real)
            .with_dde_acronym("BID")
            .with_field_type(MfFieldType::Price)
            .with_length(17)
            .with_rwf_length(8)
            .with_ripple_to_field(23);
        assert_eq!(entry.fid, 22);
        assert_eq!(entry.field_type, MfFieldType::Price);
        assert_eq!(entry.ripple_to_field, 23);
        assert!(!entry.is_placeholder());
        assert_eq!(entry.enum_table_index(), None);
    }

    #[test]
    fn test_fill_keeps_enum_table() {
        let mut placeholder = DictionaryEntry::placeholder(4, "RDN_EXCHID", 3);
        assert!(placeholder.is_placeholder());
        placeholder.fill_from(
            DictionaryEntry::new(4, "RDN_EXCHID", DataType::Enum).with_enum_length(3),
        );
        assert!(!placeholder.is_placeholder());
        assert_eq!(placeholder.enum_table_index(), Some(3));
        assert_eq!(placeholder.enum_length, 3);
    }
}

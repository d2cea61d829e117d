/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Enumerated value tables.

use bytes::Bytes;
use ironrwf_core::DictionaryError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One enumerated value and how it is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    /// Numeric value carried on the wire.
    pub value: u16,
    /// Display text, or raw bytes for hex displays.
    pub display: Bytes,
    /// Free-text meaning.
    pub meaning: String,
}

impl EnumType {
    /// Creates an enum value.
    #[must_use]
    pub fn new(value: u16, display: impl Into<Bytes>) -> Self {
        Self {
            value,
            display: display.into(),
            meaning: String::new(),
        }
    }

    /// Sets the meaning.
    #[must_use]
    pub fn with_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = meaning.into();
        self
    }

    /// Returns the display as text when it is valid UTF-8.
    #[must_use]
    pub fn display_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.display).ok()
    }
}

/// Values shared by one or more enumerated fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeTable {
    values: Vec<Option<EnumType>>,
    fid_references: SmallVec<[i16; 4]>,
}

impl EnumTypeTable {
    /// Builds a table from its values.
    ///
    /// # Errors
    /// Returns `DictionaryError::DuplicateEnumValue` if a value repeats.
    pub fn from_values(
        enum_types: impl IntoIterator<Item = EnumType>,
    ) -> Result<Self, DictionaryError> {
        let mut values: Vec<Option<EnumType>> = Vec::new();
        for enum_type in enum_types {
            let index = usize::from(enum_type.value);
            if index >= values.len() {
                values.resize(index + 1, None);
            }
            if values[index].is_some() {
                return Err(DictionaryError::DuplicateEnumValue {
                    value: enum_type.value,
                });
            }
            values[index] = Some(enum_type);
        }
        Ok(Self {
            values,
            fid_references: SmallVec::new(),
        })
    }

    /// Returns the largest value present, 0 for an empty table.
    #[must_use]
    pub fn max_value(&self) -> u16 {
        self.values.len().saturating_sub(1) as u16
    }

    /// Returns the entry for `value`.
    #[must_use]
    pub fn enum_type(&self, value: u16) -> Option<&EnumType> {
        self.values.get(usize::from(value)).and_then(Option::as_ref)
    }

    /// Iterates present values in ascending order.
    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.values.iter().flatten()
    }

    /// Returns the number of values present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enum_types().count()
    }

    /// Returns true if the table has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Returns the fids using this table.
    #[must_use]
    pub fn fid_references(&self) -> &[i16] {
        &self.fid_references
    }

    pub(crate) fn set_fid_references(&mut self, fids: impl IntoIterator<Item = i16>) {
        self.fid_references = fids.into_iter().collect();
    }
}

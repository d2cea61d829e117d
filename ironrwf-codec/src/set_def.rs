/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Local element set-definition database.
//!
//! A set definition lists `(name, type)` slots so that element-list rows can
//! omit entry names and type bytes. A series carries up to
//! [`MAX_LOCAL_SET_DEFS`] of them ahead of its entries.

use arrayvec::ArrayVec;
use bytes::BufMut;
use ironrwf_core::{CodecError, DataType};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::primitive::{put_u15rb, read_slice, read_u15rb, read_u8, u15rb_len};

/// Maximum number of set definitions in a local database.
pub const MAX_LOCAL_SET_DEFS: usize = 16;

/// One slot of a set definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSetDefEntry {
    /// Element name.
    pub name: String,
    /// Wire type of the slot, possibly a fixed-width set type.
    pub data_type: DataType,
}

impl ElementSetDefEntry {
    /// Creates a slot.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of slots identified by a set id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSetDef {
    /// Set id, 0..16 for local definitions.
    pub set_id: u16,
    /// Slots in wire order.
    pub entries: SmallVec<[ElementSetDefEntry; 9]>,
}

impl ElementSetDef {
    /// Creates a definition from its slots.
    #[must_use]
    pub fn new(set_id: u16, entries: impl IntoIterator<Item = ElementSetDefEntry>) -> Self {
        Self {
            set_id,
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the definition has no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Local set-definition database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSetDefDb {
    definitions: ArrayVec<ElementSetDef, MAX_LOCAL_SET_DEFS>,
}

impl ElementSetDefDb {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing one with the same id.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if the set id is not a local id
    /// or the definition has more than 255 slots.
    pub fn add(&mut self, definition: ElementSetDef) -> Result<(), CodecError> {
        if usize::from(definition.set_id) >= MAX_LOCAL_SET_DEFS {
            return Err(CodecError::InvalidArgument(format!(
                "set id {} is not a local set id",
                definition.set_id
            )));
        }
        if definition.len() > usize::from(u8::MAX) {
            return Err(CodecError::InvalidArgument(format!(
                "set definition {} has {} slots",
                definition.set_id,
                definition.len()
            )));
        }
        if let Some(existing) = self
            .definitions
            .iter_mut()
            .find(|d| d.set_id == definition.set_id)
        {
            *existing = definition;
        } else {
            self.definitions.push(definition);
        }
        Ok(())
    }

    /// Returns the definition with `set_id`.
    #[must_use]
    pub fn definition(&self, set_id: u16) -> Option<&ElementSetDef> {
        self.definitions.iter().find(|d| d.set_id == set_id)
    }

    /// Returns all definitions.
    #[must_use]
    pub fn definitions(&self) -> &[ElementSetDef] {
        &self.definitions
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no definition is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Removes every definition.
    pub fn clear(&mut self) {
        self.definitions.clear();
    }

    /// Returns the encoded size in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + self
            .definitions
            .iter()
            .map(|d| {
                u15rb_len(d.set_id)
                    + 1
                    + d.entries
                        .iter()
                        .map(|e| u15rb_len(e.name.len() as u16) + e.name.len() + 1)
                        .sum::<usize>()
            })
            .sum::<usize>()
    }

    /// Writes the database.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if a name exceeds 32767 bytes.
    pub fn encode(&self, out: &mut impl BufMut) -> Result<(), CodecError> {
        out.put_u8(0);
        out.put_u8(self.definitions.len() as u8);
        for definition in &self.definitions {
            put_u15rb(out, definition.set_id)?;
            out.put_u8(definition.len() as u8);
            for entry in &definition.entries {
                let name_len = u16::try_from(entry.name.len()).map_err(|_| {
                    CodecError::InvalidArgument(format!("set entry name '{}' too long", entry.name))
                })?;
                put_u15rb(out, name_len)?;
                out.put_slice(entry.name.as_bytes());
                out.put_u8(entry.data_type.code());
            }
        }
        Ok(())
    }

    /// Reads a database.
    ///
    /// # Errors
    /// Returns `CodecError::IncompleteData` on truncation and
    /// `CodecError::InvalidData` for unknown types, non-UTF-8 names or too
    /// many definitions.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut offset = 0;
        let _flags = read_u8(data, &mut offset)?;
        let count = usize::from(read_u8(data, &mut offset)?);
        if count > MAX_LOCAL_SET_DEFS {
            return Err(CodecError::InvalidData(format!(
                "{count} local set definitions"
            )));
        }

        let mut db = Self::new();
        for _ in 0..count {
            let set_id = read_u15rb(data, &mut offset)?;
            let slots = usize::from(read_u8(data, &mut offset)?);
            let mut entries = SmallVec::with_capacity(slots);
            for _ in 0..slots {
                let name_len = usize::from(read_u15rb(data, &mut offset)?);
                let name = std::str::from_utf8(read_slice(data, &mut offset, name_len)?)
                    .map_err(|_| CodecError::InvalidData("set entry name is not utf-8".into()))?;
                let code = read_u8(data, &mut offset)?;
                let data_type = DataType::from_code(code)
                    .ok_or(CodecError::UnsupportedDataType(code))?;
                entries.push(ElementSetDefEntry::new(name, data_type));
            }
            db.add(ElementSetDef { set_id, entries })
                .map_err(|e| CodecError::InvalidData(e.to_string()))?;
        }
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> ElementSetDefDb {
        let mut db = ElementSetDefDb::new();
        db.add(ElementSetDef::new(
            0,
            [
                ElementSetDefEntry::new("NAME", DataType::AsciiString),
                ElementSetDefEntry::new("FID", DataType::Int2),
            ],
        ))
        .unwrap();
        db
    }

    #[test]
    fn test_encode_decode_db() {
        let db = sample_db();
        let mut out = Vec::new();
        db.encode(&mut out).unwrap();
        assert_eq!(out.len(), db.encoded_len());
        let decoded = ElementSetDefDb::decode(&out).unwrap();
        assert_eq!(decoded, db);
        assert_eq!(decoded.definition(0).unwrap().entries[1].data_type, DataType::Int2);
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut db = sample_db();
        db.add(ElementSetDef::new(0, [ElementSetDefEntry::new("X", DataType::Int)]))
            .unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.definition(0).unwrap().len(), 1);
    }

    #[test]
    fn test_add_rejects_global_id() {
        let mut db = ElementSetDefDb::new();
        assert!(db.add(ElementSetDef::new(16, [])).is_err());
        assert!(db.is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        let mut out = Vec::new();
        sample_db().encode(&mut out).unwrap();
        for len in 0..out.len() {
            assert_eq!(
                ElementSetDefDb::decode(&out[..len]),
                Err(CodecError::IncompleteData)
            );
        }
    }
}

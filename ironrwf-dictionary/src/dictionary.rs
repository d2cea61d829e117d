/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Data dictionary container.
//!
//! [`DataDictionary`] stores field definitions in a table indexed directly by
//! fid and the enum tables those fields share. Loaders and the decode engine
//! fill it through [`DataDictionary::add_field`] and
//! [`DataDictionary::add_table`]; the encode engine reads it back.

use std::fmt;

use ironrwf_core::{DataType, DictionaryError};
use serde::{Deserialize, Serialize};

use crate::entry::{DictionaryEntry, MAX_FID, MIN_FID};
use crate::enum_table::{EnumType, EnumTypeTable};

/// Maximum number of enum tables in one dictionary.
pub const MAX_ENUM_TABLES: usize = 2500;

const SLOT_COUNT: usize = 1 << 16;

/// Field dictionary tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// `Filename` tag.
    pub filename: String,
    /// `Desc` tag.
    pub description: String,
    /// `Version` tag.
    pub version: String,
    /// `Build` tag.
    pub build: String,
    /// `Date` tag.
    pub date: String,
}

/// Enum type dictionary tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumInfo {
    /// `Filename` tag.
    pub filename: String,
    /// `Desc` tag.
    pub description: String,
    /// `RT_Version` tag.
    pub rt_version: String,
    /// `DT_Version` tag.
    pub dt_version: String,
    /// `Date` tag.
    pub date: String,
}

/// Field definitions and enum tables.
#[derive(Debug, Clone)]
pub struct DataDictionary {
    entries: Vec<Option<DictionaryEntry>>,
    enum_tables: Vec<EnumTypeTable>,
    min_fid: i32,
    max_fid: i32,
    number_of_entries: usize,
    pub(crate) field_info: FieldInfo,
    pub(crate) enum_info: EnumInfo,
    dictionary_id: i64,
    initialized: bool,
}

impl Default for DataDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn slot(fid: i16) -> usize {
    (i32::from(fid) - i32::from(MIN_FID)) as usize
}

impl DataDictionary {
    /// Creates an empty, uninitialized dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![None; SLOT_COUNT],
            enum_tables: Vec::new(),
            min_fid: i32::from(MAX_FID) + 1,
            max_fid: i32::from(MIN_FID) - 1,
            number_of_entries: 0,
            field_info: FieldInfo::default(),
            enum_info: EnumInfo::default(),
            dictionary_id: 0,
            initialized: false,
        }
    }

    /// Drops every entry, table and tag.
    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
        self.enum_tables.clear();
        self.min_fid = i32::from(MAX_FID) + 1;
        self.max_fid = i32::from(MIN_FID) - 1;
        self.number_of_entries = 0;
        self.field_info = FieldInfo::default();
        self.enum_info = EnumInfo::default();
        self.dictionary_id = 0;
        self.initialized = false;
    }

    /// Returns true once a load or decode has succeeded.
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Runs `apply` on a copy and keeps the copy only if it succeeds.
    pub(crate) fn staged<T>(
        &mut self,
        apply: impl FnOnce(&mut Self) -> Result<T, DictionaryError>,
    ) -> Result<T, DictionaryError> {
        let mut staged = self.clone();
        let out = apply(&mut staged)?;
        *self = staged;
        Ok(out)
    }

    /// Returns the entry for `fid`, including enum-only placeholders.
    #[inline]
    #[must_use]
    pub fn entry(&self, fid: i16) -> Option<&DictionaryEntry> {
        self.entries[slot(fid)].as_ref()
    }

    pub(crate) fn entry_mut(&mut self, fid: i16) -> Option<&mut DictionaryEntry> {
        self.entries[slot(fid)].as_mut()
    }

    /// Looks up the display of `value` for an enumerated field.
    #[must_use]
    pub fn entry_enum_type(&self, entry: &DictionaryEntry, value: u16) -> Option<&EnumType> {
        entry
            .enum_table
            .and_then(|index| self.enum_tables.get(index))
            .and_then(|table| table.enum_type(value))
    }

    /// Returns the enum table `entry` uses.
    #[must_use]
    pub fn entry_enum_table(&self, entry: &DictionaryEntry) -> Option<&EnumTypeTable> {
        entry.enum_table.and_then(|index| self.enum_tables.get(index))
    }

    /// Returns all enum tables in insertion order.
    #[inline]
    #[must_use]
    pub fn enum_tables(&self) -> &[EnumTypeTable] {
        &self.enum_tables
    }

    /// Returns the number of enum tables.
    #[inline]
    #[must_use]
    pub fn enum_table_count(&self) -> usize {
        self.enum_tables.len()
    }

    /// Returns the field dictionary tags.
    #[inline]
    #[must_use]
    pub const fn field_info(&self) -> &FieldInfo {
        &self.field_info
    }

    /// Returns the enum type dictionary tags.
    #[inline]
    #[must_use]
    pub const fn enum_info(&self) -> &EnumInfo {
        &self.enum_info
    }

    /// Returns the dictionary id, 0 if none was given.
    #[inline]
    #[must_use]
    pub const fn dictionary_id(&self) -> i64 {
        self.dictionary_id
    }

    /// Records a `DictionaryId` tag.
    ///
    /// # Errors
    /// Returns `DictionaryError::DictionaryIdMismatch` if a different
    /// non-zero id is already set.
    pub(crate) fn apply_dictionary_id(&mut self, id: i64) -> Result<(), DictionaryError> {
        if id == 0 {
            return Ok(());
        }
        if self.dictionary_id != 0 && self.dictionary_id != id {
            return Err(DictionaryError::DictionaryIdMismatch {
                found: id,
                previous: self.dictionary_id,
            });
        }
        self.dictionary_id = id;
        Ok(())
    }

    /// Iterates stored entries in fid order, placeholders included.
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        let (low, high) = if self.min_fid <= self.max_fid {
            (
                (self.min_fid - i32::from(MIN_FID)) as usize,
                (self.max_fid - i32::from(MIN_FID)) as usize + 1,
            )
        } else {
            (0, 0)
        };
        self.entries[low..high].iter().flatten()
    }

    /// Finds a defined field by acronym.
    #[must_use]
    pub fn entry_by_acronym(&self, acronym: &str) -> Option<&DictionaryEntry> {
        self.entries()
            .find(|e| !e.is_placeholder() && e.acronym == acronym)
    }

    /// Returns the number of defined fields, placeholders excluded.
    #[inline]
    #[must_use]
    pub const fn number_of_entries(&self) -> usize {
        self.number_of_entries
    }

    /// Returns the smallest stored fid, or 32768 when empty.
    #[inline]
    #[must_use]
    pub const fn min_fid(&self) -> i32 {
        self.min_fid
    }

    /// Returns the largest stored fid, or -32769 when empty.
    #[inline]
    #[must_use]
    pub const fn max_fid(&self) -> i32 {
        self.max_fid
    }

    fn track_fid(&mut self, fid: i16) {
        let fid = i32::from(fid);
        self.min_fid = self.min_fid.min(fid);
        self.max_fid = self.max_fid.max(fid);
    }

    /// Adds a field definition.
    ///
    /// A placeholder left by an enum table takes the new columns and keeps
    /// its table reference.
    ///
    /// # Errors
    /// Returns `ReservedFid` for fid 0, `InvalidRwfType` for an entry of
    /// unknown wire type, `DuplicateFid` if the fid is already defined and
    /// `AcronymMismatch` if a placeholder was created under another name.
    pub fn add_field(&mut self, mut entry: DictionaryEntry) -> Result<(), DictionaryError> {
        let fid = entry.fid;
        if fid == 0 {
            return Err(DictionaryError::ReservedFid);
        }
        if entry.rwf_type == DataType::Unknown {
            return Err(DictionaryError::InvalidRwfType { fid });
        }
        let stored = &mut self.entries[slot(fid)];
        if let Some(existing) = stored.as_mut() {
            if !existing.is_placeholder() {
                return Err(DictionaryError::DuplicateFid { fid });
            }
            if !existing.acronym.is_empty() && existing.acronym != entry.acronym {
                return Err(DictionaryError::AcronymMismatch {
                    fid,
                    expected: existing.acronym.clone(),
                    found: entry.acronym,
                });
            }
            existing.fill_from(entry);
        } else {
            entry.enum_table = None;
            *stored = Some(entry);
        }
        self.number_of_entries += 1;
        self.track_fid(fid);
        Ok(())
    }

    /// Adds an enum table shared by `fids`.
    ///
    /// Each reference is a fid and the acronym it is known by in the enum
    /// file, or an empty string when unknown. Fids not defined yet get a
    /// placeholder entry of unknown wire type.
    ///
    /// # Returns
    /// The index of the new table.
    ///
    /// # Errors
    /// Returns `TooManyEnumTables`, `NoReferencingFids`, `ReservedFid`,
    /// `AcronymMismatch` or `DuplicateEnumReference`. Nothing is changed on
    /// error.
    pub fn add_table(
        &mut self,
        mut table: EnumTypeTable,
        fids: &[(i16, &str)],
    ) -> Result<usize, DictionaryError> {
        if self.enum_tables.len() >= MAX_ENUM_TABLES {
            return Err(DictionaryError::TooManyEnumTables {
                max: MAX_ENUM_TABLES,
            });
        }
        if fids.is_empty() {
            return Err(DictionaryError::NoReferencingFids);
        }
        for (i, &(fid, acronym)) in fids.iter().enumerate() {
            if fid == 0 {
                return Err(DictionaryError::ReservedFid);
            }
            if fids[..i].iter().any(|&(other, _)| other == fid) {
                return Err(DictionaryError::DuplicateEnumReference { fid });
            }
            if let Some(existing) = self.entry(fid) {
                if !acronym.is_empty() && existing.acronym != acronym {
                    return Err(DictionaryError::AcronymMismatch {
                        fid,
                        expected: existing.acronym.clone(),
                        found: acronym.to_string(),
                    });
                }
                if existing.enum_table.is_some() {
                    return Err(DictionaryError::DuplicateEnumReference { fid });
                }
            }
        }

        let index = self.enum_tables.len();
        for &(fid, acronym) in fids {
            let stored = &mut self.entries[slot(fid)];
            if let Some(existing) = stored.as_mut() {
                existing.enum_table = Some(index);
            } else {
                *stored = Some(DictionaryEntry::placeholder(fid, acronym, index));
                self.track_fid(fid);
            }
        }
        table.set_fid_references(fids.iter().map(|&(fid, _)| fid));
        self.enum_tables.push(table);
        Ok(index)
    }
}

impl fmt::Display for DataDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Data Dictionary Dump: MinFid={} MaxFid={} NumEntries {}\n",
            self.min_fid, self.max_fid, self.number_of_entries
        )?;
        writeln!(f, "Tags:\n  DictionaryId=\"{}\"\n", self.dictionary_id)?;
        let fi = &self.field_info;
        writeln!(f, "  [Field Dictionary Tags]")?;
        writeln!(f, "      Filename=\"{}\"", fi.filename)?;
        writeln!(f, "          Desc=\"{}\"", fi.description)?;
        writeln!(f, "       Version=\"{}\"", fi.version)?;
        writeln!(f, "         Build=\"{}\"", fi.build)?;
        writeln!(f, "          Date=\"{}\"\n", fi.date)?;
        let ei = &self.enum_info;
        writeln!(f, "  [Enum Type Dictionary Tags]")?;
        writeln!(f, "      Filename=\"{}\"", ei.filename)?;
        writeln!(f, "          Desc=\"{}\"", ei.description)?;
        writeln!(f, "    RT_Version=\"{}\"", ei.rt_version)?;
        writeln!(f, "    DT_Version=\"{}\"", ei.dt_version)?;
        writeln!(f, "          Date=\"{}\"\n", ei.date)?;

        writeln!(f, "Field Dictionary:")?;
        for e in self.entries().filter(|e| !e.is_placeholder()) {
            writeln!(
                f,
                "  Fid={} '{}' '{}' Type={} RippleTo={} Len={} EnumLen={} RwfType={} RwfLen={}",
                e.fid,
                e.acronym,
                e.dde_acronym,
                e.field_type.code(),
                e.ripple_to_field,
                e.length,
                e.enum_length,
                e.rwf_type.code(),
                e.rwf_length
            )?;
        }

        writeln!(f, "\nEnum Type Tables:")?;
        for table in &self.enum_tables {
            for fid in table.fid_references() {
                writeln!(f, "(Referenced by Fid {fid})")?;
            }
            for value in table.enum_types() {
                writeln!(
                    f,
                    "value={} display=\"{}\" meaning=\"{}\"",
                    value.value,
                    String::from_utf8_lossy(&value.display),
                    value.meaning
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

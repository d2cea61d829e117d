/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Dictionary encode engine.
//!
//! A dictionary is sent as a series of element lists. The series carries a
//! local set definition so each row is written as set data, and summary
//! data naming the dictionary type, id and versions. Field dictionaries may
//! be split over several parts at fid boundaries, enum dictionaries at table
//! boundaries; a row is never split between parts.
//!
//! Every entry point has a `_with` form taking a [`ContainerEncoder`], so
//! tests can fail any nested container step.

use ironrwf_codec::{
    Array, ContainerEncoder, ElementList, ElementSetDef, ElementSetDefDb, ElementSetDefEntry,
    EncodeIterator, EntryStatus, Series, Value, WireEncoder,
};
use ironrwf_core::{CodecError, DataType, DictionaryError, DictionaryType, Verbosity};
use tracing::debug;

use crate::config::EncodeConfig;
use crate::dictionary::DataDictionary;
use crate::entry::DictionaryEntry;
use crate::enum_table::EnumTypeTable;
use crate::names::*;

/// Result of one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    /// Everything has been encoded.
    Complete,
    /// The part is full; call again with a fresh buffer to continue.
    PartEncoded,
}

/// Builds the set definition used by field rows.
///
/// `Normal` and above carry `ENUMLENGTH` and `LONGNAME` after the seven core
/// slots.
#[must_use]
pub fn field_set_def(verbosity: Verbosity) -> ElementSetDef {
    let mut slots = vec![
        ElementSetDefEntry::new(FIELD_NAME, DataType::AsciiString),
        ElementSetDefEntry::new(FIELD_ID, DataType::Int2),
        ElementSetDefEntry::new(FIELD_RIPPLETO, DataType::Int2),
        ElementSetDefEntry::new(FIELD_TYPE, DataType::Int1),
        ElementSetDefEntry::new(FIELD_LENGTH, DataType::Uint2),
        ElementSetDefEntry::new(FIELD_RWFTYPE, DataType::Uint1),
        ElementSetDefEntry::new(FIELD_RWFLEN, DataType::Uint2),
    ];
    if verbosity >= Verbosity::Normal {
        slots.push(ElementSetDefEntry::new(FIELD_ENUMLENGTH, DataType::Uint1));
        slots.push(ElementSetDefEntry::new(FIELD_LONGNAME, DataType::AsciiString));
    }
    ElementSetDef::new(0, slots)
}

/// Builds the set definition used by enum table rows.
#[must_use]
pub fn enum_set_def(verbosity: Verbosity) -> ElementSetDef {
    let mut slots = vec![
        ElementSetDefEntry::new(ENUM_FIDS, DataType::Array),
        ElementSetDefEntry::new(ENUM_VALUE, DataType::Array),
        ElementSetDefEntry::new(ENUM_DISPLAY, DataType::Array),
    ];
    if verbosity >= Verbosity::Verbose {
        slots.push(ElementSetDefEntry::new(ENUM_MEANING, DataType::Array));
    }
    ElementSetDef::new(0, slots)
}

fn set_db(definition: ElementSetDef) -> Result<ElementSetDefDb, CodecError> {
    let mut db = ElementSetDefDb::new();
    db.add(definition)?;
    Ok(db)
}

/// Runs `body` inside one container level and closes it with `close`.
///
/// `body` opens the level. On any error the level is closed with
/// `success = false`, which drops its bytes; if the level was never opened
/// that call is a no-op.
fn scoped<E, T, Er>(
    encoder: &mut E,
    iter: &mut EncodeIterator,
    body: impl FnOnce(&mut E, &mut EncodeIterator) -> Result<(), Er>,
    close: impl Fn(&mut E, &mut EncodeIterator, bool) -> Result<T, CodecError>,
) -> Result<T, Er>
where
    E: ContainerEncoder,
    Er: From<CodecError>,
{
    let result = body(encoder, iter).and_then(|()| close(encoder, iter, true).map_err(Er::from));
    if result.is_err() {
        let _ = close(encoder, iter, false);
    }
    result
}

fn require_set_complete(status: EntryStatus, row: &'static str) -> Result<(), CodecError> {
    if status == EntryStatus::SetComplete {
        Ok(())
    } else {
        Err(CodecError::InvalidArgument(format!(
            "{row} row did not fill its set definition"
        )))
    }
}

/// Writes one field row as a series entry of set data.
///
/// # Errors
/// Returns the container error; nothing of the row stays in the buffer.
pub fn encode_data_dict_entry<E: ContainerEncoder>(
    encoder: &mut E,
    iter: &mut EncodeIterator,
    entry: &DictionaryEntry,
    verbosity: Verbosity,
    set_db: &ElementSetDefDb,
) -> Result<(), CodecError> {
    scoped(
        encoder,
        iter,
        |enc, it| -> Result<(), CodecError> {
            enc.series_entry_init(it)?;
            scoped(
                enc,
                it,
                |enc, it| -> Result<(), CodecError> {
                    enc.element_list_init(it, &ElementList::set_data(0), Some(set_db))?;
                    enc.element_entry(it, FIELD_NAME, &Value::Ascii(&entry.acronym))?;
                    enc.element_entry(it, FIELD_ID, &Value::Int(i64::from(entry.fid)))?;
                    enc.element_entry(
                        it,
                        FIELD_RIPPLETO,
                        &Value::Int(i64::from(entry.ripple_to_field)),
                    )?;
                    enc.element_entry(
                        it,
                        FIELD_TYPE,
                        &Value::Int(i64::from(entry.field_type.code())),
                    )?;
                    enc.element_entry(it, FIELD_LENGTH, &Value::Uint(u64::from(entry.length)))?;
                    enc.element_entry(
                        it,
                        FIELD_RWFTYPE,
                        &Value::Uint(u64::from(entry.rwf_type.code())),
                    )?;
                    let mut status = enc.element_entry(
                        it,
                        FIELD_RWFLEN,
                        &Value::Uint(u64::from(entry.rwf_length)),
                    )?;
                    if verbosity >= Verbosity::Normal {
                        enc.element_entry(
                            it,
                            FIELD_ENUMLENGTH,
                            &Value::Uint(u64::from(entry.enum_length)),
                        )?;
                        status = enc.element_entry(
                            it,
                            FIELD_LONGNAME,
                            &Value::Ascii(&entry.dde_acronym),
                        )?;
                    }
                    require_set_complete(status, "field")
                },
                E::element_list_complete,
            )
        },
        E::series_entry_complete,
    )
}

/// Writes one array-valued slot of an enum row.
fn encode_array_slot<'v, E: ContainerEncoder>(
    encoder: &mut E,
    iter: &mut EncodeIterator,
    name: &str,
    array: Array,
    items: impl IntoIterator<Item = Value<'v>>,
) -> Result<EntryStatus, CodecError> {
    scoped(
        encoder,
        iter,
        |enc, it| -> Result<(), CodecError> {
            enc.element_entry_init(it, name, DataType::Array)?;
            scoped(
                enc,
                it,
                |enc, it| -> Result<(), CodecError> {
                    enc.array_init(it, &array)?;
                    for item in items {
                        enc.array_entry(it, &item)?;
                    }
                    Ok(())
                },
                E::array_complete,
            )
        },
        E::element_entry_complete,
    )
}

/// Writes one enum table as a series entry of set data.
fn encode_enum_row<E: ContainerEncoder>(
    encoder: &mut E,
    iter: &mut EncodeIterator,
    table: &EnumTypeTable,
    verbosity: Verbosity,
    set_db: &ElementSetDefDb,
) -> Result<(), CodecError> {
    scoped(
        encoder,
        iter,
        |enc, it| -> Result<(), CodecError> {
            enc.series_entry_init(it)?;
            scoped(
                enc,
                it,
                |enc, it| -> Result<(), CodecError> {
                    enc.element_list_init(it, &ElementList::set_data(0), Some(set_db))?;
                    encode_array_slot(
                        enc,
                        it,
                        ENUM_FIDS,
                        Array::new(DataType::Int).with_item_length(2),
                        table.fid_references().iter().map(|&fid| Value::Int(i64::from(fid))),
                    )?;
                    encode_array_slot(
                        enc,
                        it,
                        ENUM_VALUE,
                        Array::new(DataType::Enum),
                        table.enum_types().map(|e| Value::Enum(e.value)),
                    )?;
                    let mut status = encode_array_slot(
                        enc,
                        it,
                        ENUM_DISPLAY,
                        Array::new(DataType::AsciiString),
                        table.enum_types().map(|e| Value::Buffer(&e.display)),
                    )?;
                    if verbosity >= Verbosity::Verbose {
                        status = encode_array_slot(
                            enc,
                            it,
                            ENUM_MEANING,
                            Array::new(DataType::AsciiString),
                            table.enum_types().map(|e| Value::Ascii(&e.meaning)),
                        )?;
                    }
                    require_set_complete(status, "enum")
                },
                E::element_list_complete,
            )
        },
        E::series_entry_complete,
    )
}

impl DataDictionary {
    /// Writes the summary data of an open series and completes it.
    ///
    /// The summary is a standard element list carrying `Type`,
    /// `DictionaryId` and the version tags of `dictionary_type`.
    ///
    /// # Errors
    /// Returns the first container error.
    pub fn encode_data_dict_summary_data<E: ContainerEncoder>(
        &self,
        encoder: &mut E,
        iter: &mut EncodeIterator,
        dictionary_type: DictionaryType,
    ) -> Result<(), CodecError> {
        scoped(
            encoder,
            iter,
            |enc, it| -> Result<(), CodecError> {
                enc.element_list_init(it, &ElementList::standard(), None)?;
                enc.element_entry(
                    it,
                    DICT_TYPE,
                    &Value::Int(i64::from(dictionary_type.code())),
                )?;
                enc.element_entry(it, DICTIONARY_ID, &Value::Int(self.dictionary_id()))?;
                match dictionary_type {
                    DictionaryType::FieldDefinitions => {
                        enc.element_entry(it, DICT_VERSION, &Value::Ascii(&self.field_info.version))?;
                    }
                    DictionaryType::EnumTables => {
                        let info = &self.enum_info;
                        enc.element_entry(it, ENUM_RT_VERSION, &Value::Ascii(&info.rt_version))?;
                        enc.element_entry(it, ENUM_DT_VERSION, &Value::Ascii(&info.dt_version))?;
                        enc.element_entry(it, DICT_VERSION, &Value::Ascii(&info.dt_version))?;
                    }
                }
                Ok(())
            },
            E::element_list_complete,
        )?;
        encoder.series_summary_data_complete(iter, true)
    }

    /// Encodes field definitions, possibly over several parts.
    ///
    /// Start with `current_fid` at [`DataDictionary::min_fid`] (or lower)
    /// and call again with a fresh buffer while `PartEncoded` is returned.
    /// The first part carries the summary data.
    ///
    /// # Errors
    /// Returns `NotInitialized` before touching `iter`, a `BufferTooSmall`
    /// codec error if not even one row fits in a part, or any other
    /// container error. On error nothing of the part stays in `iter`.
    pub fn encode_field_dictionary(
        &self,
        iter: &mut EncodeIterator,
        current_fid: &mut i32,
        config: &EncodeConfig,
    ) -> Result<EncodeStatus, DictionaryError> {
        self.encode_field_dictionary_with(&mut WireEncoder, iter, current_fid, config)
    }

    /// [`DataDictionary::encode_field_dictionary`] through `encoder`.
    ///
    /// # Errors
    /// As [`DataDictionary::encode_field_dictionary`].
    pub fn encode_field_dictionary_with<E: ContainerEncoder>(
        &self,
        encoder: &mut E,
        iter: &mut EncodeIterator,
        current_fid: &mut i32,
        config: &EncodeConfig,
    ) -> Result<EncodeStatus, DictionaryError> {
        if !self.is_initialized() {
            return Err(DictionaryError::NotInitialized);
        }
        let verbosity = config.verbosity;
        let with_rows = verbosity > Verbosity::Info;
        let first_part = *current_fid <= self.min_fid();
        let db = set_db(field_set_def(verbosity))?;

        let mut series = Series::new(DataType::ElementList);
        if with_rows {
            series = series.with_set_defs();
        }
        if first_part {
            if config.total_count_hint && self.number_of_entries() > 0 {
                series = series.with_total_count_hint(
                    u32::try_from(self.number_of_entries()).unwrap_or(u32::MAX),
                );
            }
            series = series.with_summary_data();
        }

        let mut fid = (*current_fid).max(i32::from(i16::MIN));
        let mut rows = 0usize;
        scoped(
            encoder,
            iter,
            |enc, it| -> Result<(), DictionaryError> {
                enc.series_init(it, &series)?;
                if with_rows {
                    enc.encode_set_def_db(it, &db)?;
                    enc.series_set_defs_complete(it, true)?;
                }
                if first_part {
                    self.encode_data_dict_summary_data(enc, it, DictionaryType::FieldDefinitions)?;
                }
                if !with_rows {
                    fid = self.max_fid() + 1;
                    return Ok(());
                }
                while fid <= self.max_fid() {
                    let Some(entry) = i16::try_from(fid)
                        .ok()
                        .and_then(|f| self.entry(f))
                        .filter(|e| !e.is_placeholder())
                    else {
                        fid += 1;
                        continue;
                    };
                    let needed = 3
                        + entry.acronym.len()
                        + entry.dde_acronym.len()
                        + config.entry_headroom;
                    let outcome = if it.remaining() < needed {
                        Err(CodecError::BufferTooSmall {
                            needed,
                            available: it.remaining(),
                        })
                    } else {
                        encode_data_dict_entry(enc, it, entry, verbosity, &db)
                    };
                    match outcome {
                        Ok(()) => rows += 1,
                        Err(CodecError::BufferTooSmall { .. }) if rows > 0 => break,
                        Err(err) => return Err(DictionaryError::from(err)),
                    }
                    fid += 1;
                }
                Ok(())
            },
            E::series_complete,
        )
        .inspect_err(|e| debug!("Field dictionary encode failed at fid {}: {}", fid, e))?;

        *current_fid = fid;
        if fid > self.max_fid() {
            debug!("Field dictionary complete, {} rows in last part", rows);
            Ok(EncodeStatus::Complete)
        } else {
            debug!("Field dictionary part ends before fid {} ({} rows)", fid, rows);
            Ok(EncodeStatus::PartEncoded)
        }
    }

    /// Encodes all enum tables into a single buffer.
    ///
    /// # Errors
    /// Returns `NotInitialized`, or the container error (including
    /// `BufferTooSmall`) if the tables do not fit.
    pub fn encode_enum_type_dictionary(
        &self,
        iter: &mut EncodeIterator,
        config: &EncodeConfig,
    ) -> Result<(), DictionaryError> {
        self.encode_enum_type_dictionary_with(&mut WireEncoder, iter, config)
    }

    /// [`DataDictionary::encode_enum_type_dictionary`] through `encoder`.
    ///
    /// # Errors
    /// As [`DataDictionary::encode_enum_type_dictionary`].
    pub fn encode_enum_type_dictionary_with<E: ContainerEncoder>(
        &self,
        encoder: &mut E,
        iter: &mut EncodeIterator,
        config: &EncodeConfig,
    ) -> Result<(), DictionaryError> {
        let mut current_table = 0;
        self.encode_enum_tables(encoder, iter, &mut current_table, config, false)
            .map(|_| ())
    }

    /// Encodes enum tables over several parts.
    ///
    /// Start with `current_table` at 0 and call again with a fresh buffer
    /// while `PartEncoded` is returned. Every part carries the summary data.
    ///
    /// # Errors
    /// Returns `NotInitialized`, a `BufferTooSmall` codec error if a table
    /// does not fit in an empty part, or any other container error.
    pub fn encode_enum_type_dictionary_as_multi_part(
        &self,
        iter: &mut EncodeIterator,
        current_table: &mut usize,
        config: &EncodeConfig,
    ) -> Result<EncodeStatus, DictionaryError> {
        self.encode_enum_type_dictionary_as_multi_part_with(
            &mut WireEncoder,
            iter,
            current_table,
            config,
        )
    }

    /// [`DataDictionary::encode_enum_type_dictionary_as_multi_part`] through
    /// `encoder`.
    ///
    /// # Errors
    /// As [`DataDictionary::encode_enum_type_dictionary_as_multi_part`].
    pub fn encode_enum_type_dictionary_as_multi_part_with<E: ContainerEncoder>(
        &self,
        encoder: &mut E,
        iter: &mut EncodeIterator,
        current_table: &mut usize,
        config: &EncodeConfig,
    ) -> Result<EncodeStatus, DictionaryError> {
        self.encode_enum_tables(encoder, iter, current_table, config, true)
    }

    fn encode_enum_tables<E: ContainerEncoder>(
        &self,
        encoder: &mut E,
        iter: &mut EncodeIterator,
        current_table: &mut usize,
        config: &EncodeConfig,
        resumable: bool,
    ) -> Result<EncodeStatus, DictionaryError> {
        if !self.is_initialized() {
            return Err(DictionaryError::NotInitialized);
        }
        let verbosity = config.verbosity;
        let with_rows = verbosity > Verbosity::Info;
        let db = set_db(enum_set_def(verbosity))?;

        let mut series = Series::new(DataType::ElementList).with_summary_data();
        if with_rows {
            series = series.with_set_defs();
        }

        let tables = self.enum_tables();
        let mut index = *current_table;
        let start = index;
        scoped(
            encoder,
            iter,
            |enc, it| -> Result<(), DictionaryError> {
                enc.series_init(it, &series)?;
                if with_rows {
                    enc.encode_set_def_db(it, &db)?;
                    enc.series_set_defs_complete(it, true)?;
                }
                self.encode_data_dict_summary_data(enc, it, DictionaryType::EnumTables)?;
                if !with_rows {
                    index = tables.len();
                    return Ok(());
                }
                while let Some(table) = tables.get(index) {
                    match encode_enum_row(enc, it, table, verbosity, &db) {
                        Ok(()) => index += 1,
                        Err(CodecError::BufferTooSmall { .. }) if resumable && index > start => {
                            break;
                        }
                        Err(err) => return Err(DictionaryError::from(err)),
                    }
                }
                Ok(())
            },
            E::series_complete,
        )
        .inspect_err(|e| debug!("Enum dictionary encode failed at table {}: {}", index, e))?;

        *current_table = index;
        if index >= tables.len() {
            Ok(EncodeStatus::Complete)
        } else {
            debug!("Enum dictionary part ends before table {}", index);
            Ok(EncodeStatus::PartEncoded)
        }
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Dictionary decode engine.
//!
//! Reads the series produced by the encode engine back into a
//! [`DataDictionary`]. Parts may be decoded one after another into the same
//! dictionary; only the part carrying summary data checks the type tag.

use bytes::Bytes;
use ironrwf_codec::primitive::{decode_enum, decode_int};
use ironrwf_codec::{
    ContainerDecoder, DecodeIterator, ElementEntry, ElementSetDefDb, SeriesView, WireDecoder,
};
use ironrwf_core::{DataType, DictionaryError, DictionaryType, MfFieldType, Verbosity};
use tracing::{debug, warn};

use crate::dictionary::DataDictionary;
use crate::entry::DictionaryEntry;
use crate::enum_table::{EnumType, EnumTypeTable};
use crate::names::*;

/// Reads the dictionary type from the summary data of an encoded
/// dictionary without decoding it.
///
/// # Errors
/// Returns `Codec(NoData)` if nothing is bound, `UnexpectedContainer` if
/// the series does not hold element lists, `MissingSummary`, or
/// `MissingElement` when there is no `Type` element.
pub fn extract_dictionary_type(
    iter: &DecodeIterator<'_>,
) -> Result<DictionaryType, DictionaryError> {
    extract_dictionary_type_with(&mut WireDecoder, iter)
}

/// [`extract_dictionary_type`] through `decoder`.
///
/// # Errors
/// As [`extract_dictionary_type`].
pub fn extract_dictionary_type_with<D: ContainerDecoder>(
    decoder: &mut D,
    iter: &DecodeIterator<'_>,
) -> Result<DictionaryType, DictionaryError> {
    let series = decoder.decode_series(iter)?;
    check_container(&series)?;
    let summary = series.summary.ok_or(DictionaryError::MissingSummary)?;
    let list = decoder.decode_element_list(summary, None)?;
    let mut elements = list.entries();
    while let Some(element) = decoder.next_element_entry(&mut elements)? {
        if element.name == DICT_TYPE {
            let code = element.decode_uint()?.unwrap_or(0);
            return i64::try_from(code)
                .ok()
                .and_then(DictionaryType::from_code)
                .ok_or_else(|| invalid(&element));
        }
    }
    Err(DictionaryError::MissingElement { name: DICT_TYPE })
}

fn check_container(series: &SeriesView<'_>) -> Result<(), DictionaryError> {
    if series.container_type() == Some(DataType::ElementList) {
        Ok(())
    } else {
        Err(DictionaryError::UnexpectedContainer {
            found: series.raw_container_type(),
        })
    }
}

fn invalid(element: &ElementEntry<'_>) -> DictionaryError {
    DictionaryError::InvalidElement {
        name: element.name.to_string(),
        data_type: element.data_type.code(),
    }
}

fn expect_type(element: &ElementEntry<'_>, data_type: DataType) -> Result<(), DictionaryError> {
    if element.data_type == data_type {
        Ok(())
    } else {
        Err(invalid(element))
    }
}

fn is_text(data_type: DataType) -> bool {
    matches!(
        data_type,
        DataType::AsciiString | DataType::Utf8String | DataType::RmtesString
    )
}

fn text<'a>(element: &ElementEntry<'a>) -> Result<&'a str, DictionaryError> {
    if is_text(element.data_type) {
        Ok(element.as_str()?)
    } else {
        Err(invalid(element))
    }
}

fn int<T: TryFrom<i64>>(element: &ElementEntry<'_>) -> Result<T, DictionaryError> {
    expect_type(element, DataType::Int)?;
    let value = element.decode_int()?.unwrap_or(0);
    T::try_from(value).map_err(|_| invalid(element))
}

fn uint<T: TryFrom<u64>>(element: &ElementEntry<'_>) -> Result<T, DictionaryError> {
    expect_type(element, DataType::Uint)?;
    let value = element.decode_uint()?.unwrap_or(0);
    T::try_from(value).map_err(|_| invalid(element))
}

fn fid_of(value: i64) -> Result<i16, DictionaryError> {
    i16::try_from(value).map_err(|_| DictionaryError::FidOutOfRange { value })
}

/// Collects the items of an array element.
fn array_items<'a, D, T>(
    decoder: &mut D,
    element: &ElementEntry<'a>,
    accepts: impl Fn(DataType) -> bool,
    mut item: impl FnMut(&'a [u8]) -> Result<T, DictionaryError>,
) -> Result<Vec<T>, DictionaryError>
where
    D: ContainerDecoder,
{
    expect_type(element, DataType::Array)?;
    let array = decoder.decode_array(element.encoded)?;
    if !accepts(array.primitive_type.primitive_base()) {
        return Err(DictionaryError::InvalidElement {
            name: element.name.to_string(),
            data_type: array.primitive_type.code(),
        });
    }
    let mut items = Vec::with_capacity(usize::from(array.count));
    let mut entries = array.entries();
    while let Some(encoded) = decoder.next_array_entry(&mut entries)? {
        items.push(item(encoded)?);
    }
    Ok(items)
}

impl DataDictionary {
    /// Reads the summary data of one part.
    fn decode_summary<D: ContainerDecoder>(
        &mut self,
        decoder: &mut D,
        summary: &[u8],
        expected: DictionaryType,
    ) -> Result<(), DictionaryError> {
        let list = decoder.decode_element_list(summary, None)?;
        let mut elements = list.entries();
        while let Some(element) = decoder.next_element_entry(&mut elements)? {
            match (element.name, expected) {
                (DICT_TYPE, _) => {
                    let found = element.decode_uint()?.unwrap_or(0);
                    if found != u64::from(expected.code()) {
                        return Err(DictionaryError::TypeMismatch {
                            expected: i64::from(expected.code()),
                            found: i64::try_from(found).unwrap_or(i64::MAX),
                        });
                    }
                }
                (DICTIONARY_ID, _) => {
                    self.apply_dictionary_id(element.decode_int()?.unwrap_or(0))?;
                }
                (DICT_VERSION, DictionaryType::FieldDefinitions) => {
                    self.field_info.version = text(&element)?.to_string();
                }
                (ENUM_RT_VERSION, DictionaryType::EnumTables) => {
                    self.enum_info.rt_version = text(&element)?.to_string();
                }
                (ENUM_DT_VERSION, DictionaryType::EnumTables) => {
                    self.enum_info.dt_version = text(&element)?.to_string();
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Decodes one part of an encoded field dictionary into `self`.
    ///
    /// Rows are read with the detail of `verbosity`: `ENUMLENGTH` and
    /// `LONGNAME` are taken only at `Normal` and above.
    ///
    /// A part that fails leaves `self` unchanged, so a truncated part can be
    /// decoded again once the rest of its bytes arrive.
    ///
    /// # Errors
    /// Returns `Codec(NoData)` for an empty iterator, an error for which
    /// [`DictionaryError::is_incomplete`] is true on truncation, and any
    /// other `DictionaryError` for an invalid payload or a rejected row.
    pub fn decode_field_dictionary(
        &mut self,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        self.decode_field_dictionary_with(&mut WireDecoder, iter, verbosity)
    }

    /// [`DataDictionary::decode_field_dictionary`] through `decoder`.
    ///
    /// # Errors
    /// As [`DataDictionary::decode_field_dictionary`].
    pub fn decode_field_dictionary_with<D: ContainerDecoder>(
        &mut self,
        decoder: &mut D,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        self.staged(|dict| dict.decode_field_part(decoder, iter, verbosity))
    }

    fn decode_field_part<D: ContainerDecoder>(
        &mut self,
        decoder: &mut D,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        let series = decoder.decode_series(iter)?;
        check_container(&series)?;
        if let Some(summary) = series.summary {
            self.decode_summary(decoder, summary, DictionaryType::FieldDefinitions)?;
        }
        let set_db = decoder.decode_set_def_db(&series)?;

        let mut rows = series.entries();
        let mut count = 0usize;
        while let Some(row) = decoder.next_series_entry(&mut rows)? {
            let entry = self.decode_field_row(decoder, row, set_db.as_ref(), verbosity)?;
            self.add_field(entry).inspect_err(|e| warn!("Rejected field row: {}", e))?;
            count += 1;
        }
        debug!("Decoded {} field rows", count);
        self.mark_initialized();
        Ok(())
    }

    fn decode_field_row<D: ContainerDecoder>(
        &self,
        decoder: &mut D,
        row: &[u8],
        set_db: Option<&ElementSetDefDb>,
        verbosity: Verbosity,
    ) -> Result<DictionaryEntry, DictionaryError> {
        let list = decoder.decode_element_list(row, set_db)?;
        let mut entry = DictionaryEntry::new(0, String::new(), DataType::Unknown);
        let mut elements = list.entries();
        while let Some(element) = decoder.next_element_entry(&mut elements)? {
            match element.name {
                FIELD_NAME => entry.acronym = text(&element)?.to_string(),
                FIELD_ID => {
                    expect_type(&element, DataType::Int)?;
                    entry.fid = fid_of(element.decode_int()?.unwrap_or(0))?;
                }
                FIELD_RIPPLETO => entry.ripple_to_field = int(&element)?,
                FIELD_TYPE => {
                    let code = int::<i64>(&element)?;
                    entry.field_type =
                        MfFieldType::from_code(code).ok_or_else(|| invalid(&element))?;
                }
                FIELD_LENGTH => entry.length = uint(&element)?,
                FIELD_RWFTYPE => {
                    let code = uint::<u8>(&element)?;
                    entry.rwf_type = DataType::from_code(code)
                        .map_or(DataType::Unknown, DataType::primitive_base);
                }
                FIELD_RWFLEN => entry.rwf_length = uint(&element)?,
                FIELD_ENUMLENGTH if verbosity >= Verbosity::Normal => {
                    entry.enum_length = uint(&element)?;
                }
                FIELD_LONGNAME if verbosity >= Verbosity::Normal => {
                    entry.dde_acronym = text(&element)?.to_string();
                }
                _ => {}
            }
        }
        Ok(entry)
    }

    /// Decodes one part of an encoded enum type dictionary into `self`.
    ///
    /// # Errors
    /// As [`DataDictionary::decode_field_dictionary`]; a table is also
    /// rejected when its values or displays are missing, their counts
    /// differ, or a value repeats.
    pub fn decode_enum_type_dictionary(
        &mut self,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        self.decode_enum_type_dictionary_with(&mut WireDecoder, iter, verbosity)
    }

    /// [`DataDictionary::decode_enum_type_dictionary`] through `decoder`.
    ///
    /// # Errors
    /// As [`DataDictionary::decode_enum_type_dictionary`].
    pub fn decode_enum_type_dictionary_with<D: ContainerDecoder>(
        &mut self,
        decoder: &mut D,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        self.staged(|dict| dict.decode_enum_part(decoder, iter, verbosity))
    }

    fn decode_enum_part<D: ContainerDecoder>(
        &mut self,
        decoder: &mut D,
        iter: &DecodeIterator<'_>,
        verbosity: Verbosity,
    ) -> Result<(), DictionaryError> {
        let series = decoder.decode_series(iter)?;
        check_container(&series)?;
        if let Some(summary) = series.summary {
            self.decode_summary(decoder, summary, DictionaryType::EnumTables)?;
        }
        let set_db = decoder.decode_set_def_db(&series)?;

        let mut rows = series.entries();
        while let Some(row) = decoder.next_series_entry(&mut rows)? {
            let (table, fids) = decode_enum_row(decoder, row, set_db.as_ref(), verbosity)?;
            let references: Vec<(i16, &str)> = fids.iter().map(|&fid| (fid, "")).collect();
            self.add_table(table, &references)
                .inspect_err(|e| warn!("Rejected enum table for fids {:?}: {}", fids, e))?;
        }
        debug!("Decoded enum tables, {} total", self.enum_table_count());
        self.mark_initialized();
        Ok(())
    }
}

fn decode_enum_row<D: ContainerDecoder>(
    decoder: &mut D,
    row: &[u8],
    set_db: Option<&ElementSetDefDb>,
    verbosity: Verbosity,
) -> Result<(EnumTypeTable, Vec<i16>), DictionaryError> {
    let list = decoder.decode_element_list(row, set_db)?;
    let mut fids = Vec::new();
    let mut values: Option<Vec<u16>> = None;
    let mut displays: Option<Vec<Bytes>> = None;
    let mut meanings: Vec<String> = Vec::new();

    let mut elements = list.entries();
    while let Some(element) = decoder.next_element_entry(&mut elements)? {
        match element.name {
            ENUM_FIDS | ENUM_FID => {
                fids = array_items(
                    decoder,
                    &element,
                    |t| t == DataType::Int,
                    |item| fid_of(decode_int(item)?.unwrap_or(0)),
                )?;
            }
            ENUM_VALUE | ENUM_VALUES => {
                if values.is_some() {
                    return Err(invalid(&element));
                }
                values = Some(array_items(
                    decoder,
                    &element,
                    |t| t == DataType::Enum,
                    |item| Ok(decode_enum(item)?.unwrap_or(0)),
                )?);
            }
            ENUM_DISPLAY | ENUM_DISPLAYS => {
                displays = Some(array_items(decoder, &element, is_text, |item| {
                    Ok(Bytes::copy_from_slice(item))
                })?);
            }
            ENUM_MEANING if verbosity >= Verbosity::Verbose => {
                meanings = array_items(decoder, &element, is_text, |item| {
                    Ok(String::from_utf8_lossy(item).into_owned())
                })?;
            }
            _ => {}
        }
    }

    let values = values.ok_or(DictionaryError::MissingElement { name: ENUM_VALUE })?;
    let displays = displays.ok_or(DictionaryError::MissingElement { name: ENUM_DISPLAY })?;
    if values.len() != displays.len() {
        return Err(DictionaryError::EnumCountMismatch {
            values: values.len(),
            displays: displays.len(),
        });
    }
    let mut meanings = meanings.into_iter();
    let table = EnumTypeTable::from_values(values.into_iter().zip(displays).map(
        |(value, display)| {
            let enum_type = EnumType::new(value, display);
            match meanings.next() {
                Some(meaning) => enum_type.with_meaning(meaning),
                None => enum_type,
            }
        },
    ))?;
    Ok((table, fids))
}

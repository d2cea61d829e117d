/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! RWF container decoder.
//!
//! Decoding is zero-copy: [`DecodeIterator`] borrows the encoded bytes and
//! each container view hands out sub-slices of them. Views are parsed eagerly
//! up to their entries; entries are read lazily by the entry iterators, which
//! report truncation as `CodecError::IncompleteData` and then stop.

use ironrwf_core::{CodecError, DataType, Date, Real};

use crate::container::{ElementList, Series};
use crate::encoder::{DEFAULT_MAJOR_VERSION, DEFAULT_MINOR_VERSION};
use crate::primitive::{
    decode_date, decode_enum, decode_int, decode_real, decode_uint, read_slice, read_u8,
    read_u15rb, read_u16, read_u16ob, read_u30rb,
};
use crate::set_def::{ElementSetDef, ElementSetDefDb};

/// Source of encoded bytes.
#[derive(Debug, Clone, Copy)]
pub struct DecodeIterator<'a> {
    data: Option<&'a [u8]>,
    major_version: u8,
    minor_version: u8,
}

impl<'a> DecodeIterator<'a> {
    /// Creates an iterator over `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data: Some(data),
            major_version: DEFAULT_MAJOR_VERSION,
            minor_version: DEFAULT_MINOR_VERSION,
        }
    }

    /// Creates an iterator with no buffer bound.
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            data: None,
            major_version: DEFAULT_MAJOR_VERSION,
            minor_version: DEFAULT_MINOR_VERSION,
        }
    }

    /// Sets the wire format version.
    #[must_use]
    pub const fn with_version(mut self, major: u8, minor: u8) -> Self {
        self.major_version = major;
        self.minor_version = minor;
        self
    }

    /// Binds a new buffer.
    pub fn set_buffer(&mut self, data: &'a [u8]) {
        self.data = Some(data);
    }

    /// Returns the wire format major version.
    #[must_use]
    pub const fn major_version(&self) -> u8 {
        self.major_version
    }

    /// Returns the wire format minor version.
    #[must_use]
    pub const fn minor_version(&self) -> u8 {
        self.minor_version
    }

    /// Returns the bound bytes.
    ///
    /// # Errors
    /// Returns `CodecError::NoData` if nothing, or an empty buffer, is bound.
    pub fn data(&self) -> Result<&'a [u8], CodecError> {
        match self.data {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(CodecError::NoData),
        }
    }

    /// Decodes the bound bytes as one [`Real`].
    ///
    /// # Errors
    /// Returns `CodecError::NoData` if nothing is bound and
    /// `CodecError::InvalidArgument` for content that is not a real.
    pub fn decode_real(&self) -> Result<Real, CodecError> {
        decode_real(self.data()?)
    }

    /// Decodes the bound bytes as one [`Date`].
    ///
    /// # Errors
    /// Returns `CodecError::NoData` or `CodecError::InvalidData`.
    pub fn decode_date(&self) -> Result<Date, CodecError> {
        decode_date(self.data()?)
    }

    /// Decodes the bound bytes as a signed integer.
    ///
    /// # Errors
    /// Returns `CodecError::NoData` or `CodecError::InvalidData`.
    pub fn decode_int(&self) -> Result<i64, CodecError> {
        decode_int(self.data()?)?.ok_or(CodecError::NoData)
    }

    /// Decodes the bound bytes as an unsigned integer.
    ///
    /// # Errors
    /// Returns `CodecError::NoData` or `CodecError::InvalidData`.
    pub fn decode_uint(&self) -> Result<u64, CodecError> {
        decode_uint(self.data()?)?.ok_or(CodecError::NoData)
    }

    /// Decodes the bound bytes as a series.
    ///
    /// # Errors
    /// Returns `CodecError::NoData` if nothing is bound and
    /// `CodecError::IncompleteData` if the header is truncated.
    pub fn decode_series(&self) -> Result<SeriesView<'a>, CodecError> {
        SeriesView::decode(self.data()?)
    }
}

/// Decoded series header.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    /// Presence flags.
    pub flags: u8,
    container_type: u8,
    /// Encoded set-definition database.
    pub set_defs: Option<&'a [u8]>,
    /// Encoded summary element list.
    pub summary: Option<&'a [u8]>,
    /// Expected total number of entries.
    pub total_count_hint: Option<u32>,
    /// Number of entries in this part.
    pub count: u16,
    entries: &'a [u8],
}

impl<'a> SeriesView<'a> {
    /// Parses a series header.
    ///
    /// # Errors
    /// Returns `CodecError::IncompleteData` on truncation.
    pub fn decode(data: &'a [u8]) -> Result<Self, CodecError> {
        let mut offset = 0;
        let flags = read_u8(data, &mut offset)?;
        let container_type = read_u8(data, &mut offset)?;
        let set_defs = if flags & Series::HAS_SET_DEFS != 0 {
            let len = usize::from(read_u15rb(data, &mut offset)?);
            Some(read_slice(data, &mut offset, len)?)
        } else {
            None
        };
        let summary = if flags & Series::HAS_SUMMARY_DATA != 0 {
            let len = usize::from(read_u15rb(data, &mut offset)?);
            Some(read_slice(data, &mut offset, len)?)
        } else {
            None
        };
        let total_count_hint = if flags & Series::HAS_TOTAL_COUNT_HINT != 0 {
            Some(read_u30rb(data, &mut offset)?)
        } else {
            None
        };
        let count = read_u16(data, &mut offset)?;
        Ok(Self {
            flags,
            container_type,
            set_defs,
            summary,
            total_count_hint,
            count,
            entries: &data[offset..],
        })
    }

    /// Returns the entry container type, `None` if the byte is unknown.
    #[must_use]
    pub fn container_type(&self) -> Option<DataType> {
        DataType::from_code(self.container_type)
    }

    /// Returns the raw entry container type byte.
    #[must_use]
    pub const fn raw_container_type(&self) -> u8 {
        self.container_type
    }

    /// Decodes the set-definition database, if present.
    ///
    /// # Errors
    /// Returns the database decode error.
    pub fn set_def_db(&self) -> Result<Option<ElementSetDefDb>, CodecError> {
        self.set_defs.map(ElementSetDefDb::decode).transpose()
    }

    /// Returns an iterator over the encoded entries.
    #[must_use]
    pub const fn entries(&self) -> SeriesEntries<'a> {
        SeriesEntries {
            data: self.entries,
            offset: 0,
            remaining: self.count,
        }
    }
}

/// Iterator over series entry payloads.
#[derive(Debug, Clone)]
pub struct SeriesEntries<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> Iterator for SeriesEntries<'a> {
    type Item = Result<&'a [u8], CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = read_u16ob(self.data, &mut self.offset)
            .and_then(|len| read_slice(self.data, &mut self.offset, usize::from(len)));
        if entry.is_err() {
            self.remaining = 0;
        }
        Some(entry)
    }
}

impl std::iter::FusedIterator for SeriesEntries<'_> {}

/// Decoded element list header.
#[derive(Debug, Clone, Copy)]
pub struct ElementListView<'a> {
    /// Presence flags.
    pub flags: u8,
    /// Application list number.
    pub list_number: Option<u16>,
    set_def: Option<&'a ElementSetDef>,
    set_data: &'a [u8],
    standard_count: u16,
    standard_data: &'a [u8],
}

impl<'a> ElementListView<'a> {
    /// Parses an element list header.
    ///
    /// # Arguments
    /// * `data` - Encoded list
    /// * `set_db` - Set definitions for lists carrying set data
    ///
    /// # Errors
    /// Returns `CodecError::IncompleteData` on truncation and
    /// `CodecError::SetDefinitionNotFound` for set data without a definition.
    pub fn decode(
        data: &'a [u8],
        set_db: Option<&'a ElementSetDefDb>,
    ) -> Result<Self, CodecError> {
        let mut offset = 0;
        let flags = read_u8(data, &mut offset)?;
        let list_number = if flags & ElementList::HAS_ELEMENT_LIST_INFO != 0 {
            let len = usize::from(read_u8(data, &mut offset)?);
            let info = read_slice(data, &mut offset, len)?;
            let mut info_offset = 0;
            Some(read_u16(info, &mut info_offset)?)
        } else {
            None
        };
        let set_id = if flags & ElementList::HAS_SET_ID != 0 {
            read_u15rb(data, &mut offset)?
        } else {
            0
        };
        let has_standard = flags & ElementList::HAS_STANDARD_DATA != 0;

        let mut set_def = None;
        let mut set_data: &[u8] = &[];
        if flags & ElementList::HAS_SET_DATA != 0 {
            set_def = Some(
                set_db
                    .and_then(|db| db.definition(set_id))
                    .ok_or(CodecError::SetDefinitionNotFound(set_id))?,
            );
            set_data = if has_standard {
                let len = usize::from(read_u15rb(data, &mut offset)?);
                read_slice(data, &mut offset, len)?
            } else {
                let rest = &data[offset..];
                offset = data.len();
                rest
            };
        }

        let mut standard_count = 0;
        if has_standard {
            standard_count = read_u16(data, &mut offset)?;
        }

        Ok(Self {
            flags,
            list_number,
            set_def,
            set_data,
            standard_count,
            standard_data: &data[offset..],
        })
    }

    /// Returns the set definition driving the set data.
    #[must_use]
    pub const fn set_def(&self) -> Option<&'a ElementSetDef> {
        self.set_def
    }

    /// Returns an iterator over set entries followed by standard entries.
    #[must_use]
    pub const fn entries(&self) -> ElementEntries<'a> {
        ElementEntries {
            set_def: self.set_def,
            set_data: self.set_data,
            set_index: 0,
            set_offset: 0,
            standard_data: self.standard_data,
            standard_offset: 0,
            standard_remaining: self.standard_count,
            failed: false,
        }
    }
}

/// Iterator over element entries.
#[derive(Debug, Clone)]
pub struct ElementEntries<'a> {
    set_def: Option<&'a ElementSetDef>,
    set_data: &'a [u8],
    set_index: usize,
    set_offset: usize,
    standard_data: &'a [u8],
    standard_offset: usize,
    standard_remaining: u16,
    failed: bool,
}

impl<'a> ElementEntries<'a> {
    fn next_set_entry(&mut self) -> Option<Result<ElementEntry<'a>, CodecError>> {
        let def = self.set_def?;
        let slot = def.entries.get(self.set_index)?;
        if self.set_offset >= self.set_data.len() {
            self.set_def = None;
            return None;
        }
        self.set_index += 1;
        let encoded = match slot.data_type.fixed_width() {
            Some(width) => read_slice(self.set_data, &mut self.set_offset, width),
            None => read_u16ob(self.set_data, &mut self.set_offset).and_then(|len| {
                read_slice(self.set_data, &mut self.set_offset, usize::from(len))
            }),
        };
        Some(encoded.map(|encoded| ElementEntry {
            name: &slot.name,
            data_type: slot.data_type.primitive_base(),
            encoded,
        }))
    }

    fn next_standard_entry(&mut self) -> Result<ElementEntry<'a>, CodecError> {
        let data = self.standard_data;
        let offset = &mut self.standard_offset;
        let name_len = usize::from(read_u15rb(data, offset)?);
        let name = std::str::from_utf8(read_slice(data, offset, name_len)?)
            .map_err(|_| CodecError::InvalidData("element name is not utf-8".into()))?;
        let code = read_u8(data, offset)?;
        let data_type = DataType::from_code(code).ok_or(CodecError::UnsupportedDataType(code))?;
        let len = usize::from(read_u16ob(data, offset)?);
        let encoded = read_slice(data, offset, len)?;
        Ok(ElementEntry {
            name,
            data_type: data_type.primitive_base(),
            encoded,
        })
    }
}

impl<'a> Iterator for ElementEntries<'a> {
    type Item = Result<ElementEntry<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = match self.next_set_entry() {
            Some(entry) => entry,
            None if self.standard_remaining > 0 => {
                self.standard_remaining -= 1;
                self.next_standard_entry()
            }
            None => return None,
        };
        self.failed = entry.is_err();
        Some(entry)
    }
}

impl std::iter::FusedIterator for ElementEntries<'_> {}

/// One decoded element entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementEntry<'a> {
    /// Element name.
    pub name: &'a str,
    /// Data type, set types reported as their base type.
    pub data_type: DataType,
    /// Encoded content.
    pub encoded: &'a [u8],
}

impl<'a> ElementEntry<'a> {
    /// Decodes a signed integer; `None` when blank.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidData` for oversized content.
    pub fn decode_int(&self) -> Result<Option<i64>, CodecError> {
        decode_int(self.encoded)
    }

    /// Decodes an unsigned integer; `None` when blank.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidData` for oversized content.
    pub fn decode_uint(&self) -> Result<Option<u64>, CodecError> {
        decode_uint(self.encoded)
    }

    /// Decodes an enumerated value; `None` when blank.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidData` for oversized content.
    pub fn decode_enum(&self) -> Result<Option<u16>, CodecError> {
        decode_enum(self.encoded)
    }

    /// Decodes a [`Real`].
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` for content that is not a real.
    pub fn decode_real(&self) -> Result<Real, CodecError> {
        decode_real(self.encoded)
    }

    /// Decodes a [`Date`].
    ///
    /// # Errors
    /// Returns `CodecError::InvalidData` for content that is not a date.
    pub fn decode_date(&self) -> Result<Date, CodecError> {
        decode_date(self.encoded)
    }

    /// Returns the content as text.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidData` if the content is not UTF-8.
    pub fn as_str(&self) -> Result<&'a str, CodecError> {
        std::str::from_utf8(self.encoded)
            .map_err(|_| CodecError::InvalidData(format!("element '{}' is not text", self.name)))
    }

    /// Returns the raw content.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.encoded
    }

    /// Parses the content as an array.
    ///
    /// # Errors
    /// Returns `CodecError::IncompleteData` on truncation.
    pub fn decode_array(&self) -> Result<ArrayView<'a>, CodecError> {
        ArrayView::decode(self.encoded)
    }
}

/// Decoded array header.
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<'a> {
    /// Type of every item.
    pub primitive_type: DataType,
    /// Fixed item width, 0 for length-prefixed items.
    pub item_length: u8,
    /// Number of items.
    pub count: u16,
    items: &'a [u8],
}

impl<'a> ArrayView<'a> {
    /// Parses an array header.
    ///
    /// # Errors
    /// Returns `CodecError::IncompleteData` on truncation and
    /// `CodecError::UnsupportedDataType` for an unknown item type.
    pub fn decode(data: &'a [u8]) -> Result<Self, CodecError> {
        let mut offset = 0;
        let code = read_u8(data, &mut offset)?;
        let primitive_type =
            DataType::from_code(code).ok_or(CodecError::UnsupportedDataType(code))?;
        let item_length = read_u8(data, &mut offset)?;
        let count = read_u16(data, &mut offset)?;
        Ok(Self {
            primitive_type,
            item_length,
            count,
            items: &data[offset..],
        })
    }

    /// Returns an iterator over the encoded items.
    #[must_use]
    pub const fn entries(&self) -> ArrayEntries<'a> {
        ArrayEntries {
            data: self.items,
            offset: 0,
            item_length: self.item_length,
            remaining: self.count,
        }
    }
}

/// Iterator over array item payloads.
#[derive(Debug, Clone)]
pub struct ArrayEntries<'a> {
    data: &'a [u8],
    offset: usize,
    item_length: u8,
    remaining: u16,
}

impl<'a> Iterator for ArrayEntries<'a> {
    type Item = Result<&'a [u8], CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let item = if self.item_length > 0 {
            read_slice(self.data, &mut self.offset, usize::from(self.item_length))
        } else {
            read_u16ob(self.data, &mut self.offset)
                .and_then(|len| read_slice(self.data, &mut self.offset, usize::from(len)))
        };
        if item.is_err() {
            self.remaining = 0;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(usize::from(self.remaining)))
    }
}

impl std::iter::FusedIterator for ArrayEntries<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Array, Value};
    use crate::encoder::EncodeIterator;
    use crate::set_def::ElementSetDefEntry;
    use ironrwf_core::RealHint;

    fn set_db() -> ElementSetDefDb {
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
    fn test_unbound_and_empty_have_no_data() {
        assert_eq!(DecodeIterator::unbound().data(), Err(CodecError::NoData));
        assert_eq!(DecodeIterator::new(&[]).decode_real(), Err(CodecError::NoData));
        let mut iter = DecodeIterator::unbound();
        iter.set_buffer(&[0x0E, 0x05]);
        assert_eq!(iter.decode_real().unwrap(), Real::new(5, RealHint::Exponent0));
    }

    #[test]
    fn test_date_payload_as_real() {
        assert!(matches!(
            DecodeIterator::new(&[31, 12, 0x07, 0xE8]).decode_real(),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(DecodeIterator::new(&[30, 12, 0x07, 0xE8]).decode_real().is_ok());
    }

    #[test]
    fn test_series_round_trip_with_set_data() {
        let db = set_db();
        let mut enc = EncodeIterator::new(256);
        enc.series_init(
            &Series::new(DataType::ElementList)
                .with_set_defs()
                .with_total_count_hint(1),
        )
        .unwrap();
        enc.encode_element_set_def_db(&db).unwrap();
        enc.series_set_defs_complete(true).unwrap();
        enc.series_entry_init().unwrap();
        enc.element_list_init(&ElementList::set_data(0).with_standard_data(), Some(&db))
            .unwrap();
        enc.element_entry("NAME", &Value::Ascii("BID")).unwrap();
        enc.element_entry("FID", &Value::Int(-22)).unwrap();
        enc.element_entry("Extra", &Value::Uint(300)).unwrap();
        enc.element_list_complete(true).unwrap();
        enc.series_entry_complete(true).unwrap();
        enc.series_complete(true).unwrap();
        let bytes = enc.finish();

        let series = DecodeIterator::new(&bytes).decode_series().unwrap();
        assert_eq!(series.container_type(), Some(DataType::ElementList));
        assert_eq!(series.total_count_hint, Some(1));
        assert!(series.summary.is_none());
        let decoded_db = series.set_def_db().unwrap().unwrap();
        assert_eq!(decoded_db, db);

        let rows: Vec<_> = series.entries().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        let list = ElementListView::decode(rows[0], Some(&decoded_db)).unwrap();
        let entries: Vec<_> = list.entries().collect::<Result<_, _>>().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_str().unwrap(), "BID");
        assert_eq!(entries[1].name, "FID");
        assert_eq!(entries[1].data_type, DataType::Int);
        assert_eq!(entries[1].decode_int().unwrap(), Some(-22));
        assert_eq!(entries[2].decode_uint().unwrap(), Some(300));
    }

    #[test]
    fn test_truncated_series_reports_incomplete() {
        let mut enc = EncodeIterator::new(128);
        enc.series_init(&Series::new(DataType::ElementList)).unwrap();
        for _ in 0..2 {
            enc.series_entry_init().unwrap();
            enc.element_list_init(&ElementList::standard(), None).unwrap();
            enc.element_entry("A", &Value::Int(1)).unwrap();
            enc.element_list_complete(true).unwrap();
            enc.series_entry_complete(true).unwrap();
        }
        enc.series_complete(true).unwrap();
        let bytes = enc.finish();

        let short = &bytes[..bytes.len() - 1];
        let series = DecodeIterator::new(short).decode_series().unwrap();
        let mut entries = series.entries();
        assert!(entries.next().unwrap().is_ok());
        assert_eq!(entries.next(), Some(Err(CodecError::IncompleteData)));
        assert_eq!(entries.next(), None);
    }

    #[test]
    fn test_missing_set_definition_on_decode() {
        assert_eq!(
            ElementListView::decode(&[0x06, 0x02], Some(&set_db())).err(),
            Some(CodecError::SetDefinitionNotFound(2))
        );
    }

    #[test]
    fn test_array_entries() {
        let mut enc = EncodeIterator::new(64);
        enc.array_init(&Array::new(DataType::AsciiString)).unwrap();
        enc.array_entry(&Value::Ascii("up")).unwrap();
        enc.array_entry(&Value::Ascii("down")).unwrap();
        enc.array_complete(true).unwrap();
        let bytes = enc.finish();

        let array = ArrayView::decode(&bytes).unwrap();
        assert_eq!(array.primitive_type, DataType::AsciiString);
        let items: Vec<_> = array.entries().collect::<Result<_, _>>().unwrap();
        assert_eq!(items, vec![&b"up"[..], &b"down"[..]]);
    }
}

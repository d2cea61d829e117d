/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! RWF container encoder.
//!
//! [`EncodeIterator`] writes nested containers into a bounded buffer. Each
//! container is opened with an `*_init` call and closed with a matching
//! `*_complete(success)` call; completing with `success = false` truncates
//! the buffer back to where the container started, so a failed entry never
//! leaves partial bytes behind.

use bytes::{BufMut, Bytes, BytesMut};
use ironrwf_core::{CodecError, DataType};
use smallvec::SmallVec;

use crate::container::{Array, ElementList, EntryStatus, Series, Value};
use crate::primitive::{
    U16OB_LONG, encode_fixed, encode_value, put_u15rb, put_u16ob, put_u30rb, u15rb_len,
    u16ob_len, u30rb_len,
};
use crate::set_def::{ElementSetDef, ElementSetDefDb};

/// Default wire format major version.
pub const DEFAULT_MAJOR_VERSION: u8 = 14;

/// Default wire format minor version.
pub const DEFAULT_MINOR_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesState {
    SetDefs,
    Summary,
    Entries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    SetData,
    Standard,
    Done,
}

#[derive(Debug)]
enum Level {
    Series {
        start: usize,
        flags: u8,
        total_count_hint: u32,
        state: SeriesState,
        section_pos: usize,
        count_pos: usize,
        count: u16,
    },
    SeriesEntry {
        start: usize,
    },
    ElementList {
        start: usize,
        has_standard: bool,
        set_def: Option<ElementSetDef>,
        set_index: usize,
        set_length_pos: usize,
        count_pos: usize,
        count: u16,
        state: ListState,
    },
    ElementEntry {
        start: usize,
        length_pos: usize,
        in_set: bool,
    },
    Array {
        start: usize,
        primitive_type: DataType,
        item_length: u8,
        count_pos: usize,
        count: u16,
    },
}

impl Level {
    fn start(&self) -> usize {
        match self {
            Self::Series { start, .. }
            | Self::SeriesEntry { start }
            | Self::ElementList { start, .. }
            | Self::ElementEntry { start, .. }
            | Self::Array { start, .. } => *start,
        }
    }
}

/// Bounded RWF encoder.
#[derive(Debug)]
pub struct EncodeIterator {
    /// Output buffer.
    buffer: BytesMut,
    /// Maximum number of bytes the buffer may hold.
    max_len: usize,
    /// Open containers, innermost last.
    levels: SmallVec<[Level; 6]>,
    /// Scratch space for values whose length must be known before writing.
    scratch: Vec<u8>,
    major_version: u8,
    minor_version: u8,
}

impl EncodeIterator {
    /// Creates an encoder whose output may not exceed `max_len` bytes.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_len.min(64 * 1024)),
            max_len,
            levels: SmallVec::new(),
            scratch: Vec::with_capacity(64),
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

    /// Returns the encoded bytes so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the maximum output size.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns the number of bytes that may still be written.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_len.saturating_sub(self.buffer.len())
    }

    /// Returns the number of open containers and entries.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Hands out the encoded bytes and resets the encoder for the next part.
    pub fn take(&mut self) -> Bytes {
        self.levels.clear();
        self.buffer.split().freeze()
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Clears the buffer and every open container.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.levels.clear();
    }

    /// Opens a series.
    ///
    /// The next calls depend on the header flags: set definitions first,
    /// then summary data, then entries.
    ///
    /// # Errors
    /// Returns `CodecError::BufferTooSmall` if the header does not fit and
    /// `CodecError::UnexpectedEncoderCall` if no container may be opened here.
    pub fn series_init(&mut self, series: &Series) -> Result<(), CodecError> {
        self.check_can_open("series_init")?;
        self.ensure(2)?;
        let start = self.buffer.len();
        self.buffer.put_u8(series.flags);
        self.buffer.put_u8(series.container_type.code());
        self.levels.push(Level::Series {
            start,
            flags: series.flags,
            total_count_hint: series.total_count_hint,
            state: SeriesState::SetDefs,
            section_pos: 0,
            count_pos: 0,
            count: 0,
        });
        if let Err(err) = self.enter_series_section(SeriesState::SetDefs) {
            self.rollback_top();
            return Err(err);
        }
        Ok(())
    }

    /// Writes the local set-definition database of the open series.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` unless the series is
    /// expecting set definitions, or `CodecError::BufferTooSmall`.
    pub fn encode_element_set_def_db(&mut self, db: &ElementSetDefDb) -> Result<(), CodecError> {
        if !matches!(
            self.levels.last(),
            Some(Level::Series {
                state: SeriesState::SetDefs,
                ..
            })
        ) {
            return Err(CodecError::UnexpectedEncoderCall("encode_element_set_def_db"));
        }
        self.ensure(db.encoded_len())?;
        db.encode(&mut self.buffer)
    }

    /// Closes the set-definition section of the open series.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` unless the series is
    /// expecting set definitions.
    pub fn series_set_defs_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::Series {
            state: SeriesState::SetDefs,
            section_pos,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("series_set_defs_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        let pos = *section_pos;
        self.fill_u15rb(pos)?;
        self.enter_series_section(SeriesState::Summary)
    }

    /// Closes the summary data of the open series.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` unless the series is
    /// expecting summary data.
    pub fn series_summary_data_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::Series {
            state: SeriesState::Summary,
            section_pos,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall(
                "series_summary_data_complete",
            ));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        let pos = *section_pos;
        self.fill_u15rb(pos)?;
        self.enter_series_section(SeriesState::Entries)
    }

    /// Opens a series entry.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` unless the series is
    /// accepting entries, or `CodecError::BufferTooSmall`.
    pub fn series_entry_init(&mut self) -> Result<(), CodecError> {
        if !matches!(
            self.levels.last(),
            Some(Level::Series {
                state: SeriesState::Entries,
                ..
            })
        ) {
            return Err(CodecError::UnexpectedEncoderCall("series_entry_init"));
        }
        let start = self.reserve_u16ob()?;
        self.levels.push(Level::SeriesEntry { start });
        Ok(())
    }

    /// Closes the open series entry, or drops it when `success` is false.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` if no series entry is open.
    pub fn series_entry_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::SeriesEntry { start }) = self.levels.last() else {
            return Err(CodecError::UnexpectedEncoderCall("series_entry_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        let pos = *start;
        self.fill_u16ob(pos)?;
        self.levels.pop();
        match self.levels.last_mut() {
            Some(Level::Series { count, .. }) => {
                *count = count
                    .checked_add(1)
                    .ok_or_else(|| CodecError::InvalidData("too many series entries".into()))?;
                Ok(())
            }
            _ => Err(CodecError::UnexpectedEncoderCall("series_entry_complete")),
        }
    }

    /// Closes the open series, or drops it when `success` is false.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` if no series is open or
    /// its set definitions or summary data were not completed.
    pub fn series_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::Series {
            state,
            count_pos,
            count,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("series_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        if *state != SeriesState::Entries {
            return Err(CodecError::UnexpectedEncoderCall("series_complete"));
        }
        let (pos, value) = (*count_pos, *count);
        self.fill_u16(pos, value);
        self.levels.pop();
        Ok(())
    }

    /// Opens an element list.
    ///
    /// # Arguments
    /// * `list` - The list header
    /// * `set_db` - Set definitions available to set data
    ///
    /// # Errors
    /// Returns `CodecError::SetDefinitionNotFound` if the list carries set
    /// data for a set id missing from `set_db`.
    pub fn element_list_init(
        &mut self,
        list: &ElementList,
        set_db: Option<&ElementSetDefDb>,
    ) -> Result<(), CodecError> {
        self.check_can_open("element_list_init")?;
        let has_set_id = list.flags & ElementList::HAS_SET_ID != 0;
        let has_info = list.flags & ElementList::HAS_ELEMENT_LIST_INFO != 0;
        let set_def = if list.has_set_data() {
            let set_id = if has_set_id { list.set_id } else { 0 };
            Some(
                set_db
                    .and_then(|db| db.definition(set_id))
                    .cloned()
                    .ok_or(CodecError::SetDefinitionNotFound(set_id))?,
            )
        } else {
            None
        };

        let header = 1
            + if has_info { 3 } else { 0 }
            + if has_set_id { u15rb_len(list.set_id) } else { 0 }
            + if list.has_standard_data() { 2 } else { 0 };
        self.ensure(header)?;

        let start = self.buffer.len();
        self.buffer.put_u8(list.flags);
        if has_info {
            self.buffer.put_u8(2);
            self.buffer.put_u16(list.list_number);
        }
        if has_set_id {
            put_u15rb(&mut self.buffer, list.set_id)?;
        }

        let mut set_length_pos = 0;
        let mut count_pos = 0;
        let state = if set_def.is_some() {
            if list.has_standard_data() {
                set_length_pos = self.buffer.len();
                self.buffer.put_u16(0x8000);
            }
            ListState::SetData
        } else if list.has_standard_data() {
            count_pos = self.buffer.len();
            self.buffer.put_u16(0);
            ListState::Standard
        } else {
            ListState::Done
        };

        let empty_set = set_def.as_ref().is_some_and(ElementSetDef::is_empty);
        self.levels.push(Level::ElementList {
            start,
            has_standard: list.has_standard_data(),
            set_def,
            set_index: 0,
            set_length_pos,
            count_pos,
            count: 0,
            state,
        });
        if empty_set {
            self.finish_set_data()?;
        }
        Ok(())
    }

    /// Writes one primitive element entry.
    ///
    /// In set data the entry must match the next slot of the set definition
    /// by name; its value is written in the slot's type.
    ///
    /// # Returns
    /// `EntryStatus::SetComplete` when the entry fills the set definition.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` for a name or type mismatch,
    /// `CodecError::BufferTooSmall` if the entry does not fit (nothing is
    /// written in that case).
    pub fn element_entry(&mut self, name: &str, value: &Value<'_>) -> Result<EntryStatus, CodecError> {
        match self.list_state("element_entry")? {
            ListState::SetData => {
                let data_type = self.set_slot_type(name)?;
                self.scratch.clear();
                if let Some(width) = data_type.fixed_width() {
                    let signed = data_type.primitive_base() == DataType::Int;
                    encode_fixed(&mut self.scratch, value, width, signed)?;
                    self.ensure(self.scratch.len())?;
                    self.buffer.put_slice(&self.scratch);
                } else {
                    encode_value(&mut self.scratch, value, data_type)?;
                    let len = self.scratch_len()?;
                    self.ensure(u16ob_len(len) + self.scratch.len())?;
                    put_u16ob(&mut self.buffer, len);
                    self.buffer.put_slice(&self.scratch);
                }
                self.advance_set()
            }
            ListState::Standard => {
                let data_type = value.data_type();
                if data_type == DataType::Unknown {
                    return Err(CodecError::InvalidArgument(format!(
                        "standard entry '{name}' needs a typed value"
                    )));
                }
                self.scratch.clear();
                encode_value(&mut self.scratch, value, data_type)?;
                let len = self.scratch_len()?;
                let name_len = name_len(name)?;
                self.ensure(
                    u15rb_len(name_len) + name.len() + 1 + u16ob_len(len) + self.scratch.len(),
                )?;
                put_u15rb(&mut self.buffer, name_len)?;
                self.buffer.put_slice(name.as_bytes());
                self.buffer.put_u8(data_type.code());
                put_u16ob(&mut self.buffer, len);
                self.buffer.put_slice(&self.scratch);
                self.bump_list_count()?;
                Ok(EntryStatus::Success)
            }
            ListState::Done => Err(CodecError::UnexpectedEncoderCall("element_entry")),
        }
    }

    /// Opens an element entry whose content is a nested container.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if a set slot does not match
    /// `name` and `data_type`, or `CodecError::BufferTooSmall`.
    pub fn element_entry_init(&mut self, name: &str, data_type: DataType) -> Result<(), CodecError> {
        match self.list_state("element_entry_init")? {
            ListState::SetData => {
                let slot_type = self.set_slot_type(name)?;
                if slot_type != data_type {
                    return Err(CodecError::InvalidArgument(format!(
                        "set slot '{name}' is {slot_type}, not {data_type}"
                    )));
                }
                let start = self.reserve_u16ob()?;
                self.levels.push(Level::ElementEntry {
                    start,
                    length_pos: start,
                    in_set: true,
                });
            }
            ListState::Standard => {
                let name_len = name_len(name)?;
                self.ensure(u15rb_len(name_len) + name.len() + 1 + 3)?;
                let start = self.buffer.len();
                put_u15rb(&mut self.buffer, name_len)?;
                self.buffer.put_slice(name.as_bytes());
                self.buffer.put_u8(data_type.code());
                let length_pos = self.reserve_u16ob()?;
                self.levels.push(Level::ElementEntry {
                    start,
                    length_pos,
                    in_set: false,
                });
            }
            ListState::Done => return Err(CodecError::UnexpectedEncoderCall("element_entry_init")),
        }
        Ok(())
    }

    /// Closes an element entry opened with [`EncodeIterator::element_entry_init`].
    ///
    /// # Returns
    /// `EntryStatus::SetComplete` when the entry fills the set definition.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` if no element entry is open.
    pub fn element_entry_complete(&mut self, success: bool) -> Result<EntryStatus, CodecError> {
        let Some(Level::ElementEntry {
            length_pos, in_set, ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("element_entry_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(EntryStatus::Success);
        }
        let (pos, in_set) = (*length_pos, *in_set);
        self.fill_u16ob(pos)?;
        self.levels.pop();
        if in_set {
            self.advance_set()
        } else {
            self.bump_list_count()?;
            Ok(EntryStatus::Success)
        }
    }

    /// Closes the open element list, or drops it when `success` is false.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if set data is incomplete.
    pub fn element_list_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::ElementList {
            state,
            count_pos,
            count,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("element_list_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        let state = *state;
        match state {
            ListState::SetData => Err(CodecError::InvalidArgument(
                "element list set data is incomplete".into(),
            )),
            ListState::Standard => {
                let (pos, value) = (*count_pos, *count);
                self.fill_u16(pos, value);
                self.levels.pop();
                Ok(())
            }
            ListState::Done => {
                self.levels.pop();
                Ok(())
            }
        }
    }

    /// Opens an array.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` for an item length the item type
    /// cannot use, or `CodecError::BufferTooSmall`.
    pub fn array_init(&mut self, array: &Array) -> Result<(), CodecError> {
        self.check_can_open("array_init")?;
        let valid_length = match (array.primitive_type, array.item_length) {
            (_, 0) => true,
            (DataType::Int | DataType::Uint, 1 | 2 | 4 | 8) => true,
            (DataType::Enum, 1 | 2) => true,
            _ => false,
        };
        if !valid_length || array.primitive_type.is_container() {
            return Err(CodecError::InvalidArgument(format!(
                "array of {} cannot use item length {}",
                array.primitive_type, array.item_length
            )));
        }
        self.ensure(4)?;
        let start = self.buffer.len();
        self.buffer.put_u8(array.primitive_type.code());
        self.buffer.put_u8(array.item_length);
        let count_pos = self.buffer.len();
        self.buffer.put_u16(0);
        self.levels.push(Level::Array {
            start,
            primitive_type: array.primitive_type,
            item_length: array.item_length,
            count_pos,
            count: 0,
        });
        Ok(())
    }

    /// Writes one array item.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidArgument` if the value does not match the
    /// array type, or `CodecError::BufferTooSmall`.
    pub fn array_entry(&mut self, value: &Value<'_>) -> Result<(), CodecError> {
        let Some(Level::Array {
            primitive_type,
            item_length,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("array_entry"));
        };
        let (primitive_type, item_length) = (*primitive_type, usize::from(*item_length));
        self.scratch.clear();
        if item_length > 0 {
            encode_fixed(
                &mut self.scratch,
                value,
                item_length,
                primitive_type == DataType::Int,
            )?;
            self.ensure(self.scratch.len())?;
            self.buffer.put_slice(&self.scratch);
        } else {
            encode_value(&mut self.scratch, value, primitive_type)?;
            let len = self.scratch_len()?;
            self.ensure(u16ob_len(len) + self.scratch.len())?;
            put_u16ob(&mut self.buffer, len);
            self.buffer.put_slice(&self.scratch);
        }
        if let Some(Level::Array { count, .. }) = self.levels.last_mut() {
            *count = count
                .checked_add(1)
                .ok_or_else(|| CodecError::InvalidData("too many array items".into()))?;
        }
        Ok(())
    }

    /// Closes the open array, or drops it when `success` is false.
    ///
    /// # Errors
    /// Returns `CodecError::UnexpectedEncoderCall` if no array is open.
    pub fn array_complete(&mut self, success: bool) -> Result<(), CodecError> {
        let Some(Level::Array {
            count_pos, count, ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("array_complete"));
        };
        if !success {
            self.rollback_top();
            return Ok(());
        }
        let (pos, value) = (*count_pos, *count);
        self.fill_u16(pos, value);
        self.levels.pop();
        Ok(())
    }

    fn ensure(&self, needed: usize) -> Result<(), CodecError> {
        let available = self.remaining();
        if needed > available {
            return Err(CodecError::BufferTooSmall { needed, available });
        }
        Ok(())
    }

    fn check_can_open(&self, call: &'static str) -> Result<(), CodecError> {
        match self.levels.last() {
            None | Some(Level::SeriesEntry { .. }) | Some(Level::ElementEntry { .. }) => Ok(()),
            Some(Level::Series {
                state: SeriesState::Summary,
                ..
            }) => Ok(()),
            _ => Err(CodecError::UnexpectedEncoderCall(call)),
        }
    }

    fn rollback_top(&mut self) {
        if let Some(level) = self.levels.pop() {
            self.buffer.truncate(level.start());
        }
    }

    fn scratch_len(&self) -> Result<u16, CodecError> {
        u16::try_from(self.scratch.len()).map_err(|_| {
            CodecError::InvalidArgument(format!("{} byte value exceeds 65535", self.scratch.len()))
        })
    }

    fn reserve_u16ob(&mut self) -> Result<usize, CodecError> {
        self.ensure(3)?;
        let pos = self.buffer.len();
        self.buffer.put_u8(U16OB_LONG);
        self.buffer.put_u16(0);
        Ok(pos)
    }

    fn fill_u16ob(&mut self, pos: usize) -> Result<(), CodecError> {
        let len = self.buffer.len() - pos - 3;
        let len = u16::try_from(len)
            .map_err(|_| CodecError::InvalidData(format!("{len} byte entry exceeds 65535")))?;
        self.buffer[pos + 1..pos + 3].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }

    fn reserve_u15rb(&mut self) -> Result<usize, CodecError> {
        self.ensure(2)?;
        let pos = self.buffer.len();
        self.buffer.put_u16(0x8000);
        Ok(pos)
    }

    fn fill_u15rb(&mut self, pos: usize) -> Result<(), CodecError> {
        let len = self.buffer.len() - pos - 2;
        if len > usize::from(crate::primitive::U15RB_MAX) {
            return Err(CodecError::InvalidData(format!(
                "{len} byte section exceeds 32767"
            )));
        }
        self.buffer[pos..pos + 2].copy_from_slice(&(len as u16 | 0x8000).to_be_bytes());
        Ok(())
    }

    fn fill_u16(&mut self, pos: usize, value: u16) {
        self.buffer[pos..pos + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn enter_series_section(&mut self, mut next: SeriesState) -> Result<(), CodecError> {
        let Some(Level::Series {
            flags,
            total_count_hint,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("series"));
        };
        let (flags, total_count_hint) = (*flags, *total_count_hint);
        if next == SeriesState::SetDefs && flags & Series::HAS_SET_DEFS == 0 {
            next = SeriesState::Summary;
        }
        if next == SeriesState::Summary && flags & Series::HAS_SUMMARY_DATA == 0 {
            next = SeriesState::Entries;
        }

        let pos = if next == SeriesState::Entries {
            if flags & Series::HAS_TOTAL_COUNT_HINT != 0 {
                self.ensure(u30rb_len(total_count_hint) + 2)?;
                put_u30rb(&mut self.buffer, total_count_hint)?;
            } else {
                self.ensure(2)?;
            }
            let pos = self.buffer.len();
            self.buffer.put_u16(0);
            pos
        } else {
            self.reserve_u15rb()?
        };

        if let Some(Level::Series {
            state,
            section_pos,
            count_pos,
            ..
        }) = self.levels.last_mut()
        {
            *state = next;
            if next == SeriesState::Entries {
                *count_pos = pos;
            } else {
                *section_pos = pos;
            }
        }
        Ok(())
    }

    fn list_state(&self, call: &'static str) -> Result<ListState, CodecError> {
        match self.levels.last() {
            Some(Level::ElementList { state, .. }) => Ok(*state),
            _ => Err(CodecError::UnexpectedEncoderCall(call)),
        }
    }

    fn set_slot_type(&self, name: &str) -> Result<DataType, CodecError> {
        let Some(Level::ElementList {
            set_def: Some(def),
            set_index,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("set data"));
        };
        let slot = def.entries.get(*set_index).ok_or_else(|| {
            CodecError::InvalidArgument(format!("set {} has no slot for '{name}'", def.set_id))
        })?;
        if slot.name != name {
            return Err(CodecError::InvalidArgument(format!(
                "expected set entry '{}', got '{name}'",
                slot.name
            )));
        }
        Ok(slot.data_type)
    }

    fn advance_set(&mut self) -> Result<EntryStatus, CodecError> {
        let done = match self.levels.last_mut() {
            Some(Level::ElementList {
                set_def: Some(def),
                set_index,
                ..
            }) => {
                *set_index += 1;
                *set_index >= def.len()
            }
            _ => return Err(CodecError::UnexpectedEncoderCall("set data")),
        };
        if done {
            self.finish_set_data()?;
            Ok(EntryStatus::SetComplete)
        } else {
            Ok(EntryStatus::Success)
        }
    }

    fn finish_set_data(&mut self) -> Result<(), CodecError> {
        let Some(Level::ElementList {
            has_standard,
            set_length_pos,
            ..
        }) = self.levels.last()
        else {
            return Err(CodecError::UnexpectedEncoderCall("set data"));
        };
        let (has_standard, set_length_pos) = (*has_standard, *set_length_pos);
        let mut count_pos = 0;
        if has_standard {
            self.fill_u15rb(set_length_pos)?;
            self.ensure(2)?;
            count_pos = self.buffer.len();
            self.buffer.put_u16(0);
        }
        if let Some(Level::ElementList {
            state,
            count_pos: list_count_pos,
            ..
        }) = self.levels.last_mut()
        {
            if has_standard {
                *state = ListState::Standard;
                *list_count_pos = count_pos;
            } else {
                *state = ListState::Done;
            }
        }
        Ok(())
    }

    fn bump_list_count(&mut self) -> Result<(), CodecError> {
        match self.levels.last_mut() {
            Some(Level::ElementList { count, .. }) => {
                *count = count
                    .checked_add(1)
                    .ok_or_else(|| CodecError::InvalidData("too many element entries".into()))?;
                Ok(())
            }
            _ => Err(CodecError::UnexpectedEncoderCall("element entry")),
        }
    }
}

impl Default for EncodeIterator {
    fn default() -> Self {
        Self::new(usize::from(u16::MAX))
    }
}

fn name_len(name: &str) -> Result<u16, CodecError> {
    u16::try_from(name.len())
        .ok()
        .filter(|len| *len <= crate::primitive::U15RB_MAX)
        .ok_or_else(|| CodecError::InvalidArgument(format!("element name of {} bytes", name.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set_def::ElementSetDefEntry;

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
    fn test_standard_element_list_bytes() {
        let mut iter = EncodeIterator::new(64);
        iter.element_list_init(&ElementList::standard(), None).unwrap();
        iter.element_entry("Type", &Value::Int(1)).unwrap();
        iter.element_list_complete(true).unwrap();
        assert_eq!(
            iter.as_bytes(),
            &[0x08, 0x00, 0x01, 4, b'T', b'y', b'p', b'e', 3, 1, 0x01]
        );
        assert_eq!(iter.depth(), 0);
    }

    #[test]
    fn test_set_data_reports_set_complete() {
        let db = set_db();
        let mut iter = EncodeIterator::new(64);
        iter.element_list_init(&ElementList::set_data(0), Some(&db))
            .unwrap();
        assert_eq!(
            iter.element_entry("NAME", &Value::Ascii("BID")).unwrap(),
            EntryStatus::Success
        );
        assert_eq!(
            iter.element_entry("FID", &Value::Int(22)).unwrap(),
            EntryStatus::SetComplete
        );
        iter.element_list_complete(true).unwrap();
        assert_eq!(
            iter.as_bytes(),
            &[0x06, 0x00, 3, b'B', b'I', b'D', 0x00, 22]
        );
    }

    #[test]
    fn test_set_data_rejects_out_of_order_entry() {
        let db = set_db();
        let mut iter = EncodeIterator::new(64);
        iter.element_list_init(&ElementList::set_data(0), Some(&db))
            .unwrap();
        assert!(matches!(
            iter.element_entry("FID", &Value::Int(22)),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(iter.element_list_complete(true).is_err());
        iter.element_list_complete(false).unwrap();
        assert!(iter.is_empty());
    }

    #[test]
    fn test_missing_set_definition() {
        let mut iter = EncodeIterator::new(64);
        assert_eq!(
            iter.element_list_init(&ElementList::set_data(3), Some(&set_db())),
            Err(CodecError::SetDefinitionNotFound(3))
        );
    }

    #[test]
    fn test_series_entry_rollback() {
        let mut iter = EncodeIterator::new(256);
        iter.series_init(&Series::new(DataType::ElementList)).unwrap();
        iter.series_entry_init().unwrap();
        iter.element_list_init(&ElementList::standard(), None).unwrap();
        iter.element_entry("A", &Value::Uint(7)).unwrap();
        iter.element_list_complete(true).unwrap();
        iter.series_entry_complete(true).unwrap();
        let after_first = iter.len();

        iter.series_entry_init().unwrap();
        iter.element_list_init(&ElementList::standard(), None).unwrap();
        iter.element_list_complete(false).unwrap();
        iter.series_entry_complete(false).unwrap();
        assert_eq!(iter.len(), after_first);

        iter.series_complete(true).unwrap();
        let bytes = iter.finish();
        assert_eq!(&bytes[2..4], &[0x00, 0x01]);
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let mut iter = EncodeIterator::new(12);
        iter.element_list_init(&ElementList::standard(), None).unwrap();
        let before = iter.len();
        let err = iter
            .element_entry("LONGNAME", &Value::Ascii("Bid price"))
            .unwrap_err();
        assert!(matches!(err, CodecError::BufferTooSmall { .. }));
        assert_eq!(iter.len(), before);
    }

    #[test]
    fn test_series_sections_in_order() {
        let db = set_db();
        let mut iter = EncodeIterator::new(256);
        let series = Series::new(DataType::ElementList)
            .with_set_defs()
            .with_summary_data()
            .with_total_count_hint(2);
        iter.series_init(&series).unwrap();
        assert!(iter.series_entry_init().is_err());
        iter.encode_element_set_def_db(&db).unwrap();
        iter.series_set_defs_complete(true).unwrap();
        assert!(iter.series_complete(true).is_err());
        iter.element_list_init(&ElementList::standard(), None).unwrap();
        iter.element_entry("Type", &Value::Int(1)).unwrap();
        iter.element_list_complete(true).unwrap();
        iter.series_summary_data_complete(true).unwrap();
        iter.series_complete(true).unwrap();
        assert_eq!(iter.depth(), 0);
        assert_eq!(iter.as_bytes()[0], series.flags);
        assert_eq!(iter.as_bytes()[1], DataType::ElementList.code());
    }

    #[test]
    fn test_array_fixed_items() {
        let mut iter = EncodeIterator::new(64);
        iter.array_init(&Array::new(DataType::Int).with_item_length(2))
            .unwrap();
        iter.array_entry(&Value::Int(-2)).unwrap();
        iter.array_entry(&Value::Int(300)).unwrap();
        iter.array_complete(true).unwrap();
        assert_eq!(
            iter.as_bytes(),
            &[3, 2, 0x00, 0x02, 0xFF, 0xFE, 0x01, 0x2C]
        );
        assert!(
            EncodeIterator::new(8)
                .array_init(&Array::new(DataType::AsciiString).with_item_length(3))
                .is_err()
        );
    }

    #[test]
    fn test_take_resets_for_next_part() {
        let mut iter = EncodeIterator::new(32);
        iter.array_init(&Array::new(DataType::Enum)).unwrap();
        iter.array_entry(&Value::Enum(1)).unwrap();
        iter.array_complete(true).unwrap();
        let part = iter.take();
        assert_eq!(part.len(), 6);
        assert!(iter.is_empty());
        assert_eq!(iter.remaining(), 32);
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Container step interfaces.
//!
//! Higher layers drive the encoder and decoder through these traits rather
//! than calling the iterators directly. Every provided method first reports
//! its step to [`ContainerEncoder::on_step`] / [`ContainerDecoder::on_step`];
//! an implementation that returns an error there makes that step fail before
//! any byte is touched. [`WireEncoder`] and [`WireDecoder`] accept every step.

use ironrwf_core::{CodecError, DataType};

use crate::container::{Array, ElementList, EntryStatus, Series, Value};
use crate::decoder::{
    ArrayEntries, ArrayView, DecodeIterator, ElementEntries, ElementEntry, ElementListView,
    SeriesEntries, SeriesView,
};
use crate::encoder::EncodeIterator;
use crate::set_def::ElementSetDefDb;

/// Nested encode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeStep {
    /// Series header.
    SeriesInit,
    /// Set-definition database.
    SetDefDb,
    /// End of the set-definition section.
    SetDefsComplete,
    /// End of the summary data.
    SummaryDataComplete,
    /// Series entry opened.
    SeriesEntryInit,
    /// Series entry closed.
    SeriesEntryComplete,
    /// Series closed.
    SeriesComplete,
    /// Element list header.
    ElementListInit,
    /// Primitive element entry.
    ElementEntry,
    /// Element entry holding a container opened.
    ElementEntryInit,
    /// Element entry holding a container closed.
    ElementEntryComplete,
    /// Element list closed.
    ElementListComplete,
    /// Array header.
    ArrayInit,
    /// Array item.
    ArrayEntry,
    /// Array closed.
    ArrayComplete,
}

/// Nested decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStep {
    /// Series header.
    Series,
    /// Set-definition database.
    SetDefDb,
    /// Series entry.
    SeriesEntry,
    /// Element list header.
    ElementList,
    /// Element entry.
    ElementEntry,
    /// Array header.
    Array,
    /// Array item.
    ArrayEntry,
}

/// Encoder for the container steps.
///
/// Completing a level with `success = false` rolls it back; those calls are
/// not reported to `on_step` so that error paths always clean up.
pub trait ContainerEncoder {
    /// Called before each step.
    ///
    /// # Errors
    /// An error fails the step.
    fn on_step(&mut self, _step: EncodeStep) -> Result<(), CodecError> {
        Ok(())
    }

    /// Opens a series.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_init(&mut self, iter: &mut EncodeIterator, series: &Series) -> Result<(), CodecError> {
        self.on_step(EncodeStep::SeriesInit)?;
        iter.series_init(series)
    }

    /// Writes the series set-definition database.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn encode_set_def_db(
        &mut self,
        iter: &mut EncodeIterator,
        db: &ElementSetDefDb,
    ) -> Result<(), CodecError> {
        self.on_step(EncodeStep::SetDefDb)?;
        iter.encode_element_set_def_db(db)
    }

    /// Closes the set-definition section.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_set_defs_complete(
        &mut self,
        iter: &mut EncodeIterator,
        success: bool,
    ) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::SetDefsComplete)?;
        }
        iter.series_set_defs_complete(success)
    }

    /// Closes the summary data.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_summary_data_complete(
        &mut self,
        iter: &mut EncodeIterator,
        success: bool,
    ) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::SummaryDataComplete)?;
        }
        iter.series_summary_data_complete(success)
    }

    /// Opens a series entry.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_entry_init(&mut self, iter: &mut EncodeIterator) -> Result<(), CodecError> {
        self.on_step(EncodeStep::SeriesEntryInit)?;
        iter.series_entry_init()
    }

    /// Closes a series entry.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_entry_complete(
        &mut self,
        iter: &mut EncodeIterator,
        success: bool,
    ) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::SeriesEntryComplete)?;
        }
        iter.series_entry_complete(success)
    }

    /// Closes a series.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn series_complete(&mut self, iter: &mut EncodeIterator, success: bool) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::SeriesComplete)?;
        }
        iter.series_complete(success)
    }

    /// Opens an element list.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn element_list_init(
        &mut self,
        iter: &mut EncodeIterator,
        list: &ElementList,
        set_db: Option<&ElementSetDefDb>,
    ) -> Result<(), CodecError> {
        self.on_step(EncodeStep::ElementListInit)?;
        iter.element_list_init(list, set_db)
    }

    /// Writes a primitive element entry.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn element_entry(
        &mut self,
        iter: &mut EncodeIterator,
        name: &str,
        value: &Value<'_>,
    ) -> Result<EntryStatus, CodecError> {
        self.on_step(EncodeStep::ElementEntry)?;
        iter.element_entry(name, value)
    }

    /// Opens an element entry holding a container.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn element_entry_init(
        &mut self,
        iter: &mut EncodeIterator,
        name: &str,
        data_type: DataType,
    ) -> Result<(), CodecError> {
        self.on_step(EncodeStep::ElementEntryInit)?;
        iter.element_entry_init(name, data_type)
    }

    /// Closes an element entry holding a container.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn element_entry_complete(
        &mut self,
        iter: &mut EncodeIterator,
        success: bool,
    ) -> Result<EntryStatus, CodecError> {
        if success {
            self.on_step(EncodeStep::ElementEntryComplete)?;
        }
        iter.element_entry_complete(success)
    }

    /// Closes an element list.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn element_list_complete(
        &mut self,
        iter: &mut EncodeIterator,
        success: bool,
    ) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::ElementListComplete)?;
        }
        iter.element_list_complete(success)
    }

    /// Opens an array.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn array_init(&mut self, iter: &mut EncodeIterator, array: &Array) -> Result<(), CodecError> {
        self.on_step(EncodeStep::ArrayInit)?;
        iter.array_init(array)
    }

    /// Writes an array item.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn array_entry(&mut self, iter: &mut EncodeIterator, value: &Value<'_>) -> Result<(), CodecError> {
        self.on_step(EncodeStep::ArrayEntry)?;
        iter.array_entry(value)
    }

    /// Closes an array.
    ///
    /// # Errors
    /// Returns the step or encoder error.
    fn array_complete(&mut self, iter: &mut EncodeIterator, success: bool) -> Result<(), CodecError> {
        if success {
            self.on_step(EncodeStep::ArrayComplete)?;
        }
        iter.array_complete(success)
    }
}

/// Decoder for the container steps.
pub trait ContainerDecoder {
    /// Called before each step.
    ///
    /// # Errors
    /// An error fails the step.
    fn on_step(&mut self, _step: DecodeStep) -> Result<(), CodecError> {
        Ok(())
    }

    /// Parses the bound bytes as a series.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn decode_series<'a>(&mut self, iter: &DecodeIterator<'a>) -> Result<SeriesView<'a>, CodecError> {
        self.on_step(DecodeStep::Series)?;
        iter.decode_series()
    }

    /// Decodes the series set-definition database.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn decode_set_def_db(
        &mut self,
        series: &SeriesView<'_>,
    ) -> Result<Option<ElementSetDefDb>, CodecError> {
        self.on_step(DecodeStep::SetDefDb)?;
        series.set_def_db()
    }

    /// Reads the next series entry.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn next_series_entry<'a>(
        &mut self,
        entries: &mut SeriesEntries<'a>,
    ) -> Result<Option<&'a [u8]>, CodecError> {
        self.on_step(DecodeStep::SeriesEntry)?;
        entries.next().transpose()
    }

    /// Parses an element list.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn decode_element_list<'a>(
        &mut self,
        data: &'a [u8],
        set_db: Option<&'a ElementSetDefDb>,
    ) -> Result<ElementListView<'a>, CodecError> {
        self.on_step(DecodeStep::ElementList)?;
        ElementListView::decode(data, set_db)
    }

    /// Reads the next element entry.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn next_element_entry<'a>(
        &mut self,
        entries: &mut ElementEntries<'a>,
    ) -> Result<Option<ElementEntry<'a>>, CodecError> {
        self.on_step(DecodeStep::ElementEntry)?;
        entries.next().transpose()
    }

    /// Parses an array.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn decode_array<'a>(&mut self, data: &'a [u8]) -> Result<ArrayView<'a>, CodecError> {
        self.on_step(DecodeStep::Array)?;
        ArrayView::decode(data)
    }

    /// Reads the next array item.
    ///
    /// # Errors
    /// Returns the step or decoder error.
    fn next_array_entry<'a>(
        &mut self,
        entries: &mut ArrayEntries<'a>,
    ) -> Result<Option<&'a [u8]>, CodecError> {
        self.on_step(DecodeStep::ArrayEntry)?;
        entries.next().transpose()
    }
}

/// Encoder that forwards every step to the iterator.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireEncoder;

impl ContainerEncoder for WireEncoder {}

/// Decoder that forwards every step to the views.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireDecoder;

impl ContainerDecoder for WireDecoder {}

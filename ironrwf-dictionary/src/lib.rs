/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronRwf Dictionary
//!
//! Field and enumerated type dictionaries for the IronRwf codec.
//!
//! This crate provides:
//! - **Dictionary model**: [`DictionaryEntry`], [`EnumType`], [`EnumTypeTable`]
//!   and the fid-indexed [`DataDictionary`]
//! - **Text loaders**: `RDMFieldDictionary` and `enumtype.def` style files
//! - **Encode engine**: resumable multi-part encoding at two verbosity levels
//! - **Decode engine**: rebuilding a dictionary from encoded parts

pub mod config;
pub mod decode;
pub mod dictionary;
pub mod encode;
pub mod entry;
pub mod enum_table;
mod loader;
pub mod names;

#[cfg(test)]
mod fixtures;

pub use config::{DEFAULT_ENTRY_HEADROOM, EncodeConfig, EncodeConfigBuilder};
pub use decode::{extract_dictionary_type, extract_dictionary_type_with};
pub use dictionary::{DataDictionary, EnumInfo, FieldInfo, MAX_ENUM_TABLES};
pub use encode::{EncodeStatus, encode_data_dict_entry, enum_set_def, field_set_def};
pub use entry::{DictionaryEntry, MAX_FID, MIN_FID};
pub use enum_table::{EnumType, EnumTypeTable};

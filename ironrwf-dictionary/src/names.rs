/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Element names used in encoded dictionaries.

/// Summary: dictionary type.
pub const DICT_TYPE: &str = "Type";
/// Summary: dictionary id.
pub const DICTIONARY_ID: &str = "DictionaryId";
/// Summary: dictionary version.
pub const DICT_VERSION: &str = "Version";
/// Summary: enum RT version.
pub const ENUM_RT_VERSION: &str = "RT_Version";
/// Summary: enum DT version.
pub const ENUM_DT_VERSION: &str = "DT_Version";

/// Field row: acronym.
pub const FIELD_NAME: &str = "NAME";
/// Field row: fid.
pub const FIELD_ID: &str = "FID";
/// Field row: ripple target.
pub const FIELD_RIPPLETO: &str = "RIPPLETO";
/// Field row: legacy field type.
pub const FIELD_TYPE: &str = "TYPE";
/// Field row: display length.
pub const FIELD_LENGTH: &str = "LENGTH";
/// Field row: wire type.
pub const FIELD_RWFTYPE: &str = "RWFTYPE";
/// Field row: wire length.
pub const FIELD_RWFLEN: &str = "RWFLEN";
/// Field row: enum length.
pub const FIELD_ENUMLENGTH: &str = "ENUMLENGTH";
/// Field row: DDE acronym.
pub const FIELD_LONGNAME: &str = "LONGNAME";

/// Enum row: referencing fids.
pub const ENUM_FIDS: &str = "FIDS";
/// Enum row: referencing fids, legacy name.
pub const ENUM_FID: &str = "FID";
/// Enum row: values.
pub const ENUM_VALUE: &str = "VALUE";
/// Enum row: values, legacy name.
pub const ENUM_VALUES: &str = "VALUES";
/// Enum row: displays.
pub const ENUM_DISPLAY: &str = "DISPLAY";
/// Enum row: displays, legacy name.
pub const ENUM_DISPLAYS: &str = "DISPLAYS";
/// Enum row: meanings.
pub const ENUM_MEANING: &str = "MEANING";

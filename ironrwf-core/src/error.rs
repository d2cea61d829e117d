/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the IronRwf codec.
//!
//! This module provides a unified error hierarchy using `thiserror`:
//! - [`CodecError`]: wire-level failures raised by primitives and containers
//! - [`DictionaryError`]: logical failures raised while loading, encoding or
//!   decoding a data dictionary
//! - [`RwfError`]: top-level error wrapping both

use thiserror::Error;

/// Result type alias using [`RwfError`] as the error type.
pub type Result<T> = std::result::Result<T, RwfError>;

/// Top-level error type for all IronRwf operations.
#[derive(Debug, Error)]
pub enum RwfError {
    /// Error in the container or primitive codec.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error in dictionary load, encode or decode.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// I/O error from reading dictionary files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the wire codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Output buffer capacity would be exceeded by the write.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes needed to complete the write.
        needed: usize,
        /// Bytes still available in the buffer.
        available: usize,
    },

    /// Input ended before the structure being decoded was complete.
    #[error("incomplete data, need more bytes")]
    IncompleteData,

    /// A value or call argument is outside what the wire format can express.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Decoded bytes are structurally invalid.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The data type code is not supported in this position.
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(u8),

    /// An encode step was called out of order.
    #[error("unexpected encoder call: {0}")]
    UnexpectedEncoderCall(&'static str),

    /// The set id used by an element list is not defined.
    #[error("set definition not found: {0}")]
    SetDefinitionNotFound(u16),

    /// No buffer is bound to the decode iterator.
    #[error("no data bound to iterator")]
    NoData,
}

/// Errors raised by dictionary operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// Encode was attempted on a dictionary that holds nothing.
    #[error("dictionary is not initialized")]
    NotInitialized,

    /// Field id 0 is reserved.
    #[error("fid 0 is reserved")]
    ReservedFid,

    /// Field id does not fit in the signed 16-bit range.
    #[error("fid {value} out of range")]
    FidOutOfRange {
        /// The parsed value.
        value: i64,
    },

    /// Field id already defined.
    #[error("duplicate definition for fid {fid}")]
    DuplicateFid {
        /// The duplicated field id.
        fid: i16,
    },

    /// Entry carries an unknown wire type.
    #[error("fid {fid} has an unknown rwf type")]
    InvalidRwfType {
        /// The offending field id.
        fid: i16,
    },

    /// Field and enum definitions disagree on the acronym of a fid.
    #[error("acronym mismatch for fid {fid}: '{expected}' vs '{found}'")]
    AcronymMismatch {
        /// The field id.
        fid: i16,
        /// Acronym already known.
        expected: String,
        /// Acronym being added.
        found: String,
    },

    /// Field id already references an enum table.
    #[error("fid {fid} already references an enum table")]
    DuplicateEnumReference {
        /// The field id.
        fid: i16,
    },

    /// Enum value appears twice in one table.
    #[error("duplicate enum value {value}")]
    DuplicateEnumValue {
        /// The duplicated value.
        value: u16,
    },

    /// Enum table has no referencing fids.
    #[error("enum table has no referencing fids")]
    NoReferencingFids,

    /// Enum table limit reached.
    #[error("too many enum tables, maximum is {max}")]
    TooManyEnumTables {
        /// Maximum number of tables.
        max: usize,
    },

    /// Malformed line in a dictionary file.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Dictionary file could not be opened.
    #[error("cannot open '{path}': {reason}")]
    FileOpen {
        /// Path that was requested.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// Payload declares a dictionary type other than the one being decoded.
    #[error("dictionary type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type code.
        expected: i64,
        /// Type code found.
        found: i64,
    },

    /// Payload declares a dictionary id different from one already loaded.
    #[error("dictionary id mismatch: found {found}, previously {previous}")]
    DictionaryIdMismatch {
        /// Id found in the payload.
        found: i64,
        /// Id already set on the dictionary.
        previous: i64,
    },

    /// Element carries an unexpected data type.
    #[error("element '{name}' has unexpected data type {data_type}")]
    InvalidElement {
        /// Element name.
        name: String,
        /// Data type code found.
        data_type: u8,
    },

    /// Series does not contain element lists.
    #[error("unexpected container type {found}")]
    UnexpectedContainer {
        /// Container type code found.
        found: u8,
    },

    /// Series has no summary data.
    #[error("series has no summary data")]
    MissingSummary,

    /// Required element absent.
    #[error("missing element '{name}'")]
    MissingElement {
        /// Element name.
        name: &'static str,
    },

    /// Enum row value and display arrays disagree in length.
    #[error("enum row has {values} values but {displays} displays")]
    EnumCountMismatch {
        /// Number of values.
        values: usize,
        /// Number of displays.
        displays: usize,
    },

    /// Error propagated from the codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl DictionaryError {
    /// Returns true if the error means the input was truncated.
    ///
    /// Callers may retry with a longer buffer; any other error is terminal.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Codec(CodecError::IncompleteData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::BufferTooSmall {
            needed: 10,
            available: 4,
        };
        assert_eq!(err.to_string(), "buffer too small: need 10 bytes, have 4");
    }

    #[test]
    fn test_rwf_error_from_codec() {
        let err: RwfError = CodecError::IncompleteData.into();
        assert!(matches!(err, RwfError::Codec(CodecError::IncompleteData)));
    }

    #[test]
    fn test_dictionary_error_is_incomplete() {
        let err: DictionaryError = CodecError::IncompleteData.into();
        assert!(err.is_incomplete());
        assert!(!DictionaryError::NotInitialized.is_incomplete());
        assert!(!DictionaryError::Codec(CodecError::NoData).is_incomplete());
    }

    #[test]
    fn test_parse_error_display() {
        let err = DictionaryError::Parse {
            line: 12,
            reason: "missing fid".to_string(),
        };
        assert_eq!(err.to_string(), "line 12: missing fid");
    }

    #[test]
    fn test_transparent_codec_display() {
        let err = DictionaryError::Codec(CodecError::NoData);
        assert_eq!(err.to_string(), "no data bound to iterator");
    }
}

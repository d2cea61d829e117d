/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronRwf
//!
//! RWF market data codec for Rust: `Real` numerics, the container layer and
//! the field and enumerated type data dictionary.
//!
//! ## Features
//!
//! - **Exact numerics**: [`core::Real`] keeps a 64-bit mantissa and a hint
//!   (power-of-ten exponent, binary fraction or sentinel)
//! - **Bounded encoding**: every container rolls back when it does not fit
//! - **Zero-copy decoding**: views borrow the encoded bytes
//! - **Data dictionary**: text loaders plus resumable multi-part encoding
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ironrwf::prelude::*;
//!
//! let mut dictionary = DataDictionary::new();
//! dictionary.load_field_dictionary("RDMFieldDictionary")?;
//!
//! let config = EncodeConfig::new().with_verbosity(Verbosity::Normal);
//! let mut current_fid = dictionary.min_fid();
//! loop {
//!     let mut iter = EncodeIterator::new(6144);
//!     let status = dictionary.encode_field_dictionary(&mut iter, &mut current_fid, &config)?;
//!     send(iter.finish());
//!     if status == EncodeStatus::Complete {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Error types, `Real`, and wire-level enums
//! - [`codec`]: Encode/decode iterators and containers
//! - [`dictionary`]: Data dictionary model, loaders and engines

pub mod core {
    //! Error types, `Real`, and wire-level enums.
    pub use ironrwf_core::*;
}

pub mod codec {
    //! Encode/decode iterators and containers.
    pub use ironrwf_codec::*;
}

pub mod dictionary {
    //! Data dictionary model, loaders and engines.
    pub use ironrwf_dictionary::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ironrwf_core::{
        CodecError, DataType, Date, DictionaryError, DictionaryType, MfFieldType, Real, RealHint,
        Result, RwfError, Verbosity,
    };

    // Codec
    pub use ironrwf_codec::{
        ContainerDecoder, ContainerEncoder, DecodeIterator, EncodeIterator, WireDecoder,
        WireEncoder,
    };

    // Dictionary
    pub use ironrwf_dictionary::{
        DataDictionary, DictionaryEntry, EncodeConfig, EncodeConfigBuilder, EncodeStatus,
        EnumType, EnumTypeTable, extract_dictionary_type,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _real = Real::new(1250, RealHint::ExponentMinus2);
        let _config = EncodeConfig::new();
        let dictionary = DataDictionary::new();
        assert!(!dictionary.is_initialized());
    }

    #[test]
    fn test_errors_convert() {
        let err: RwfError = DictionaryError::NotInitialized.into();
        assert!(matches!(err, RwfError::Dictionary(_)));
        let codec: RwfError = CodecError::NoData.into();
        assert!(matches!(codec, RwfError::Codec(_)));
    }

    #[test]
    fn test_real_display() {
        let real = Real::new(1250, RealHint::ExponentMinus2);
        assert_eq!(real.to_string(), "12.50");
    }
}

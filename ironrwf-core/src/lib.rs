/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronRwf Core
//!
//! Core types, numeric value codec, and error definitions for the IronRwf
//! market data codec.
//!
//! This crate provides the fundamental building blocks used across all IronRwf crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Real**: Scaled decimal with exponent, fraction and sentinel hints
//! - **Wire types**: `DataType`, `MfFieldType`, `Verbosity`, `DictionaryType`, `Date`
//!
//! ## Exactness
//!
//! A [`Real`] never silently truncates: conversions that would overflow the
//! 64-bit mantissa fail with [`CodecError::InvalidArgument`].

pub mod error;
pub mod real;
pub mod types;

pub use error::{CodecError, DictionaryError, Result, RwfError};
pub use real::{Real, RealHint};
pub use types::{DataType, Date, DictionaryType, MfFieldType, Verbosity};

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronRwf Codec
//!
//! Binary container and primitive codecs for the RWF wire format.
//!
//! ## Features
//!
//! - **Bounded encoding**: [`EncodeIterator`] never writes past its maximum
//!   size and rolls failed containers back
//! - **Zero-copy decoding**: [`DecodeIterator`] and the container views borrow
//!   the encoded bytes
//! - **Containers**: Element list, array and series, with local set
//!   definitions
//! - **Step traits**: [`ContainerEncoder`] and [`ContainerDecoder`] let callers
//!   observe or fail individual nested steps

pub mod container;
pub mod decoder;
pub mod encoder;
pub mod primitive;
pub mod set_def;
pub mod traits;

pub use container::{Array, ElementList, EntryStatus, Series, Value};
pub use decoder::{
    ArrayEntries, ArrayView, DecodeIterator, ElementEntries, ElementEntry, ElementListView,
    SeriesEntries, SeriesView,
};
pub use encoder::EncodeIterator;
pub use set_def::{ElementSetDef, ElementSetDefDb, ElementSetDefEntry, MAX_LOCAL_SET_DEFS};
pub use traits::{ContainerDecoder, ContainerEncoder, DecodeStep, EncodeStep, WireDecoder, WireEncoder};

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sample dictionary files shipped with the IronRwf examples.

use std::path::PathBuf;

/// Sample field dictionary file name.
pub const FIELD_DICTIONARY: &str = "RDMFieldDictionary";

/// Sample enum type dictionary file name.
pub const ENUM_TYPE_DICTIONARY: &str = "enumtype.def";

/// Returns the path of a file in the sample data directory.
///
/// `IRONRWF_DATA_DIR` overrides the directory.
#[must_use]
pub fn data_path(name: &str) -> PathBuf {
    std::env::var_os("IRONRWF_DATA_DIR")
        .map_or_else(
            || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
            PathBuf::from,
        )
        .join(name)
}

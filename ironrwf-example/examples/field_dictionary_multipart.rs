//! Multi-part field dictionary example.
//!
//! Loads the sample field dictionary, encodes it into bounded parts the way a
//! provider answers a dictionary request, and decodes every part into a
//! second dictionary.

mod common;

use common::{init_logging, part_size};
use ironrwf_codec::{DecodeIterator, EncodeIterator};
use ironrwf_core::Verbosity;
use ironrwf_dictionary::{DataDictionary, EncodeConfig, EncodeStatus, extract_dictionary_type};
use ironrwf_example::{FIELD_DICTIONARY, data_path};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(data_path(FIELD_DICTIONARY))?;
    info!(
        "Loaded {} fields (fid {}..={})",
        dictionary.number_of_entries(),
        dictionary.min_fid(),
        dictionary.max_fid()
    );

    let config = EncodeConfig::new().with_verbosity(Verbosity::Normal);
    let size = part_size();
    let mut current_fid = dictionary.min_fid();
    let mut parts = Vec::new();
    loop {
        let mut iter = EncodeIterator::new(size);
        let status = dictionary.encode_field_dictionary(&mut iter, &mut current_fid, &config)?;
        let part = iter.finish();
        info!("Part {}: {} bytes, next fid {}", parts.len() + 1, part.len(), current_fid);
        parts.push(part);
        if status == EncodeStatus::Complete {
            break;
        }
    }

    let kind = extract_dictionary_type(&DecodeIterator::new(&parts[0]))?;
    info!("First part carries {:?}", kind);

    let mut decoded = DataDictionary::new();
    for part in &parts {
        decoded.decode_field_dictionary(&DecodeIterator::new(part), Verbosity::Normal)?;
    }
    info!(
        "Decoded {} fields from {} parts, version {}",
        decoded.number_of_entries(),
        parts.len(),
        decoded.field_info().version
    );

    for entry in decoded.entries().take(5) {
        info!(
            "  {:>5} {:<12} {:?} ripples to {}",
            entry.fid, entry.acronym, entry.rwf_type, entry.ripple_to_field
        );
    }

    Ok(())
}

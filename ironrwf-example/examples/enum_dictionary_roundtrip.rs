//! Enum type dictionary round trip example.
//!
//! Loads both sample dictionaries, encodes the enum tables over several parts
//! at `Verbose` detail, decodes them and resolves a few values through the
//! field definitions.

mod common;

use common::{hex, init_logging, part_size};
use ironrwf_codec::{DecodeIterator, EncodeIterator};
use ironrwf_core::Verbosity;
use ironrwf_dictionary::{DataDictionary, EncodeConfig, EncodeStatus};
use ironrwf_example::{ENUM_TYPE_DICTIONARY, FIELD_DICTIONARY, data_path};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(data_path(FIELD_DICTIONARY))?;
    dictionary.load_enum_type_dictionary(data_path(ENUM_TYPE_DICTIONARY))?;
    info!(
        "Loaded {} enum tables, DT version {}",
        dictionary.enum_table_count(),
        dictionary.enum_info().dt_version
    );

    let config = EncodeConfig::new().with_verbosity(Verbosity::Verbose);
    let mut decoded = DataDictionary::new();
    decoded.load_field_dictionary(data_path(FIELD_DICTIONARY))?;

    let mut current_table = 0;
    let mut parts = 0;
    loop {
        let mut iter = EncodeIterator::new(part_size());
        let status = dictionary.encode_enum_type_dictionary_as_multi_part(
            &mut iter,
            &mut current_table,
            &config,
        )?;
        let part = iter.finish();
        parts += 1;
        info!("Part {}: {} bytes, next table {}", parts, part.len(), current_table);
        decoded.decode_enum_type_dictionary(&DecodeIterator::new(&part), Verbosity::Verbose)?;
        if status == EncodeStatus::Complete {
            break;
        }
    }

    for acronym in ["RDN_EXCHID", "PRCTCK_1", "CURRENCY"] {
        let Some(entry) = decoded.entry_by_acronym(acronym) else {
            continue;
        };
        let Some(table) = decoded.entry_enum_table(entry) else {
            continue;
        };
        info!("{} (fid {}):", acronym, entry.fid);
        for value in table.enum_types() {
            match value.display_str() {
                Some(text) => info!("  {:>4} {:?} {}", value.value, text, value.meaning),
                None => info!("  {:>4} #{}# {}", value.value, hex(&value.display), value.meaning),
            }
        }
    }

    Ok(())
}

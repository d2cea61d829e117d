/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Text dictionary loaders.
//!
//! Field dictionaries hold one definition per row:
//!
//! ```text
//! !tag Type 1
//! BID  "BID"  22  BID_1  PRICE  17  REAL64  7
//! ```
//!
//! Enum type dictionaries list `ACRONYM FID` rows followed by the
//! `VALUE DISPLAY [MEANING]` rows of the table those fields share.
//! Lines starting with `!` are comments unless they start with `!tag`.

use std::path::Path;

use bytes::Bytes;
use ironrwf_core::{DataType, DictionaryError, MfFieldType};
use memchr::{memchr, memchr_iter};
use tracing::{debug, warn};

use crate::dictionary::DataDictionary;
use crate::entry::DictionaryEntry;
use crate::enum_table::{EnumType, EnumTypeTable};

const FIELD_TYPES: &[(&str, MfFieldType)] = &[
    ("INTEGER", MfFieldType::Integer),
    ("ALPHANUMERIC", MfFieldType::Alphanumeric),
    ("ENUMERATED", MfFieldType::Enumerated),
    ("TIME_SECONDS", MfFieldType::TimeSeconds),
    ("TIME", MfFieldType::Time),
    ("PRICE", MfFieldType::Price),
    ("DATE", MfFieldType::Date),
    ("BINARY", MfFieldType::Binary),
    ("NONE", MfFieldType::None),
];

// Matched by prefix in this order, so `UINT64` is UINT and `DATETIME` is
// not taken for DATE.
const RWF_TYPES: &[(&str, DataType)] = &[
    ("UINT", DataType::Uint),
    ("INT", DataType::Int),
    ("REAL", DataType::Real),
    ("FLOAT", DataType::Float),
    ("DOUBLE", DataType::Double),
    ("DATETIME", DataType::DateTime),
    ("DATE_TIME", DataType::DateTime),
    ("DATE", DataType::Date),
    ("TIME", DataType::Time),
    ("QOS", DataType::Qos),
    ("STATE", DataType::State),
    ("STATUS", DataType::State),
    ("ENUM", DataType::Enum),
    ("ARRAY", DataType::Array),
    ("BUFFER", DataType::Buffer),
    ("ASCII_STRING", DataType::AsciiString),
    ("UTF8_STRING", DataType::Utf8String),
    ("RMTES_STRING", DataType::RmtesString),
    ("VECTOR", DataType::Vector),
    ("MAP", DataType::Map),
    ("SERIES", DataType::Series),
    ("FIELD_LIST", DataType::FieldList),
    ("FILTER_LIST", DataType::FilterList),
    ("ELEMENT_LIST", DataType::ElementList),
    ("ELEM_LIST", DataType::ElementList),
    ("XML", DataType::Xml),
    ("ANSI_PAGE", DataType::AnsiPage),
    ("OPAQUE", DataType::Opaque),
    ("MSG", DataType::Msg),
];

fn match_prefix<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(prefix, _)| token.starts_with(prefix))
        .map(|&(_, value)| value)
}

/// Splits text into numbered lines with trailing `\r` removed.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let bytes = text.as_bytes();
    let mut start = 0;
    let ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    ends.filter_map(move |end| {
        if start > bytes.len() {
            return None;
        }
        let line = &text[start..end];
        start = end + 1;
        Some(line.strip_suffix('\r').unwrap_or(line))
    })
    .enumerate()
    .map(|(i, line)| (i + 1, line))
}

fn parse_error(line: usize, reason: impl Into<String>) -> DictionaryError {
    DictionaryError::Parse {
        line,
        reason: reason.into(),
    }
}

/// Whitespace-separated cursor over one line.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn token(&mut self) -> Option<&'a str> {
        self.skip_ws();
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }

    /// Reads text between `delimiter` bytes.
    fn delimited(&mut self, delimiter: u8) -> Option<&'a str> {
        self.delimited_pair(delimiter, delimiter)
    }

    fn delimited_pair(&mut self, open: u8, close: u8) -> Option<&'a str> {
        self.skip_ws();
        let body = self.rest.strip_prefix(char::from(open))?;
        let end = memchr(close, body.as_bytes())?;
        let inner = &body[..end];
        self.rest = &body[end + 1..];
        Some(inner)
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest.chars().next()
    }

    fn remainder(&self) -> &'a str {
        self.rest.trim()
    }
}

/// Splits a `!tag Name Value` line.
fn tag_line(line: &str) -> Option<(&str, &str)> {
    let mut cursor = Cursor::new(line.strip_prefix("!tag")?);
    let name = cursor.token()?;
    Some((name, cursor.remainder()))
}

fn set_once(slot: &mut String, value: &str) {
    if slot.is_empty() {
        *slot = value.to_string();
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    fn nibble(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }
    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn read_file(path: &Path) -> Result<String, DictionaryError> {
    std::fs::read_to_string(path).map_err(|e| DictionaryError::FileOpen {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_fid(token: Option<&str>, line: usize, what: &str) -> Result<i16, DictionaryError> {
    let value: i64 = token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_error(line, format!("cannot find {what}")))?;
    i16::try_from(value).map_err(|_| DictionaryError::FidOutOfRange { value })
}

fn parse_type_tag(value: &str, line: usize, expected: i64) -> Result<(), DictionaryError> {
    let found: i64 = value
        .parse()
        .map_err(|_| parse_error(line, format!("invalid Type '{value}'")))?;
    if found != expected {
        return Err(DictionaryError::TypeMismatch { expected, found });
    }
    Ok(())
}

fn parse_id_tag(value: &str, line: usize) -> Result<i64, DictionaryError> {
    value
        .parse()
        .map_err(|_| parse_error(line, format!("invalid DictionaryId '{value}'")))
}

/// Parses one field row, returning the entry and its pending ripple acronym.
fn parse_field_row(
    text: &str,
    line: usize,
) -> Result<(DictionaryEntry, Option<&str>), DictionaryError> {
    let mut cursor = Cursor::new(text);

    let acronym = cursor
        .token()
        .ok_or_else(|| parse_error(line, "cannot find acronym"))?;
    let dde_acronym = cursor
        .delimited(b'"')
        .filter(|s| !s.is_empty())
        .ok_or_else(|| parse_error(line, "cannot find DDE acronym"))?;
    let fid = parse_fid(cursor.token(), line, "fid")?;

    let ripples_to = cursor
        .token()
        .ok_or_else(|| parse_error(line, "cannot find ripples to"))?;
    let ripples_to = (ripples_to != "NULL").then_some(ripples_to);

    let field_token = cursor
        .token()
        .ok_or_else(|| parse_error(line, "cannot find field type"))?;
    let field_type = match_prefix(FIELD_TYPES, field_token)
        .ok_or_else(|| parse_error(line, format!("unknown field type '{field_token}'")))?;

    let length: u16 = cursor
        .token()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_error(line, "cannot find length"))?;

    let mut enum_length = 0;
    if cursor.peek() == Some('(') {
        enum_length = cursor
            .delimited_pair(b'(', b')')
            .and_then(|inner| inner.trim().parse::<u8>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| parse_error(line, "cannot find enum length"))?;
    }

    let rwf_token = cursor
        .token()
        .ok_or_else(|| parse_error(line, "cannot find rwf type"))?;
    let rwf_type = match_prefix(RWF_TYPES, rwf_token)
        .ok_or_else(|| parse_error(line, format!("illegal rwf type '{rwf_token}'")))?;

    let rwf_length: u16 = cursor
        .token()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_error(line, "cannot find rwf length"))?;

    let entry = DictionaryEntry::new(fid, acronym, rwf_type)
        .with_dde_acronym(dde_acronym)
        .with_field_type(field_type)
        .with_length(length)
        .with_enum_length(enum_length)
        .with_rwf_length(rwf_length);
    Ok((entry, ripples_to))
}

/// Parses a `VALUE DISPLAY [MEANING]` row whose value is already read.
fn parse_value_row(
    value: u16,
    cursor: &mut Cursor<'_>,
    line: usize,
) -> Result<EnumType, DictionaryError> {
    let display = match cursor.peek() {
        Some('"') => {
            let text = cursor
                .delimited(b'"')
                .filter(|s| !s.is_empty())
                .ok_or_else(|| parse_error(line, "missing display"))?;
            Bytes::copy_from_slice(text.as_bytes())
        }
        Some('#') => {
            let hex = cursor
                .delimited(b'#')
                .ok_or_else(|| parse_error(line, "unterminated hexadecimal display"))?;
            if hex.len() % 2 != 0 {
                return Err(parse_error(line, "odd-length hexadecimal input"));
            }
            let raw =
                decode_hex(hex).ok_or_else(|| parse_error(line, "invalid hexadecimal input"))?;
            Bytes::from(raw)
        }
        _ => return Err(parse_error(line, "missing display")),
    };
    Ok(EnumType::new(value, display).with_meaning(cursor.remainder()))
}

impl DataDictionary {
    /// Loads a field dictionary file.
    ///
    /// # Errors
    /// Returns `DictionaryError::FileOpen` if the file cannot be read, or any
    /// error of [`DataDictionary::load_field_dictionary_str`].
    pub fn load_field_dictionary(&mut self, path: impl AsRef<Path>) -> Result<(), DictionaryError> {
        let path = path.as_ref();
        let text = read_file(path).inspect_err(|e| warn!("{}", e))?;
        self.load_field_dictionary_str(&text)
            .inspect_err(|e| warn!("field dictionary {}: {}", path.display(), e))?;
        debug!(
            "Loaded field dictionary {} ({} entries)",
            path.display(),
            self.number_of_entries()
        );
        Ok(())
    }

    /// Loads field definitions from text.
    ///
    /// The dictionary is left unchanged when the text is rejected.
    ///
    /// # Errors
    /// Returns `DictionaryError::Parse` for a malformed row or tag,
    /// `FidOutOfRange`, `TypeMismatch` for a `Type` tag other than 1,
    /// `DictionaryIdMismatch`, or any error of [`DataDictionary::add_field`].
    pub fn load_field_dictionary_str(&mut self, text: &str) -> Result<(), DictionaryError> {
        self.staged(|dict| dict.load_field_rows(text))
    }

    fn load_field_rows(&mut self, text: &str) -> Result<(), DictionaryError> {
        let mut ripples: Vec<(i16, &str)> = Vec::new();

        for (line, raw) in numbered_lines(text) {
            let row = raw.trim_start();
            if row.is_empty() {
                continue;
            }
            if row.starts_with("!tag") {
                let Some((name, value)) = tag_line(row) else {
                    continue;
                };
                match name {
                    "Type" => parse_type_tag(value, line, 1)?,
                    "DictionaryId" => {
                        let id = parse_id_tag(value, line)?;
                        self.apply_dictionary_id(id)?;
                    }
                    "Version" => set_once(&mut self.field_info.version, value),
                    "Filename" => set_once(&mut self.field_info.filename, value),
                    "Desc" => set_once(&mut self.field_info.description, value),
                    "Build" => set_once(&mut self.field_info.build, value),
                    "Date" => set_once(&mut self.field_info.date, value),
                    _ => {}
                }
                continue;
            }
            if row.starts_with('!') {
                continue;
            }

            let (entry, ripples_to) = parse_field_row(row, line)?;
            let fid = entry.fid;
            self.add_field(entry)
                .inspect_err(|e| debug!("Rejected field row at line {}: {}", line, e))?;
            if let Some(acronym) = ripples_to {
                ripples.push((fid, acronym));
            }
        }

        for (fid, acronym) in ripples {
            let target = self.entry_by_acronym(acronym).map(|e| e.fid);
            match (target, self.entry_mut(fid)) {
                (Some(target), Some(entry)) => entry.ripple_to_field = target,
                _ => warn!("Fid {} ripples to unknown acronym '{}'", fid, acronym),
            }
        }

        self.mark_initialized();
        Ok(())
    }

    /// Loads an enum type dictionary file.
    ///
    /// # Errors
    /// Returns `DictionaryError::FileOpen` if the file cannot be read, or any
    /// error of [`DataDictionary::load_enum_type_dictionary_str`].
    pub fn load_enum_type_dictionary(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), DictionaryError> {
        let path = path.as_ref();
        let text = read_file(path).inspect_err(|e| warn!("{}", e))?;
        self.load_enum_type_dictionary_str(&text)
            .inspect_err(|e| warn!("enum type dictionary {}: {}", path.display(), e))?;
        debug!(
            "Loaded enum type dictionary {} ({} tables)",
            path.display(),
            self.enum_table_count()
        );
        Ok(())
    }

    /// Loads enum tables from text.
    ///
    /// The dictionary is left unchanged when the text is rejected.
    ///
    /// # Errors
    /// Returns `DictionaryError::Parse` for a malformed row, a negative
    /// value or a file without tables, `TypeMismatch` for a `Type` tag other
    /// than 2, `DuplicateEnumValue`, or any error of
    /// [`DataDictionary::add_table`].
    pub fn load_enum_type_dictionary_str(&mut self, text: &str) -> Result<(), DictionaryError> {
        self.staged(|dict| dict.load_enum_rows(text))
    }

    fn load_enum_rows(&mut self, text: &str) -> Result<(), DictionaryError> {
        let mut fids: Vec<(i16, &str)> = Vec::new();
        let mut values: Vec<EnumType> = Vec::new();
        let mut last_line = 0;

        for (line, raw) in numbered_lines(text) {
            last_line = line;
            let row = raw.trim_start();
            if row.is_empty() {
                continue;
            }
            if row.starts_with("!tag") {
                let Some((name, value)) = tag_line(row) else {
                    continue;
                };
                match name {
                    "Type" => parse_type_tag(value, line, 2)?,
                    "DictionaryId" => {
                        let id = parse_id_tag(value, line)?;
                        self.apply_dictionary_id(id)?;
                    }
                    "Filename" => set_once(&mut self.enum_info.filename, value),
                    "Desc" => set_once(&mut self.enum_info.description, value),
                    "Date" => set_once(&mut self.enum_info.date, value),
                    "RT_Version" => set_once(&mut self.enum_info.rt_version, value),
                    "DT_Version" => set_once(&mut self.enum_info.dt_version, value),
                    _ => {}
                }
                continue;
            }
            if row.starts_with('!') {
                continue;
            }
            if row.starts_with('"') {
                return Err(parse_error(line, "missing keyword"));
            }

            let mut cursor = Cursor::new(row);
            let first = cursor
                .token()
                .ok_or_else(|| parse_error(line, "missing keyword"))?;

            match first.parse::<i64>() {
                Ok(value) if value < 0 => {
                    return Err(parse_error(line, "enum value cannot be negative"));
                }
                Ok(value) => {
                    let value = u16::try_from(value)
                        .map_err(|_| parse_error(line, format!("enum value {value} too large")))?;
                    values.push(parse_value_row(value, &mut cursor, line)?);
                }
                Err(_) => {
                    if !values.is_empty() {
                        self.add_enum_rows(std::mem::take(&mut values), &fids, line)?;
                        fids.clear();
                    }
                    let fid = parse_fid(cursor.token(), line, "fid")?;
                    fids.push((fid, first));
                }
            }
        }

        if values.is_empty() {
            return Err(parse_error(last_line, "no enum table found"));
        }
        self.add_enum_rows(values, &fids, last_line)?;
        self.mark_initialized();
        Ok(())
    }

    fn add_enum_rows(
        &mut self,
        values: Vec<EnumType>,
        fids: &[(i16, &str)],
        line: usize,
    ) -> Result<(), DictionaryError> {
        let table = EnumTypeTable::from_values(values)?;
        self.add_table(table, fids)
            .inspect_err(|e| debug!("Rejected enum table ending at line {}: {}", line, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ENUM_TEXT, FIELD_TEXT};

    fn field_err(text: &str) -> DictionaryError {
        DataDictionary::new()
            .load_field_dictionary_str(text)
            .unwrap_err()
    }

    fn enum_err(text: &str) -> DictionaryError {
        DataDictionary::new()
            .load_enum_type_dictionary_str(text)
            .unwrap_err()
    }

    #[test]
    fn test_load_fields() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(FIELD_TEXT).unwrap();
        assert!(dict.is_initialized());
        assert_eq!(dict.number_of_entries(), 7);
        assert_eq!(dict.min_fid(), 1);
        assert_eq!(dict.max_fid(), 24);
        assert_eq!(dict.field_info().version, "4.20.29");
        assert_eq!(dict.field_info().filename, "RWF.DAT");
        assert_eq!(dict.field_info().description, "RDFD RWF field set");

        let perm = dict.entry(1).unwrap();
        assert_eq!(perm.rwf_type, DataType::Uint);
        assert_eq!(perm.dde_acronym, "PERMISSION");
        assert_eq!(perm.length, 5);
        assert_eq!(perm.rwf_length, 2);

        let exch = dict.entry(4).unwrap();
        assert_eq!(exch.field_type, MfFieldType::Enumerated);
        assert_eq!(exch.enum_length, 3);
        assert_eq!(exch.rwf_type, DataType::Enum);

        assert_eq!(dict.entry(3).unwrap().rwf_type, DataType::RmtesString);
        assert_eq!(dict.entry(16).unwrap().rwf_type, DataType::Date);
    }

    #[test]
    fn test_ripples_resolved_forward() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(FIELD_TEXT).unwrap();
        assert_eq!(dict.entry(22).unwrap().ripple_to_field, 23);
        assert_eq!(dict.entry(23).unwrap().ripple_to_field, 24);
        assert_eq!(dict.entry(24).unwrap().ripple_to_field, 0);
    }

    #[test]
    fn test_first_tag_value_kept() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str("!tag Version 1.0\n!tag Version 2.0\n")
            .unwrap();
        assert_eq!(dict.field_info().version, "1.0");
    }

    #[test]
    fn test_rwf_type_prefixes() {
        assert_eq!(match_prefix(RWF_TYPES, "UINT64"), Some(DataType::Uint));
        assert_eq!(match_prefix(RWF_TYPES, "INT32"), Some(DataType::Int));
        assert_eq!(match_prefix(RWF_TYPES, "REAL64"), Some(DataType::Real));
        assert_eq!(match_prefix(RWF_TYPES, "DATETIME"), Some(DataType::DateTime));
        assert_eq!(match_prefix(RWF_TYPES, "DATE"), Some(DataType::Date));
        assert_eq!(match_prefix(RWF_TYPES, "STATUS"), Some(DataType::State));
        assert_eq!(match_prefix(RWF_TYPES, "ELEM_LIST"), Some(DataType::ElementList));
        assert_eq!(match_prefix(RWF_TYPES, "BOGUS"), None);
        assert_eq!(
            match_prefix(FIELD_TYPES, "TIME_SECONDS"),
            Some(MfFieldType::TimeSeconds)
        );
        assert_eq!(match_prefix(FIELD_TYPES, "TIME"), Some(MfFieldType::Time));
    }

    #[test]
    fn test_fid_endpoints_load() {
        let text = "\
LOW  \"LOW\"  -32768  NULL  INTEGER  5  INT  2
HIGH \"HIGH\"  32767  NULL  INTEGER  5  INT  2
";
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(text).unwrap();
        assert_eq!(dict.entry(i16::MIN).unwrap().acronym, "LOW");
        assert_eq!(dict.entry(i16::MAX).unwrap().acronym, "HIGH");
    }

    #[test]
    fn test_field_rejects() {
        assert_eq!(
            field_err("X \"X\" 0 NULL INTEGER 5 INT 2\n"),
            DictionaryError::ReservedFid
        );
        assert_eq!(
            field_err("X \"X\" 32768 NULL INTEGER 5 INT 2\n"),
            DictionaryError::FidOutOfRange { value: 32768 }
        );
        assert_eq!(
            field_err("X \"X\" -32769 NULL INTEGER 5 INT 2\n"),
            DictionaryError::FidOutOfRange { value: -32769 }
        );
        assert!(matches!(
            field_err("X \"X\" 5 NULL WIDGET 5 INT 2\n"),
            DictionaryError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            field_err("!\nX \"X\" 5 NULL INTEGER 5 BOGUS 2\n"),
            DictionaryError::Parse { line: 2, .. }
        ));
        assert!(matches!(
            field_err("X \"\" 5 NULL INTEGER 5 INT 2\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            field_err("X \"X\" 5 NULL INTEGER 5 INT\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            field_err("X \"X\" 5 NULL ENUMERATED 3 ( 3 ENUM 1\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            field_err("X \"X\" 5 NULL ENUMERATED 3 ( 0 ) ENUM 1\n"),
            DictionaryError::Parse { .. }
        ));
        assert_eq!(
            field_err("X \"X\" 5 NULL INTEGER 5 INT 2\nY \"Y\" 5 NULL INTEGER 5 INT 2\n"),
            DictionaryError::DuplicateFid { fid: 5 }
        );
        let mut dict = DataDictionary::new();
        assert!(
            dict.load_field_dictionary_str(
                "X \"X\" 5 NULL INTEGER 5 INT 2\nY \"Y\" 5 NULL INTEGER 5 INT 2\n"
            )
            .is_err()
        );
        assert_eq!(dict.number_of_entries(), 0);
        assert!(!dict.is_initialized());
        assert_eq!(
            field_err("!tag Type 2\n"),
            DictionaryError::TypeMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("ironrwf_no_such_dictionary.txt");
        let err = DataDictionary::new()
            .load_field_dictionary(&path)
            .unwrap_err();
        assert!(matches!(err, DictionaryError::FileOpen { .. }));
        let err = DataDictionary::new()
            .load_enum_type_dictionary(&path)
            .unwrap_err();
        assert!(matches!(err, DictionaryError::FileOpen { .. }));
    }

    #[test]
    fn test_load_from_files() {
        let dir = std::env::temp_dir();
        let field_path = dir.join(format!("ironrwf_fields_{}.txt", std::process::id()));
        let enum_path = dir.join(format!("ironrwf_enums_{}.txt", std::process::id()));
        std::fs::write(&field_path, FIELD_TEXT).unwrap();
        std::fs::write(&enum_path, ENUM_TEXT).unwrap();

        let mut dict = DataDictionary::new();
        dict.load_field_dictionary(&field_path).unwrap();
        dict.load_enum_type_dictionary(&enum_path).unwrap();
        std::fs::remove_file(&field_path).ok();
        std::fs::remove_file(&enum_path).ok();

        assert_eq!(dict.enum_table_count(), 2);
        let exch = dict.entry(4).unwrap();
        assert_eq!(
            dict.entry_enum_type(exch, 2).unwrap().display_str(),
            Some("NYS")
        );
    }

    #[test]
    fn test_load_enums() {
        let mut dict = DataDictionary::new();
        dict.load_enum_type_dictionary_str(ENUM_TEXT).unwrap();
        assert!(dict.is_initialized());
        assert_eq!(dict.enum_table_count(), 2);
        assert_eq!(dict.enum_info().rt_version, "4.20.29");
        assert_eq!(dict.enum_info().dt_version, "17.11");

        let exch = &dict.enum_tables()[0];
        assert_eq!(exch.fid_references(), &[4]);
        assert_eq!(exch.max_value(), 2);
        assert_eq!(exch.enum_type(1).unwrap().meaning, "NYSE AMEX");
        assert_eq!(exch.enum_type(0).unwrap().display_str(), Some("   "));

        let tick = &dict.enum_tables()[1];
        assert_eq!(tick.enum_type(1).unwrap().display.as_ref(), &[0xDE]);
        assert_eq!(tick.enum_type(2).unwrap().meaning, "Down tick");

        let placeholder = dict.entry(14).unwrap();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.acronym, "PRCTCK_1");
    }

    #[test]
    fn test_fields_then_enums() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(FIELD_TEXT).unwrap();
        dict.load_enum_type_dictionary_str(ENUM_TEXT).unwrap();
        let exch = dict.entry(4).unwrap();
        assert!(!exch.is_placeholder());
        assert_eq!(dict.entry_enum_table(exch).unwrap().len(), 3);
        assert_eq!(dict.number_of_entries(), 7);
    }

    #[test]
    fn test_enum_acronym_mismatch() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(FIELD_TEXT).unwrap();
        let err = dict
            .load_enum_type_dictionary_str("WRONG 4\n0 \"A\"\n")
            .unwrap_err();
        assert!(matches!(err, DictionaryError::AcronymMismatch { fid: 4, .. }));
    }

    #[test]
    fn test_rejected_enum_file_keeps_prior_state() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str(FIELD_TEXT).unwrap();
        let before = dict.number_of_entries();
        let err = dict
            .load_enum_type_dictionary_str(
                "!tag RT_Version 9.9\nRDN_EXCHID 4\n0 \"A\"\nOTHER 9\n1 \"B\"\n1 \"C\"\n",
            )
            .unwrap_err();
        assert_eq!(err, DictionaryError::DuplicateEnumValue { value: 1 });
        assert_eq!(dict.enum_table_count(), 0);
        assert_eq!(dict.number_of_entries(), before);
        assert!(dict.entry_enum_table(dict.entry(4).unwrap()).is_none());
        assert!(dict.enum_info().rt_version.is_empty());

        dict.load_enum_type_dictionary_str(ENUM_TEXT).unwrap();
        assert!(dict.entry_enum_table(dict.entry(4).unwrap()).is_some());
    }

    #[test]
    fn test_enum_rejects() {
        assert!(matches!(
            enum_err("X 4\n-1 \"A\"\n"),
            DictionaryError::Parse { line: 2, .. }
        ));
        assert_eq!(
            enum_err("X 4\n1 \"A\"\n1 \"B\"\n"),
            DictionaryError::DuplicateEnumValue { value: 1 }
        );
        assert!(matches!(
            enum_err("!tag Desc nothing\nX 4\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            enum_err("X 4\n1 \"\"\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            enum_err("X 4\n1 #ABC#\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            enum_err("X 4\n1 #ZZ#\n"),
            DictionaryError::Parse { .. }
        ));
        assert!(matches!(
            enum_err("X\n1 \"A\"\n"),
            DictionaryError::Parse { line: 1, .. }
        ));
        assert!(matches!(
            enum_err("\"A\" 4\n"),
            DictionaryError::Parse { line: 1, .. }
        ));
        assert_eq!(
            enum_err("1 \"A\"\nX 4\n2 \"B\"\n"),
            DictionaryError::NoReferencingFids
        );
        assert_eq!(
            enum_err("!tag Type 1\n"),
            DictionaryError::TypeMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_dictionary_id_mismatch_across_files() {
        let mut dict = DataDictionary::new();
        dict.load_field_dictionary_str("!tag DictionaryId 3\n").unwrap();
        let err = dict
            .load_enum_type_dictionary_str("!tag DictionaryId 4\nX 4\n0 \"A\"\n")
            .unwrap_err();
        assert_eq!(
            err,
            DictionaryError::DictionaryIdMismatch {
                found: 4,
                previous: 3
            }
        );
    }

    #[test]
    fn test_numbered_lines() {
        let lines: Vec<_> = numbered_lines("a\r\nb\n\nc").collect();
        assert_eq!(lines, vec![(1, "a"), (2, "b"), (3, ""), (4, "c")]);
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("DEad01"), Some(vec![0xDE, 0xAD, 0x01]));
        assert_eq!(decode_hex("0G"), None);
    }
}

//! Charset tables and the lookup adapter
//!
//! Tables are external data: bidirectional maps between a Unicode scalar and
//! a charset-native code. Double-byte codes are stored as `row << 8 | cell`
//! with both bytes in 0x21-0x7E; 96-set codes are the GR byte (0xA0-0xFF).
//!
//! [`TableSet`] resolves [`TableKey`]s to shared tables and hides the
//! difference between table-backed and algorithmic charsets.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::profile::Profile;

/// Identity key of an externally supplied table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKey {
    #[serde(rename = "jisx0208")]
    JisX0208,
    #[serde(rename = "jisx0212")]
    JisX0212,
    #[serde(rename = "ksx1001")]
    KsX1001,
    #[serde(rename = "gb2312")]
    Gb2312,
    #[serde(rename = "iso8859-7")]
    Iso8859_7,
}

/// A bidirectional scalar <-> native code map
pub trait CharsetTable: Send + Sync + fmt::Debug {
    /// Native code for a scalar
    fn encode(&self, ch: char) -> Option<u16>;

    /// Scalar for a native code
    fn decode(&self, code: u16) -> Option<char>;
}

/// One entry of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub scalar: char,
    pub code: u16,
}

/// On-disk form of a [`MapTable`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableFile {
    pub entries: Vec<TableEntry>,
}

/// Hash-map backed table
///
/// When the same scalar or the same code appears more than once, the first
/// entry wins in that direction, so the table stays injective both ways.
#[derive(Debug, Clone, Default)]
pub struct MapTable {
    to_native: HashMap<char, u16>,
    to_unicode: HashMap<u16, char>,
}

impl MapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(scalar, code)` pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, u16)>,
    {
        let mut table = Self::new();
        for (ch, code) in pairs {
            table.insert(ch, code);
        }
        table
    }

    /// Add a mapping; existing mappings in either direction are kept
    pub fn insert(&mut self, ch: char, code: u16) {
        self.to_native.entry(ch).or_insert(code);
        self.to_unicode.entry(code).or_insert(ch);
    }

    /// Parse a JSON table file
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        Ok(Self::from(file))
    }

    /// Read a JSON table file
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        let file: TableFile = serde_json::from_reader(reader)?;
        Ok(Self::from(file))
    }

    /// Export the table in file form, sorted by native code
    pub fn to_file(&self) -> TableFile {
        let mut entries: Vec<TableEntry> = self
            .to_unicode
            .iter()
            .map(|(&code, &scalar)| TableEntry { scalar, code })
            .collect();
        entries.sort_by_key(|entry| entry.code);
        TableFile { entries }
    }

    /// Number of decodable codes
    pub fn len(&self) -> usize {
        self.to_unicode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_unicode.is_empty()
    }
}

impl From<TableFile> for MapTable {
    fn from(file: TableFile) -> Self {
        Self::from_pairs(file.entries.into_iter().map(|e| (e.scalar, e.code)))
    }
}

impl CharsetTable for MapTable {
    fn encode(&self, ch: char) -> Option<u16> {
        self.to_native.get(&ch).copied()
    }

    fn decode(&self, code: u16) -> Option<char> {
        self.to_unicode.get(&code).copied()
    }
}

/// JIS X 0201 Roman: ASCII with 0x5C = YEN SIGN and 0x7E = OVERLINE
pub fn jisx0201_roman_encode(ch: char) -> Option<u8> {
    match ch {
        '\u{A5}' => Some(0x5C),
        '\u{203E}' => Some(0x7E),
        '\\' | '~' => None,
        c if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}

pub fn jisx0201_roman_decode(byte: u8) -> Option<char> {
    match byte {
        0x5C => Some('\u{A5}'),
        0x7E => Some('\u{203E}'),
        b if b < 0x80 => Some(b as char),
        _ => None,
    }
}

/// Registry of loaded tables, shared read-only between streams
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: HashMap<TableKey, Arc<dyn CharsetTable>>,
}

impl TableSet {
    /// Create an empty set; only algorithmic charsets resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under a key, replacing any previous one
    pub fn insert<T: CharsetTable + 'static>(&mut self, key: TableKey, table: T) {
        self.insert_shared(key, Arc::new(table));
    }

    pub fn insert_shared(&mut self, key: TableKey, table: Arc<dyn CharsetTable>) {
        log::debug!("registering charset table {:?}", key);
        self.tables.insert(key, table);
    }

    /// Builder-style [`TableSet::insert`]
    pub fn with<T: CharsetTable + 'static>(mut self, key: TableKey, table: T) -> Self {
        self.insert(key, table);
        self
    }

    pub fn get(&self, key: TableKey) -> Option<&dyn CharsetTable> {
        self.tables.get(&key).map(|table| table.as_ref())
    }

    pub fn contains(&self, key: TableKey) -> bool {
        self.tables.contains_key(&key)
    }

    /// Table keys the profile's designations need that are not loaded
    pub fn missing_tables(&self, profile: &Profile) -> Vec<TableKey> {
        let mut missing = Vec::new();
        for designation in &profile.designations {
            if let Some(key) = designation.charset.table_key() {
                if !self.contains(key) && !missing.contains(&key) {
                    missing.push(key);
                }
            }
        }
        missing
    }

    /// Native code of `ch` in `charset`
    pub fn lookup_encode(&self, charset: Charset, ch: char) -> Option<u16> {
        match charset {
            Charset::Ascii => ch.is_ascii().then_some(ch as u16),
            Charset::JisX0201Roman => jisx0201_roman_encode(ch).map(u16::from),
            Charset::Iso8859_1 => match ch as u32 {
                cp @ 0xA0..=0xFF => Some(cp as u16),
                _ => None,
            },
            Charset::JisX0208
            | Charset::JisX0208_1978
            | Charset::JisX0212
            | Charset::KsX1001
            | Charset::Gb2312
            | Charset::Iso8859_7 => self.table_for(charset)?.encode(ch),
        }
    }

    /// Scalar for native `code` in `charset`
    pub fn lookup_decode(&self, charset: Charset, code: u16) -> Option<char> {
        match charset {
            Charset::Ascii => (code < 0x80).then(|| char::from(code as u8)),
            Charset::JisX0201Roman => u8::try_from(code).ok().and_then(jisx0201_roman_decode),
            Charset::Iso8859_1 => match code {
                0xA0..=0xFF => char::from_u32(u32::from(code)),
                _ => None,
            },
            Charset::JisX0208
            | Charset::JisX0208_1978
            | Charset::JisX0212
            | Charset::KsX1001
            | Charset::Gb2312
            | Charset::Iso8859_7 => self.table_for(charset)?.decode(code),
        }
    }

    fn table_for(&self, charset: Charset) -> Option<&dyn CharsetTable> {
        charset.table_key().and_then(|key| self.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kana_table() -> MapTable {
        MapTable::from_pairs([('あ', 0x2422), ('い', 0x2424), ('中', 0x4366)])
    }

    #[test]
    fn test_map_table_both_directions() {
        let table = kana_table();
        assert_eq!(table.encode('あ'), Some(0x2422));
        assert_eq!(table.decode(0x2424), Some('い'));
        assert_eq!(table.encode('x'), None);
        assert_eq!(table.decode(0x2121), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_map_table_first_entry_wins() {
        let table = MapTable::from_pairs([('a', 0x2121), ('b', 0x2121), ('a', 0x2122)]);
        assert_eq!(table.encode('a'), Some(0x2121));
        assert_eq!(table.decode(0x2121), Some('a'));
        // Still reachable from the code side
        assert_eq!(table.decode(0x2122), Some('a'));
        assert_eq!(table.encode('b'), Some(0x2121));
    }

    #[test]
    fn test_map_table_json() {
        let json = r#"{"entries": [{"scalar": "가", "code": 12321}]}"#;
        let table = MapTable::from_json(json).unwrap();
        assert_eq!(table.encode('가'), Some(0x3021));

        let file = table.to_file();
        let text = serde_json::to_string(&file).unwrap();
        let restored = MapTable::from_json(&text).unwrap();
        assert_eq!(restored.decode(0x3021), Some('가'));
    }

    #[test]
    fn test_roman_mapping() {
        assert_eq!(jisx0201_roman_encode('A'), Some(0x41));
        assert_eq!(jisx0201_roman_encode('¥'), Some(0x5C));
        assert_eq!(jisx0201_roman_encode('‾'), Some(0x7E));
        assert_eq!(jisx0201_roman_encode('\\'), None);
        assert_eq!(jisx0201_roman_encode('~'), None);
        assert_eq!(jisx0201_roman_decode(0x5C), Some('¥'));
        assert_eq!(jisx0201_roman_decode(0x41), Some('A'));
        assert_eq!(jisx0201_roman_decode(0x80), None);
    }

    #[test]
    fn test_lookup_algorithmic() {
        let tables = TableSet::new();
        assert_eq!(tables.lookup_encode(Charset::Ascii, 'z'), Some(0x7A));
        assert_eq!(tables.lookup_encode(Charset::Ascii, 'é'), None);
        assert_eq!(tables.lookup_encode(Charset::Iso8859_1, 'é'), Some(0xE9));
        assert_eq!(tables.lookup_decode(Charset::Iso8859_1, 0xE9), Some('é'));
        assert_eq!(tables.lookup_decode(Charset::Iso8859_1, 0x41), None);
        assert_eq!(tables.lookup_decode(Charset::JisX0201Roman, 0x7E), Some('‾'));
    }

    #[test]
    fn test_lookup_through_table() {
        let tables = TableSet::new().with(TableKey::JisX0208, kana_table());
        assert_eq!(tables.lookup_encode(Charset::JisX0208, 'あ'), Some(0x2422));
        assert_eq!(tables.lookup_decode(Charset::JisX0208_1978, 0x2422), Some('あ'));
        // Not loaded
        assert_eq!(tables.lookup_encode(Charset::KsX1001, 'あ'), None);
    }

    #[test]
    fn test_missing_tables() {
        let tables = TableSet::new().with(TableKey::JisX0208, kana_table());
        assert!(tables.missing_tables(&Profile::iso2022_jp()).is_empty());
        assert_eq!(
            tables.missing_tables(&Profile::iso2022_jp_1()),
            vec![TableKey::JisX0212]
        );
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn distinct_pairs_are_bijective(
                pairs in prop::collection::btree_map(any::<char>(), 0x2121u16..0x7E7E, 0..64)
            ) {
                let mut seen = std::collections::HashSet::new();
                let pairs: Vec<(char, u16)> = pairs
                    .into_iter()
                    .filter(|(_, code)| seen.insert(*code))
                    .collect();
                let table = MapTable::from_pairs(pairs.iter().copied());
                prop_assert_eq!(table.len(), pairs.len());
                for (ch, code) in pairs {
                    prop_assert_eq!(table.encode(ch), Some(code));
                    prop_assert_eq!(table.decode(code), Some(ch));
                }
            }

            #[test]
            fn latin1_is_identity_on_upper_half(byte in 0xA0u8..=0xFF) {
                let tables = TableSet::new();
                let ch = tables.lookup_decode(Charset::Iso8859_1, u16::from(byte));
                prop_assert_eq!(ch, char::from_u32(u32::from(byte)));
                prop_assert_eq!(
                    tables.lookup_encode(Charset::Iso8859_1, char::from(byte)),
                    Some(u16::from(byte))
                );
            }
        }
    }
}

//! Built-in tables derived from `encoding_rs`
//!
//! The WHATWG EUC-JP, EUC-KR and GBK decoders already carry the JIS X 0208,
//! JIS X 0212, KS X 1001 and GB 2312 repertoires in their EUC form. Each
//! table is built once by decoding every row/cell pair and stripping the
//! high bits back off.

use std::sync::{Arc, OnceLock};

use encoding_rs::{Encoding, EUC_JP, EUC_KR, GBK, ISO_8859_7};

use crate::table::{CharsetTable, MapTable, TableKey, TableSet};

/// Row/cell bytes of a 94x94 set
const CELLS: std::ops::RangeInclusive<u8> = 0x21..=0x7E;

/// Decode `bytes` and accept the result only if it is exactly one scalar
fn decode_one(encoding: &'static Encoding, bytes: &[u8]) -> Option<char> {
    let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn is_private_use(ch: char) -> bool {
    matches!(ch as u32, 0xE000..=0xF8FF)
}

/// Walk the 94x94 plane of an EUC-style encoding
fn build_94x94<F>(encoding: &'static Encoding, prefix: &[u8], keep_row: F) -> MapTable
where
    F: Fn(u8) -> bool,
{
    let mut table = MapTable::new();
    for row in CELLS.filter(|&row| keep_row(row)) {
        for cell in CELLS {
            let mut bytes = prefix.to_vec();
            bytes.extend_from_slice(&[row | 0x80, cell | 0x80]);
            if let Some(ch) = decode_one(encoding, &bytes) {
                if !is_private_use(ch) {
                    table.insert(ch, u16::from(row) << 8 | u16::from(cell));
                }
            }
        }
    }
    log::debug!(
        "built {} table from {} ({} entries)",
        if prefix.is_empty() { "94x94" } else { "supplementary 94x94" },
        encoding.name(),
        table.len()
    );
    table
}

fn build_jisx0208() -> MapTable {
    // Rows 1-84 of JIS X 0208; row 13 is the NEC extension in the WHATWG index
    build_94x94(EUC_JP, &[], |row| row <= 0x74 && row != 0x2D)
}

fn build_jisx0212() -> MapTable {
    build_94x94(EUC_JP, &[0x8F], |_| true)
}

fn build_ksx1001() -> MapTable {
    build_94x94(EUC_KR, &[], |_| true)
}

fn build_gb2312() -> MapTable {
    // Rows above 0x77 are GBK/GB18030 user-defined areas
    build_94x94(GBK, &[], |row| row <= 0x77)
}

fn build_iso8859_7() -> MapTable {
    let mut table = MapTable::new();
    for byte in 0xA0..=0xFFu8 {
        if let Some(ch) = decode_one(ISO_8859_7, &[byte]) {
            table.insert(ch, u16::from(byte));
        }
    }
    table
}

fn shared(
    cell: &'static OnceLock<Arc<MapTable>>,
    build: fn() -> MapTable,
) -> Arc<dyn CharsetTable> {
    cell.get_or_init(|| Arc::new(build())).clone()
}

/// Built-in table for one key, built on first use
pub fn table(key: TableKey) -> Arc<dyn CharsetTable> {
    static JISX0208: OnceLock<Arc<MapTable>> = OnceLock::new();
    static JISX0212: OnceLock<Arc<MapTable>> = OnceLock::new();
    static KSX1001: OnceLock<Arc<MapTable>> = OnceLock::new();
    static GB2312: OnceLock<Arc<MapTable>> = OnceLock::new();
    static ISO8859_7: OnceLock<Arc<MapTable>> = OnceLock::new();

    match key {
        TableKey::JisX0208 => shared(&JISX0208, build_jisx0208),
        TableKey::JisX0212 => shared(&JISX0212, build_jisx0212),
        TableKey::KsX1001 => shared(&KSX1001, build_ksx1001),
        TableKey::Gb2312 => shared(&GB2312, build_gb2312),
        TableKey::Iso8859_7 => shared(&ISO8859_7, build_iso8859_7),
    }
}

impl TableSet {
    /// Every built-in table
    pub fn standard() -> Self {
        let mut tables = TableSet::new();
        for key in [
            TableKey::JisX0208,
            TableKey::JisX0212,
            TableKey::KsX1001,
            TableKey::Gb2312,
            TableKey::Iso8859_7,
        ] {
            tables.insert_shared(key, table(key));
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jisx0208_hiragana() {
        let jis = table(TableKey::JisX0208);
        assert_eq!(jis.encode('あ'), Some(0x2422));
        assert_eq!(jis.decode(0x2422), Some('あ'));
        assert_eq!(jis.encode('中'), Some(0x4366));
    }

    #[test]
    fn test_jisx0208_excludes_nec_row() {
        let jis = table(TableKey::JisX0208);
        assert_eq!(jis.decode(0x2D21), None);
        assert_eq!(jis.decode(0x7521), None);
    }

    #[test]
    fn test_jisx0212_row_one_empty() {
        let jis = table(TableKey::JisX0212);
        assert_eq!(jis.decode(0x2121), None);
    }

    #[test]
    fn test_ksx1001_hangul() {
        let ks = table(TableKey::KsX1001);
        assert_eq!(ks.encode('가'), Some(0x3021));
        assert_eq!(ks.decode(0x3021), Some('가'));
    }

    #[test]
    fn test_gb2312_bopomofo() {
        let gb = table(TableKey::Gb2312);
        assert_eq!(gb.encode('ㄅ'), Some(0x2845));
        assert_eq!(gb.encode('中'), Some(0x5650));
    }

    #[test]
    fn test_iso8859_7_greek() {
        let greek = table(TableKey::Iso8859_7);
        assert_eq!(greek.encode('α'), Some(0xE1));
        assert_eq!(greek.decode(0xC1), Some('Α'));
    }

    #[test]
    fn test_tables_are_shared() {
        let a = table(TableKey::KsX1001);
        let b = table(TableKey::KsX1001);
        assert!(Arc::ptr_eq(&a, &b));
    }
}

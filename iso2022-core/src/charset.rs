//! Charset identities and the designation register file
//!
//! Every charset that can be designated in an ISO-2022 stream is a variant of
//! [`Charset`]. The per-stream [`CodecState`] records which charset occupies
//! each of the G0-G2 registers plus the locking-shift flag.

use serde::{Deserialize, Serialize};

use crate::table::TableKey;

/// Charset identities known to the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    /// US-ASCII - default for every register
    #[default]
    Ascii,
    /// JIS X 0201 Roman (ASCII with yen sign and overline)
    #[serde(rename = "jisx0201-roman")]
    JisX0201Roman,
    /// JIS X 0208-1983/1990
    #[serde(rename = "jisx0208")]
    JisX0208,
    /// JIS X 0208-1978 (old JIS), decoded through the JIS X 0208 table
    #[serde(rename = "jisx0208-1978")]
    JisX0208_1978,
    /// JIS X 0212-1990 supplementary kanji
    #[serde(rename = "jisx0212")]
    JisX0212,
    /// KS X 1001 (KS C 5601) Korean
    #[serde(rename = "ksx1001")]
    KsX1001,
    /// GB 2312-80 simplified Chinese
    #[serde(rename = "gb2312")]
    Gb2312,
    /// ISO-8859-1 upper half (96-set, G2 only)
    #[serde(rename = "iso8859-1")]
    Iso8859_1,
    /// ISO-8859-7 upper half (96-set, G2 only)
    #[serde(rename = "iso8859-7")]
    Iso8859_7,
}

/// Size class of a graphic character set, as used by the ISO 2022 grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetClass {
    /// 94 single-byte characters (0x21-0x7E)
    Set94,
    /// 96 single-byte characters (0x20-0x7F / 0xA0-0xFF)
    Set96,
    /// 94x94 double-byte characters
    Set94x94,
}

impl Charset {
    /// All charset identities, in declaration order
    pub const ALL: [Charset; 9] = [
        Charset::Ascii,
        Charset::JisX0201Roman,
        Charset::JisX0208,
        Charset::JisX0208_1978,
        Charset::JisX0212,
        Charset::KsX1001,
        Charset::Gb2312,
        Charset::Iso8859_1,
        Charset::Iso8859_7,
    ];

    /// Number of bytes in one native code
    pub fn width(self) -> usize {
        match self.class() {
            SetClass::Set94 | SetClass::Set96 => 1,
            SetClass::Set94x94 => 2,
        }
    }

    /// Whether a native code takes two bytes
    pub fn is_double_byte(self) -> bool {
        self.width() == 2
    }

    pub fn class(self) -> SetClass {
        match self {
            Charset::Ascii | Charset::JisX0201Roman => SetClass::Set94,
            Charset::Iso8859_1 | Charset::Iso8859_7 => SetClass::Set96,
            Charset::JisX0208
            | Charset::JisX0208_1978
            | Charset::JisX0212
            | Charset::KsX1001
            | Charset::Gb2312 => SetClass::Set94x94,
        }
    }

    /// ISO 2022 final byte identifying this charset within its set class
    pub fn final_byte(self) -> u8 {
        match self {
            Charset::Ascii => b'B',
            Charset::JisX0201Roman => b'J',
            Charset::JisX0208 => b'B',
            Charset::JisX0208_1978 => b'@',
            Charset::JisX0212 => b'D',
            Charset::KsX1001 => b'C',
            Charset::Gb2312 => b'A',
            Charset::Iso8859_1 => b'A',
            Charset::Iso8859_7 => b'F',
        }
    }

    /// Reverse of [`Charset::final_byte`] for one set class
    pub fn from_final_byte(class: SetClass, byte: u8) -> Option<Charset> {
        match (class, byte) {
            (SetClass::Set94, b'B') => Some(Charset::Ascii),
            (SetClass::Set94, b'J') => Some(Charset::JisX0201Roman),
            (SetClass::Set96, b'A') => Some(Charset::Iso8859_1),
            (SetClass::Set96, b'F') => Some(Charset::Iso8859_7),
            (SetClass::Set94x94, b'@') => Some(Charset::JisX0208_1978),
            (SetClass::Set94x94, b'A') => Some(Charset::Gb2312),
            (SetClass::Set94x94, b'B') => Some(Charset::JisX0208),
            (SetClass::Set94x94, b'C') => Some(Charset::KsX1001),
            (SetClass::Set94x94, b'D') => Some(Charset::JisX0212),
            _ => None,
        }
    }

    /// Key of the external table backing this charset, if it is not algorithmic
    pub fn table_key(self) -> Option<TableKey> {
        match self {
            Charset::Ascii | Charset::JisX0201Roman | Charset::Iso8859_1 => None,
            Charset::JisX0208 | Charset::JisX0208_1978 => Some(TableKey::JisX0208),
            Charset::JisX0212 => Some(TableKey::JisX0212),
            Charset::KsX1001 => Some(TableKey::KsX1001),
            Charset::Gb2312 => Some(TableKey::Gb2312),
            Charset::Iso8859_7 => Some(TableKey::Iso8859_7),
        }
    }
}

/// Designation register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    G0,
    G1,
    G2,
}

/// Register file for one stream
///
/// The same state shape is used by the encoder and the decoder. It is `Copy`
/// so callers that need atomic retries can snapshot it before a call and put
/// it back afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodecState {
    /// G0 charset, consulted for plain bytes
    pub g0: Charset,
    /// G1 charset, consulted for plain bytes while shifted
    pub g1: Charset,
    /// G2 charset, consulted after a single shift
    pub g2: Charset,
    /// Inside a locking-shift (SO) region
    pub shifted: bool,
}

impl CodecState {
    /// Create state at the baseline (all registers ASCII, not shifted)
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every register to ASCII and clear the shift flag
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, register: Register) -> Charset {
        match register {
            Register::G0 => self.g0,
            Register::G1 => self.g1,
            Register::G2 => self.g2,
        }
    }

    pub fn set(&mut self, register: Register, charset: Charset) {
        match register {
            Register::G0 => self.g0 = charset,
            Register::G1 => self.g1 = charset,
            Register::G2 => self.g2 = charset,
        }
    }

    pub fn is_shifted(&self) -> bool {
        self.shifted
    }

    pub fn set_shifted(&mut self, shifted: bool) {
        self.shifted = shifted;
    }

    /// Charset that interprets plain (unescaped) bytes right now
    pub fn active(&self) -> Charset {
        if self.shifted {
            self.g1
        } else {
            self.g0
        }
    }

    /// G0 is ASCII and no shift is in effect
    pub fn is_baseline(&self) -> bool {
        self.g0 == Charset::Ascii && !self.shifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        let state = CodecState::new();
        assert_eq!(state.g0, Charset::Ascii);
        assert_eq!(state.g1, Charset::Ascii);
        assert_eq!(state.g2, Charset::Ascii);
        assert!(!state.shifted);
        assert!(state.is_baseline());
    }

    #[test]
    fn test_registers_independent() {
        let mut state = CodecState::new();
        state.set(Register::G0, Charset::JisX0208);
        state.set(Register::G2, Charset::Iso8859_7);

        assert_eq!(state.get(Register::G0), Charset::JisX0208);
        assert_eq!(state.get(Register::G1), Charset::Ascii);
        assert_eq!(state.get(Register::G2), Charset::Iso8859_7);
        assert!(!state.is_baseline());
    }

    #[test]
    fn test_active_follows_shift() {
        let mut state = CodecState::new();
        state.g1 = Charset::KsX1001;
        assert_eq!(state.active(), Charset::Ascii);

        state.set_shifted(true);
        assert_eq!(state.active(), Charset::KsX1001);
        assert!(!state.is_baseline());
    }

    #[test]
    fn test_clear() {
        let mut state = CodecState::new();
        state.g0 = Charset::Gb2312;
        state.g1 = Charset::KsX1001;
        state.shifted = true;

        state.clear();
        assert_eq!(state, CodecState::default());
    }

    #[test]
    fn test_final_byte_roundtrip() {
        for charset in Charset::ALL {
            assert_eq!(
                Charset::from_final_byte(charset.class(), charset.final_byte()),
                Some(charset)
            );
        }
    }

    #[test]
    fn test_widths() {
        assert_eq!(Charset::Ascii.width(), 1);
        assert_eq!(Charset::JisX0201Roman.width(), 1);
        assert_eq!(Charset::Iso8859_7.width(), 1);
        assert!(Charset::JisX0208.is_double_byte());
        assert!(Charset::Gb2312.is_double_byte());
    }

    #[test]
    fn test_old_jis_shares_table() {
        assert_eq!(Charset::JisX0208_1978.table_key(), Charset::JisX0208.table_key());
        assert_eq!(Charset::Ascii.table_key(), None);
    }
}

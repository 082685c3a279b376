//! Encoding profiles
//!
//! A profile bundles everything that distinguishes one concrete ISO-2022
//! scheme from another: which designations it accepts, the order in which
//! the encoder tries its tables, fixed literal substitutions, and which shift
//! functions it honours.

use serde::{Deserialize, Serialize};

use crate::charset::{Charset, Register};

/// A charset the profile may designate, and the register it goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub charset: Charset,
    pub register: Register,
}

impl Designation {
    pub const fn new(charset: Charset, register: Register) -> Self {
        Self { charset, register }
    }
}

/// Fixed scalar <-> native code override used when no table maps the scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub scalar: char,
    pub charset: Charset,
    pub code: u16,
}

/// FULLWIDTH REVERSE SOLIDUS, written as JIS X 0208 0x2140
pub const FULLWIDTH_REVERSE_SOLIDUS: Substitution = Substitution {
    scalar: '\u{FF3C}',
    charset: Charset::JisX0208,
    code: 0x2140,
};

/// A named encoding scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Canonical name
    pub name: String,
    /// Accepted designations
    pub designations: Vec<Designation>,
    /// Encoder table priority for scalars >= 0x80; earlier entries win
    pub candidates: Vec<Charset>,
    /// Literal overrides, tried after every candidate fails
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    /// SO/SI switch plain bytes between G0 and G1
    #[serde(default)]
    pub locking_shift: bool,
    /// ESC N reads the next byte through G2
    #[serde(default)]
    pub single_shift: bool,
}

const JP_DESIGNATIONS: [Designation; 4] = [
    Designation::new(Charset::Ascii, Register::G0),
    Designation::new(Charset::JisX0201Roman, Register::G0),
    Designation::new(Charset::JisX0208, Register::G0),
    Designation::new(Charset::JisX0208_1978, Register::G0),
];

impl Profile {
    /// Names accepted by [`Profile::by_name`], canonical form
    pub const BUILTIN: [&'static str; 4] =
        ["iso2022_jp", "iso2022_jp_1", "iso2022_jp_2", "iso2022_kr"];

    /// ISO-2022-JP (RFC 1468)
    pub fn iso2022_jp() -> Self {
        Self {
            name: "iso2022_jp".to_string(),
            designations: JP_DESIGNATIONS.to_vec(),
            candidates: vec![Charset::JisX0208, Charset::JisX0201Roman],
            substitutions: vec![FULLWIDTH_REVERSE_SOLIDUS],
            locking_shift: false,
            single_shift: false,
        }
    }

    /// ISO-2022-JP-1 (RFC 2237): ISO-2022-JP plus JIS X 0212
    pub fn iso2022_jp_1() -> Self {
        let mut designations = JP_DESIGNATIONS.to_vec();
        designations.push(Designation::new(Charset::JisX0212, Register::G0));
        Self {
            name: "iso2022_jp_1".to_string(),
            designations,
            candidates: vec![Charset::JisX0208, Charset::JisX0212, Charset::JisX0201Roman],
            substitutions: vec![FULLWIDTH_REVERSE_SOLIDUS],
            locking_shift: false,
            single_shift: false,
        }
    }

    /// ISO-2022-JP-2 (RFC 1554): adds Korean, Chinese and G2 Latin-1/Greek
    pub fn iso2022_jp_2() -> Self {
        let mut designations = JP_DESIGNATIONS.to_vec();
        designations.extend([
            Designation::new(Charset::JisX0212, Register::G0),
            Designation::new(Charset::Gb2312, Register::G0),
            Designation::new(Charset::KsX1001, Register::G0),
            Designation::new(Charset::Iso8859_1, Register::G2),
            Designation::new(Charset::Iso8859_7, Register::G2),
        ]);
        Self {
            name: "iso2022_jp_2".to_string(),
            designations,
            // Latin-1 and Greek are never candidates: JIS X 0212 covers them
            candidates: vec![
                Charset::JisX0208,
                Charset::JisX0212,
                Charset::KsX1001,
                Charset::Gb2312,
                Charset::JisX0201Roman,
            ],
            substitutions: vec![FULLWIDTH_REVERSE_SOLIDUS],
            locking_shift: false,
            single_shift: true,
        }
    }

    /// ISO-2022-KR (RFC 1557): KS X 1001 in G1, selected with SO/SI
    pub fn iso2022_kr() -> Self {
        Self {
            name: "iso2022_kr".to_string(),
            designations: vec![
                Designation::new(Charset::Ascii, Register::G0),
                Designation::new(Charset::KsX1001, Register::G1),
            ],
            candidates: vec![Charset::KsX1001],
            substitutions: Vec::new(),
            locking_shift: true,
            single_shift: false,
        }
    }

    /// Look up a built-in profile by name or common alias
    ///
    /// Matching ignores ASCII case and treats `-` and `_` alike, so
    /// `ISO-2022-JP-2`, `iso2022_jp_2` and `csISO2022JP2` all resolve.
    pub fn by_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let key = key.strip_prefix("cs").unwrap_or(&key);

        match key {
            "iso2022jp" => Some(Self::iso2022_jp()),
            "iso2022jp1" => Some(Self::iso2022_jp_1()),
            "iso2022jp2" => Some(Self::iso2022_jp_2()),
            "iso2022kr" => Some(Self::iso2022_kr()),
            _ => None,
        }
    }

    /// Register this profile designates `charset` into, if supported
    pub fn register_for(&self, charset: Charset) -> Option<Register> {
        self.designations
            .iter()
            .find(|d| d.charset == charset)
            .map(|d| d.register)
    }

    /// Whether `charset` may be designated into `register`
    ///
    /// ASCII into G0 is always accepted.
    pub fn supports(&self, register: Register, charset: Charset) -> bool {
        (register == Register::G0 && charset == Charset::Ascii)
            || self
                .designations
                .iter()
                .any(|d| d.register == register && d.charset == charset)
    }

    /// Substitution for a scalar, checked after all tables fail
    pub fn substitution_for(&self, scalar: char) -> Option<&Substitution> {
        self.substitutions.iter().find(|s| s.scalar == scalar)
    }

    /// Literal decode override for a native code in `charset`
    ///
    /// Charsets sharing a table (JIS X 0208 and its 1978 edition) share
    /// their overrides.
    pub fn literal_decode(&self, charset: Charset, code: u16) -> Option<char> {
        self.substitutions
            .iter()
            .find(|s| {
                s.code == code
                    && (s.charset == charset
                        || (s.charset.table_key().is_some()
                            && s.charset.table_key() == charset.table_key()))
            })
            .map(|s| s.scalar)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::iso2022_jp_2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_aliases() {
        assert_eq!(Profile::by_name("iso2022_jp").unwrap().name, "iso2022_jp");
        assert_eq!(Profile::by_name("ISO-2022-JP-2").unwrap().name, "iso2022_jp_2");
        assert_eq!(Profile::by_name("csISO2022JP2").unwrap().name, "iso2022_jp_2");
        assert_eq!(Profile::by_name("iso-2022-kr").unwrap().name, "iso2022_kr");
        assert!(Profile::by_name("shift_jis").is_none());
    }

    #[test]
    fn test_builtin_names_resolve() {
        for name in Profile::BUILTIN {
            assert_eq!(Profile::by_name(name).unwrap().name, name);
        }
    }

    #[test]
    fn test_jp2_priority_order() {
        let profile = Profile::iso2022_jp_2();
        let jis = profile.candidates.iter().position(|&c| c == Charset::JisX0208);
        let ks = profile.candidates.iter().position(|&c| c == Charset::KsX1001);
        let gb = profile.candidates.iter().position(|&c| c == Charset::Gb2312);
        assert!(jis < ks && ks < gb);
    }

    #[test]
    fn test_supports() {
        let jp = Profile::iso2022_jp();
        assert!(jp.supports(Register::G0, Charset::JisX0208));
        assert!(jp.supports(Register::G0, Charset::Ascii));
        assert!(!jp.supports(Register::G0, Charset::JisX0212));
        assert!(!jp.supports(Register::G2, Charset::Iso8859_1));

        let jp2 = Profile::iso2022_jp_2();
        assert!(jp2.supports(Register::G2, Charset::Iso8859_7));
        assert!(!jp2.supports(Register::G0, Charset::Iso8859_7));

        let kr = Profile::iso2022_kr();
        assert!(kr.supports(Register::G1, Charset::KsX1001));
        assert!(!kr.supports(Register::G0, Charset::KsX1001));
        assert_eq!(kr.register_for(Charset::KsX1001), Some(Register::G1));
    }

    #[test]
    fn test_literal_decode_covers_old_jis() {
        let jp = Profile::iso2022_jp();
        assert_eq!(jp.literal_decode(Charset::JisX0208, 0x2140), Some('\u{FF3C}'));
        assert_eq!(jp.literal_decode(Charset::JisX0208_1978, 0x2140), Some('\u{FF3C}'));
        assert_eq!(jp.literal_decode(Charset::JisX0212, 0x2140), None);
        assert_eq!(Profile::iso2022_kr().literal_decode(Charset::KsX1001, 0x2140), None);
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = Profile::iso2022_kr();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"ksx1001\""));
        let restored: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }
}

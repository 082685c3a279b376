//! ISO 2022 escape and designation grammar
//!
//! An escape sequence is ESC, zero or more intermediate bytes (0x20-0x2F)
//! and a final byte (0x30-0x7E). The intermediates select the register and
//! the set class; the final byte selects the charset. The one exception is
//! the JIS X 0208-1990 announcer `ESC & @`, which must be followed by
//! `ESC $ B` and is treated as one six-byte designation.
//!
//! Reference: ECMA-35 (ISO/IEC 2022), RFC 1554

use std::ops::Deref;

use iso2022_core::{Charset, Register, SetClass};

pub const ESC: u8 = 0x1B;
/// Shift Out - lock G1 into GL
pub const SO: u8 = 0x0E;
/// Shift In - lock G0 into GL
pub const SI: u8 = 0x0F;
/// Single Shift 2 in 7-bit form
pub const SS2: [u8; 2] = [ESC, b'N'];

/// Maximum intermediate bytes accepted before giving up on a sequence
const MAX_INTERMEDIATES: usize = 4;

/// Tail that must follow the `ESC & @` announcer
const JISX0208_1990_TAIL: [u8; 3] = [ESC, b'$', b'B'];

/// A recognized escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Assign a charset to a register
    Designate { register: Register, charset: Charset },
    /// ESC N - read the next byte through G2
    SingleShift2,
}

/// Outcome of scanning an escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeParse {
    /// A complete sequence of `len` bytes
    Complete { escape: Escape, len: usize },
    /// Input ends inside a valid prefix
    Incomplete,
    /// Not part of the grammar; `len` bytes were examined
    Invalid { len: usize },
}

/// Scan the escape sequence at the start of `input`
///
/// `input[0]` must be ESC.
pub fn parse(input: &[u8]) -> EscapeParse {
    debug_assert_eq!(input.first(), Some(&ESC));

    let mut i = 1;
    while let Some(&byte) = input.get(i) {
        if !(0x20..=0x2F).contains(&byte) {
            break;
        }
        if i > MAX_INTERMEDIATES {
            return EscapeParse::Invalid { len: i };
        }
        i += 1;
    }

    let Some(&final_byte) = input.get(i) else {
        return EscapeParse::Incomplete;
    };
    if !(0x30..=0x7E).contains(&final_byte) {
        return EscapeParse::Invalid { len: i.max(1) };
    }
    let len = i + 1;

    let (register, class) = match (&input[1..i], final_byte) {
        ([], b'N') => {
            return EscapeParse::Complete {
                escape: Escape::SingleShift2,
                len,
            }
        }
        ([b'&'], b'@') => return parse_jisx0208_1990(&input[len..], len),
        ([b'('], _) => (Register::G0, SetClass::Set94),
        ([b')'], _) => (Register::G1, SetClass::Set94),
        ([b'*'], _) => (Register::G2, SetClass::Set94),
        ([b'-'], _) => (Register::G1, SetClass::Set96),
        ([b'.'], _) => (Register::G2, SetClass::Set96),
        // Legacy short form, only defined for @ A B
        ([b'$'], b'@' | b'A' | b'B') => (Register::G0, SetClass::Set94x94),
        ([b'$', b'('], _) => (Register::G0, SetClass::Set94x94),
        ([b'$', b')'], _) => (Register::G1, SetClass::Set94x94),
        ([b'$', b'*'], _) => (Register::G2, SetClass::Set94x94),
        _ => return EscapeParse::Invalid { len },
    };

    match Charset::from_final_byte(class, final_byte) {
        Some(charset) => EscapeParse::Complete {
            escape: Escape::Designate { register, charset },
            len,
        },
        None => EscapeParse::Invalid { len },
    }
}

fn parse_jisx0208_1990(rest: &[u8], announcer_len: usize) -> EscapeParse {
    if rest.len() < JISX0208_1990_TAIL.len() {
        return if JISX0208_1990_TAIL.starts_with(rest) {
            EscapeParse::Incomplete
        } else {
            EscapeParse::Invalid { len: announcer_len }
        };
    }
    if rest[..JISX0208_1990_TAIL.len()] != JISX0208_1990_TAIL {
        return EscapeParse::Invalid { len: announcer_len };
    }
    EscapeParse::Complete {
        escape: Escape::Designate {
            register: Register::G0,
            charset: Charset::JisX0208,
        },
        len: announcer_len + JISX0208_1990_TAIL.len(),
    }
}

/// Bytes of one designation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    bytes: [u8; 4],
    len: usize,
}

impl Sequence {
    fn new(parts: &[u8]) -> Self {
        let mut bytes = [0; 4];
        bytes[..parts.len()].copy_from_slice(parts);
        Self {
            bytes,
            len: parts.len(),
        }
    }
}

impl Deref for Sequence {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Canonical designation sequence putting `charset` into `register`
///
/// Returns `None` for combinations ISO 2022 cannot express (a 96-set in G0).
pub fn designation(register: Register, charset: Charset) -> Option<Sequence> {
    let f = charset.final_byte();
    let sequence = match (charset.class(), register) {
        (SetClass::Set94, Register::G0) => Sequence::new(&[ESC, b'(', f]),
        (SetClass::Set94, Register::G1) => Sequence::new(&[ESC, b')', f]),
        (SetClass::Set94, Register::G2) => Sequence::new(&[ESC, b'*', f]),
        (SetClass::Set96, Register::G0) => return None,
        (SetClass::Set96, Register::G1) => Sequence::new(&[ESC, b'-', f]),
        (SetClass::Set96, Register::G2) => Sequence::new(&[ESC, b'.', f]),
        (SetClass::Set94x94, Register::G0) => match f {
            b'@' | b'A' | b'B' => Sequence::new(&[ESC, b'$', f]),
            _ => Sequence::new(&[ESC, b'$', b'(', f]),
        },
        (SetClass::Set94x94, Register::G1) => Sequence::new(&[ESC, b'$', b')', f]),
        (SetClass::Set94x94, Register::G2) => Sequence::new(&[ESC, b'$', b'*', f]),
    };
    Some(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn designates(input: &[u8], register: Register, charset: Charset) {
        assert_eq!(
            parse(input),
            EscapeParse::Complete {
                escape: Escape::Designate { register, charset },
                len: input.len(),
            },
            "parsing {:?}",
            input
        );
    }

    #[test]
    fn test_parse_g0_designations() {
        designates(b"\x1b(B", Register::G0, Charset::Ascii);
        designates(b"\x1b(J", Register::G0, Charset::JisX0201Roman);
        designates(b"\x1b$@", Register::G0, Charset::JisX0208_1978);
        designates(b"\x1b$A", Register::G0, Charset::Gb2312);
        designates(b"\x1b$B", Register::G0, Charset::JisX0208);
        designates(b"\x1b$(C", Register::G0, Charset::KsX1001);
        designates(b"\x1b$(D", Register::G0, Charset::JisX0212);
        designates(b"\x1b$(B", Register::G0, Charset::JisX0208);
    }

    #[test]
    fn test_parse_g1_g2_designations() {
        designates(b"\x1b$)C", Register::G1, Charset::KsX1001);
        designates(b"\x1b.A", Register::G2, Charset::Iso8859_1);
        designates(b"\x1b.F", Register::G2, Charset::Iso8859_7);
        designates(b"\x1b-A", Register::G1, Charset::Iso8859_1);
    }

    #[test]
    fn test_parse_jisx0208_1990() {
        designates(b"\x1b&@\x1b$B", Register::G0, Charset::JisX0208);
        assert_eq!(parse(b"\x1b&@\x1b$"), EscapeParse::Incomplete);
        assert_eq!(parse(b"\x1b&@\x1b(B"), EscapeParse::Invalid { len: 3 });
    }

    #[test]
    fn test_parse_single_shift() {
        assert_eq!(
            parse(b"\x1bNa"),
            EscapeParse::Complete {
                escape: Escape::SingleShift2,
                len: 2
            }
        );
    }

    #[test]
    fn test_parse_incomplete() {
        assert_eq!(parse(b"\x1b"), EscapeParse::Incomplete);
        assert_eq!(parse(b"\x1b$"), EscapeParse::Incomplete);
        assert_eq!(parse(b"\x1b$("), EscapeParse::Incomplete);
    }

    #[test]
    fn test_parse_invalid() {
        // Unknown final byte
        assert_eq!(parse(b"\x1b(Z"), EscapeParse::Invalid { len: 3 });
        // 94x94 final not valid in short form
        assert_eq!(parse(b"\x1b$C"), EscapeParse::Invalid { len: 3 });
        // Not an intermediate or final byte
        assert_eq!(parse(b"\x1b\x1b"), EscapeParse::Invalid { len: 1 });
        // CSI is not part of the grammar
        assert_eq!(parse(b"\x1b[31m"), EscapeParse::Invalid { len: 2 });
        // Runaway intermediates
        assert_eq!(parse(b"\x1b$$$$$$B"), EscapeParse::Invalid { len: 5 });
    }

    #[test]
    fn test_designation_sequences() {
        assert_eq!(&*designation(Register::G0, Charset::Ascii).unwrap(), b"\x1b(B");
        assert_eq!(&*designation(Register::G0, Charset::JisX0208).unwrap(), b"\x1b$B");
        assert_eq!(&*designation(Register::G0, Charset::JisX0212).unwrap(), b"\x1b$(D");
        assert_eq!(&*designation(Register::G0, Charset::KsX1001).unwrap(), b"\x1b$(C");
        assert_eq!(&*designation(Register::G1, Charset::KsX1001).unwrap(), b"\x1b$)C");
        assert_eq!(&*designation(Register::G2, Charset::Iso8859_7).unwrap(), b"\x1b.F");
        assert_eq!(designation(Register::G0, Charset::Iso8859_1), None);
    }

    #[test]
    fn test_designation_parses_back() {
        for charset in Charset::ALL {
            for register in [Register::G0, Register::G1, Register::G2] {
                if let Some(sequence) = designation(register, charset) {
                    designates(&sequence, register, charset);
                }
            }
        }
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_stays_in_bounds(rest in prop::collection::vec(any::<u8>(), 0..12)) {
                let mut input = vec![ESC];
                input.extend_from_slice(&rest);
                match parse(&input) {
                    EscapeParse::Complete { len, .. } => {
                        prop_assert!(len >= 2 && len <= input.len())
                    }
                    EscapeParse::Invalid { len } => prop_assert!(len >= 1 && len <= input.len()),
                    EscapeParse::Incomplete => {}
                }
            }

            #[test]
            fn prefix_of_designation_is_incomplete(
                index in 0usize..Charset::ALL.len(),
                cut in 1usize..4,
            ) {
                let charset = Charset::ALL[index];
                let register = if charset.class() == SetClass::Set96 {
                    Register::G2
                } else {
                    Register::G0
                };
                if let Some(sequence) = designation(register, charset) {
                    let cut = cut.min(sequence.len() - 1);
                    prop_assert_eq!(parse(&sequence[..cut]), EscapeParse::Incomplete);
                }
            }
        }
    }
}

//! Encoder engine: Unicode scalars to an ISO-2022 byte stream
//!
//! The encoder keeps its own [`CodecState`] and only emits a designation
//! when the charset it needs is not already in place, so consecutive
//! characters from the same set share one escape sequence.

use iso2022_core::{Charset, CodecState, Profile, Register, TableSet};

use crate::error::{Error, Result};
use crate::escape::{self, SI, SO, SS2};

/// Stateful encoder for one output stream
#[derive(Debug, Clone)]
pub struct Encoder<'a> {
    profile: &'a Profile,
    tables: &'a TableSet,
    state: CodecState,
}

impl<'a> Encoder<'a> {
    /// Create an encoder at the baseline state
    pub fn new(profile: &'a Profile, tables: &'a TableSet) -> Self {
        Self {
            profile,
            tables,
            state: CodecState::new(),
        }
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn state(&self) -> &CodecState {
        &self.state
    }

    /// Replace the register file, e.g. to roll back after a failed call
    pub fn set_state(&mut self, state: CodecState) {
        self.state = state;
    }

    /// Encode `input`, appending to `output`
    ///
    /// On [`Error::UnmappableCharacter`] everything before the failing scalar
    /// has been written and the state reflects it; the failing scalar
    /// itself wrote nothing.
    pub fn encode(&mut self, input: &str, output: &mut Vec<u8>) -> Result<()> {
        for (position, ch) in input.chars().enumerate() {
            self.encode_char(ch, position, output)?;
        }
        Ok(())
    }

    /// Encode `input` into a fresh buffer and return to the baseline
    pub fn encode_to_vec(&mut self, input: &str) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() + 8);
        self.encode(input, &mut output)?;
        self.reset(&mut output);
        Ok(output)
    }

    /// Return to the baseline: SI if shifted, then `ESC ( B` if G0 is not ASCII
    ///
    /// Emits nothing when already at the baseline.
    pub fn reset(&mut self, output: &mut Vec<u8>) {
        self.unshift(output);
        if self.state.g0 != Charset::Ascii {
            log::trace!("reset: designating ASCII into G0");
            output.extend_from_slice(b"\x1b(B");
            self.state.g0 = Charset::Ascii;
        }
    }

    /// Encode one scalar; `position` is only used for error reporting
    pub fn encode_char(&mut self, ch: char, position: usize, output: &mut Vec<u8>) -> Result<()> {
        if ch.is_ascii() {
            self.encode_ascii(ch, position, output)?;
            if ch == '\n' {
                self.state.shifted = false;
            }
            return Ok(());
        }

        // A single-byte set already in G0 (JIS X 0201 Roman) is used as is
        if let Some(code) = self.g0_single_byte(ch) {
            self.unshift(output);
            output.push(code);
            return Ok(());
        }

        let profile = self.profile;
        for &charset in &profile.candidates {
            if let Some(code) = self.tables.lookup_encode(charset, ch) {
                return self.emit(charset, code, position, output);
            }
        }

        if let Some(substitution) = profile.substitution_for(ch) {
            return self.emit(substitution.charset, substitution.code, position, output);
        }

        log::debug!("no mapping for {:?} in {}", ch, profile.name);
        Err(Error::UnmappableCharacter { ch, position })
    }

    fn encode_ascii(&mut self, ch: char, position: usize, output: &mut Vec<u8>) -> Result<()> {
        let byte = match self.state.g0 {
            Charset::Ascii => ch as u8,
            _ => match self.g0_single_byte(ch) {
                Some(code) => code,
                None => {
                    self.designate(Register::G0, Charset::Ascii, position, output)?;
                    ch as u8
                }
            },
        };
        self.unshift(output);
        output.push(byte);
        Ok(())
    }

    /// Native byte of `ch` in a single-byte, non-ASCII charset held by G0
    fn g0_single_byte(&self, ch: char) -> Option<u8> {
        let g0 = self.state.g0;
        if g0 == Charset::Ascii || g0.is_double_byte() {
            return None;
        }
        self.tables
            .lookup_encode(g0, ch)
            .and_then(|code| u8::try_from(code).ok())
    }

    /// Write `code` of `charset`, designating and shifting as needed
    fn emit(
        &mut self,
        charset: Charset,
        code: u16,
        position: usize,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        let Some(register) = self.profile.register_for(charset) else {
            log::error!("{} never designates {:?}", self.profile.name, charset);
            return Err(Error::Internal {
                offset: position,
                charset,
                register: Register::G0,
            });
        };
        match register {
            Register::G0 => {
                self.unshift(output);
                self.designate(Register::G0, charset, position, output)?;
            }
            Register::G1 => {
                self.designate(Register::G1, charset, position, output)?;
                if !self.state.shifted {
                    output.push(SO);
                    self.state.shifted = true;
                }
            }
            Register::G2 => {
                self.designate(Register::G2, charset, position, output)?;
                output.extend_from_slice(&SS2);
            }
        }

        if charset.is_double_byte() {
            output.push((code >> 8) as u8);
            output.push(code as u8);
        } else if register == Register::G2 {
            // Single shift carries the GL form
            output.push(code as u8 & 0x7F);
        } else {
            output.push(code as u8);
        }
        Ok(())
    }

    fn designate(
        &mut self,
        register: Register,
        charset: Charset,
        position: usize,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        if self.state.get(register) == charset {
            return Ok(());
        }
        let Some(sequence) = escape::designation(register, charset) else {
            log::error!("{:?} cannot be designated into {:?}", charset, register);
            return Err(Error::Internal {
                offset: position,
                charset,
                register,
            });
        };
        log::trace!("designating {:?} into {:?}", charset, register);
        output.extend_from_slice(&sequence);
        self.state.set(register, charset);
        Ok(())
    }

    fn unshift(&mut self, output: &mut Vec<u8>) {
        if self.state.shifted {
            output.push(SI);
            self.state.shifted = false;
        }
    }
}

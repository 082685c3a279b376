//! Decoder engine: ISO-2022 byte stream to Unicode scalars
//!
//! The decoder can be driven two ways:
//! - [`Decoder::decode`] works on a complete buffer and reports an
//!   [`Error::IncompleteSequence`] when the buffer ends inside a unit
//! - [`Decoder::feed`] accepts arbitrary chunks and carries a split unit
//!   over to the next chunk, the same way a streaming UTF-8 decoder does

use iso2022_core::{Charset, CodecState, Profile, Register, TableSet};

use crate::error::{Error, Result};
use crate::escape::{self, Escape, EscapeParse, ESC, SI, SO};

/// Stateful decoder for one input stream
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    profile: &'a Profile,
    tables: &'a TableSet,
    state: CodecState,
    /// Tail of the previous chunk that did not form a complete unit
    pending: Vec<u8>,
    /// Stream offset of the first byte not yet consumed
    position: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder at the baseline state
    pub fn new(profile: &'a Profile, tables: &'a TableSet) -> Self {
        Self {
            profile,
            tables,
            state: CodecState::new(),
            pending: Vec::new(),
            position: 0,
        }
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn state(&self) -> &CodecState {
        &self.state
    }

    pub fn set_state(&mut self, state: CodecState) {
        self.state = state;
    }

    /// Bytes consumed from the stream so far (through [`Decoder::feed`])
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether a split unit is waiting for more input
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Clear the shift flag
    ///
    /// Designations are kept: a stream may continue across reset calls.
    pub fn reset(&mut self) {
        self.state.shifted = false;
    }

    /// Decode a buffer, appending to `output`
    ///
    /// On error, `output` and the state reflect every unit before the
    /// reported offset. After [`Error::IncompleteSequence`] the caller can
    /// retry with `input[offset..]` followed by more bytes.
    pub fn decode(&mut self, input: &[u8], output: &mut String) -> Result<()> {
        let mut i = 0;
        while i < input.len() {
            let byte = input[i];
            i += match byte {
                ESC => self.decode_escape(&input[i..], i, output)?,
                SO | SI if self.profile.locking_shift => {
                    self.state.shifted = byte == SO;
                    1
                }
                b'\n' => {
                    self.state.shifted = false;
                    output.push('\n');
                    1
                }
                0x00..=0x1F => {
                    output.push(char::from(byte));
                    1
                }
                0x80..=0xFF => {
                    log::debug!("8-bit byte {:#04x} at offset {}", byte, i);
                    return Err(Error::InvalidByte { offset: i, len: 1 });
                }
                _ => self.decode_graphic(&input[i..], i, output)?,
            };
        }
        Ok(())
    }

    /// Decode a buffer into a new string
    pub fn decode_to_string(&mut self, input: &[u8]) -> Result<String> {
        let mut output = String::with_capacity(input.len());
        self.decode(input, &mut output)?;
        Ok(output)
    }

    /// Decode the next chunk of a stream, appending to `output`
    ///
    /// A unit split by the chunk boundary is held back until the next call.
    /// Error offsets are absolute stream offsets. After a hard error the
    /// rest of the chunk is dropped but still counted in [`Decoder::position`].
    pub fn feed(&mut self, chunk: &[u8], output: &mut String) -> Result<()> {
        let mut buffer = std::mem::take(&mut self.pending);
        buffer.extend_from_slice(chunk);

        match self.decode(&buffer, output) {
            Ok(()) => {
                self.position += buffer.len();
                Ok(())
            }
            Err(Error::IncompleteSequence { offset }) => {
                self.position += offset;
                self.pending = buffer.split_off(offset);
                Ok(())
            }
            Err(err) => {
                let err = err.rebase(self.position);
                self.position += buffer.len();
                Err(err)
            }
        }
    }

    /// End the stream: fail if a unit is still pending, then reset
    pub fn finish(&mut self) -> Result<()> {
        self.reset();
        if self.pending.is_empty() {
            return Ok(());
        }
        let offset = self.position;
        log::debug!(
            "stream ended with {} pending bytes at offset {}",
            self.pending.len(),
            offset
        );
        self.pending.clear();
        Err(Error::IncompleteSequence { offset })
    }

    /// Handle an escape sequence at `input[0]`; returns bytes consumed
    fn decode_escape(&mut self, input: &[u8], offset: usize, output: &mut String) -> Result<usize> {
        match escape::parse(input) {
            EscapeParse::Incomplete => Err(Error::IncompleteSequence { offset }),
            EscapeParse::Invalid { len } => {
                log::debug!("unrecognized escape sequence at offset {}", offset);
                Err(Error::InvalidEscapeSequence { offset, len })
            }
            EscapeParse::Complete {
                escape: Escape::Designate { register, charset },
                len,
            } => {
                if !self.profile.supports(register, charset) {
                    log::debug!(
                        "{} does not designate {:?} into {:?}",
                        self.profile.name,
                        charset,
                        register
                    );
                    return Err(Error::InvalidEscapeSequence { offset, len });
                }
                log::trace!("designating {:?} into {:?}", charset, register);
                self.state.set(register, charset);
                Ok(len)
            }
            EscapeParse::Complete {
                escape: Escape::SingleShift2,
                len,
            } => {
                if !self.profile.single_shift {
                    return Err(Error::InvalidEscapeSequence { offset, len });
                }
                let Some(&byte) = input.get(len) else {
                    return Err(Error::IncompleteSequence { offset });
                };
                let ch = self
                    .decode_single_shift(byte, offset)?
                    .ok_or(Error::InvalidByte {
                        offset,
                        len: len + 1,
                    })?;
                output.push(ch);
                Ok(len + 1)
            }
        }
    }

    /// Read one byte through G2
    fn decode_single_shift(&self, byte: u8, offset: usize) -> Result<Option<char>> {
        let charset = self.state.g2;
        // 7-bit stream: the shifted byte is a GL byte like any other
        if !(0x20..=0x7F).contains(&byte) {
            return Ok(None);
        }
        let ch = match charset {
            Charset::Ascii | Charset::JisX0201Roman => {
                self.tables.lookup_decode(charset, u16::from(byte))
            }
            Charset::Iso8859_1 | Charset::Iso8859_7 => {
                self.tables.lookup_decode(charset, u16::from(byte | 0x80))
            }
            Charset::JisX0208
            | Charset::JisX0208_1978
            | Charset::JisX0212
            | Charset::KsX1001
            | Charset::Gb2312 => {
                return Err(self.internal(offset, charset, Register::G2));
            }
        };
        Ok(ch)
    }

    /// Decode one graphic unit at `input[0]` through the active register
    fn decode_graphic(&self, input: &[u8], offset: usize, output: &mut String) -> Result<usize> {
        let register = if self.state.shifted {
            Register::G1
        } else {
            Register::G0
        };
        let charset = self.state.get(register);
        let byte = input[0];

        match charset {
            Charset::Ascii => {
                output.push(char::from(byte));
                Ok(1)
            }
            Charset::JisX0201Roman => {
                let ch = self
                    .tables
                    .lookup_decode(charset, u16::from(byte))
                    .ok_or(Error::InvalidByte { offset, len: 1 })?;
                output.push(ch);
                Ok(1)
            }
            Charset::JisX0208
            | Charset::JisX0208_1978
            | Charset::JisX0212
            | Charset::KsX1001
            | Charset::Gb2312 => {
                let Some(&second) = input.get(1) else {
                    return Err(Error::IncompleteSequence { offset });
                };
                let code = u16::from(byte) << 8 | u16::from(second);
                let ch = self
                    .profile
                    .literal_decode(charset, code)
                    .or_else(|| self.tables.lookup_decode(charset, code))
                    .ok_or(Error::InvalidByte { offset, len: 2 })?;
                output.push(ch);
                Ok(2)
            }
            Charset::Iso8859_1 | Charset::Iso8859_7 => {
                Err(self.internal(offset, charset, register))
            }
        }
    }

    fn internal(&self, offset: usize, charset: Charset, register: Register) -> Error {
        log::error!(
            "{:?} in {:?} cannot decode plain bytes (offset {}, profile {})",
            charset,
            register,
            offset,
            self.profile.name
        );
        Error::Internal {
            offset,
            charset,
            register,
        }
    }
}

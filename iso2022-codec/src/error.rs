//! Error types for encoding and decoding

use iso2022_core::{Charset, Register};
use thiserror::Error;

/// Codec error type
///
/// Decode offsets are byte offsets into the input handed to the call that
/// failed (or absolute stream offsets when returned from
/// [`Decoder::feed`](crate::Decoder::feed)). `len` is the number of bytes
/// that make up the offending unit, so a caller can skip it and resume.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No candidate table of the profile maps the scalar
    #[error("character {ch:?} cannot be encoded in this profile (position {position})")]
    UnmappableCharacter {
        ch: char,
        /// Scalars consumed before the failing one
        position: usize,
    },

    /// Byte or byte pair has no entry in the charset designated for it
    #[error("invalid byte sequence at offset {offset}")]
    InvalidByte { offset: usize, len: usize },

    /// Escape sequence outside the profile's designation grammar
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscapeSequence { offset: usize, len: usize },

    /// Input ends inside a multibyte unit; supply more bytes and resume
    #[error("incomplete multibyte sequence at offset {offset}")]
    IncompleteSequence { offset: usize },

    /// A register holds a charset the engine cannot use from there
    #[error("internal error at offset {offset}: {charset:?} cannot be used from {register:?}")]
    Internal {
        offset: usize,
        charset: Charset,
        register: Register,
    },
}

impl Error {
    /// Byte offset (decoding) or scalar position (encoding) of the failure
    pub fn offset(&self) -> usize {
        match *self {
            Error::UnmappableCharacter { position, .. } => position,
            Error::InvalidByte { offset, .. }
            | Error::InvalidEscapeSequence { offset, .. }
            | Error::IncompleteSequence { offset }
            | Error::Internal { offset, .. } => offset,
        }
    }

    /// More input may complete the sequence
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::IncompleteSequence { .. })
    }

    /// Implementation defect rather than malformed input
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal { .. })
    }

    /// Same error with its offset moved forward by `base`
    pub fn rebase(self, base: usize) -> Self {
        match self {
            Error::UnmappableCharacter { ch, position } => Error::UnmappableCharacter {
                ch,
                position: position + base,
            },
            Error::InvalidByte { offset, len } => Error::InvalidByte {
                offset: offset + base,
                len,
            },
            Error::InvalidEscapeSequence { offset, len } => Error::InvalidEscapeSequence {
                offset: offset + base,
                len,
            },
            Error::IncompleteSequence { offset } => Error::IncompleteSequence {
                offset: offset + base,
            },
            Error::Internal {
                offset,
                charset,
                register,
            } => Error::Internal {
                offset: offset + base,
                charset,
                register,
            },
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase() {
        let err = Error::InvalidByte { offset: 3, len: 2 }.rebase(10);
        assert_eq!(err, Error::InvalidByte { offset: 13, len: 2 });
        assert_eq!(err.offset(), 13);
    }

    #[test]
    fn test_classification() {
        assert!(Error::IncompleteSequence { offset: 0 }.is_recoverable());
        assert!(!Error::InvalidByte { offset: 0, len: 1 }.is_recoverable());
        let internal = Error::Internal {
            offset: 0,
            charset: Charset::Iso8859_1,
            register: Register::G0,
        };
        assert!(internal.is_internal());
        assert!(!internal.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = Error::UnmappableCharacter {
            ch: '☃',
            position: 4,
        };
        assert_eq!(
            err.to_string(),
            "character '☃' cannot be encoded in this profile (position 4)"
        );
    }
}

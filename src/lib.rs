//! ISO-2022 encoding and decoding
//!
//! Stateful, escape-driven conversion between Unicode text and the 7-bit
//! ISO-2022 family: ISO-2022-JP, -JP-1, -JP-2 and ISO-2022-KR.
//!
//! - `iso2022_core`: charsets, the register file, tables and profiles
//! - `iso2022_codec`: the streaming encoder and decoder engines
//! - this crate: the [`Codec`] facade, JSON [`Config`] and error policy
//!
//! ```no_run
//! let codec = iso2022::Codec::new("iso-2022-jp")?;
//! let bytes = codec.encode("あA")?;
//! assert_eq!(bytes, b"\x1b$B\x24\x22\x1b(BA");
//! assert_eq!(codec.decode(&bytes)?, "あA");
//! # Ok::<(), iso2022::Error>(())
//! ```

mod codec;
pub mod config;
mod error;

pub use codec::Codec;
pub use config::{Config, ErrorMode, TableSource};
pub use error::{Error, Result};

pub use iso2022_codec::{escape, Decoder, Encoder, Escape, EscapeParse};
pub use iso2022_core::{
    Charset, CharsetTable, CodecState, Designation, MapTable, Profile, Register, SetClass,
    Substitution, TableEntry, TableFile, TableKey, TableSet,
};

#[cfg(feature = "builtin-tables")]
pub use iso2022_core::builtin;

/// Errors from the encoder and decoder engines
pub type CodecError = iso2022_codec::Error;

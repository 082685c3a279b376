//! ISO-2022 Codec - stateful encoder and decoder engines
//!
//! This crate implements the two halves of an ISO-2022 style codec:
//! - [`Encoder`]: Unicode scalars to bytes, emitting designation escapes
//!   only when the charset in a register has to change
//! - [`Decoder`]: bytes to Unicode scalars, tracking designations and
//!   shifts embedded in the stream
//!
//! Both engines own their [`CodecState`](iso2022_core::CodecState) and only
//! borrow the profile and the tables, so any number of streams can share
//! one set of tables. Input can arrive in arbitrary chunks; a multibyte
//! unit split by a chunk boundary is reported as
//! [`Error::IncompleteSequence`] (or carried over by [`Decoder::feed`]).
//!
//! Reference: ECMA-35, RFC 1468, RFC 1554, RFC 1557

mod decoder;
mod encoder;
mod error;
pub mod escape;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use escape::{Escape, EscapeParse};

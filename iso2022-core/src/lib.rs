//! ISO-2022 Core - charset identities, registers, tables and profiles
//!
//! This crate holds the data model shared by the encoder and decoder:
//! - Charset identities and their ISO 2022 attributes
//! - The per-stream designation register file (G0/G1/G2 + shift flag)
//! - The table lookup adapter over externally supplied charset tables
//! - Encoding profiles (designation sets, table priority, substitutions)
//!
//! Nothing in here performs I/O or keeps process-wide mutable state. Tables
//! are immutable once loaded and can be shared between any number of
//! streams.

#[cfg(feature = "builtin-tables")]
pub mod builtin;
mod charset;
mod profile;
mod table;

pub use charset::{Charset, CodecState, Register, SetClass};
pub use profile::{Designation, Profile, Substitution, FULLWIDTH_REVERSE_SOLIDUS};
pub use table::{
    jisx0201_roman_decode, jisx0201_roman_encode, CharsetTable, MapTable, TableEntry, TableFile,
    TableKey, TableSet,
};

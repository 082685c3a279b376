//! One-shot codec facade
//!
//! [`Codec`] bundles a profile, a shared table set and an [`ErrorMode`].
//! Each call runs a fresh engine and ends at the baseline state, so a
//! `Codec` can be shared freely. Streams that need state across calls use
//! [`Codec::encoder`] / [`Codec::decoder`] directly.

use std::sync::Arc;

use iso2022_codec::{escape, Decoder, Encoder};
use iso2022_core::{Charset, Profile, TableSet};

use crate::config::{Config, ErrorMode};
use crate::error::{Error, Result};

/// Written in place of an unmappable scalar in [`ErrorMode::Replace`]
const ENCODE_REPLACEMENT: char = '?';

/// Profile plus tables plus error policy
#[derive(Debug, Clone)]
pub struct Codec {
    profile: Profile,
    tables: Arc<TableSet>,
    errors: ErrorMode,
}

impl Codec {
    /// Codec for a built-in profile over the built-in tables
    #[cfg(feature = "builtin-tables")]
    pub fn new(name: &str) -> Result<Self> {
        let profile =
            Profile::by_name(name).ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
        Self::with_tables(profile, Arc::new(TableSet::standard()))
    }

    /// Codec for any profile over caller-supplied tables
    ///
    /// Fails if the profile needs a table that is not in `tables`,
    /// designates a charset into a register ISO 2022 has no escape for, or
    /// encodes into a charset it never designates.
    pub fn with_tables(profile: Profile, tables: Arc<TableSet>) -> Result<Self> {
        if let Some(&key) = tables.missing_tables(&profile).first() {
            return Err(Error::MissingTable {
                profile: profile.name.clone(),
                key,
            });
        }
        if let Some(bad) = profile
            .designations
            .iter()
            .find(|d| escape::designation(d.register, d.charset).is_none())
        {
            return Err(Error::InvalidProfile {
                profile: profile.name.clone(),
                reason: format!("{:?} cannot be designated into {:?}", bad.charset, bad.register),
            });
        }
        let encodable = profile
            .candidates
            .iter()
            .chain(profile.substitutions.iter().map(|s| &s.charset));
        for &charset in encodable {
            if charset != Charset::Ascii && profile.register_for(charset).is_none() {
                return Err(Error::InvalidProfile {
                    profile: profile.name.clone(),
                    reason: format!("{:?} is encoded but never designated", charset),
                });
            }
        }
        Ok(Self {
            profile,
            tables,
            errors: ErrorMode::default(),
        })
    }

    /// Codec described by a configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let profile = config.resolve_profile()?;
        let tables = config.load_tables()?;
        Ok(Self::with_tables(profile, Arc::new(tables))?.with_errors(config.errors))
    }

    pub fn with_errors(mut self, errors: ErrorMode) -> Self {
        self.errors = errors;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn tables(&self) -> &Arc<TableSet> {
        &self.tables
    }

    pub fn errors(&self) -> ErrorMode {
        self.errors
    }

    /// Fresh streaming encoder borrowing this codec's profile and tables
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.profile, &self.tables)
    }

    /// Fresh streaming decoder borrowing this codec's profile and tables
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.profile, &self.tables)
    }

    /// Encode a complete string, ending at the baseline state
    pub fn encode(&self, input: &str) -> Result<Vec<u8>> {
        let mut encoder = self.encoder();
        let mut output = Vec::with_capacity(input.len() + 8);

        for (position, ch) in input.chars().enumerate() {
            match encoder.encode_char(ch, position, &mut output) {
                Ok(()) => {}
                Err(err @ iso2022_codec::Error::UnmappableCharacter { .. }) => match self.errors {
                    ErrorMode::Strict => return Err(err.into()),
                    ErrorMode::Replace => {
                        log::debug!("replacing {:?} at position {}", ch, position);
                        encoder.encode_char(ENCODE_REPLACEMENT, position, &mut output)?;
                    }
                    ErrorMode::Ignore => {
                        log::debug!("dropping {:?} at position {}", ch, position);
                    }
                },
                Err(err) => return Err(err.into()),
            }
        }

        encoder.reset(&mut output);
        Ok(output)
    }

    /// Decode a complete byte string
    ///
    /// Input that ends inside a unit is malformed here; use
    /// [`Decoder::feed`] for input that arrives in pieces.
    pub fn decode(&self, input: &[u8]) -> Result<String> {
        let mut decoder = self.decoder();
        let mut output = String::with_capacity(input.len());
        let mut base = 0;

        while base < input.len() {
            let err = match decoder.decode(&input[base..], &mut output) {
                Ok(()) => break,
                Err(err) => err.rebase(base),
            };
            let (offset, len) = match err {
                iso2022_codec::Error::InvalidByte { offset, len }
                | iso2022_codec::Error::InvalidEscapeSequence { offset, len } => (offset, len),
                iso2022_codec::Error::IncompleteSequence { offset } => {
                    (offset, input.len() - offset)
                }
                _ => return Err(err.into()),
            };
            match self.errors {
                ErrorMode::Strict => return Err(err.into()),
                ErrorMode::Replace => {
                    log::debug!("replacing {} bytes at offset {}", len, offset);
                    output.push(char::REPLACEMENT_CHARACTER);
                }
                ErrorMode::Ignore => {
                    log::debug!("dropping {} bytes at offset {}", len, offset);
                }
            }
            base = offset + len;
        }

        decoder.reset();
        Ok(output)
    }
}

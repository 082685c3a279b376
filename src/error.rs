//! Error type for codec construction, configuration and one-shot calls

use std::io;

use iso2022_core::TableKey;
use thiserror::Error;

/// Facade error type
#[derive(Error, Debug)]
pub enum Error {
    /// Encoding or decoding failed
    #[error(transparent)]
    Codec(#[from] iso2022_codec::Error),

    /// No built-in or configured profile has this name
    #[error("Unknown encoding profile: {0}")]
    UnknownProfile(String),

    /// The profile designates a charset whose table is not loaded
    #[error("Profile {profile} needs table {key:?}, which is not loaded")]
    MissingTable { profile: String, key: TableKey },

    /// The profile cannot be expressed in ISO 2022
    #[error("Invalid profile {profile}: {reason}")]
    InvalidProfile { profile: String, reason: String },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON configuration or table file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration for the codec facade
//!
//! Configuration is a JSON document selecting the profile, the error
//! policy, and where tables come from. Every field has a default, so `{}`
//! is a valid configuration (ISO-2022-JP-2, strict, built-in tables).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use iso2022_core::{MapTable, Profile, TableKey, TableSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What the one-shot facade calls do with malformed or unmappable input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Return the typed error
    #[default]
    Strict,
    /// Write `?` when encoding, U+FFFD when decoding
    Replace,
    /// Drop the offending unit
    Ignore,
}

/// A table file to load under a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    pub key: TableKey,
    pub path: PathBuf,
}

/// Codec configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Profile name, looked up in `profiles` first, then the built-ins
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Error policy
    #[serde(default)]
    pub errors: ErrorMode,

    /// Start from the built-in tables (needs the `builtin-tables` feature)
    #[serde(default = "default_true")]
    pub builtin_tables: bool,

    /// Table files, loaded after (and replacing) the built-ins
    #[serde(default)]
    pub tables: Vec<TableSource>,

    /// Custom profile definitions
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

fn default_profile() -> String {
    "iso2022_jp_2".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            errors: ErrorMode::default(),
            builtin_tables: true,
            tables: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The selected profile
    pub fn resolve_profile(&self) -> Result<Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == self.profile)
            .cloned()
            .or_else(|| Profile::by_name(&self.profile))
            .ok_or_else(|| Error::UnknownProfile(self.profile.clone()))
    }

    /// Build the table set described by this configuration
    pub fn load_tables(&self) -> Result<TableSet> {
        let mut tables = if self.builtin_tables {
            builtin_tables()
        } else {
            TableSet::new()
        };

        for source in &self.tables {
            let file = File::open(&source.path)?;
            let table = MapTable::from_reader(BufReader::new(file))?;
            log::info!(
                "loaded {:?} table from {} ({} entries)",
                source.key,
                source.path.display(),
                table.len()
            );
            tables.insert(source.key, table);
        }
        Ok(tables)
    }
}

#[cfg(feature = "builtin-tables")]
fn builtin_tables() -> TableSet {
    TableSet::standard()
}

#[cfg(not(feature = "builtin-tables"))]
fn builtin_tables() -> TableSet {
    log::warn!("built-in tables requested but the builtin-tables feature is disabled");
    TableSet::new()
}

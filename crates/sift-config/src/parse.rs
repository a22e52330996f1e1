//! Configuration file parsing.
//!
//! Parses individual `.sift.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, InputFormat};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Input settings section.
    pub input: Option<RawInputSettings>,
    /// Output settings section.
    pub output: Option<RawOutputSettings>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Fuzzy distance for terms without a `~N` suffix.
    pub default_fuzzy: Option<u8>,
}

/// Raw input settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawInputSettings {
    /// Record format.
    pub format: Option<InputFormat>,
    /// Field separator for the `lines` format.
    pub delimiter: Option<String>,
    /// Keys to search in the `jsonl` format.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub fields: Option<Vec<String>>,
}

/// Raw output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawOutputSettings {
    /// Maximum number of records to print.
    pub limit: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// This is used during discovery to stop traversal at root configs.
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

//! Configuration system for sift.
//!
//! sift uses TOML configuration files named `.sift.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.sift.toml` files found, then loading `~/.sift.toml` as the global config with lowest
//! precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawInputSettings, RawOutputSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Largest fuzzy distance a query can request with a `~N` suffix.
pub const MAX_SUFFIX_FUZZY: u8 = 9;

/// Top-level merged configuration for sift.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.sift.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Matching settings.
    pub search: SearchSettings,
    /// How records are read.
    pub input: InputSettings,
    /// How matches are printed.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sift.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.sift.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.sift.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.sift.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            search: &self.search,
            input: &self.input,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Matching settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Fuzzy distance for terms without a `~N` suffix (0 = exact matching only).
    pub default_fuzzy: u8,
}

/// How record files are split into records and fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One record per line.
    #[default]
    Lines,
    /// One JSON object per line.
    Jsonl,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "jsonl" | "json" => Ok(Self::Jsonl),
            _ => Err(ConfigError::UnknownInputFormat {
                value: s.to_string(),
            }),
        }
    }
}

/// Input settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSettings {
    /// Record format.
    pub format: InputFormat,
    /// Field separator for the `lines` format; unset means the whole line is one field.
    pub delimiter: Option<String>,
    /// Keys to search in the `jsonl` format; empty means every string value.
    pub fields: Vec<String>,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Maximum number of records to print (0 = unlimited).
    pub limit: usize,
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Matching settings.
    search: &'a SearchSettings,
    /// Input settings.
    input: &'a InputSettings,
    /// Output settings.
    output: &'a OutputSettings,
}

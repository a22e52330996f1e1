//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying
//! precedence rules.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::{
    Config, InputSettings, OutputSettings, SearchSettings,
    parse::{RawConfig, RawInputSettings, RawOutputSettings, RawSearchSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// cwd), lowest precedence last (global config). Each setting takes the value from the
/// highest-precedence file that defines it. `fields` is replaced wholesale, never
/// concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut search = SearchSettings::default();
    let mut input = InputSettings::default();
    let mut output = OutputSettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        trace!(path = %parsed.path.display(), "applying config");
        let raw = &parsed.config;
        if let Some(ref s) = raw.search {
            apply_raw_search(&mut search, s);
        }
        if let Some(ref s) = raw.input {
            apply_raw_input(&mut input, s);
        }
        if let Some(ref s) = raw.output {
            apply_raw_output(&mut output, s);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Config {
        search,
        input,
        output,
        config_root,
    }
}

/// Applies raw search settings, overwriting any present values.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.default_fuzzy {
        result.default_fuzzy = v;
    }
}

/// Applies raw input settings, overwriting any present values.
fn apply_raw_input(result: &mut InputSettings, raw: &RawInputSettings) {
    if let Some(v) = raw.format {
        result.format = v;
    }
    if let Some(ref v) = raw.delimiter {
        result.delimiter = Some(v.clone());
    }
    if let Some(ref v) = raw.fields {
        result.fields.clone_from(v);
    }
}

/// Applies raw output settings, overwriting any present values.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
}

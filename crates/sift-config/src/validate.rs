//! Configuration validation.
//!
//! Reports settings that load fine but are unlikely to do what the user intended.

use std::fmt;

use crate::{Config, InputFormat, MAX_SUFFIX_FUZZY};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `default_fuzzy` is larger than any `~N` suffix can express.
    LargeDefaultFuzzy {
        /// Configured distance.
        value: u8,
    },
    /// `fields` is set but the input format is `lines`, which ignores it.
    FieldsIgnoredForLines,
    /// `delimiter` is set but the input format is `jsonl`, which ignores it.
    DelimiterIgnoredForJsonl,
    /// `delimiter` is the empty string.
    EmptyDelimiter,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LargeDefaultFuzzy { value } => write!(
                f,
                "search.default_fuzzy = {value} exceeds {MAX_SUFFIX_FUZZY}; most words will match"
            ),
            Self::FieldsIgnoredForLines => {
                write!(f, "input.fields is ignored when input.format = \"lines\"")
            }
            Self::DelimiterIgnoredForJsonl => {
                write!(f, "input.delimiter is ignored when input.format = \"jsonl\"")
            }
            Self::EmptyDelimiter => {
                write!(f, "input.delimiter is empty; each line is kept as one field")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.search.default_fuzzy > MAX_SUFFIX_FUZZY {
        warnings.push(ConfigWarning::LargeDefaultFuzzy {
            value: config.search.default_fuzzy,
        });
    }

    match config.input.format {
        InputFormat::Lines => {
            if !config.input.fields.is_empty() {
                warnings.push(ConfigWarning::FieldsIgnoredForLines);
            }
        }
        InputFormat::Jsonl => {
            if config.input.delimiter.is_some() {
                warnings.push(ConfigWarning::DelimiterIgnoredForJsonl);
            }
        }
    }

    if config.input.delimiter.as_deref() == Some("") {
        warnings.push(ConfigWarning::EmptyDelimiter);
    }

    warnings
}

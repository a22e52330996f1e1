//! Prepared record fields.

use std::cell::OnceCell;

/// The searchable fields of one candidate record, lower-cased for matching.
///
/// The word list used by fuzzy matching is only built the first time a fuzzy term
/// needs it.
#[derive(Debug, Clone, Default)]
pub struct Haystack {
    /// Lower-cased fields, in caller order.
    fields: Vec<String>,
    /// Alphanumeric words across all fields.
    words: OnceCell<Vec<String>>,
}

impl Haystack {
    /// Prepares a record's fields for matching.
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|field| field.as_ref().to_lowercase())
                .collect(),
            words: OnceCell::new(),
        }
    }

    /// Returns the lower-cased fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns true if any field contains `needle` as a substring.
    ///
    /// `needle` is expected to be lower-case already.
    pub fn contains(&self, needle: &str) -> bool {
        self.fields.iter().any(|field| field.contains(needle))
    }

    /// Returns every word of every field, split on non-alphanumeric characters.
    pub fn words(&self) -> &[String] {
        self.words.get_or_init(|| {
            self.fields
                .iter()
                .flat_map(|field| field.split(|ch: char| !ch.is_alphanumeric()))
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

//! Boolean evaluation of query trees against record fields.

use sift_query::{ParseResult, QueryExpr, TermNode, parse};
use tracing::trace;

use crate::{fuzzy::levenshtein, haystack::Haystack};

/// Options that apply to every term of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Fuzzy distance for terms written without a `~N` suffix (0 = exact only).
    pub default_fuzzy: u8,
}

impl EvalOptions {
    /// Creates options with the given default fuzzy distance.
    pub fn with_default_fuzzy(default_fuzzy: u8) -> Self {
        Self { default_fuzzy }
    }
}

/// Returns true if a single term matches the record.
///
/// Phrases must appear as a contiguous substring of one field and ignore fuzziness.
/// Other terms first try the same substring test; failing that, with a non-zero fuzzy
/// distance (the term's own, else `default_fuzzy`), any field word within that edit
/// distance is a match.
pub fn term_matches(term: &TermNode, haystack: &Haystack, default_fuzzy: u8) -> bool {
    if haystack.contains(&term.value) {
        return true;
    }
    if term.is_phrase {
        return false;
    }

    let max = usize::from(term.fuzzy_distance.unwrap_or(default_fuzzy));
    if max == 0 {
        return false;
    }

    let term_len = term.value.chars().count();
    haystack
        .words()
        .iter()
        .filter(|word| word.chars().count().abs_diff(term_len) <= max)
        .any(|word| {
            let distance = levenshtein(&term.value, word, max);
            let hit = distance <= max;
            if hit {
                trace!(term = %term.value, %word, distance, "fuzzy match");
            }
            hit
        })
}

/// Evaluates an expression tree against a prepared record.
pub fn matches(expr: &QueryExpr, haystack: &Haystack, options: EvalOptions) -> bool {
    match expr {
        QueryExpr::Term(term) => term_matches(term, haystack, options.default_fuzzy),
        QueryExpr::Not { child } => !matches(child, haystack, options),
        QueryExpr::And { left, right } => {
            matches(left, haystack, options) && matches(right, haystack, options)
        }
        QueryExpr::Or { left, right } => {
            matches(left, haystack, options) || matches(right, haystack, options)
        }
    }
}

/// Evaluates an optional query tree against one record's fields.
///
/// An absent tree (an empty query) matches every record.
pub fn evaluate<S: AsRef<str>>(
    root: Option<&QueryExpr>,
    fields: &[S],
    default_fuzzy: u8,
) -> bool {
    let Some(root) = root else {
        return true;
    };
    matches(
        root,
        &Haystack::new(fields),
        EvalOptions::with_default_fuzzy(default_fuzzy),
    )
}

/// A parsed query ready to test many records.
///
/// The tree is immutable once built, so a `Matcher` can be shared across threads and
/// used for any number of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    /// Parsed query.
    parsed: ParseResult,
    /// Evaluation options.
    options: EvalOptions,
}

impl Matcher {
    /// Parses `query` and pairs it with evaluation options.
    pub fn new(query: &str, options: EvalOptions) -> Self {
        Self {
            parsed: parse(query),
            options,
        }
    }

    /// Returns the parse result behind this matcher.
    pub fn parsed(&self) -> &ParseResult {
        &self.parsed
    }

    /// Returns the evaluation options.
    pub fn options(&self) -> EvalOptions {
        self.options
    }

    /// Returns true if the query was empty and therefore matches everything.
    pub fn is_match_all(&self) -> bool {
        self.parsed.root.is_none()
    }

    /// Tests a prepared record.
    pub fn matches(&self, haystack: &Haystack) -> bool {
        self.parsed
            .root
            .as_ref()
            .is_none_or(|root| matches(root, haystack, self.options))
    }

    /// Tests a record given as raw fields.
    pub fn matches_fields<S: AsRef<str>>(&self, fields: &[S]) -> bool {
        self.is_match_all() || self.matches(&Haystack::new(fields))
    }
}

//! Record matching for sift queries.
//!
//! Evaluates a parsed [`sift_query::QueryExpr`] against the text fields of a candidate
//! record and answers a single question: does this record satisfy the query?
//!
//! Matching is case-insensitive substring containment. Fuzzy terms (`colour~1`, or any
//! plain term when a default fuzzy distance is set) also accept whole words within a
//! bounded Levenshtein distance.
//!
//! # Example
//!
//! ```
//! use sift_match::{EvalOptions, Matcher, evaluate, levenshtein};
//! use sift_query::parse;
//!
//! let parsed = parse("color~1 AND NOT red");
//! assert!(evaluate(parsed.root.as_ref(), &["Favourite colour: blue"], 0));
//!
//! let matcher = Matcher::new("\"hello world\"", EvalOptions::default());
//! assert!(!matcher.matches_fields(&["hello", "world"]));
//!
//! assert_eq!(levenshtein("kitten", "sitting", 10), 3);
//! ```

#![warn(missing_docs)]

mod evaluate;
mod fuzzy;
mod haystack;

pub use evaluate::{EvalOptions, Matcher, evaluate, matches, term_matches};
pub use fuzzy::levenshtein;
pub use haystack::Haystack;

//! sift: filter records with boolean queries.
//!
//! sift reads records from text or JSON-lines files and prints the ones whose fields
//! satisfy a query such as `rust OR golang NOT java` or `"error handling" colour~1`.
//! Parsing lives in `sift-query`, matching in `sift-match`, and `.sift.toml` handling in
//! `sift-config`; this crate turns input files into records and drives the CLI.

#![warn(missing_docs)]

pub mod input;

pub use input::{InputError, Record, Records, open};

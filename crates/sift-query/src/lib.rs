//! Boolean query parsing for sift.
//!
//! This crate turns a user-typed filter string into an expression tree:
//!
//! - **Terms**: `rust` - words that must appear (case-insensitive substring)
//! - **Phrases**: `"error handling"` or `'error handling'` - contiguous text
//! - **Fuzzy terms**: `colour~1` - words within an edit distance (single digit)
//! - **AND**: `rust AND async`, or just `rust async`
//! - **OR**: `rust OR golang`
//! - **NOT**: `NOT deprecated`
//!
//! Precedence is NOT, then AND, then OR. There is no grouping syntax. Parsing never
//! fails: malformed input degrades to a more literal or less constrained query.
//!
//! # Example
//!
//! ```
//! use sift_query::{QueryExpr, TermNode, parse};
//!
//! let result = parse("rust OR golang AND NOT deprecated");
//! assert_eq!(result.terms.len(), 3);
//! assert!(matches!(result.root, Some(QueryExpr::Or { .. })));
//! assert_eq!(result.terms[0], TermNode::word("rust"));
//! ```

#![warn(missing_docs)]

mod ast;
mod lexer;
mod parser;

pub use ast::{ParseResult, QueryExpr, TermNode};
pub use lexer::{Token, tokenize};
pub use parser::{parse, term_from_raw};

//! Query abstract syntax tree.
//!
//! A parsed query is a binary expression tree of terms combined with NOT, AND and OR.
//! Trees are built once by the parser and are read-only afterwards.

use std::fmt;

use serde::Serialize;

/// A single searchable unit: a word, a quoted phrase, or a fuzzy-suffixed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermNode {
    /// Lower-cased text to look for, with quotes and fuzzy suffix removed.
    pub value: String,
    /// Maximum edit distance from a `~N` suffix, if one was given.
    pub fuzzy_distance: Option<u8>,
    /// True if the term was quoted; phrases only match as contiguous substrings.
    pub is_phrase: bool,
}

impl TermNode {
    /// Creates a plain (non-phrase, non-fuzzy) term.
    pub fn word(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fuzzy_distance: None,
            is_phrase: false,
        }
    }

    /// Creates a phrase term.
    pub fn phrase(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fuzzy_distance: None,
            is_phrase: true,
        }
    }

    /// Creates a word term with an explicit fuzzy distance.
    pub fn fuzzy(value: impl Into<String>, distance: u8) -> Self {
        Self {
            value: value.into(),
            fuzzy_distance: Some(distance),
            is_phrase: false,
        }
    }

    /// Formats the term back into query syntax.
    fn to_query_string(&self) -> String {
        let mut out = if self.is_phrase {
            format!("\"{}\"", self.value)
        } else {
            self.value.clone()
        };
        if let Some(distance) = self.fuzzy_distance {
            out.push_str(&format!("~{distance}"));
        }
        out
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryExpr {
    /// A single search term.
    Term(TermNode),

    /// Negation: the record must NOT match the child.
    Not {
        /// Negated expression.
        child: Box<Self>,
    },

    /// Conjunction: both sides must match.
    And {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// Disjunction: at least one side must match.
    Or {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
}

impl QueryExpr {
    /// Wraps an expression in a negation.
    pub fn not(child: Self) -> Self {
        Self::Not {
            child: Box::new(child),
        }
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns every term in the tree, depth-first, left to right.
    pub fn terms(&self) -> Vec<TermNode> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    /// Pushes the terms of this subtree onto `out` in pre-order.
    fn collect_terms(&self, out: &mut Vec<TermNode>) {
        match self {
            Self::Term(term) => out.push(term.clone()),
            Self::Not { child } => child.collect_terms(out),
            Self::And { left, right } | Self::Or { left, right } => {
                left.collect_terms(out);
                right.collect_terms(out);
            }
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(term) => {
                write!(f, "{prefix}")?;
                if term.is_phrase {
                    write!(f, "Phrase({:?})", term.value)?;
                } else {
                    write!(f, "Term({:?})", term.value)?;
                }
                match term.fuzzy_distance {
                    Some(distance) => writeln!(f, "~{distance}"),
                    None => writeln!(f),
                }
            }
            Self::Not { child } => {
                writeln!(f, "{prefix}Not")?;
                child.fmt_tree(f, indent + 1)
            }
            Self::And { left, right } => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or { left, right } => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression as a query string (human-readable form).
    ///
    /// Operators are always spelled out, so `a b` comes back as `a AND b`. Since the
    /// language has no grouping, the output re-parses to the same tree only when the
    /// tree follows the parser's precedence.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Term(term) => term.to_query_string(),
            Self::Not { child } => format!("NOT {}", child.to_query_string()),
            Self::And { left, right } => {
                format!("{} AND {}", left.to_query_string(), right.to_query_string())
            }
            Self::Or { left, right } => {
                format!("{} OR {}", left.to_query_string(), right.to_query_string())
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// The outcome of parsing a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Root of the expression tree; `None` only for empty or whitespace-only input.
    pub root: Option<QueryExpr>,
    /// Every term in the tree, depth-first, left to right.
    pub terms: Vec<TermNode>,
}

impl ParseResult {
    /// Builds a result from an optional root, collecting its terms.
    pub fn new(root: Option<QueryExpr>) -> Self {
        let terms = root.as_ref().map(QueryExpr::terms).unwrap_or_default();
        Self { root, terms }
    }

    /// Returns true if the query had no content.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> QueryExpr {
        QueryExpr::Term(TermNode::word(s))
    }

    #[test]
    fn terms_are_pre_order_left_to_right() {
        let expr = QueryExpr::or(
            QueryExpr::and(term("a"), QueryExpr::not(term("b"))),
            term("c"),
        );
        let values: Vec<String> = expr.terms().into_iter().map(|t| t.value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_result_collects_terms() {
        let result = ParseResult::new(Some(QueryExpr::and(term("x"), term("y"))));
        assert_eq!(result.terms, vec![TermNode::word("x"), TermNode::word("y")]);
        assert!(!result.is_empty());
    }

    #[test]
    fn empty_parse_result() {
        let result = ParseResult::new(None);
        assert!(result.terms.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn tree_display() {
        let expr = QueryExpr::or(
            QueryExpr::Term(TermNode::fuzzy("color", 1)),
            QueryExpr::not(QueryExpr::Term(TermNode::phrase("hello world"))),
        );
        assert_eq!(
            expr.to_string(),
            "Or\n  Term(\"color\")~1\n  Not\n    Phrase(\"hello world\")\n"
        );
    }

    #[test]
    fn query_string() {
        let expr = QueryExpr::or(
            term("a"),
            QueryExpr::and(
                QueryExpr::not(QueryExpr::Term(TermNode::phrase("b c"))),
                QueryExpr::Term(TermNode::fuzzy("d", 2)),
            ),
        );
        assert_eq!(expr.to_query_string(), "a OR NOT \"b c\" AND d~2");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let expr = QueryExpr::not(term("a"));
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["kind"], "not");
        assert_eq!(json["child"]["kind"], "term");
        assert_eq!(json["child"]["value"], "a");
        assert_eq!(json["child"]["is_phrase"], false);
    }
}

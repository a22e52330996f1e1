//! Query parser.
//!
//! Folds a token stream into an expression tree in three sequential passes. There is no
//! grouping syntax, so precedence is fixed:
//!
//! 1. `NOT` binds to the term immediately after it.
//! 2. `AND` chains adjacent terms, left-associative.
//! 3. `OR` joins whatever the AND pass produced, left to right.
//!
//! Terms that end up next to each other with no operator between them are joined with
//! an implicit AND during the OR pass, so `a b` means `a AND b`. Note that this join
//! happens in the OR pass: `a OR b c` is `(a OR b) AND c`.
//!
//! Parsing never fails. Operators without an operand are dropped, and a query made of
//! nothing but operator keywords is read literally as a list of words.

use tracing::{debug, trace};

use crate::{
    ast::{ParseResult, QueryExpr, TermNode},
    lexer::{Token, is_quote, tokenize},
};

/// A token after the NOT pass.
#[derive(Debug)]
enum Folded {
    /// A term, possibly negated by a preceding NOT.
    Term {
        /// Raw term text as produced by the lexer.
        raw: String,
        /// Whether a NOT was merged into this term.
        negated: bool,
    },
    /// An AND keyword.
    And,
    /// An OR keyword.
    Or,
}

/// An item after the AND pass.
#[derive(Debug)]
enum Chained {
    /// A finished subtree.
    Node(QueryExpr),
    /// An AND keyword that had no term on one side.
    And,
    /// An OR keyword.
    Or,
}

/// Merges each `NOT TERM` pair into a negated term. Other NOTs are dropped.
fn fold_not(tokens: Vec<Token>) -> Vec<Folded> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token {
            Token::Not => match tokens.next_if(|t| matches!(t, Token::Term(_))) {
                Some(Token::Term(raw)) => out.push(Folded::Term { raw, negated: true }),
                _ => trace!("dropping NOT without a following term"),
            },
            Token::Term(raw) => out.push(Folded::Term {
                raw,
                negated: false,
            }),
            Token::And => out.push(Folded::And),
            Token::Or => out.push(Folded::Or),
        }
    }

    out
}

/// Collapses every `TERM (AND TERM)*` run into a left-associative AND chain.
fn fold_and(items: &[Folded]) -> Vec<Chained> {
    let mut out = Vec::with_capacity(items.len());
    let mut position = 0;

    while let Some(item) = items.get(position) {
        position += 1;
        match item {
            Folded::Term { raw, negated } => {
                let mut node = term_from_raw(raw, *negated);
                while let (Some(Folded::And), Some(Folded::Term { raw, negated })) =
                    (items.get(position), items.get(position + 1))
                {
                    node = QueryExpr::and(node, term_from_raw(raw, *negated));
                    position += 2;
                }
                out.push(Chained::Node(node));
            }
            Folded::And => out.push(Chained::And),
            Folded::Or => out.push(Chained::Or),
        }
    }

    out
}

/// Joins the AND pass output left to right: OR where an OR keyword separates two
/// nodes, implicit AND where nothing does.
fn fold_or(items: Vec<Chained>) -> Option<QueryExpr> {
    let mut root: Option<QueryExpr> = None;
    let mut pending_or = false;

    for item in items {
        match item {
            Chained::Node(node) => {
                root = Some(match root.take() {
                    None => node,
                    Some(left) if pending_or => QueryExpr::or(left, node),
                    Some(left) => QueryExpr::and(left, node),
                });
                pending_or = false;
            }
            Chained::Or if root.is_some() => pending_or = true,
            Chained::Or => trace!("dropping OR without a left operand"),
            Chained::And => trace!("dropping AND without an operand"),
        }
    }

    if pending_or {
        trace!("dropping OR without a right operand");
    }

    root
}

/// Reads a query made only of operator keywords as plain words joined by AND.
fn literal_fallback(input: &str) -> Option<QueryExpr> {
    debug!("query has no terms, reading keywords literally");
    input
        .split_whitespace()
        .map(|word| term_from_raw(word, false))
        .reduce(QueryExpr::and)
}

/// Strips surrounding quotes, returning the inner text and whether it was quoted.
///
/// A missing closing quote is tolerated.
fn strip_quotes(raw: &str) -> (&str, bool) {
    match raw.chars().next() {
        Some(quote) if is_quote(quote) => {
            let inner = &raw[quote.len_utf8()..];
            (inner.strip_suffix(quote).unwrap_or(inner), true)
        }
        _ => (raw, false),
    }
}

/// Splits a trailing `~N` (single decimal digit) off a term.
fn split_fuzzy_suffix(text: &str) -> (&str, Option<u8>) {
    let Some((head, suffix)) = text.rsplit_once('~') else {
        return (text, None);
    };
    match suffix.as_bytes() {
        [digit] if digit.is_ascii_digit() && !head.is_empty() => (head, Some(digit - b'0')),
        _ => (text, None),
    }
}

/// Builds a term expression from raw lexer text.
///
/// Surrounding quotes mark a phrase, a `~N` suffix sets the fuzzy distance, and the
/// remaining text is lower-cased. With `negated` set the term is wrapped in `Not`.
///
/// A phrase is any term opened by `"` or `'`, closed or not; the quotes never reach
/// the value.
pub fn term_from_raw(raw: &str, negated: bool) -> QueryExpr {
    let (text, is_phrase) = strip_quotes(raw);
    let (text, fuzzy_distance) = split_fuzzy_suffix(text);

    let term = QueryExpr::Term(TermNode {
        value: text.to_lowercase(),
        fuzzy_distance,
        is_phrase,
    });

    if negated { QueryExpr::not(term) } else { term }
}

/// Parses a query string into an expression tree and its term list.
///
/// Returns an empty result (no root, no terms) for empty or whitespace-only input.
pub fn parse(input: &str) -> ParseResult {
    if input.trim().is_empty() {
        return ParseResult::default();
    }

    let tokens = tokenize(input);
    let token_count = tokens.len();

    let root = fold_or(fold_and(&fold_not(tokens))).or_else(|| literal_fallback(input));
    let result = ParseResult::new(root);

    debug!(
        tokens = token_count,
        terms = result.terms.len(),
        "parsed query"
    );

    result
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn term(s: &str) -> QueryExpr {
        QueryExpr::Term(TermNode::word(s))
    }

    fn phrase(s: &str) -> QueryExpr {
        QueryExpr::Term(TermNode::phrase(s))
    }

    fn fuzzy(s: &str, distance: u8) -> QueryExpr {
        QueryExpr::Term(TermNode::fuzzy(s, distance))
    }

    fn not(e: QueryExpr) -> QueryExpr {
        QueryExpr::not(e)
    }

    fn and(l: QueryExpr, r: QueryExpr) -> QueryExpr {
        QueryExpr::and(l, r)
    }

    fn or(l: QueryExpr, r: QueryExpr) -> QueryExpr {
        QueryExpr::or(l, r)
    }

    fn root(input: &str) -> QueryExpr {
        parse(input).root.unwrap()
    }

    #[test]
    fn empty_query() {
        assert_eq!(parse(""), ParseResult::default());
        assert_eq!(parse("   "), ParseResult::default());
        assert_eq!(parse("\t\n"), ParseResult::default());
    }

    #[test]
    fn single_term() {
        assert_eq!(root("rust"), term("rust"));
    }

    #[test]
    fn terms_are_lowercased() {
        assert_eq!(root("RuSt"), term("rust"));
    }

    #[test]
    fn explicit_and() {
        assert_eq!(root("a AND b"), and(term("a"), term("b")));
    }

    #[test]
    fn and_chain_is_left_associative() {
        assert_eq!(
            root("a AND b AND c"),
            and(and(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn implicit_and() {
        assert_eq!(root("a b"), and(term("a"), term("b")));
        assert_eq!(
            root("a b c"),
            and(and(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn simple_or() {
        assert_eq!(root("a OR b"), or(term("a"), term("b")));
    }

    #[test]
    fn or_chain_is_left_associative() {
        assert_eq!(
            root("a OR b OR c"),
            or(or(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            root("a OR b AND c"),
            or(term("a"), and(term("b"), term("c")))
        );
        assert_eq!(
            root("a AND b OR c"),
            or(and(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn not_binds_tighter_than_and() {
        assert_eq!(root("NOT a AND b"), and(not(term("a")), term("b")));
        assert_eq!(root("a AND NOT b"), and(term("a"), not(term("b"))));
    }

    #[test]
    fn not_binds_tighter_than_or() {
        assert_eq!(root("NOT a OR b"), or(not(term("a")), term("b")));
    }

    #[test]
    fn implicit_and_joins_after_or() {
        // Juxtaposition is resolved in the OR pass, left to right.
        assert_eq!(
            root("a OR b c"),
            and(or(term("a"), term("b")), term("c"))
        );
        assert_eq!(
            root("a b OR c"),
            or(and(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn implicit_and_between_and_chains() {
        assert_eq!(
            root("a AND b c AND d"),
            and(and(term("a"), term("b")), and(term("c"), term("d")))
        );
    }

    #[test]
    fn stray_and_between_terms_becomes_implicit_and() {
        assert_eq!(root("a AND AND b"), and(term("a"), term("b")));
    }

    #[test]
    fn stray_and_before_or_is_ignored() {
        assert_eq!(root("a AND OR b"), or(term("a"), term("b")));
    }

    #[test]
    fn stray_operators_at_edges_are_dropped() {
        assert_eq!(root("a AND"), term("a"));
        assert_eq!(root("AND a"), term("a"));
        assert_eq!(root("a OR"), term("a"));
        assert_eq!(root("OR a"), term("a"));
        assert_eq!(root("a NOT"), term("a"));
    }

    #[test]
    fn double_not_keeps_one_negation() {
        // The first NOT is not followed by a term, so it is dropped.
        assert_eq!(root("NOT NOT a"), not(term("a")));
    }

    #[test]
    fn not_before_operator_is_dropped() {
        assert_eq!(root("a NOT OR b"), or(term("a"), term("b")));
    }

    #[test]
    fn negated_terms_in_and_chain() {
        assert_eq!(
            root("NOT a AND NOT b"),
            and(not(term("a")), not(term("b")))
        );
    }

    #[test]
    fn keyword_only_queries_read_literally() {
        assert_eq!(root("NOT"), term("not"));
        assert_eq!(root("and OR"), and(term("and"), term("or")));
    }

    #[test]
    fn leading_dash_is_literal() {
        assert_eq!(root("-deprecated"), term("-deprecated"));
    }

    #[test]
    fn double_quoted_phrase() {
        assert_eq!(root("\"Hello World\""), phrase("hello world"));
    }

    #[test]
    fn single_quoted_phrase() {
        assert_eq!(root("'hello world'"), phrase("hello world"));
    }

    #[test]
    fn unterminated_phrase() {
        assert_eq!(root("a \"hello AND world"), and(term("a"), phrase("hello and world")));
    }

    #[test]
    fn empty_phrase() {
        assert_eq!(root("\"\""), phrase(""));
    }

    #[test]
    fn negated_phrase() {
        assert_eq!(root("NOT \"a b\""), not(phrase("a b")));
    }

    #[test]
    fn phrase_with_fuzzy_suffix_inside_quotes() {
        assert_eq!(
            root("\"hello world~2\""),
            QueryExpr::Term(TermNode {
                value: "hello world".into(),
                fuzzy_distance: Some(2),
                is_phrase: true,
            })
        );
    }

    #[test]
    fn fuzzy_suffix() {
        assert_eq!(root("color~1"), fuzzy("color", 1));
        assert_eq!(root("Colour~0"), fuzzy("colour", 0));
        assert_eq!(root("NOT color~2"), not(fuzzy("color", 2)));
    }

    #[test]
    fn malformed_fuzzy_suffix_is_literal() {
        assert_eq!(root("word~12"), term("word~12"));
        assert_eq!(root("word~"), term("word~"));
        assert_eq!(root("word~x"), term("word~x"));
        assert_eq!(root("~1"), term("~1"));
    }

    #[test]
    fn only_last_tilde_is_a_suffix() {
        assert_eq!(root("a~b~3"), fuzzy("a~b", 3));
    }

    #[test]
    fn term_from_raw_negated() {
        assert_eq!(term_from_raw("\"X Y\"", true), not(phrase("x y")));
        assert_eq!(term_from_raw("Foo~1", true), not(fuzzy("foo", 1)));
    }

    #[test]
    fn terms_follow_tree_order() {
        let result = parse("NOT a OR \"b c\" AND d~1");
        assert_eq!(
            result.terms,
            vec![
                TermNode::word("a"),
                TermNode::phrase("b c"),
                TermNode::fuzzy("d", 1),
            ]
        );
    }

    #[test]
    fn reparsing_is_idempotent() {
        for query in ["a OR b AND c", "NOT x \"y z\" w~2", "AND", "'unterminated"] {
            assert_eq!(parse(query), parse(query));
        }
    }

    #[test]
    fn performance_many_queries() {
        let queries = [
            "rust",
            "rust async await",
            "\"error handling\"",
            "NOT deprecated",
            "rust OR golang OR python",
            "a AND b OR c AND d",
            "guide rust OR golang NOT deprecated",
            "colour~1 OR \"favourite color\"",
            "NOT NOT a AND OR b",
            "'unterminated phrase with AND inside",
        ];

        let start = Instant::now();
        for _ in 0..1000 {
            for query in &queries {
                assert!(parse(query).root.is_some());
            }
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 1000,
            "Parsing 10,000 queries took {:?}, expected < 1s",
            elapsed
        );
    }
}

//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. Lexing never fails:
//! an unterminated quote simply runs to the end of the input.

use std::{iter::Peekable, str::Chars};

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// The NOT keyword.
    Not,

    /// A search term, exactly as typed.
    ///
    /// Quoted phrases keep their surrounding quotes (e.g. `"multi word"`), and case is
    /// preserved. Interpretation happens in the parser.
    Term(String),
}

/// Returns true for the characters that open a quoted phrase.
pub fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token() {
            tokens.push(token);
        }

        tokens
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let &ch = self.chars.peek()?;

        if is_quote(ch) {
            Some(self.read_phrase(ch))
        } else {
            Some(self.read_word())
        }
    }

    /// Reads a quoted phrase, keeping both quote characters in the raw text.
    ///
    /// Only the opening quote character closes the phrase. Without a closing quote the
    /// phrase swallows the rest of the input.
    fn read_phrase(&mut self, quote: char) -> Token {
        let mut raw = String::new();
        raw.push(quote);
        self.chars.next(); // consume opening quote

        for ch in self.chars.by_ref() {
            raw.push(ch);
            if ch == quote {
                break;
            }
        }

        Token::Term(raw)
    }

    /// Reads a run of non-whitespace characters as a keyword or a term.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            self.chars.next();
        }

        match word.to_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => Token::Term(word),
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|ch| ch.is_whitespace()).is_some() {}
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

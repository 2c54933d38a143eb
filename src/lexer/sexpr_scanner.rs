use super::token::{Token, TokenKind};
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whitespace runs; `;` line comments are folded into the run
    static ref WHITESPACE: Regex = Regex::new(r"^(?:\s|;[^\n]*)+").expect("whitespace pattern");
    /// Double-quoted string without escapes
    static ref STRING: Regex = Regex::new(r#"^"([^"]*)""#).expect("string pattern");
    /// Unsigned number with optional fraction and exponent
    static ref NUMBER: Regex =
        Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][0-9]+)?").expect("number pattern");
    /// Identifier-style or operator-character symbol
    static ref SYMBOL: Regex =
        Regex::new(r"^(?:[A-Za-z_][A-Za-z_!?*0-9-]*|[-+*/<>=!?\\]+)").expect("symbol pattern");
}

/// Scanner for S-expression egglisp syntax
///
/// Produces tokens lazily through its `Iterator` implementation. A scanner is
/// good for one pass over its source; create a new one to scan again.
pub struct SExprScanner {
    /// Source code
    source: String,
    /// Byte offset of the next unscanned character
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Set once Eof has been produced or an error was raised
    finished: bool,
}

impl SExprScanner {
    /// Creates a new S-expression scanner from source code
    pub fn new(source: &str) -> Self {
        SExprScanner {
            source: source.to_string(),
            current: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// The last token is always `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        self.by_ref().collect()
    }

    /// Scans the next token, producing `Eof` at the end of input
    pub fn next_token(&mut self) -> Result<Token> {
        if self.is_at_end() {
            self.finished = true;
            return Ok(Token::new(
                TokenKind::Eof,
                String::new(),
                self.line,
                self.column,
            ));
        }

        let rest = &self.source[self.current..];
        let (kind, len) = if let Some(m) = WHITESPACE.find(rest) {
            (TokenKind::Whitespace, m.end())
        } else if let Some(caps) = STRING.captures(rest) {
            (TokenKind::String(caps[1].to_string()), caps[0].len())
        } else if rest.starts_with('"') {
            return Err(self.fail(format!(
                "Unterminated string starting at {}:{}",
                self.line, self.column
            )));
        } else if let Some(m) = NUMBER.find(rest) {
            let value: f64 = m.as_str().parse().map_err(|_| {
                Error::syntax(
                    self.line,
                    self.column,
                    format!("Invalid number: {}", m.as_str()),
                )
            })?;
            (TokenKind::Number(value), m.end())
        } else if rest.starts_with('(') {
            (TokenKind::LeftParen, 1)
        } else if rest.starts_with(')') {
            (TokenKind::RightParen, 1)
        } else if rest.starts_with('\'') {
            (TokenKind::Quote, 1)
        } else if let Some(m) = SYMBOL.find(rest) {
            (TokenKind::Symbol(m.as_str().to_string()), m.end())
        } else {
            let c = rest.chars().next().unwrap_or('\0');
            return Err(self.fail(format!("Unexpected character '{}'", c)));
        };

        let lexeme = rest[..len].to_string();
        let token = Token::new(kind, lexeme, self.line, self.column);
        self.advance(len);
        Ok(token)
    }

    /// Current position as (line, column)
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Moves past `len` bytes, keeping line/column in step with any newlines
    fn advance(&mut self, len: usize) {
        let text = &self.source[self.current..self.current + len];
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count();
                self.column = text[last + 1..].chars().count() + 1;
            }
            None => self.column += text.chars().count(),
        }
        self.current += len;
    }

    fn fail(&mut self, message: String) -> Error {
        self.finished = true;
        Error::syntax(self.line, self.column, message)
    }
}

impl Iterator for SExprScanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

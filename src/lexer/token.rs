use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token starts (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    /// `line:column` of the token start, as used in error messages
    pub fn location(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

/// All possible token types in egglisp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Double-quoted string literal (contents without the quotes)
    String(String),
    /// Unsigned numeric literal
    Number(f64),

    /// Symbol: identifier-style or operator-character name
    Symbol(String),

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Quote marker (')
    Quote,

    /// Run of whitespace and/or line comments
    Whitespace,

    // Special
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// Short description used in parser diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::Quote => "`'`",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Eof => "end of input",
        }
    }

    /// True for tokens that form an atom on their own
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::Symbol(_)
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Symbol(name) => write!(f, "{}", name),
            other => write!(f, "{}", other.describe()),
        }
    }
}

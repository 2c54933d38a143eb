//! Lexical analysis for egglisp
//!
//! Converts source text into a lazy stream of tokens. Whitespace (and line
//! comments) is emitted as a token of its own so the parser can reject atoms
//! that run into each other.

mod sexpr_scanner;
mod token;

pub use sexpr_scanner::SExprScanner;
pub use token::{Token, TokenKind};

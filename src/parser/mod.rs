//! egglisp parser
//!
//! Builds `Value` expressions directly from the token stream; code and data
//! share one representation.

mod sexpr_parser;

pub use sexpr_parser::{SExprParser, MAX_PARSE_DEPTH};

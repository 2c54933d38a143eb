//! # egglisp - a small Lisp with first-class scopes
//!
//! A tree-walking interpreter for a minimal Lisp dialect: lexical closures,
//! macros that compute code and run it in the caller's scope, and scopes that
//! are themselves values a program can inspect.
//!
//! ## Quick Start
//!
//! ```rust
//! use egglisp::{Evaluator, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut evaluator = Evaluator::new();
//! let result = evaluator.execute_source("(def x 3) (+ x x)")?;
//!
//! assert_eq!(result, Value::Number(6.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### One expression at a time
//!
//! The parser is driven one expression at a time, so reading and evaluating
//! can be interleaved. This is the loop a REPL or a file runner uses:
//!
//! ```rust
//! use egglisp::{Evaluator, Parser, Value};
//!
//! # fn main() -> egglisp::Result<()> {
//! let code = r#"
//!     (def make-counter (fn (n)
//!       (fn () (begin (set* n (+ n 1)) n))))
//!     (def tick (make-counter 0))
//!     (tick)
//!     (tick)
//! "#;
//!
//! let mut evaluator = Evaluator::new();
//! let globals = evaluator.globals().clone();
//! let mut parser = Parser::new(code);
//! let mut last = Value::Nil;
//!
//! while !parser.is_done()? {
//!     let expr = parser.parse_expression()?;
//!     last = evaluator.evaluate(&expr, &globals)?;
//! }
//!
//! assert_eq!(last, Value::Number(2.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data Types
//!
//! - **Atoms**: numbers (`1.5e3`), strings (`"text"`, no escapes), symbols
//! - **Lists**: `(a b c)`, with `()` as the empty list
//! - **Quoted data**: `'x`, `'(1 2)`
//! - **Singletons**: `nil`, `true` and `false` are bound in the global scope
//!
//! ### Special Forms
//!
//! - `(quote x)` - `x` unevaluated
//! - `(if cond then else)` - `cond` must be a boolean
//! - `(def name value)` - new binding in the current scope
//! - `(set! name value)` - rebind in the current scope only
//! - `(set* name value)` - rebind the nearest enclosing binding
//! - `(fn (params...) body)` / `(macro (params...) body)`
//! - `(begin expr...)` - sequence, value of the last
//!
//! ### Builtin Functions
//!
//! - **Arithmetic and text**: `+`, `concat`
//! - **Lists**: `cons`, `list`, `head`, `tail`, `nil?`
//! - **Meta**: `eval`, `body`, `closure`, `is?`, `type-of`, `env`, `globals`
//! - **Rendering**: `print`, `str`, `repr`
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → Value → Evaluator → Value
//! ```
//!
//! - [`Scanner`] - Tokenizes source code, whitespace runs included
//! - [`Parser`] - Builds `Value` expressions with one token of lookahead
//! - [`Evaluator`] - Evaluates expressions against a scope chain
//! - [`Value`] - Runtime value, shared by code and data
//! - [`Environment`] - Shared, mutable lexical scope
//! - [`BuiltinRegistry`] - Native functions and special forms
//!
//! ## Error Handling
//!
//! Every failure is an [`Error`]; [`Error::classify`] names its class.
//!
//! ```rust
//! use egglisp::Evaluator;
//!
//! let err = Evaluator::new().execute_source("(head nil)").unwrap_err();
//! assert_eq!(err.classify().as_str(), "ArgumentError");
//! ```

/// Version of the egglisp interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builtins;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use builtins::{Arity, Builtin, BuiltinKind, BuiltinRegistry};
pub use error::{ArityKind, Error, ErrorKind, Result};
pub use lexer::{SExprScanner, Token, TokenKind};
pub use parser::SExprParser;
pub use runtime::{Environment, EvaluatorConfig, LispEvaluator, Value};

/// Type alias for the S-expression scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = SExprScanner;

/// Type alias for the S-expression parser.
/// Converts source text into `Value` expressions.
pub type Parser = SExprParser;

/// Type alias for the evaluator (interpreter).
pub type Evaluator = LispEvaluator;

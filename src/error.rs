//! Error types for the egglisp interpreter

use thiserror::Error;

/// Which way an argument count missed the expected arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityKind {
    /// Fewer arguments than parameters
    TooFew,
    /// More arguments than parameters
    TooMany,
}

impl std::fmt::Display for ArityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ArityKind::TooFew => write!(f, "Too few"),
            ArityKind::TooMany => write!(f, "Too many"),
        }
    }
}

/// egglisp interpreter errors
///
/// Every error is fatal to the current top-level evaluation unit. The core
/// never catches its own errors; the host decides how to present them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed token or malformed list structure
    ///
    /// **Triggered by:** unterminated strings, unmatched parentheses, atoms not
    /// separated by whitespace
    /// **Example:** `(+ 1 2` (missing closing parenthesis), `(a"b")`
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where error occurred (1-indexed)
        line: usize,
        /// Column number where error occurred (1-indexed)
        col: usize,
        /// Error description
        message: String,
    },

    /// Unbound symbol on lookup, or missing target on assignment
    ///
    /// **Triggered by:** `x` when x was never defined, `(set! x 1)` when x is
    /// not bound in the current scope
    /// **Prevention:** define names with `(def x value)` before use
    #[error("{name} is undefined{reason}")]
    NameError {
        /// Variable name
        name: String,
        /// Extra context appended to the message (empty for plain lookups)
        reason: String,
    },

    /// `def` of a name that is already bound in the same scope
    #[error("{name} is already defined")]
    DuplicateDefinition {
        /// Variable name
        name: String,
    },

    /// Callable invoked with the wrong number of arguments
    ///
    /// **Example:** `((fn (a b) a) 1)`
    #[error("{kind} arguments to {callee}, expected {expected}, got {got}")]
    ArityError {
        /// Rendered callee (builtin name or closure parameter list)
        callee: String,
        /// Expected argument count, rendered (`2`, `at least 1`)
        expected: String,
        /// Actual argument count
        got: usize,
        /// Too few or too many
        kind: ArityKind,
    },

    /// A builtin's type precondition was violated
    ///
    /// **Example:** `(+ "hello" 5)`, `(cons 1 2)`
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type(s)
        expected: String,
        /// Actual type
        got: String,
    },

    /// A well-typed but semantically invalid argument
    ///
    /// **Example:** `(head nil)`, `(if 1 2 3)`
    #[error("Invalid argument to {callee}: {reason}")]
    ArgumentError {
        /// Callable that rejected the argument
        callee: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The evaluated head of a call form is not callable
    #[error("Value of type {type_name} cannot be applied")]
    NotCallable {
        /// Type of the non-callable value
        type_name: String,
    },

    /// Evaluation nested deeper than the configured limit
    #[error("Maximum evaluation depth exceeded (limit: {limit})")]
    RecursionLimit {
        /// Configured maximum depth
        limit: usize,
    },
}

/// Error taxonomy class, as shown by a host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lexing or parsing failure
    Syntax,
    /// Unbound name
    Name,
    /// Redefinition in one scope
    DuplicateDefinition,
    /// Wrong argument count
    Arity,
    /// Wrong argument type
    Type,
    /// Invalid argument value
    Argument,
    /// Applying a non-callable
    NotCallable,
    /// Evaluation too deep
    Recursion,
}

impl ErrorKind {
    /// Name of the class as the REPL prints it
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Name => "NameError",
            ErrorKind::DuplicateDefinition => "DuplicateDefinitionError",
            ErrorKind::Arity => "ArityError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::NotCallable => "NotCallableError",
            ErrorKind::Recursion => "RecursionError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a syntax error at a source position
    pub fn syntax(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a name error for a plain unbound lookup
    pub fn unbound(name: impl Into<String>) -> Self {
        Error::NameError {
            name: name.into(),
            reason: String::new(),
        }
    }

    /// Create a type error from an expected description and the offending type
    pub fn type_error(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::TypeError {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create an argument error
    pub fn argument(callee: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ArgumentError {
            callee: callee.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error into its taxonomy class
    pub fn classify(&self) -> ErrorKind {
        match self {
            Error::SyntaxError { .. } => ErrorKind::Syntax,
            Error::NameError { .. } => ErrorKind::Name,
            Error::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            Error::ArityError { .. } => ErrorKind::Arity,
            Error::TypeError { .. } => ErrorKind::Type,
            Error::ArgumentError { .. } => ErrorKind::Argument,
            Error::NotCallable { .. } => ErrorKind::NotCallable,
            Error::RecursionLimit { .. } => ErrorKind::Recursion,
        }
    }
}

/// Result type for egglisp operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_fields() {
        let err = Error::syntax(3, 7, "Unexpected )");
        assert_eq!(
            err.to_string(),
            "Syntax error at line 3, column 7: Unexpected )"
        );

        assert_eq!(Error::unbound("x").to_string(), "x is undefined");

        let err = Error::ArityError {
            callee: "<function (a b)>".to_string(),
            expected: "2".to_string(),
            got: 3,
            kind: ArityKind::TooMany,
        };
        assert!(err.to_string().starts_with("Too many arguments"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(Error::unbound("x").classify(), ErrorKind::Name);
        assert_eq!(
            Error::argument("head", "empty list").classify().as_str(),
            "ArgumentError"
        );
        assert_eq!(
            Error::RecursionLimit { limit: 10 }.classify(),
            ErrorKind::Recursion
        );
    }
}

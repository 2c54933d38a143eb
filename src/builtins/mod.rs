//! Builtin registry for egglisp
//!
//! The fixed catalog of native functions and special forms that is installed
//! into a fresh global scope before any user code runs.

pub mod arithmetic;
pub mod forms;
pub mod introspection;
pub mod lists;

use crate::error::{ArityKind, Error, Result};
use crate::runtime::{Environment, LispEvaluator, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// How a builtin receives its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// Arguments are evaluated left to right before the call
    Function,
    /// Arguments are passed as raw forms, with the calling scope
    SpecialForm,
}

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly n arguments
    Exact(usize),
    /// n or more arguments
    AtLeast(usize),
    /// Any number of arguments
    Any,
}

impl Arity {
    /// Checks an argument count, naming `callee` in the error
    pub fn check(&self, callee: &str, got: usize) -> Result<()> {
        let (expected, kind) = match *self {
            Arity::Exact(n) if got < n => (n.to_string(), ArityKind::TooFew),
            Arity::Exact(n) if got > n => (n.to_string(), ArityKind::TooMany),
            Arity::AtLeast(n) if got < n => (format!("at least {}", n), ArityKind::TooFew),
            _ => return Ok(()),
        };
        Err(Error::ArityError {
            callee: callee.to_string(),
            expected,
            got,
            kind,
        })
    }
}

/// Builtin trait - every native function and special form implements this
pub trait Builtin {
    /// Name the builtin is bound to in the global scope
    fn name(&self) -> &str;

    /// One-line description
    fn description(&self) -> &str;

    /// Whether arguments arrive evaluated or raw
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::Function
    }

    /// Accepted argument counts, checked by the evaluator before `call`
    fn arity(&self) -> Arity {
        Arity::Any
    }

    /// Run the builtin
    ///
    /// `args` is a proper list: evaluated values for functions, unevaluated
    /// forms for special forms. `env` is the calling scope.
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment)
        -> Result<Value>;
}

/// Builtin registry
pub struct BuiltinRegistry {
    builtins: HashMap<String, Rc<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// Create new registry with the full builtin catalog
    pub fn new() -> Self {
        let mut registry = BuiltinRegistry {
            builtins: HashMap::new(),
        };

        forms::register(&mut registry);
        lists::register(&mut registry);
        arithmetic::register(&mut registry);
        introspection::register(&mut registry);

        registry
    }

    /// Create empty registry (for testing)
    pub fn empty() -> Self {
        BuiltinRegistry {
            builtins: HashMap::new(),
        }
    }

    /// Register a builtin, replacing any previous one with the same name
    pub fn register<B: Builtin + 'static>(&mut self, builtin: B) {
        let name = builtin.name().to_string();
        self.builtins.insert(name, Rc::new(builtin));
    }

    /// Get builtin by name
    pub fn get(&self, name: &str) -> Result<Rc<dyn Builtin>> {
        self.builtins
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unbound(name))
    }

    /// Check if builtin exists
    pub fn has(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// List all builtin names
    pub fn list_builtins(&self) -> Vec<String> {
        let mut names: Vec<_> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// One catalog line for `name`: name, kind, arity and description
    pub fn describe(&self, name: &str) -> Result<String> {
        let builtin = self.get(name)?;
        let kind = match builtin.kind() {
            BuiltinKind::Function => "builtin",
            BuiltinKind::SpecialForm => "specialform",
        };
        let arity = match builtin.arity() {
            Arity::Exact(n) => n.to_string(),
            Arity::AtLeast(n) => format!("{}+", n),
            Arity::Any => "*".to_string(),
        };
        Ok(format!(
            "{:<8} {:<11} {:<3} {}",
            builtin.name(),
            kind,
            arity,
            builtin.description()
        ))
    }

    /// Get builtin count
    pub fn count(&self) -> usize {
        self.builtins.len()
    }

    /// Seeds `env` with `nil`, `true`, `false` and every registered builtin
    ///
    /// Returns the number of bindings made.
    pub fn install(&self, env: &Environment) -> usize {
        env.bind("nil", Value::Nil);
        env.bind("true", Value::TRUE);
        env.bind("false", Value::FALSE);

        for (name, builtin) in &self.builtins {
            env.bind(name, Value::native(builtin.clone()));
        }

        let installed = self.builtins.len() + 3;
        tracing::debug!(installed, "installed builtins into global scope");
        installed
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use crate::builtins::BuiltinRegistry;
use crate::error::{ArityKind, Error, Result};
use crate::parser::SExprParser;
use crate::runtime::{Environment, Lambda, Value};
use tracing::{debug, trace, warn};

/// Default limit on nested `evaluate` calls, low enough to fit a 2 MiB thread stack
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluator settings
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Maximum nesting of `evaluate` calls before failing with `RecursionLimit`
    pub max_depth: usize,
    /// Log every macro expansion at debug level
    pub trace_macros: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_macros: false,
        }
    }
}

impl EvaluatorConfig {
    /// Sets the evaluation depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables macro expansion logging
    pub fn with_trace_macros(mut self, trace_macros: bool) -> Self {
        self.trace_macros = trace_macros;
        self
    }
}

/// Tree-walking evaluator
///
/// Dispatches on the value tag of each expression:
/// - `Nil` and atoms other than symbols evaluate to themselves
/// - symbols are looked up through the scope chain
/// - `'x` evaluates to `x`, untouched
/// - `(f args...)` evaluates `f` and applies it to the raw `args`
///
/// Application of builtin functions evaluates the arguments first; special
/// forms and macros receive them unevaluated. A macro's result is evaluated a
/// second time, in the caller's scope.
pub struct LispEvaluator {
    /// Global scope, seeded with the builtins
    globals: Environment,
    /// Settings
    config: EvaluatorConfig,
    /// Current nesting of `evaluate`
    depth: usize,
}

impl LispEvaluator {
    /// Creates an evaluator with the full builtin catalog and default settings
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// Creates an evaluator with the full builtin catalog
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self::with_registry(&BuiltinRegistry::new(), config)
    }

    /// Creates an evaluator whose global scope holds the builtins of `registry`
    pub fn with_registry(registry: &BuiltinRegistry, config: EvaluatorConfig) -> Self {
        let globals = Environment::new();
        registry.install(&globals);
        LispEvaluator {
            globals,
            config,
            depth: 0,
        }
    }

    /// The global scope
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Current settings
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Parses and evaluates `source` one expression at a time in the global
    /// scope, returning the value of the last expression (`Nil` for empty input)
    ///
    /// Stops at the first error; bindings made by earlier expressions stay.
    pub fn execute_source(&mut self, source: &str) -> Result<Value> {
        let globals = self.globals.clone();
        let mut parser = SExprParser::new(source);
        let mut last = Value::Nil;

        while !parser.is_done()? {
            let expr = parser.parse_expression()?;
            last = self.evaluate(&expr, &globals)?;
        }

        Ok(last)
    }

    /// Evaluates `expr` in `env`
    pub fn evaluate(&mut self, expr: &Value, env: &Environment) -> Result<Value> {
        if self.depth >= self.config.max_depth {
            return Err(self.depth_exceeded());
        }

        self.depth += 1;
        let result = match expr {
            Value::Nil => Ok(Value::Nil),
            Value::Symbol(name) => env.lookup(name),
            Value::Quoted(inner) => Ok((**inner).clone()),
            Value::Pair(pair) => match self.evaluate(pair.head(), env) {
                Ok(callee) => self.apply(&callee, pair.tail(), env),
                Err(e) => Err(e),
            },
            other => Ok(other.clone()),
        };
        self.depth -= 1;
        result
    }

    #[cold]
    #[inline(never)]
    fn depth_exceeded(&self) -> Error {
        warn!(limit = self.config.max_depth, "evaluation depth limit reached");
        Error::RecursionLimit {
            limit: self.config.max_depth,
        }
    }

    /// Applies `callee` to the unevaluated argument list `args`, called from `env`
    pub fn apply(&mut self, callee: &Value, args: &Value, env: &Environment) -> Result<Value> {
        match callee {
            Value::NativeFunction(builtin) => {
                let values = self.evaluate_args(args, env)?;
                builtin.arity().check(builtin.name(), values.list_len())?;
                builtin.call(self, values, env)
            }

            Value::NativeSpecialForm(builtin) => {
                builtin.arity().check(builtin.name(), args.list_len())?;
                builtin.call(self, args.clone(), env)
            }

            Value::Closure(lambda) => self.apply_closure(lambda, args, env),

            Value::Macro(lambda) => self.apply_macro(lambda, args, env),

            other => Err(Error::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// Binds the evaluated arguments in a fresh frame under the closure's scope
    #[inline(never)]
    fn apply_closure(&mut self, lambda: &Lambda, args: &Value, env: &Environment) -> Result<Value> {
        check_arity(lambda, args)?;
        trace!(
            params = %lambda.param_list(),
            depth = self.depth,
            "calling closure"
        );
        let frame = Environment::with_parent(lambda.scope());
        for (param, arg) in lambda.params().iter().zip(args.iter()) {
            let value = self.evaluate(arg, env)?;
            frame.define(param, value)?;
        }
        self.evaluate(lambda.body(), &frame)
    }

    /// Expands with the raw arguments, then evaluates the expansion in `env`
    #[inline(never)]
    fn apply_macro(&mut self, lambda: &Lambda, args: &Value, env: &Environment) -> Result<Value> {
        check_arity(lambda, args)?;
        let frame = Environment::with_parent(lambda.scope());
        for (param, arg) in lambda.params().iter().zip(args.iter()) {
            frame.define(param, arg.clone())?;
        }
        let expansion = self.evaluate(lambda.body(), &frame)?;
        if self.config.trace_macros {
            debug!(
                params = %lambda.param_list(),
                input = %args,
                expansion = %expansion,
                "macro expanded"
            );
        }
        self.evaluate(&expansion, env)
    }

    /// Evaluates each element of `args` left to right
    fn evaluate_args(&mut self, args: &Value, env: &Environment) -> Result<Value> {
        let mut values = Vec::with_capacity(args.list_len());
        for arg in args.iter() {
            values.push(self.evaluate(arg, env)?);
        }
        Ok(Value::list(values))
    }
}

/// Matches the argument count against the parameter list before anything is bound
fn check_arity(lambda: &Lambda, args: &Value) -> Result<()> {
    let expected = lambda.params().len();
    let got = args.list_len();
    if got == expected {
        return Ok(());
    }
    Err(Error::ArityError {
        callee: lambda.param_list(),
        expected: expected.to_string(),
        got,
        kind: if got < expected {
            ArityKind::TooFew
        } else {
            ArityKind::TooMany
        },
    })
}

impl Default for LispEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

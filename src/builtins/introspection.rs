//! Introspection and meta-programming builtins
//!
//! EVAL, BODY, CLOSURE, IS?, TYPE-OF, PRINT, STR, REPR, ENV and GLOBALS.
//! Scopes handed out here are the live scopes, not snapshots.

use crate::builtins::{Arity, Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Environment, Lambda, LispEvaluator, Value};
use std::rc::Rc;

/// Register the introspection builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(EvalFn);
    registry.register(BodyFn);
    registry.register(ClosureFn);
    registry.register(IsFn);
    registry.register(TypeOfFn);
    registry.register(PrintFn);
    registry.register(StrFn);
    registry.register(ReprFn);
    registry.register(EnvFn);
    registry.register(GlobalsFn);
}

/// Single closure or macro argument
fn lambda_arg(args: Value, callee: &str) -> Result<Rc<Lambda>> {
    let [value] = args.expect_args::<1>(callee)?;
    match value {
        Value::Closure(lambda) | Value::Macro(lambda) => Ok(lambda),
        other => Err(Error::type_error("function or macro", other.type_name())),
    }
}

// ============================================================
// CODE AS DATA
// ============================================================

/// EVAL - evaluate a value as code in the calling scope
pub struct EvalFn;
impl Builtin for EvalFn {
    fn name(&self) -> &str {
        "eval"
    }
    fn description(&self) -> &str {
        "Evaluate a value as an expression in the calling scope"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let [expr] = args.expect_args::<1>("eval")?;
        evaluator.evaluate(&expr, env)
    }
}

/// BODY - body expression of a function or macro
pub struct BodyFn;
impl Builtin for BodyFn {
    fn name(&self) -> &str {
        "body"
    }
    fn description(&self) -> &str {
        "Body expression of a function or macro"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        Ok(lambda_arg(args, "body")?.body().clone())
    }
}

/// CLOSURE - scope captured by a function or macro
pub struct ClosureFn;
impl Builtin for ClosureFn {
    fn name(&self) -> &str {
        "closure"
    }
    fn description(&self) -> &str {
        "Scope captured by a function or macro"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        Ok(Value::Environment(
            lambda_arg(args, "closure")?.scope().clone(),
        ))
    }
}

// ============================================================
// IDENTITY AND TYPES
// ============================================================

/// IS? - identity comparison
pub struct IsFn;
impl Builtin for IsFn {
    fn name(&self) -> &str {
        "is?"
    }
    fn description(&self) -> &str {
        "True if both arguments are the same value (identity, not structure)"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [a, b] = args.expect_args::<2>("is?")?;
        Ok(Value::bool(a.is_identical(&b)))
    }
}

/// TYPE-OF - tag of a value as a string
pub struct TypeOfFn;
impl Builtin for TypeOfFn {
    fn name(&self) -> &str {
        "type-of"
    }
    fn description(&self) -> &str {
        "Type tag of the argument as a string"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [value] = args.expect_args::<1>("type-of")?;
        Ok(Value::string(value.type_name()))
    }
}

// ============================================================
// RENDERING
// ============================================================

/// PRINT - write the representations of the arguments to stdout
pub struct PrintFn;
impl Builtin for PrintFn {
    fn name(&self) -> &str {
        "print"
    }
    fn description(&self) -> &str {
        "Print the representations of the arguments, space separated"
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let parts: Vec<String> = args.iter().map(Value::repr).collect();
        println!("{}", parts.join(" "));
        Ok(Value::Nil)
    }
}

/// STR - display string of a value
pub struct StrFn;
impl Builtin for StrFn {
    fn name(&self) -> &str {
        "str"
    }
    fn description(&self) -> &str {
        "Display string of the argument (strings without quotes)"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [value] = args.expect_args::<1>("str")?;
        Ok(Value::string(value.to_display_string()))
    }
}

/// REPR - source-like string of a value
pub struct ReprFn;
impl Builtin for ReprFn {
    fn name(&self) -> &str {
        "repr"
    }
    fn description(&self) -> &str {
        "Source-like representation of the argument"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [value] = args.expect_args::<1>("repr")?;
        Ok(Value::string(value.repr()))
    }
}

// ============================================================
// SCOPES
// ============================================================

/// ENV - the calling scope as a value
pub struct EnvFn;
impl Builtin for EnvFn {
    fn name(&self) -> &str {
        "env"
    }
    fn description(&self) -> &str {
        "The current scope"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }
    fn call(&self, _: &mut LispEvaluator, _: Value, env: &Environment) -> Result<Value> {
        Ok(Value::Environment(env.clone()))
    }
}

/// GLOBALS - the global scope as a value
pub struct GlobalsFn;
impl Builtin for GlobalsFn {
    fn name(&self) -> &str {
        "globals"
    }
    fn description(&self) -> &str {
        "The global scope"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }
    fn call(&self, evaluator: &mut LispEvaluator, _: Value, _: &Environment) -> Result<Value> {
        Ok(Value::Environment(evaluator.globals().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<Value> {
        LispEvaluator::new().execute_source(source)
    }

    #[test]
    fn test_eval_runs_data_as_code() {
        assert_eq!(run("(eval '(+ 1 2))").unwrap(), Value::Number(3.0));
        assert_eq!(
            run("(def x 4) (eval (list '+ 'x 'x))").unwrap(),
            Value::Number(8.0)
        );
    }

    #[test]
    fn test_eval_uses_calling_scope() {
        assert_eq!(
            run("((fn (y) (eval 'y)) 7)").unwrap(),
            Value::Number(7.0)
        );
    }

    #[test]
    fn test_body() {
        assert_eq!(run("(body (fn (a) (+ a 1)))").unwrap().repr(), "(+ a 1)");
        assert_eq!(run("(body (macro (a) a))").unwrap().repr(), "a");
        assert!(matches!(
            run("(body +)").unwrap_err(),
            Error::TypeError { .. }
        ));
    }

    #[test]
    fn test_closure_exposes_live_scope() {
        let source = r#"
(def make (fn (n) (fn () n)))
(def get (make 5))
(def scope (closure get))
(type-of scope)
"#;
        assert_eq!(run(source).unwrap(), Value::string("environment"));
        assert_eq!(
            run("(def f ((fn (n) (fn () n)) 5)) (repr (closure f))").unwrap(),
            Value::string("<environment {n=5}>")
        );
    }

    #[test]
    fn test_is_identity() {
        assert_eq!(run("(def l (list 1)) (is? l l)").unwrap(), Value::TRUE);
        assert_eq!(run("(is? (list 1) (list 1))").unwrap(), Value::FALSE);
        assert_eq!(run("(is? nil (list))").unwrap(), Value::TRUE);
        assert_eq!(run("(is? true true)").unwrap(), Value::TRUE);
        assert_eq!(run("(is? (globals) (env))").unwrap(), Value::TRUE);
    }

    #[test]
    fn test_type_of() {
        for (source, tag) in [
            ("1", "number"),
            ("\"s\"", "string"),
            ("'a", "symbol"),
            ("nil", "list"),
            ("(list 1)", "list"),
            ("true", "boolean"),
            ("''a", "quoted"),
            ("+", "builtin"),
            ("if", "specialform"),
            ("(fn () 1)", "function"),
            ("(macro () 1)", "macro"),
            ("(env)", "environment"),
        ] {
            let result = run(&format!("(type-of {})", source)).unwrap();
            assert_eq!(result, Value::string(tag), "type-of {}", source);
        }
    }

    #[test]
    fn test_str_and_repr() {
        assert_eq!(run("(str \"hi\")").unwrap(), Value::string("hi"));
        assert_eq!(run("(repr \"hi\")").unwrap(), Value::string("\"hi\""));
        assert_eq!(run("(str (list 1 \"a\"))").unwrap(), Value::string("(1 \"a\")"));
        assert_eq!(run("(repr +)").unwrap(), Value::string("<builtin \"+\">"));
        assert_eq!(
            run("(repr if)").unwrap(),
            Value::string("<specialform \"if\">")
        );
        assert_eq!(run("(repr true)").unwrap(), Value::string("#t"));
    }

    #[test]
    fn test_print_returns_nil() {
        assert_eq!(run("(print 1 \"two\")").unwrap(), Value::Nil);
    }

    #[test]
    fn test_env_inside_call_is_call_frame() {
        assert_eq!(
            run("(repr ((fn (a b) (env)) 1 2))").unwrap(),
            Value::string("<environment {a=1, b=2}>")
        );
    }
}

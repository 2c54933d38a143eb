//! Special forms
//!
//! QUOTE, IF, DEF, SET!, SET*, FN, MACRO and BEGIN. Each receives its
//! argument forms unevaluated and decides what to evaluate, and when.

use crate::builtins::{Arity, Builtin, BuiltinKind, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Environment, Lambda, LispEvaluator, Value};
use std::rc::Rc;

/// Register the special forms
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(QuoteForm);
    registry.register(IfForm);
    registry.register(DefForm);
    registry.register(SetLocalForm);
    registry.register(SetNonLocalForm);
    registry.register(FnForm);
    registry.register(MacroForm);
    registry.register(BeginForm);
}

/// Collects a parameter list of symbols
fn parameter_names(params: &Value) -> Result<Vec<String>> {
    if !params.is_list() {
        return Err(Error::type_error("parameter list", params.type_name()));
    }
    params
        .iter()
        .map(|param| param.as_symbol().map(str::to_string))
        .collect()
}

/// Evaluates `(<form> symbol value)` and returns the name and the value
fn binding_target(
    evaluator: &mut LispEvaluator,
    form: &str,
    args: &Value,
    env: &Environment,
) -> Result<(String, Value)> {
    let [symbol, expr] = args.expect_args::<2>(form)?;
    let name = symbol.as_symbol()?.to_string();
    let value = evaluator.evaluate(&expr, env)?;
    Ok((name, value))
}

// ============================================================
// QUOTING AND CONDITIONALS
// ============================================================

/// QUOTE - return the argument form unevaluated
pub struct QuoteForm;
impl Builtin for QuoteForm {
    fn name(&self) -> &str {
        "quote"
    }
    fn description(&self) -> &str {
        "Return the argument form without evaluating it"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [form] = args.expect_args::<1>("quote")?;
        Ok(form)
    }
}

/// IF - evaluate one of two branches on a boolean condition
pub struct IfForm;
impl Builtin for IfForm {
    fn name(&self) -> &str {
        "if"
    }
    fn description(&self) -> &str {
        "Evaluate the then-branch on true, the else-branch on false"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let [cond, then_branch, else_branch] = args.expect_args::<3>("if")?;
        match evaluator.evaluate(&cond, env)? {
            Value::Bool(true) => evaluator.evaluate(&then_branch, env),
            Value::Bool(false) => evaluator.evaluate(&else_branch, env),
            other => Err(Error::argument(
                "if",
                format!("condition must be boolean, got {}", other.type_name()),
            )),
        }
    }
}

// ============================================================
// DEFINITION AND MUTATION
// ============================================================

/// DEF - bind a new name in the current scope
pub struct DefForm;
impl Builtin for DefForm {
    fn name(&self) -> &str {
        "def"
    }
    fn description(&self) -> &str {
        "Define a new variable in the current scope"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let (name, value) = binding_target(evaluator, "def", &args, env)?;
        env.define(&name, value)?;
        Ok(Value::Nil)
    }
}

/// SET! - rebind a name of the current scope
pub struct SetLocalForm;
impl Builtin for SetLocalForm {
    fn name(&self) -> &str {
        "set!"
    }
    fn description(&self) -> &str {
        "Change a variable bound in the current scope"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let (name, value) = binding_target(evaluator, "set!", &args, env)?;
        env.assign(&name, value)?;
        Ok(Value::Nil)
    }
}

/// SET* - rebind the nearest enclosing binding of a name
pub struct SetNonLocalForm;
impl Builtin for SetNonLocalForm {
    fn name(&self) -> &str {
        "set*"
    }
    fn description(&self) -> &str {
        "Change the nearest variable of that name in any enclosing scope"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let (name, value) = binding_target(evaluator, "set*", &args, env)?;
        env.assign_non_local(&name, value)?;
        Ok(Value::Nil)
    }
}

// ============================================================
// CALLABLE CONSTRUCTION
// ============================================================

/// FN - create a closure over the current scope
pub struct FnForm;
impl Builtin for FnForm {
    fn name(&self) -> &str {
        "fn"
    }
    fn description(&self) -> &str {
        "Create a function from a parameter list and a body"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let [params, body] = args.expect_args::<2>("fn")?;
        let params = parameter_names(&params)?;
        Ok(Value::Closure(Rc::new(Lambda::new(params, body, env.clone()))))
    }
}

/// MACRO - create a macro over the current scope
pub struct MacroForm;
impl Builtin for MacroForm {
    fn name(&self) -> &str {
        "macro"
    }
    fn description(&self) -> &str {
        "Create a macro: its body computes code that runs in the caller's scope"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let [params, body] = args.expect_args::<2>("macro")?;
        let params = parameter_names(&params)?;
        Ok(Value::Macro(Rc::new(Lambda::new(params, body, env.clone()))))
    }
}

// ============================================================
// SEQUENCING
// ============================================================

/// BEGIN - evaluate forms in order, returning the last
pub struct BeginForm;
impl Builtin for BeginForm {
    fn name(&self) -> &str {
        "begin"
    }
    fn description(&self) -> &str {
        "Evaluate each form in order and return the last value"
    }
    fn kind(&self) -> BuiltinKind {
        BuiltinKind::SpecialForm
    }
    fn call(&self, evaluator: &mut LispEvaluator, args: Value, env: &Environment) -> Result<Value> {
        let mut last = Value::Nil;
        for form in args.iter() {
            last = evaluator.evaluate(form, env)?;
        }
        Ok(last)
    }
}

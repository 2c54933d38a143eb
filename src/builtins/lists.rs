//! List primitives
//!
//! CONS, LIST, HEAD, TAIL and NIL?.

use crate::builtins::{Arity, Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Environment, LispEvaluator, Pair, Value};
use std::rc::Rc;

/// Register the list primitives
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(ConsFn);
    registry.register(ListFn);
    registry.register(HeadFn);
    registry.register(TailFn);
    registry.register(IsNilFn);
}

/// Single list argument of `head`/`tail`, rejecting `Nil`
fn non_empty_list(args: Value, callee: &str) -> Result<Rc<Pair>> {
    let [list] = args.expect_args::<1>(callee)?;
    match list {
        Value::Pair(pair) => Ok(pair),
        Value::Nil => Err(Error::argument(
            callee,
            format!("cannot take {} of empty list (nil)", callee),
        )),
        other => Err(Error::type_error("list", other.type_name())),
    }
}

/// CONS - prepend a value to a list
pub struct ConsFn;
impl Builtin for ConsFn {
    fn name(&self) -> &str {
        "cons"
    }
    fn description(&self) -> &str {
        "Prepend a value to a list"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [head, tail] = args.expect_args::<2>("cons")?;
        Value::cons(head, tail)
    }
}

/// LIST - collect the arguments into a list
pub struct ListFn;
impl Builtin for ListFn {
    fn name(&self) -> &str {
        "list"
    }
    fn description(&self) -> &str {
        "Return the arguments as a list"
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        Ok(args)
    }
}

/// HEAD - first element of a non-empty list
pub struct HeadFn;
impl Builtin for HeadFn {
    fn name(&self) -> &str {
        "head"
    }
    fn description(&self) -> &str {
        "First element of a non-empty list"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        Ok(non_empty_list(args, "head")?.head().clone())
    }
}

/// TAIL - everything after the first element of a non-empty list
pub struct TailFn;
impl Builtin for TailFn {
    fn name(&self) -> &str {
        "tail"
    }
    fn description(&self) -> &str {
        "List of all elements after the first"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        Ok(non_empty_list(args, "tail")?.tail().clone())
    }
}

/// NIL? - test for the empty list
pub struct IsNilFn;
impl Builtin for IsNilFn {
    fn name(&self) -> &str {
        "nil?"
    }
    fn description(&self) -> &str {
        "True if the argument is the empty list"
    }
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let [value] = args.expect_args::<1>("nil?")?;
        Ok(Value::bool(value.is_nil()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<Value> {
        LispEvaluator::new().execute_source(source)
    }

    #[test]
    fn test_cons_and_list() {
        assert_eq!(run("(cons 1 (list 2 3))").unwrap().repr(), "(1 2 3)");
        assert_eq!(run("(list)").unwrap(), Value::Nil);
        assert_eq!(run("(cons 1 nil)").unwrap().repr(), "(1)");
    }

    #[test]
    fn test_cons_requires_list_tail() {
        let err = run("(cons 1 2)").unwrap_err();
        assert!(matches!(err, Error::TypeError { .. }));
    }

    #[test]
    fn test_head_and_tail() {
        assert_eq!(run("(head (list 1 2 3))").unwrap(), Value::Number(1.0));
        assert_eq!(run("(tail (list 1 2 3))").unwrap().repr(), "(2 3)");
        assert_eq!(run("(tail (list 1))").unwrap(), Value::Nil);
    }

    #[test]
    fn test_head_tail_of_nil() {
        assert!(matches!(
            run("(head nil)").unwrap_err(),
            Error::ArgumentError { .. }
        ));
        assert!(matches!(
            run("(tail (list))").unwrap_err(),
            Error::ArgumentError { .. }
        ));
        assert!(matches!(
            run("(head 5)").unwrap_err(),
            Error::TypeError { .. }
        ));
    }

    #[test]
    fn test_failed_def_leaves_globals_untouched() {
        let mut evaluator = LispEvaluator::new();
        evaluator.execute_source("(def y 1)").unwrap();
        let before = evaluator.execute_source("(repr (globals))").unwrap();

        assert!(matches!(
            evaluator.execute_source("(def z (head nil))").unwrap_err(),
            Error::ArgumentError { .. }
        ));
        assert_eq!(evaluator.execute_source("(repr (globals))").unwrap(), before);
        assert!(matches!(
            evaluator.execute_source("z").unwrap_err(),
            Error::NameError { .. }
        ));
    }

    #[test]
    fn test_is_nil() {
        assert_eq!(run("(nil? (list))").unwrap(), Value::TRUE);
        assert_eq!(run("(nil? (list 1))").unwrap(), Value::FALSE);
        assert_eq!(run("(nil? 0)").unwrap(), Value::FALSE);
    }
}

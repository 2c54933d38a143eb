//! Numeric and string folds
//!
//! `+` and CONCAT.

use crate::builtins::{Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::{Environment, LispEvaluator, Value};

/// Register the arithmetic and string builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(AddFn);
    registry.register(ConcatFn);
}

/// + - sum numbers; booleans count as 0 and 1
pub struct AddFn;
impl Builtin for AddFn {
    fn name(&self) -> &str {
        "+"
    }
    fn description(&self) -> &str {
        "Sum of the arguments (booleans count as 0/1); 0 with no arguments"
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let mut acc = 0.0;
        for arg in args.iter() {
            acc += match arg {
                Value::Number(n) => *n,
                Value::Bool(b) => f64::from(u8::from(*b)),
                other => return Err(Error::type_error("number or boolean", other.type_name())),
            };
        }
        Ok(Value::Number(acc))
    }
}

/// CONCAT - join strings
pub struct ConcatFn;
impl Builtin for ConcatFn {
    fn name(&self) -> &str {
        "concat"
    }
    fn description(&self) -> &str {
        "Concatenation of the string arguments"
    }
    fn call(&self, _: &mut LispEvaluator, args: Value, _: &Environment) -> Result<Value> {
        let mut result = String::new();
        for arg in args.iter() {
            result.push_str(arg.as_string()?);
        }
        Ok(Value::string(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<Value> {
        LispEvaluator::new().execute_source(source)
    }

    #[test]
    fn test_add() {
        assert_eq!(run("(+)").unwrap(), Value::Number(0.0));
        assert_eq!(run("(+ 1 2 3.5)").unwrap(), Value::Number(6.5));
        assert_eq!(run("(+ 1 true false true)").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_add_rejects_strings() {
        let err = run("(+ \"hello\" 5)").unwrap_err();
        assert!(matches!(err, Error::TypeError { .. }));
    }

    #[test]
    fn test_concat() {
        assert_eq!(run("(concat)").unwrap(), Value::string(""));
        assert_eq!(
            run("(concat \"egg\" \"lisp\")").unwrap(),
            Value::string("egglisp")
        );
        assert!(matches!(
            run("(concat \"a\" 1)").unwrap_err(),
            Error::TypeError { .. }
        ));
    }
}

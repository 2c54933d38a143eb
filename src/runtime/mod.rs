//! Runtime for egglisp programs: values, scopes and the evaluator

mod environment;
mod lisp_evaluator;
mod value;

pub use environment::Environment;
pub use lisp_evaluator::{EvaluatorConfig, LispEvaluator, DEFAULT_MAX_DEPTH};
pub use value::{format_number, Lambda, ListIter, Pair, Value};

/// End-to-end integration tests
/// Demonstrates: Lexer → Parser → Evaluator working together
use egglisp::lexer::{SExprScanner, TokenKind};
use egglisp::parser::SExprParser;
use egglisp::runtime::{LispEvaluator, Value};
use egglisp::{Error, ErrorKind};

fn run(source: &str) -> egglisp::Result<Value> {
    LispEvaluator::new().execute_source(source)
}

#[test]
fn test_lisp_e2e_pipeline() {
    let source = "(+ 1 2 3)";

    // Lex
    let mut scanner = SExprScanner::new(source);
    let tokens = scanner.scan_tokens().unwrap();
    assert_eq!(tokens.first().unwrap().kind, TokenKind::LeftParen);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);

    // Parse
    let mut parser = SExprParser::new(source);
    let expr = parser.parse_expression().unwrap();
    parser.assert_done().unwrap();

    // Evaluate
    let mut evaluator = LispEvaluator::new();
    let globals = evaluator.globals().clone();
    let result = evaluator.evaluate(&expr, &globals).unwrap();

    assert_eq!(result, Value::Number(6.0));
}

#[test]
fn test_lisp_e2e_variables() {
    let source = r#"
        (def x 3)
        (+ x x)
    "#;
    assert_eq!(run(source).unwrap(), Value::Number(6.0));
}

#[test]
fn test_lisp_e2e_head_of_consed_list() {
    let source = "((fn (n) (if (nil? n) 0 (head n))) (cons 5 (list)))";
    assert_eq!(run(source).unwrap(), Value::Number(5.0));
}

#[test]
fn test_lisp_e2e_empty_list_branch() {
    let source = "((fn (n) (if (nil? n) 0 (head n))) (list))";
    assert_eq!(run(source).unwrap(), Value::Number(0.0));
}

#[test]
fn test_lisp_e2e_mutation() {
    let source = r#"
        (def counter 0)
        (set! counter (+ counter 1))
        (set! counter (+ counter 1))
        counter
    "#;
    assert_eq!(run(source).unwrap(), Value::Number(2.0));
}

#[test]
fn test_lisp_e2e_booleans_count_in_addition() {
    assert_eq!(run("(+ true true false 1)").unwrap(), Value::Number(3.0));
    assert_eq!(run("(+)").unwrap(), Value::Number(0.0));
}

#[test]
fn test_lisp_e2e_string_concat() {
    assert_eq!(
        run(r#"(concat "egg" "lisp")"#).unwrap(),
        Value::string("egglisp")
    );
    let err = run(r#"(concat "egg" 1)"#).unwrap_err();
    assert_eq!(err.classify(), ErrorKind::Type);
}

#[test]
fn test_lisp_e2e_recursion() {
    let source = r#"
        (def length (fn (l) (if (nil? l) 0 (+ 1 (length (tail l))))))
        (length (list 1 2 3 4 5))
    "#;
    assert_eq!(run(source).unwrap(), Value::Number(5.0));
}

#[test]
fn test_lisp_e2e_higher_order() {
    let source = r#"
        (def map (fn (f l)
          (if (nil? l)
              nil
              (cons (f (head l)) (map f (tail l))))))
        (map (fn (x) (+ x x)) (list 1 2 3))
    "#;
    assert_eq!(run(source).unwrap().repr(), "(2 4 6)");
}

#[test]
fn test_lisp_e2e_argument_order() {
    let source = r#"
        (def log nil)
        (def note (fn (x) (begin (set* log (cons x log)) x)))
        (list (note 1) (note 2) (note 3))
        log
    "#;
    assert_eq!(run(source).unwrap().repr(), "(3 2 1)");
}

#[test]
fn test_lisp_e2e_comments_and_newlines() {
    let source = "; leading comment\n(def a 1) ; trailing\n\n(+ a\n   2)\n";
    assert_eq!(run(source).unwrap(), Value::Number(3.0));
}

#[test]
fn test_lisp_e2e_error_classes() {
    let cases = [
        ("(+ 1", ErrorKind::Syntax),
        ("undefined-name", ErrorKind::Name),
        ("(def a 1) (def a 2)", ErrorKind::DuplicateDefinition),
        ("((fn (a b) a) 1)", ErrorKind::Arity),
        ("(+ \"a\" 1)", ErrorKind::Type),
        ("(head nil)", ErrorKind::Argument),
        ("(\"not a function\")", ErrorKind::NotCallable),
    ];
    for (source, kind) in cases {
        let err = run(source).unwrap_err();
        assert_eq!(err.classify(), kind, "{} -> {}", source, err);
    }
}

#[test]
fn test_lisp_e2e_error_messages() {
    assert_eq!(
        run("missing").unwrap_err().to_string(),
        "missing is undefined"
    );
    assert_eq!(
        run("(def a 1) (def a 2)").unwrap_err().to_string(),
        "a is already defined"
    );
    assert!(matches!(
        run("(+ 1 2))").unwrap_err(),
        Error::SyntaxError { line: 1, col: 8, .. }
    ));
}

#[test]
fn test_lisp_e2e_repr_of_results() {
    assert_eq!(run("'(a \"b\" 1.5 ())").unwrap().repr(), "(a \"b\" 1.5 ())");
    assert_eq!(run("(fn (x) (+ x 1))").unwrap().repr(), "<function (x) -> (+ x 1)>");
    assert_eq!(run("(macro (x) x)").unwrap().repr(), "<macro (x) -> x>");
    assert_eq!(run("(str 42)").unwrap(), Value::string("42"));
}

#[test]
fn test_lisp_e2e_eval_of_constructed_code() {
    let source = r#"
        (def code (cons '+ (list 1 2 3)))
        (eval code)
    "#;
    assert_eq!(run(source).unwrap(), Value::Number(6.0));
}

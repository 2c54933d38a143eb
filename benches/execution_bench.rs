use criterion::{black_box, criterion_group, criterion_main, Criterion};
use egglisp::{Evaluator, Parser, Scanner};

const PROGRAM: &str = r#"
(def length (fn (l) (if (nil? l) 0 (+ 1 (length (tail l))))))
(def map (fn (f l)
  (if (nil? l)
      nil
      (cons (f (head l)) (map f (tail l))))))
(def unless (macro (c then else) (list 'if c else then)))
(length (map (fn (x) (unless false (+ x x) 0)) (list 1 2 3 4 5 6 7 8 9 10)))
"#;

fn lexer_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize program", |b| {
        b.iter(|| {
            let mut scanner = Scanner::new(black_box(PROGRAM));
            scanner.scan_tokens().unwrap()
        })
    });
}

fn parser_benchmark(c: &mut Criterion) {
    c.bench_function("parse program", |b| {
        b.iter(|| Parser::new(black_box(PROGRAM)).parse_all().unwrap())
    });
}

fn evaluator_benchmark(c: &mut Criterion) {
    c.bench_function("evaluate recursive program", |b| {
        b.iter(|| {
            let mut evaluator = Evaluator::new();
            evaluator.execute_source(black_box(PROGRAM)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    lexer_benchmark,
    parser_benchmark,
    evaluator_benchmark
);
criterion_main!(benches);

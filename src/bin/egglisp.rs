use anyhow::{bail, Context};
use egglisp::{BuiltinRegistry, Error, Evaluator, EvaluatorConfig, Parser, Scanner, Value};
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: egglisp [-i] [--stack] [--builtins | --tokens FILE | --parse FILE] [FILE...]";

#[derive(Default)]
struct Options {
    interactive: bool,
    stack: bool,
    builtins: bool,
    tokens: Option<String>,
    parse: Option<String>,
    files: Vec<String>,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-i" => options.interactive = true,
            "--stack" => options.stack = true,
            "--builtins" => options.builtins = true,
            "--tokens" => options.tokens = Some(args.next().context(USAGE)?),
            "--parse" => options.parse = Some(args.next().context(USAGE)?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {}\n{}", flag, USAGE),
            _ => options.files.push(arg),
        }
    }

    Ok(options)
}

fn config_from_env() -> anyhow::Result<EvaluatorConfig> {
    let config = EvaluatorConfig::default();
    match std::env::var("EGGLISP_MAX_DEPTH") {
        Ok(raw) => {
            let depth = raw
                .parse()
                .with_context(|| format!("EGGLISP_MAX_DEPTH must be a number, got {:?}", raw))?;
            Ok(config.with_max_depth(depth))
        }
        Err(_) => Ok(config),
    }
}

fn report(err: &Error, stack: bool) {
    if stack {
        eprintln!("{}: {:?}", err.classify(), err);
    } else {
        eprintln!("{}: {}", err.classify(), err);
    }
}

fn read_source(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

/// One line per registered builtin
fn list_builtins() -> anyhow::Result<()> {
    let registry = BuiltinRegistry::new();
    for name in registry.list_builtins() {
        println!("{}", registry.describe(&name)?);
    }
    Ok(())
}

/// One JSON object per token
fn dump_tokens(path: &str) -> anyhow::Result<()> {
    let source = read_source(path)?;
    for token in Scanner::new(&source) {
        println!("{}", serde_json::to_string(&token?)?);
    }
    Ok(())
}

/// One `repr` per top-level expression
fn dump_parse(path: &str) -> anyhow::Result<()> {
    let source = read_source(path)?;
    for expr in Parser::new(&source).parse_all()? {
        println!("{}", expr.repr());
    }
    Ok(())
}

/// Parse one, evaluate one, until the file is exhausted or fails
fn run_source(evaluator: &mut Evaluator, source: &str) -> egglisp::Result<()> {
    let globals = evaluator.globals().clone();
    let mut parser = Parser::new(source);
    while !parser.is_done()? {
        let expr = parser.parse_expression()?;
        evaluator.evaluate(&expr, &globals)?;
    }
    Ok(())
}

fn eval_line(evaluator: &mut Evaluator, line: &str) -> egglisp::Result<Value> {
    let mut parser = Parser::new(line);
    let expr = parser.parse_expression()?;
    parser.assert_done()?;
    let globals = evaluator.globals().clone();
    evaluator.evaluate(&expr, &globals)
}

fn repl(evaluator: &mut Evaluator, stack: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match eval_line(evaluator, &line) {
                Ok(value) => println!("{}", value.repr()),
                Err(err) => report(&err, stack),
            }
        }
        print!("> ");
        stdout.flush()?;
    }
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = parse_args()?;

    if options.builtins {
        return list_builtins();
    }
    if let Some(path) = &options.tokens {
        return dump_tokens(path);
    }
    if let Some(path) = &options.parse {
        return dump_parse(path);
    }

    let mut evaluator = Evaluator::with_config(config_from_env()?);

    for path in &options.files {
        let source = read_source(path)?;
        if let Err(err) = run_source(&mut evaluator, &source) {
            report(&err, options.stack);
        }
    }

    if options.files.is_empty() || options.interactive {
        repl(&mut evaluator, options.stack)?;
    }

    Ok(())
}

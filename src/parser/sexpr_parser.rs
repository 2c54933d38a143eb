use crate::error::{Error, Result};
use crate::lexer::{SExprScanner, Token, TokenKind};
use crate::runtime::Value;

/// Deepest nesting of lists and quotes the parser accepts
pub const MAX_PARSE_DEPTH: usize = 256;

/// S-expression parser for egglisp syntax
///
/// Pulls tokens from the scanner on demand with one token of lookahead, so a
/// caller can parse one expression, evaluate it, and parse the next.
pub struct SExprParser {
    scanner: SExprScanner,
    lookahead: Option<Token>,
    /// Current nesting of lists and quotes
    depth: usize,
    /// Position just past the last consumed token
    last_line: usize,
    last_col: usize,
}

impl SExprParser {
    /// Creates a parser over source code
    pub fn new(source: &str) -> Self {
        Self::from_scanner(SExprScanner::new(source))
    }

    /// Creates a parser over an existing token stream
    pub fn from_scanner(scanner: SExprScanner) -> Self {
        SExprParser {
            scanner,
            lookahead: None,
            depth: 0,
            last_line: 1,
            last_col: 1,
        }
    }

    /// Parses every remaining expression
    pub fn parse_all(&mut self) -> Result<Vec<Value>> {
        let mut exprs = Vec::new();
        while !self.is_done()? {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    /// True when only whitespace is left
    pub fn is_done(&mut self) -> Result<bool> {
        self.skip_whitespace()?;
        Ok(matches!(self.peek()?.kind, TokenKind::Eof))
    }

    /// Fails unless only whitespace is left
    pub fn assert_done(&mut self) -> Result<()> {
        if self.is_done()? {
            return Ok(());
        }
        let token = self.peek()?;
        Err(Error::syntax(
            token.line,
            token.column,
            format!("Expected end of input, found {}", token.kind),
        ))
    }

    /// Parses one expression, skipping leading whitespace
    pub fn parse_expression(&mut self) -> Result<Value> {
        self.skip_whitespace()?;
        let token = self.peek()?.clone();

        match token.kind {
            TokenKind::Quote => {
                self.enter(&token)?;
                self.advance()?;
                let quoted = self.parse_expression();
                self.depth -= 1;
                Ok(Value::quoted(quoted?))
            }
            TokenKind::Number(n) => {
                self.advance()?;
                Ok(Value::Number(n))
            }
            TokenKind::String(s) => {
                self.advance()?;
                Ok(Value::string(s))
            }
            TokenKind::Symbol(name) => {
                self.advance()?;
                Ok(Value::symbol(name))
            }
            TokenKind::LeftParen => {
                self.enter(&token)?;
                let list = self.parse_list();
                self.depth -= 1;
                list
            }
            TokenKind::RightParen => Err(Error::syntax(
                token.line,
                token.column,
                "Unexpected `)` without matching `(`",
            )),
            TokenKind::Eof => Err(self.error_at_last("Unexpected end of input")),
            TokenKind::Whitespace => Err(Error::syntax(
                token.line,
                token.column,
                "Expected expression, found whitespace",
            )),
        }
    }

    /// `(` elements separated by whitespace `)`
    fn parse_list(&mut self) -> Result<Value> {
        let open = self.advance()?;
        self.skip_whitespace()?;

        if matches!(self.peek()?.kind, TokenKind::RightParen) {
            self.advance()?;
            return Ok(Value::Nil);
        }

        let mut items = vec![self.parse_expression()?];
        loop {
            let separated = self.skip_whitespace()?;
            let token = self.peek()?.clone();
            match &token.kind {
                TokenKind::RightParen => {
                    self.advance()?;
                    break;
                }
                TokenKind::Eof => {
                    return Err(self.error_at_last(format!(
                        "Unclosed `(` opened at {}",
                        open.location()
                    )));
                }
                kind if !separated => {
                    return Err(Error::syntax(
                        token.line,
                        token.column,
                        format!("Expected whitespace between list elements, found {}", kind),
                    ));
                }
                _ => items.push(self.parse_expression()?),
            }
        }

        Ok(Value::list(items))
    }

    /// Steps one level deeper, failing at `token` past the nesting limit
    fn enter(&mut self, token: &Token) -> Result<()> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(Error::syntax(
                token.line,
                token.column,
                format!(
                    "Expression too deeply nested (max depth: {})",
                    MAX_PARSE_DEPTH
                ),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consumes a whitespace token if one is next; reports whether it did
    fn skip_whitespace(&mut self) -> Result<bool> {
        if matches!(self.peek()?.kind, TokenKind::Whitespace) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.lookahead.is_none() {
            let token = self.scanner.next_token()?;
            self.lookahead = Some(token);
        }
        match &self.lookahead {
            Some(token) => Ok(token),
            None => Err(self.error_at_last("Unexpected end of input")),
        }
    }

    fn advance(&mut self) -> Result<Token> {
        self.peek()?;
        let (line, col) = self.scanner.position();
        self.last_line = line;
        self.last_col = col;
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => Err(self.error_at_last("Unexpected end of input")),
        }
    }

    fn error_at_last(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.last_line, self.last_col, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<Value>> {
        SExprParser::new(source).parse_all()
    }

    fn parse_one(source: &str) -> Value {
        let mut parser = SExprParser::new(source);
        let expr = parser.parse_expression().unwrap();
        parser.assert_done().unwrap();
        expr
    }

    #[test]
    fn test_atoms() {
        assert_eq!(parse_one("42"), Value::Number(42.0));
        assert_eq!(parse_one("1.5e3"), Value::Number(1500.0));
        assert_eq!(parse_one("\"hi there\""), Value::string("hi there"));
        assert_eq!(parse_one("set!"), Value::symbol("set!"));
        assert_eq!(parse_one("  <=  "), Value::symbol("<="));
    }

    #[test]
    fn test_lists() {
        assert_eq!(parse_one("()"), Value::Nil);
        assert_eq!(parse_one("( )"), Value::Nil);
        assert_eq!(parse_one("(+ 1 2)").repr(), "(+ 1 2)");
        assert_eq!(parse_one("(a (b c) ())").repr(), "(a (b c) ())");
        assert_eq!(parse_one("(\n  a\n  b\n)").repr(), "(a b)");
    }

    #[test]
    fn test_quote() {
        assert_eq!(parse_one("'a"), Value::quoted(Value::symbol("a")));
        assert_eq!(parse_one("'(1 2)").repr(), "'(1 2)");
        assert_eq!(parse_one("(quote 'x)").repr(), "(quote 'x)");
    }

    #[test]
    fn test_elements_must_be_separated() {
        let err = parse("(a\"b\")").unwrap_err();
        assert!(matches!(err, Error::SyntaxError { line: 1, col: 3, .. }));
        assert!(parse("(1a)").is_err());
        assert!(parse("((a)(b))").is_err());
    }

    #[test]
    fn test_unclosed_list() {
        let err = parse("(+ 1 2").unwrap_err();
        match err {
            Error::SyntaxError { line, col, message } => {
                assert_eq!((line, col), (1, 7));
                assert!(message.contains("Unclosed"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unmatched_close() {
        let err = parse(")").unwrap_err();
        assert!(matches!(err, Error::SyntaxError { line: 1, col: 1, .. }));
    }

    #[test]
    fn test_dangling_quote() {
        assert!(matches!(
            parse("'").unwrap_err(),
            Error::SyntaxError { .. }
        ));
    }

    #[test]
    fn test_incremental_parsing() {
        let mut parser = SExprParser::new("(def x 1)\n; comment\n(+ x 1)  ");
        assert!(!parser.is_done().unwrap());
        assert_eq!(parser.parse_expression().unwrap().repr(), "(def x 1)");
        assert!(!parser.is_done().unwrap());
        assert_eq!(parser.parse_expression().unwrap().repr(), "(+ x 1)");
        assert!(parser.is_done().unwrap());
        parser.assert_done().unwrap();
    }

    #[test]
    fn test_assert_done_rejects_trailing_expression() {
        let mut parser = SExprParser::new("1 2");
        parser.parse_expression().unwrap();
        assert!(parser.assert_done().is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  ; nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_nesting_at_limit() {
        let source = format!(
            "{}x{}",
            "(".repeat(MAX_PARSE_DEPTH),
            ")".repeat(MAX_PARSE_DEPTH)
        );
        assert_eq!(parse(&source).unwrap().len(), 1);

        let quotes = format!("{}x", "'".repeat(MAX_PARSE_DEPTH));
        assert_eq!(parse(&quotes).unwrap().len(), 1);
    }

    #[test]
    fn test_nesting_over_limit() {
        let source = format!(
            "{}x{}",
            "(".repeat(MAX_PARSE_DEPTH + 1),
            ")".repeat(MAX_PARSE_DEPTH + 1)
        );
        match parse(&source).unwrap_err() {
            Error::SyntaxError { line, col, message } => {
                assert_eq!((line, col), (1, MAX_PARSE_DEPTH + 1));
                assert!(message.contains("too deeply nested"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        let quotes = format!("{}x", "'".repeat(MAX_PARSE_DEPTH + 1));
        assert!(matches!(
            parse(&quotes).unwrap_err(),
            Error::SyntaxError { .. }
        ));
    }

    #[test]
    fn test_huge_nesting_fails_cleanly() {
        let source = format!("{}{}", "(".repeat(200_000), ")".repeat(200_000));
        assert!(matches!(
            parse(&source).unwrap_err(),
            Error::SyntaxError { .. }
        ));
    }

    #[test]
    fn test_long_flat_list() {
        let source = format!("({})", vec!["1"; 300_000].join(" "));
        let exprs = parse(&source).unwrap();
        assert_eq!(exprs[0].list_len(), 300_000);
    }

    #[test]
    fn test_lexer_errors_surface() {
        assert!(parse("(print \"oops)").is_err());
        assert!(parse("(a # b)").is_err());
    }
}

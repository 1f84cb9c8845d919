//! Recursive descent parser for binding expressions.
//!
//! ```text
//! expr    := call | path | literal
//! call    := IDENT '(' [expr (',' expr)*] ')'
//! path    := head ('.' IDENT | '[' (NUMBER | '$index') ']')*
//! head    := IDENT | '$index'
//! literal := STRING | NUMBER | 'true' | 'false' | 'null'
//! ```

use crate::error::{Error, Result};
use crate::value::Value;

use super::tokenizer::{tokenize, Spanned, Token};

/// One step of a data path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(String),
    Index(usize),
    /// `$index`, replaced by the current data index at evaluation time.
    CurrentIndex,
}

/// Parsed binding expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path(Vec<Segment>),
    Call { name: String, args: Vec<Expr> },
}

/// Parse the body of a binding (the text between `@{` and `}`).
pub fn parse_expression(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        source: input,
    };
    if parser.is_eof() {
        return Err(Error::binding("empty binding expression"));
    }
    let expr = parser.parse_expr()?;
    if let Some(tok) = parser.peek() {
        return Err(parser.unexpected(tok, "end of expression"));
    }
    Ok(expr)
}

/// Recursive descent parser state.
struct Parser<'a> {
    tokens: Vec<Spanned>,
    cursor: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn unexpected(&self, tok: &Spanned, expected: &str) -> Error {
        Error::binding(format!(
            "expected {expected}, found '{}' at offset {} in '{}'",
            tok.text, tok.offset, self.source
        ))
    }

    fn eof(&self, expected: &str) -> Error {
        Error::binding(format!(
            "expected {expected}, found end of '{}'",
            self.source
        ))
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<Spanned> {
        match self.advance() {
            Some(tok) if tok.token == expected => Ok(tok),
            Some(tok) => Err(self.unexpected(&tok, what)),
            None => Err(self.eof(what)),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let tok = self.advance().ok_or_else(|| self.eof("expression"))?;
        match tok.token {
            Token::Number => {
                let n = tok
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.unexpected(&tok, "number"))?;
                Ok(Expr::Literal(Value::number(n)))
            }
            Token::StringLiteral | Token::StringLiteralSingle => {
                let inner = &tok.text[1..tok.text.len() - 1];
                Ok(Expr::Literal(Value::string(inner)))
            }
            Token::IndexVar => self.parse_path(Segment::CurrentIndex),
            Token::Ident => {
                if self.peek_token() == Some(&Token::ParenOpen) {
                    return self.parse_call(tok.text);
                }
                let keyword = match tok.text.as_str() {
                    "true" => Some(Value::bool(true)),
                    "false" => Some(Value::bool(false)),
                    "null" => Some(Value::Null),
                    _ => None,
                };
                match keyword {
                    Some(value) if !self.continues_path() => Ok(Expr::Literal(value)),
                    _ => self.parse_path(Segment::Key(tok.text)),
                }
            }
            _ => Err(self.unexpected(&tok, "expression")),
        }
    }

    fn continues_path(&self) -> bool {
        matches!(self.peek_token(), Some(Token::Dot | Token::BracketOpen))
    }

    fn parse_call(&mut self, name: String) -> Result<Expr> {
        self.expect(Token::ParenOpen, "'('")?;
        let mut args = Vec::new();
        if self.peek_token() == Some(&Token::ParenClose) {
            self.advance();
            return Ok(Expr::Call { name, args });
        }
        loop {
            args.push(self.parse_expr()?);
            match self.advance() {
                Some(tok) if tok.token == Token::Comma => continue,
                Some(tok) if tok.token == Token::ParenClose => break,
                Some(tok) => return Err(self.unexpected(&tok, "',' or ')'")),
                None => return Err(self.eof("')'")),
            }
        }
        Ok(Expr::Call { name, args })
    }

    fn parse_path(&mut self, head: Segment) -> Result<Expr> {
        let mut segments = vec![head];
        loop {
            match self.peek_token() {
                Some(Token::Dot) => {
                    self.advance();
                    let key = self.expect(Token::Ident, "key after '.'")?;
                    segments.push(Segment::Key(key.text));
                }
                Some(Token::BracketOpen) => {
                    self.advance();
                    let tok = self.advance().ok_or_else(|| self.eof("index"))?;
                    let segment = match tok.token {
                        Token::IndexVar => Segment::CurrentIndex,
                        Token::Number => tok
                            .text
                            .parse::<usize>()
                            .map(Segment::Index)
                            .map_err(|_| self.unexpected(&tok, "non-negative integer index"))?,
                        _ => return Err(self.unexpected(&tok, "index")),
                    };
                    segments.push(segment);
                    self.expect(Token::BracketClose, "']'")?;
                }
                _ => break,
            }
        }
        Ok(Expr::Path(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> Segment {
        Segment::Key(s.to_owned())
    }

    #[test]
    fn dotted_path() {
        assert_eq!(
            parse_expression("path.to.greeting").unwrap(),
            Expr::Path(vec![key("path"), key("to"), key("greeting")])
        );
    }

    #[test]
    fn indexed_path() {
        assert_eq!(
            parse_expression("items[2].tags[$index]").unwrap(),
            Expr::Path(vec![
                key("items"),
                Segment::Index(2),
                key("tags"),
                Segment::CurrentIndex
            ])
        );
    }

    #[test]
    fn nested_call() {
        let expr = parse_expression("add(1, length(items), 'x')").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                name: "add".into(),
                args: vec![
                    Expr::Literal(Value::number(1.0)),
                    Expr::Call {
                        name: "length".into(),
                        args: vec![Expr::Path(vec![key("items")])],
                    },
                    Expr::Literal(Value::string("x")),
                ],
            }
        );
    }

    #[test]
    fn empty_call() {
        assert_eq!(
            parse_expression("not()").unwrap(),
            Expr::Call {
                name: "not".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn keywords_and_keyword_paths() {
        assert_eq!(
            parse_expression("true").unwrap(),
            Expr::Literal(Value::bool(true))
        );
        assert_eq!(
            parse_expression("null.x").unwrap(),
            Expr::Path(vec![key("null"), key("x")])
        );
    }

    #[test]
    fn malformed_paths_are_errors() {
        for bad in ["a..b", "a.", "a[", "a[x]", "a[1", "a[-1]", "", "add(1,", "add(1 2)", "a b"] {
            let err = parse_expression(bad).unwrap_err();
            assert!(matches!(err, Error::Binding(_)), "{bad}: {err:?}");
        }
    }
}

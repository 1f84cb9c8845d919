//! logos-based tokenizer for binding expressions.
//!
//! Keywords (`true`, `false`, `null`) lex as [`Token::Ident`] and are told
//! apart by the parser, so identifiers such as `trueValue` never split.

use logos::Logos;

use crate::error::{Error, Result};

/// Binding expression token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    /// `$index`: the current position inside a repeated region.
    #[token("$index")]
    IndexVar,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Identifier: data keys and function names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub text: String,
    pub offset: usize,
}

/// Tokenize an expression. Unlike a lenient lexer, any unrecognised input is
/// a [`Error::Binding`].
pub fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    let mut out = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => out.push(Spanned {
                token,
                text: input[span.clone()].to_string(),
                offset: span.start,
            }),
            Err(()) => {
                return Err(Error::binding(format!(
                    "unexpected character '{}' at offset {} in '{}'",
                    &input[span.clone()],
                    span.start,
                    input
                )))
            }
        }
    }
    Ok(out)
}

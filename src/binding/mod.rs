//! Data bindings: `@{path}` and `@{fn(args)}` expressions embedded in
//! templates.

pub mod eval;
pub mod parser;
pub mod tokenizer;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

pub use eval::{Evaluator, Scope};
pub use parser::{Expr, Segment};

/// Whether a binding reads a single data path or needs function evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Path,
    Compound,
}

/// An unevaluated expression. The source text is kept for display and
/// equality; the parsed form is shared between clones.
#[derive(Debug, Clone)]
pub struct Binding {
    source: Arc<str>,
    expr: Arc<Expr>,
}

impl Binding {
    /// Parse `@{expr}`.
    pub fn parse(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix("@{")
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| Error::binding(format!("'{text}' is not of the form @{{...}}")))?;
        let expr = parser::parse_expression(body)?;
        Ok(Self {
            source: Arc::from(text),
            expr: Arc::new(expr),
        })
    }

    pub fn kind(&self) -> BindingKind {
        match *self.expr {
            Expr::Path(_) => BindingKind::Path,
            _ => BindingKind::Compound,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

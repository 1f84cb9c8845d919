//! Primitive scalars: boolean, number, string, single character.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A single scalar value.
///
/// Numbers are stored as `f64`. Equality and hashing follow the underlying
/// scalar; `-0.0` and `0.0` hash identically.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Number(f64),
    String(String),
    Char(char),
}

impl Primitive {
    /// Short name of the scalar kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "boolean",
            Primitive::Number(_) => "number",
            Primitive::String(_) => "string",
            Primitive::Char(_) => "char",
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Primitive::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Primitive::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Primitive::String(_) | Primitive::Char(_))
    }

    /// Narrow to a boolean. Strings `"true"` and `"false"` are accepted.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Primitive::Bool(b) => Ok(*b),
            Primitive::String(s) if s == "true" => Ok(true),
            Primitive::String(s) if s == "false" => Ok(false),
            other => Err(Error::mismatch("boolean", other.kind())),
        }
    }

    /// Narrow to a number. Numeric strings and digit characters are parsed.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Primitive::Number(n) => Ok(*n),
            Primitive::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::mismatch("number", format!("string '{s}'"))),
            Primitive::Char(c) => c
                .to_digit(10)
                .map(f64::from)
                .ok_or_else(|| Error::mismatch("number", format!("char '{c}'"))),
            Primitive::Bool(_) => Err(Error::mismatch("number", "boolean")),
        }
    }

    /// Render as a string. Integral numbers print without a fraction.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

/// Format a number the way templates expect: `3` rather than `3.0`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(b) => write!(f, "{b}"),
            Primitive::Number(n) => f.write_str(&format_number(*n)),
            Primitive::String(s) => f.write_str(s),
            Primitive::Char(c) => write!(f, "{c}"),
        }
    }
}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Primitive::Bool(b) => b.hash(state),
            Primitive::Number(n) => {
                let normalized = if *n == 0.0 { 0.0f64 } else { *n };
                normalized.to_bits().hash(state);
            }
            Primitive::String(s) => s.hash(state),
            Primitive::Char(c) => c.hash(state),
        }
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Primitive::Bool(b)
    }
}

impl From<f64> for Primitive {
    fn from(n: f64) -> Self {
        Primitive::Number(n)
    }
}

impl From<i64> for Primitive {
    fn from(n: i64) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::String(s.to_owned())
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::String(s)
    }
}

impl From<char> for Primitive {
    fn from(c: char) -> Self {
        Primitive::Char(c)
    }
}

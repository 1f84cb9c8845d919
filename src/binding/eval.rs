//! Binding evaluation against a `(data, index)` pair.
//!
//! The evaluator holds only an immutable [`FunctionLibrary`] handle, so one
//! instance can be shared across trees and called reentrantly.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::functions::FunctionLibrary;
use crate::value::{Object, Value};

use super::parser::{Expr, Segment};
use super::Binding;

/// The data a binding or function call sees.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub data: &'a Object,
    pub index: usize,
}

impl<'a> Scope<'a> {
    pub fn new(data: &'a Object, index: usize) -> Self {
        Self { data, index }
    }
}

/// Evaluates bindings, calling into the function library. Arguments are
/// evaluated innermost-first before the call.
#[derive(Clone)]
pub struct Evaluator {
    functions: Arc<FunctionLibrary>,
}

impl Evaluator {
    pub fn new(functions: Arc<FunctionLibrary>) -> Self {
        Self { functions }
    }

    /// Evaluator over the built-in function set.
    pub fn builtin() -> Self {
        Self::new(Arc::new(FunctionLibrary::builtin()))
    }

    pub fn functions(&self) -> &FunctionLibrary {
        &self.functions
    }

    /// Evaluate one binding. Missing data yields `Null`.
    pub fn evaluate(&self, binding: &Binding, data: &Object, index: usize) -> Result<Value> {
        self.eval_expr(binding.expr(), Scope::new(data, index))
    }

    /// Resolve a template value: bindings are evaluated, containers are
    /// resolved element-wise, everything else passes through.
    pub fn resolve(&self, value: &Value, data: &Object, index: usize) -> Result<Value> {
        match value {
            Value::Binding(binding) => self.evaluate(binding, data, index),
            Value::Array(items) if value.contains_binding() => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve(item, data, index))
                    .collect::<Result<_>>()?,
            )),
            Value::Object(map) if value.contains_binding() => {
                let mut out = Object::with_capacity(map.len());
                for (key, item) in map {
                    out.insert(key.clone(), self.resolve(item, data, index)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    pub fn eval_expr(&self, expr: &Expr, scope: Scope<'_>) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Path(segments) => Ok(resolve_path(segments, scope)),
            Expr::Call { name, args } => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| Error::binding(format!("unknown function '{name}'")))?;
                let values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                function(&scope, &values)
            }
        }
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Walk a data path. Any step that does not exist yields `Null`.
fn resolve_path(segments: &[Segment], scope: Scope<'_>) -> Value {
    let mut iter = segments.iter();
    let mut current = match iter.next() {
        Some(Segment::Key(key)) => match scope.data.get(key) {
            Some(value) => value,
            None => return Value::Null,
        },
        Some(Segment::CurrentIndex) => {
            return if segments.len() == 1 {
                Value::number(scope.index as f64)
            } else {
                Value::Null
            };
        }
        Some(Segment::Index(_)) | None => return Value::Null,
    };

    for segment in iter {
        let next = match segment {
            Segment::Key(key) => current.get(key),
            Segment::Index(i) => current.at(*i),
            Segment::CurrentIndex => current.at(scope.index),
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

//! Function library: named, pure functions callable from bindings.
//!
//! Functions receive the evaluation [`Scope`] and their already-evaluated
//! arguments. A function never coerces a missing or ill-typed argument that
//! has no documented default; it returns [`Error::TypeMismatch`] instead.

pub mod builtins;
pub mod date;
pub mod format;

use std::collections::HashMap;
use std::sync::Arc;

use crate::binding::Scope;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::value::Value;

/// Signature shared by every library function.
pub type FunctionFn = dyn Fn(&Scope<'_>, &[Value]) -> Result<Value> + Send + Sync;

/// Registry mapping a function name to its implementation.
#[derive(Clone, Default)]
pub struct FunctionLibrary {
    functions: HashMap<String, Arc<FunctionFn>>,
}

impl FunctionLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding every built-in function, with default date formats.
    pub fn builtin() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Built-in functions using the date formats from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut lib = Self::new();
        builtins::register(&mut lib);
        format::register(&mut lib);
        date::register(
            &mut lib,
            config.default_date_input.clone(),
            config.default_date_output.clone(),
        );
        lib
    }

    /// Register (or replace) a function.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&Scope<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&FunctionFn> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionLibrary")
            .field("functions", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

static NULL: Value = Value::Null;

/// Argument `i`, or `Null` when absent.
pub(crate) fn arg(args: &[Value], i: usize) -> &Value {
    args.get(i).unwrap_or(&NULL)
}

/// Fail unless at least `min` arguments were given.
pub(crate) fn require(name: &str, args: &[Value], min: usize) -> Result<()> {
    if args.len() < min {
        let plural = if min == 1 { "" } else { "s" };
        return Err(Error::mismatch(
            format!("at least {min} argument{plural} to {name}()"),
            format!("{} given", args.len()),
        ));
    }
    Ok(())
}

/// Numeric argument `i`, or `default` when absent.
pub(crate) fn number_or(args: &[Value], i: usize, default: f64) -> Result<f64> {
    match args.get(i) {
        None => Ok(default),
        Some(v) => v.as_f64(),
    }
}

/// Optional string argument `i`.
pub(crate) fn string_or(args: &[Value], i: usize, default: &str) -> String {
    match args.get(i) {
        None => default.to_owned(),
        Some(v) => v.as_string(),
    }
}

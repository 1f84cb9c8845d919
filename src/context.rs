//! Data contexts: the resolved data, scope and index one node sees.
//!
//! A context without a scope passes its input data through untouched. A
//! scoped context evaluates each scope entry in order against the input
//! data, with the entries resolved before it shadowing input keys of the
//! same name. Contexts are never shared mutably: deriving a child
//! or a copy leaves the parent as it was.

use std::sync::Arc;

use crate::binding::Evaluator;
use crate::error::Result;
use crate::value::Object;

/// Resolved data plus the scope that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext {
    scope: Option<Arc<Object>>,
    index: usize,
    data: Object,
    has_own_scope: bool,
}

impl DataContext {
    /// Scope-free context; `data` is used verbatim.
    pub fn create(data: Object, index: usize) -> Self {
        Self {
            scope: None,
            index,
            data,
            has_own_scope: false,
        }
    }

    /// Scoped context whose entries are evaluated against `input`.
    pub fn create_scoped(
        evaluator: &Evaluator,
        input: &Object,
        index: usize,
        scope: Arc<Object>,
    ) -> Result<Self> {
        let data = evaluate_scope(evaluator, &scope, input, index)?;
        Ok(Self {
            scope: Some(scope),
            index,
            data,
            has_own_scope: true,
        })
    }

    /// Scoped child whose input is this context's current data.
    pub fn create_child(
        &self,
        evaluator: &Evaluator,
        scope: Arc<Object>,
        index: usize,
    ) -> Result<Self> {
        Self::create_scoped(evaluator, &self.data, index, scope)
    }

    /// Structural clone that does not own its scope.
    pub fn copy(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            index: self.index,
            data: self.data.clone(),
            has_own_scope: false,
        }
    }

    /// Replace `data`: re-run the scope against `input`, or take `input` as
    /// is when there is no scope.
    pub fn update(&mut self, evaluator: &Evaluator, input: Object) -> Result<()> {
        self.data = match &self.scope {
            None => input,
            Some(scope) => evaluate_scope(evaluator, scope, &input, self.index)?,
        };
        Ok(())
    }

    pub fn data(&self) -> &Object {
        &self.data
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scope(&self) -> Option<&Arc<Object>> {
        self.scope.as_ref()
    }

    pub fn has_own_scope(&self) -> bool {
        self.has_own_scope
    }
}

fn evaluate_scope(
    evaluator: &Evaluator,
    scope: &Object,
    input: &Object,
    index: usize,
) -> Result<Object> {
    // Entries resolved so far shadow input keys of the same name.
    let mut view = input.clone();
    let mut out = Object::with_capacity(scope.len());
    for (key, value) in scope {
        let resolved = evaluator.resolve(value, &view, index)?;
        view.insert(key.clone(), resolved.clone());
        out.insert(key.clone(), resolved);
    }
    Ok(out)
}

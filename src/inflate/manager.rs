//! Per-node build record.

use std::sync::Arc;

use crate::context::DataContext;
use crate::value::layout::Layout;
use crate::value::Object;

/// What a live node was built from: its template and its data context.
///
/// Kept on the node so a later refresh can re-run attributes and children
/// without the caller supplying the template again.
#[derive(Debug, Clone, PartialEq)]
pub struct Manager {
    layout: Arc<Layout>,
    context: DataContext,
}

impl Manager {
    pub fn new(layout: Arc<Layout>, context: DataContext) -> Self {
        Self { layout, context }
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DataContext {
        &mut self.context
    }

    /// Resolved data the node's attributes and children see.
    pub fn data(&self) -> &Object {
        self.context.data()
    }
}

//! The `NodeTypeParser` trait: what each node type contributes to the registry.

use crate::context::DataContext;
use crate::dom::{Dom, NodeData, NodeId};
use crate::value::layout::Layout;

use super::attributes::AttributeTable;

/// Outcome of offering a child to one level of the parser chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildDispatch {
    /// This level attached the child.
    Handled,
    /// This level does not take children; ask the parent type.
    Delegate,
}

/// A node type known to the registry.
///
/// Implementations are stateless descriptions; everything per-node lives in
/// [`NodeData`]. The trait is object-safe so heterogeneous parsers can be
/// handed to [`Registry::prepare`](super::Registry::prepare) together.
pub trait NodeTypeParser: Send + Sync {
    /// The template `type` this parser handles (e.g. "Text").
    fn type_name(&self) -> &str;

    /// The type this one inherits attributes and child handling from.
    fn parent_type(&self) -> Option<&str> {
        None
    }

    /// Fill in this level's attributes. Only attributes new to (or
    /// overridden by) this level belong here; ancestors supply the rest.
    fn attributes(&self, table: &mut AttributeTable);

    /// Node factory. Called before the node is attached and before any
    /// attribute is applied.
    fn create(&self, layout: &Layout, _context: &DataContext) -> NodeData {
        NodeData::new(layout.node_type.clone())
    }

    /// Attach `child` under `parent`. Leaf types delegate to their parent
    /// type, which either accepts or delegates again.
    fn add_child(&self, _dom: &mut Dom, _parent: NodeId, _child: NodeId) -> ChildDispatch {
        ChildDispatch::Delegate
    }
}

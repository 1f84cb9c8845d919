//! Queries over the attached tree, in document order.

use super::node::{NodeData, NodeId};
use super::tree::Dom;
use crate::value::Value;

impl Dom {
    /// First node, in document order from the root, with the given id.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_all(|data| data.id.as_deref() == Some(id))
            .into_iter()
            .next()
    }

    /// All nodes carrying `class`.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// All nodes of `node_type`.
    pub fn query_by_type(&self, node_type: &str) -> Vec<NodeId> {
        self.query_all(|data| data.node_type == node_type)
    }

    /// All nodes whose resolved property `name` equals `value`.
    pub fn query_by_prop(&self, name: &str, value: &Value) -> Vec<NodeId> {
        self.query_all(|data| data.prop(name) == Some(value))
    }

    /// All attached nodes matching `predicate`. Detached nodes are skipped.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        self.walk_depth_first(root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(&predicate))
            .collect()
    }
}

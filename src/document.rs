//! A live node tree together with its lifecycle bookkeeping.

use crate::dom::{Dom, NodeData, NodeId};
use crate::inflate::{LifecycleEvent, LifecycleTracker, Manager, NodeState};

/// Everything an [`Engine`](crate::inflate::Engine) builds into.
///
/// Removal goes through the document so every removed node is unmounted
/// from the tracker as well as dropped from the arena.
#[derive(Default)]
pub struct Document {
    pub dom: Dom,
    pub lifecycle: LifecycleTracker,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the tree, if any node has been built.
    pub fn root(&self) -> Option<NodeId> {
        self.dom.root()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.dom.get(id)
    }

    /// Children of `id` in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.dom.children(id)
    }

    /// Build record of `id`.
    pub fn manager(&self, id: NodeId) -> Option<&Manager> {
        self.dom.get(id).and_then(|n| n.manager.as_ref())
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.lifecycle.state(id)
    }

    /// Remove `id` and its subtree, unmounting each removed node.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        for node in self.dom.walk_depth_first(id) {
            self.lifecycle.on_unmount(node);
        }
        self.dom.remove(id)
    }

    /// Drain queued lifecycle events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        self.lifecycle.pending_events()
    }
}

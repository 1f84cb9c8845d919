//! Node lifecycle: the per-node build state machine and mount/unmount events.
//!
//! A node moves `Uninstantiated → Created → AttributesApplied →
//! ChildrenResolved → Live` while it is built, and `Live → Updating → Live`
//! on every data refresh. The [`LifecycleTracker`] enforces those edges and
//! accumulates `Mount` / `Update` / `Unmount` events for the host to drain.

use std::collections::HashMap;

use crate::dom::NodeId;

// ---------------------------------------------------------------------------
// NodeState
// ---------------------------------------------------------------------------

/// Build state of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeState {
    #[default]
    Uninstantiated,
    Created,
    AttributesApplied,
    ChildrenResolved,
    Live,
    Updating,
}

impl NodeState {
    /// Whether `self → next` is an edge of the state machine.
    pub fn can_advance_to(self, next: NodeState) -> bool {
        use NodeState::*;
        matches!(
            (self, next),
            (Uninstantiated, Created)
                | (Created, AttributesApplied)
                | (AttributesApplied, ChildrenResolved)
                | (ChildrenResolved, Live)
                | (Live, Updating)
                | (Updating, Live)
        )
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events emitted as nodes come and go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A node finished its first build.
    Mount { node_id: NodeId },
    /// A node was removed from the tree.
    Unmount { node_id: NodeId },
    /// A live node finished a data refresh.
    Update { node_id: NodeId },
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks every node's [`NodeState`] and queues lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    states: HashMap<NodeId, NodeState>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `id`; unknown nodes are `Uninstantiated`.
    pub fn state(&self, id: NodeId) -> NodeState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Move `id` to `next`. Returns `false` and leaves the state alone when
    /// the edge does not exist.
    ///
    /// Reaching `Live` from `ChildrenResolved` queues `Mount`; reaching it
    /// from `Updating` queues `Update`.
    pub fn advance(&mut self, id: NodeId, next: NodeState) -> bool {
        let current = self.state(id);
        if !current.can_advance_to(next) {
            return false;
        }
        self.states.insert(id, next);
        match (current, next) {
            (NodeState::ChildrenResolved, NodeState::Live) => {
                self.pending.push(LifecycleEvent::Mount { node_id: id });
            }
            (NodeState::Updating, NodeState::Live) => {
                self.pending.push(LifecycleEvent::Update { node_id: id });
            }
            _ => {}
        }
        true
    }

    /// Return an `Updating` node to `Live` without queueing `Update`, after
    /// a refresh that failed part way.
    pub fn abort_update(&mut self, id: NodeId) {
        if self.state(id) == NodeState::Updating {
            self.states.insert(id, NodeState::Live);
        }
    }

    /// Forget `id`. Queues `Unmount` if it had been mounted.
    pub fn on_unmount(&mut self, id: NodeId) {
        match self.states.remove(&id) {
            Some(NodeState::Live | NodeState::Updating) => {
                self.pending.push(LifecycleEvent::Unmount { node_id: id });
            }
            _ => {}
        }
    }

    /// Whether `id` has been mounted and not unmounted since.
    pub fn is_mounted(&self, id: NodeId) -> bool {
        matches!(self.state(id), NodeState::Live | NodeState::Updating)
    }

    /// Number of mounted nodes.
    pub fn mounted_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, NodeState::Live | NodeState::Updating))
            .count()
    }

    /// Drain and return all pending lifecycle events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Clear all state and pending events.
    pub fn clear(&mut self) {
        self.states.clear();
        self.pending.clear();
    }
}

//! Event sinks: the callback interface and a queue implementation.
//!
//! Interactive attributes (`onClick`, `onChange`) store a payload on the
//! node. Firing an event walks the bubble path from the target up to the
//! root and hands the first registered payload to an [`EventSink`].

use std::collections::VecDeque;

use crate::dom::{Dom, NodeId};
use crate::value::Value;

// ---------------------------------------------------------------------------
// EventSink
// ---------------------------------------------------------------------------

/// Receives events fired on live nodes.
pub trait EventSink {
    fn on_event(&mut self, name: &str, value: &Value, node: NodeId);
}

impl<F> EventSink for F
where
    F: FnMut(&str, &Value, NodeId),
{
    fn on_event(&mut self, name: &str, value: &Value, node: NodeId) {
        self(name, value, node)
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One delivered event.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Event name, e.g. "onClick".
    pub name: String,
    /// Payload registered on the handling node.
    pub value: Value,
    /// The node whose payload was delivered.
    pub node: NodeId,
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// Sink that queues envelopes for the host to drain later.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<Envelope>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all pending envelopes in delivery order.
    pub fn drain(&mut self) -> Vec<Envelope> {
        self.queue.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Path from `start` up to the root, inclusive. Empty when `start` is
    /// not in the tree.
    pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
        if !dom.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(dom.ancestors(start));
        path
    }
}

impl EventSink for EventQueue {
    fn on_event(&mut self, name: &str, value: &Value, node: NodeId) {
        self.queue.push_back(Envelope {
            name: name.to_owned(),
            value: value.clone(),
            node,
        });
    }
}

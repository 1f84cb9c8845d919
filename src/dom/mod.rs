//! Live node arena: slotmap-backed tree with id/class/type queries.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{NodeData, NodeId};
pub use tree::Dom;

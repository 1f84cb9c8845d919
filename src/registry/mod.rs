//! Attribute dispatch registry: node types, inherited attribute ids, handlers.

pub mod attributes;
pub mod dispatch;
pub mod parser;

pub use attributes::{AttributeId, AttributeProcessor, AttributeSet, AttributeTable, Resolved};
pub use dispatch::Registry;
pub use parser::{ChildDispatch, NodeTypeParser};

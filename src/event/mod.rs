//! Event delivery from interactive attributes to the host.

pub mod queue;

pub use queue::{Envelope, EventQueue, EventSink};

//! Template tree building: node state machine, build records, the engine.

pub mod children;
pub mod engine;
pub mod lifecycle;
pub mod manager;

pub use engine::{Engine, EngineBuilder};
pub use lifecycle::{LifecycleEvent, LifecycleTracker, NodeState};
pub use manager::Manager;

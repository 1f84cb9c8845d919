//! Helpers for asserting on built trees.
//!
//! Use [`dump`] to capture a subtree as indented text for snapshot-style
//! assertions.

pub mod snapshot;

pub use snapshot::dump;

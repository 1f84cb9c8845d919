//! # gilt-inflate
//!
//! Runtime inflation of declarative layouts into a live, data-bound node tree.
//!
//! A template (JSON or XML) describes a tree of typed nodes whose attributes
//! may contain `@{...}` expressions, resource references (`@string/title`),
//! theme references (`?attr/colorAccent`, `@style/Heading`) and repeated
//! children driven by a collection binding. The [`Engine`] evaluates those
//! against a data snapshot and builds a retained tree; a later
//! [`Engine::update`] with new data refreshes the same nodes in place.
//!
//! ## Core Systems
//!
//! - **[`value`]**: Tagged values, references and the parsed [`Layout`]
//! - **[`binding`]**: Expression tokenizer, parser and evaluator
//! - **[`functions`]**: Named function library (logic, math, strings, dates)
//! - **[`context`]**: Per-node data contexts with scoped bindings
//! - **[`registry`]**: Node type parsers with inherited attribute ids
//! - **[`inflate`]**: Tree builder, index-aligned reconciliation, lifecycle
//! - **[`dom`]**: Slotmap-backed node arena and queries
//! - **[`widgets`]**: Built-in node types: View, Container, Row, Column, Text, Button, Input
//! - **[`resolve`]**: Resource and theme lookup seams
//! - **[`event`]**: Event payload delivery and bubbling
//! - **[`xml`]**: XML template front-end
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gilt_inflate::{widgets, Document, Engine, Registry, Value};
//!
//! let registry = Arc::new(Registry::prepare(widgets::builtin_parsers()).unwrap());
//! let engine = Engine::new(registry);
//! let layout = engine
//!     .parse_layout(r#"{"type":"Text","attributes":{"text":"@{format('Hi %s', name)}"}}"#)
//!     .unwrap();
//!
//! let mut doc = Document::new();
//! let data = gilt_inflate::value::json::parse_data(r#"{"name":"ann"}"#).unwrap();
//! let root = engine.build(&mut doc, &layout, data, None, 0).unwrap();
//! assert_eq!(doc.get(root).unwrap().prop("text"), Some(&Value::string("Hi ann")));
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod value;

// Expressions
pub mod binding;
pub mod context;
pub mod functions;

// Node types
pub mod registry;
pub mod widgets;

// Tree building
pub mod document;
pub mod dom;
pub mod inflate;
pub mod resolve;

// Host surfaces
pub mod event;
pub mod testing;
pub mod xml;

pub use config::EngineConfig;
pub use context::DataContext;
pub use document::Document;
pub use error::{Error, Result};
pub use inflate::{Engine, EngineBuilder};
pub use registry::{NodeTypeParser, Registry};
pub use value::{Layout, Object, Value};

//! Collaborators that turn symbolic references into values.
//!
//! The engine never looks resources up itself. Hosts supply a
//! [`ResourceResolver`] and a [`ThemeResolver`]; a not-found answer is
//! [`Error::ResourceUnavailable`], which the engine hands to the attribute
//! handler as a missing value so it can fall back to its default.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::value::reference::{AttributeRef, ResourceRef, StyleRef};
use crate::value::Value;

/// Platform resources (`@string/title`, `@color/accent`, ...).
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, reference: &ResourceRef) -> Result<Value>;
}

/// Theme attributes (`?attr/colorAccent`) and styles (`@style/Title`).
pub trait ThemeResolver: Send + Sync {
    fn resolve_attr(&self, reference: &AttributeRef) -> Result<Value>;
    fn resolve_style(&self, reference: &StyleRef) -> Result<Value>;
}

/// Resolver with nothing in it. Every lookup is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ResourceResolver for NoResources {
    fn resolve(&self, reference: &ResourceRef) -> Result<Value> {
        Err(Error::ResourceUnavailable(reference.to_string()))
    }
}

impl ThemeResolver for NoResources {
    fn resolve_attr(&self, reference: &AttributeRef) -> Result<Value> {
        Err(Error::ResourceUnavailable(reference.to_string()))
    }

    fn resolve_style(&self, reference: &StyleRef) -> Result<Value> {
        Err(Error::ResourceUnavailable(reference.to_string()))
    }
}

/// In-memory resources keyed by `kind/name`; packages are ignored.
#[derive(Debug, Clone, Default)]
pub struct MapResources {
    entries: HashMap<String, Value>,
}

impl MapResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder).
    pub fn with(mut self, kind: &str, name: &str, value: Value) -> Self {
        self.insert(kind, name, value);
        self
    }

    pub fn insert(&mut self, kind: &str, name: &str, value: Value) {
        self.entries.insert(format!("{kind}/{name}"), value);
    }
}

impl ResourceResolver for MapResources {
    fn resolve(&self, reference: &ResourceRef) -> Result<Value> {
        self.entries
            .get(&format!("{}/{}", reference.kind, reference.name))
            .cloned()
            .ok_or_else(|| Error::ResourceUnavailable(reference.to_string()))
    }
}

/// In-memory theme: attribute and style values by name.
#[derive(Debug, Clone, Default)]
pub struct MapTheme {
    attrs: HashMap<String, Value>,
    styles: HashMap<String, Value>,
}

impl MapTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a theme attribute (builder).
    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_owned(), value);
        self
    }

    /// Add a style (builder).
    pub fn with_style(mut self, name: &str, value: Value) -> Self {
        self.styles.insert(name.to_owned(), value);
        self
    }
}

impl ThemeResolver for MapTheme {
    fn resolve_attr(&self, reference: &AttributeRef) -> Result<Value> {
        self.attrs
            .get(&reference.name)
            .cloned()
            .ok_or_else(|| Error::ResourceUnavailable(reference.to_string()))
    }

    fn resolve_style(&self, reference: &StyleRef) -> Result<Value> {
        self.styles
            .get(&reference.name)
            .cloned()
            .ok_or_else(|| Error::ResourceUnavailable(reference.to_string()))
    }
}

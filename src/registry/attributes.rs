//! Attribute ids, handlers and the per-type `AttributeSet` chain.
//!
//! Every prepared node type owns one [`AttributeSet`]. A set knows its own
//! attributes plus a pointer to its parent's set, and numbers its local
//! attributes starting at `offset`, the parent's offset plus the parent's
//! size. Ids therefore grow monotonically down an inheritance chain and an
//! id below a set's offset always belongs to one of its ancestors.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::dom::NodeData;
use crate::error::{Error, Result};
use crate::value::reference::{AttributeRef, ResourceRef, StyleRef};
use crate::value::Value;

// ---------------------------------------------------------------------------
// AttributeId
// ---------------------------------------------------------------------------

/// Registry-wide attribute identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(u32);

impl AttributeId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Handler for a plain evaluated value.
pub type ValueHandler = dyn Fn(&mut NodeData, &Value) -> Result<()> + Send + Sync;
/// Handler for a resource reference; the value is `None` when the resource
/// could not be found.
pub type ResourceHandler =
    dyn Fn(&mut NodeData, &ResourceRef, Option<&Value>) -> Result<()> + Send + Sync;
/// Handler for a theme attribute reference.
pub type AttributeRefHandler =
    dyn Fn(&mut NodeData, &AttributeRef, Option<&Value>) -> Result<()> + Send + Sync;
/// Handler for a style reference.
pub type StyleHandler = dyn Fn(&mut NodeData, &StyleRef, Option<&Value>) -> Result<()> + Send + Sync;

/// An attribute value after evaluation and external resolution, tagged with
/// the shape of its source.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Value(&'a Value),
    Resource(&'a ResourceRef, Option<&'a Value>),
    Attribute(&'a AttributeRef, Option<&'a Value>),
    Style(&'a StyleRef, Option<&'a Value>),
}

impl Resolved<'_> {
    /// Shape name used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Resolved::Value(_) => "value",
            Resolved::Resource(..) => "resource",
            Resolved::Attribute(..) => "attribute reference",
            Resolved::Style(..) => "style reference",
        }
    }
}

/// The handlers one attribute registers, one per value shape.
///
/// A shape without a handler is rejected at dispatch time.
#[derive(Clone, Default)]
pub struct AttributeProcessor {
    value: Option<Arc<ValueHandler>>,
    resource: Option<Arc<ResourceHandler>>,
    attribute: Option<Arc<AttributeRefHandler>>,
    style: Option<Arc<StyleHandler>>,
}

impl AttributeProcessor {
    /// Processor accepting plain values only.
    pub fn value<F>(handler: F) -> Self
    where
        F: Fn(&mut NodeData, &Value) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            value: Some(Arc::new(handler)),
            ..Self::default()
        }
    }

    /// Processor accepting every shape. References are fed to the value
    /// handler once resolved, or with `fallback` when resolution failed.
    pub fn resolving<F>(fallback: Value, handler: F) -> Self
    where
        F: Fn(&mut NodeData, &Value) -> Result<()> + Send + Sync + 'static,
    {
        let handler: Arc<ValueHandler> = Arc::new(handler);
        let fallback = Arc::new(fallback);

        let (h, d) = (handler.clone(), fallback.clone());
        let resource = move |node: &mut NodeData, _: &ResourceRef, v: Option<&Value>| {
            h(node, v.unwrap_or(d.as_ref()))
        };
        let (h, d) = (handler.clone(), fallback.clone());
        let attribute = move |node: &mut NodeData, _: &AttributeRef, v: Option<&Value>| {
            h(node, v.unwrap_or(d.as_ref()))
        };
        let (h, d) = (handler.clone(), fallback);
        let style = move |node: &mut NodeData, _: &StyleRef, v: Option<&Value>| {
            h(node, v.unwrap_or(d.as_ref()))
        };

        Self {
            value: Some(handler),
            resource: Some(Arc::new(resource)),
            attribute: Some(Arc::new(attribute)),
            style: Some(Arc::new(style)),
        }
    }

    /// Add a resource handler (builder).
    pub fn on_resource<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut NodeData, &ResourceRef, Option<&Value>) -> Result<()> + Send + Sync + 'static,
    {
        self.resource = Some(Arc::new(handler));
        self
    }

    /// Add an attribute-reference handler (builder).
    pub fn on_attribute<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut NodeData, &AttributeRef, Option<&Value>) -> Result<()> + Send + Sync + 'static,
    {
        self.attribute = Some(Arc::new(handler));
        self
    }

    /// Add a style handler (builder).
    pub fn on_style<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut NodeData, &StyleRef, Option<&Value>) -> Result<()> + Send + Sync + 'static,
    {
        self.style = Some(Arc::new(handler));
        self
    }

    /// Route `resolved` to the handler for its shape.
    pub fn process(&self, name: &str, node: &mut NodeData, resolved: Resolved<'_>) -> Result<()> {
        let handled = match resolved {
            Resolved::Value(v) => self.value.as_ref().map(|h| h(node, v)),
            Resolved::Resource(r, v) => self.resource.as_ref().map(|h| h(node, r, v)),
            Resolved::Attribute(r, v) => self.attribute.as_ref().map(|h| h(node, r, v)),
            Resolved::Style(r, v) => self.style.as_ref().map(|h| h(node, r, v)),
        };
        handled.unwrap_or_else(|| {
            Err(Error::binding(format!(
                "attribute '{name}' does not support this reference kind ({})",
                resolved.shape()
            )))
        })
    }

    pub fn accepts_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn accepts_resource(&self) -> bool {
        self.resource.is_some()
    }

    pub fn accepts_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    pub fn accepts_style(&self) -> bool {
        self.style.is_some()
    }
}

impl fmt::Debug for AttributeProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeProcessor")
            .field("value", &self.accepts_value())
            .field("resource", &self.accepts_resource())
            .field("attribute", &self.accepts_attribute())
            .field("style", &self.accepts_style())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AttributeTable
// ---------------------------------------------------------------------------

/// Declarative `name -> processor` table a node type fills in once.
#[derive(Debug, Default)]
pub struct AttributeTable {
    entries: IndexMap<String, AttributeProcessor>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `processor` under `name`. A second registration of the same
    /// name replaces the first.
    pub fn add(&mut self, name: impl Into<String>, processor: AttributeProcessor) -> &mut Self {
        self.entries.insert(name.into(), processor);
        self
    }

    /// Shorthand for a value-only attribute.
    pub fn value<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut NodeData, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.add(name, AttributeProcessor::value(handler))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AttributeSet
// ---------------------------------------------------------------------------

/// One level of the prepared attribute chain. Immutable once built.
#[derive(Debug)]
pub struct AttributeSet {
    node_type: String,
    ids: IndexMap<String, AttributeId>,
    processors: Vec<(String, AttributeProcessor)>,
    offset: u32,
    parent: Option<Arc<AttributeSet>>,
}

impl AttributeSet {
    /// Number `table`'s entries after everything `parent` already owns.
    pub fn new(
        node_type: impl Into<String>,
        table: AttributeTable,
        parent: Option<Arc<AttributeSet>>,
    ) -> Self {
        let offset = parent.as_ref().map_or(0, |p| p.end());
        let mut ids = IndexMap::with_capacity(table.entries.len());
        let mut processors = Vec::with_capacity(table.entries.len());
        for (local, (name, processor)) in table.entries.into_iter().enumerate() {
            ids.insert(name.clone(), AttributeId::new(offset + local as u32));
            processors.push((name, processor));
        }
        Self {
            node_type: node_type.into(),
            ids,
            processors,
            offset,
            parent,
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// First id this level owns.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// One past the last id this level owns.
    pub fn end(&self) -> u32 {
        self.offset + self.processors.len() as u32
    }

    pub fn parent(&self) -> Option<&Arc<AttributeSet>> {
        self.parent.as_ref()
    }

    /// Walk from this level to the root; the first level defining `name` wins.
    pub fn resolve(&self, name: &str) -> Option<AttributeId> {
        match self.ids.get(name) {
            Some(id) => Some(*id),
            None => self.parent.as_ref().and_then(|p| p.resolve(name)),
        }
    }

    /// Name registered for `id` anywhere along the chain.
    pub fn name_of(&self, id: AttributeId) -> Option<&str> {
        self.owner(id).map(|(set, local)| set.processors[local].0.as_str())
    }

    /// Invoke the handler owning `id` with `resolved`.
    pub fn dispatch(&self, node: &mut NodeData, id: AttributeId, resolved: Resolved<'_>) -> Result<()> {
        let (set, local) = self.owner(id).ok_or_else(|| {
            Error::binding(format!(
                "attribute id {id} is not known to node type '{}'",
                self.node_type
            ))
        })?;
        let (name, processor) = &set.processors[local];
        tracing::trace!(node_type = %self.node_type, level = %set.node_type, attribute = %name, "dispatch");
        processor.process(name, node, resolved)
    }

    /// The level owning `id` and the local index into its processors.
    fn owner(&self, id: AttributeId) -> Option<(&AttributeSet, usize)> {
        let raw = id.get();
        if raw < self.offset {
            return self.parent.as_ref().and_then(|p| p.owner(id));
        }
        let local = (raw - self.offset) as usize;
        (local < self.processors.len()).then_some((self, local))
    }
}

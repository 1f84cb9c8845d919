//! The template tree builder.
//!
//! [`Engine::build`] turns a [`Layout`] plus a data snapshot into live nodes;
//! [`Engine::update`] re-runs attributes and children of an existing node
//! against a new snapshot without recreating it. A subtree that fails to
//! build is removed before the error is returned, so callers see either a
//! complete node or nothing.

use std::fmt;
use std::sync::Arc;

use super::lifecycle::NodeState;
use super::manager::Manager;
use crate::binding::Evaluator;
use crate::config::EngineConfig;
use crate::context::DataContext;
use crate::document::Document;
use crate::dom::{Dom, NodeData, NodeId};
use crate::error::{Error, Result};
use crate::event::{EventQueue, EventSink};
use crate::functions::FunctionLibrary;
use crate::registry::{Registry, Resolved};
use crate::resolve::{NoResources, ResourceResolver, ThemeResolver};
use crate::value::layout::{Attribute, Layout, CHILDREN};
use crate::value::{Object, Value};

// ---------------------------------------------------------------------------
// EngineBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Engine`].
pub struct EngineBuilder {
    registry: Arc<Registry>,
    functions: Option<FunctionLibrary>,
    resources: Arc<dyn ResourceResolver>,
    theme: Arc<dyn ThemeResolver>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Use `functions` instead of the built-in library.
    pub fn with_functions(mut self, functions: FunctionLibrary) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceResolver + 'static) -> Self {
        self.resources = Arc::new(resources);
        self
    }

    pub fn with_theme(mut self, theme: impl ThemeResolver + 'static) -> Self {
        self.theme = Arc::new(theme);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Engine {
        let functions = self
            .functions
            .unwrap_or_else(|| FunctionLibrary::from_config(&self.config));
        Engine {
            registry: self.registry,
            evaluator: Evaluator::new(Arc::new(functions)),
            resources: self.resources,
            theme: self.theme,
            config: self.config,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Builds and refreshes live node trees from templates.
///
/// An engine is immutable and can serve any number of [`Document`]s.
pub struct Engine {
    pub(super) registry: Arc<Registry>,
    pub(super) evaluator: Evaluator,
    resources: Arc<dyn ResourceResolver>,
    theme: Arc<dyn ThemeResolver>,
    pub(super) config: EngineConfig,
}

impl Engine {
    /// Engine with built-in functions, no resources and default config.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: Arc<Registry>) -> EngineBuilder {
        EngineBuilder {
            registry,
            functions: None,
            resources: Arc::new(NoResources),
            theme: Arc::new(NoResources),
            config: EngineConfig::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse JSON template text against this engine's registry.
    pub fn parse_layout(&self, text: &str) -> Result<Arc<Layout>> {
        Layout::parse(text, &self.registry).map(Arc::new)
    }

    /// Parse an XML template; see [`crate::xml`] for the mapping.
    pub fn parse_xml(&self, xml: &str) -> Result<Arc<Layout>> {
        crate::xml::parse_layout(xml, &self.registry).map(Arc::new)
    }

    /// Build `layout` with `data` at `index`, appended under `container` when
    /// one is given.
    ///
    /// The node is attached before its attributes are applied. An unknown
    /// node type, for the template or for `container`, is
    /// [`Error::UnknownType`] and nothing is created; a container whose type
    /// refuses children is [`Error::Template`].
    #[tracing::instrument(skip_all, fields(node_type = %layout.node_type, index = index))]
    pub fn build(
        &self,
        doc: &mut Document,
        layout: &Arc<Layout>,
        data: Object,
        container: Option<NodeId>,
        index: usize,
    ) -> Result<NodeId> {
        let depth = container.map_or(0, |c| doc.dom.ancestors(c).len() + 1);
        let parent = DataContext::create(data, index);
        self.build_node(doc, layout, &parent, container, index, depth)
    }

    /// Re-run attributes and children of `node` against `data`. The node and
    /// every child that survives reconciliation keep their identity.
    #[tracing::instrument(skip_all, fields(node = ?node))]
    pub fn update(&self, doc: &mut Document, node: NodeId, data: Object) -> Result<()> {
        self.refresh_node(doc, node, &data)
    }

    /// Deliver `event` starting at `node` and bubbling towards the root. The
    /// first node with a payload for `event` handles it; a disabled node
    /// swallows the event. Returns the handling node.
    pub fn fire(
        &self,
        doc: &Document,
        node: NodeId,
        event: &str,
        sink: &mut dyn EventSink,
    ) -> Option<NodeId> {
        for id in EventQueue::bubble_path(&doc.dom, node) {
            let data = doc.get(id)?;
            if data.disabled {
                tracing::debug!(node = ?id, event, "event swallowed by disabled node");
                return None;
            }
            if let Some(value) = data.events.get(event) {
                sink.on_event(event, value, id);
                return Some(id);
            }
        }
        None
    }

    // -- building -----------------------------------------------------------

    pub(super) fn build_node(
        &self,
        doc: &mut Document,
        layout: &Arc<Layout>,
        parent: &DataContext,
        container: Option<NodeId>,
        index: usize,
        depth: usize,
    ) -> Result<NodeId> {
        if depth >= self.config.max_depth {
            return Err(Error::template(format!(
                "template nesting exceeds {} levels",
                self.config.max_depth
            )));
        }
        // Nothing is created for a type without a parser.
        let parser = self.registry.parser(&layout.node_type)?;
        let container_type = match container {
            Some(c) => {
                let node_type = doc
                    .get(c)
                    .map(|n| n.node_type.clone())
                    .ok_or_else(|| Error::template("container node is not in the tree"))?;
                self.registry.parser(&node_type)?;
                Some(node_type)
            }
            None => None,
        };

        let context = self.derive_context(layout, parent, index)?;
        let data = parser.create(layout, &context);
        let node = match container {
            Some(_) => doc.dom.create(data),
            None => doc.dom.insert(data),
        };
        doc.lifecycle.advance(node, NodeState::Created);
        tracing::debug!(node_type = %layout.node_type, index, depth, "created node");

        let attach = container.zip(container_type);
        if let Err(err) = self.populate(doc, node, layout, context, attach, depth) {
            doc.remove(node);
            return Err(err);
        }
        Ok(node)
    }

    fn populate(
        &self,
        doc: &mut Document,
        node: NodeId,
        layout: &Arc<Layout>,
        context: DataContext,
        attach: Option<(NodeId, String)>,
        depth: usize,
    ) -> Result<()> {
        if let Some((parent, parent_type)) = attach {
            self.registry
                .add_child(&parent_type, &mut doc.dom, parent, node)?;
        }

        self.apply_attributes(&mut doc.dom, node, layout, &context)?;
        doc.lifecycle.advance(node, NodeState::AttributesApplied);

        node_mut(&mut doc.dom, node)?.manager = Some(Manager::new(layout.clone(), context));
        self.resolve_children(doc, node, depth)?;
        doc.lifecycle.advance(node, NodeState::ChildrenResolved);
        doc.lifecycle.advance(node, NodeState::Live);
        Ok(())
    }

    /// Clone the parent's data, or evaluate the template's own scope
    /// against it.
    fn derive_context(
        &self,
        layout: &Layout,
        parent: &DataContext,
        index: usize,
    ) -> Result<DataContext> {
        match &layout.data {
            Some(scope) => parent.create_child(&self.evaluator, Arc::new(scope.clone()), index),
            None => Ok(DataContext::create(parent.data().clone(), index)),
        }
    }

    // -- refreshing ---------------------------------------------------------

    pub(super) fn refresh_node(&self, doc: &mut Document, node: NodeId, input: &Object) -> Result<()> {
        if !doc.lifecycle.advance(node, NodeState::Updating) {
            return Err(Error::template(format!(
                "node {node:?} is not live and cannot be updated"
            )));
        }
        match self.refresh_inner(doc, node, input) {
            Ok(()) => {
                doc.lifecycle.advance(node, NodeState::Live);
                Ok(())
            }
            Err(err) => {
                doc.lifecycle.abort_update(node);
                Err(err)
            }
        }
    }

    fn refresh_inner(&self, doc: &mut Document, node: NodeId, input: &Object) -> Result<()> {
        let manager = node_mut(&mut doc.dom, node)?
            .manager
            .as_mut()
            .ok_or_else(|| Error::template(format!("node {node:?} was not built from a template")))?;
        manager
            .context_mut()
            .update(&self.evaluator, input.clone())?;
        let layout = manager.layout().clone();
        let context = manager.context().clone();

        self.apply_attributes(&mut doc.dom, node, &layout, &context)?;
        let depth = doc.dom.ancestors(node).len();
        self.resolve_children(doc, node, depth)
    }

    // -- attributes ---------------------------------------------------------

    fn apply_attributes(
        &self,
        dom: &mut Dom,
        node: NodeId,
        layout: &Layout,
        context: &DataContext,
    ) -> Result<()> {
        let data = node_mut(dom, node)?;
        for attr in layout.attributes.iter().filter(|a| a.name != CHILDREN) {
            self.apply_attribute(&layout.node_type, data, attr, context)?;
        }
        Ok(())
    }

    /// Evaluate, resolve references, then dispatch by the shape the value
    /// turned out to have.
    fn apply_attribute(
        &self,
        node_type: &str,
        node: &mut NodeData,
        attr: &Attribute,
        context: &DataContext,
    ) -> Result<()> {
        let value = self.evaluate(&attr.value, context, &attr.name)?;
        let resolved;
        let shaped = match &value {
            Value::Resource(r) => {
                resolved = self.lookup(self.resources.resolve(r))?;
                Resolved::Resource(r, resolved.as_ref())
            }
            Value::Attribute(r) => {
                resolved = self.lookup(self.theme.resolve_attr(r))?;
                Resolved::Attribute(r, resolved.as_ref())
            }
            Value::Style(r) => {
                resolved = self.lookup(self.theme.resolve_style(r))?;
                Resolved::Style(r, resolved.as_ref())
            }
            other => Resolved::Value(other),
        };
        self.registry.dispatch(node_type, node, attr.id, shaped)
    }

    /// Evaluate a raw template value. Outside strict mode an evaluation
    /// error is logged and becomes `Null`.
    pub(super) fn evaluate(&self, raw: &Value, context: &DataContext, what: &str) -> Result<Value> {
        match self.evaluator.resolve(raw, context.data(), context.index()) {
            Ok(value) => Ok(value),
            Err(err) if !self.config.strict_bindings => {
                tracing::warn!(attribute = what, error = %err, "binding failed; using null");
                Ok(Value::Null)
            }
            Err(err) => Err(err),
        }
    }

    /// Not-found becomes `None` for the handler to default; other resolver
    /// errors propagate.
    fn lookup(&self, result: Result<Value>) -> Result<Option<Value>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::ResourceUnavailable(what)) => {
                tracing::warn!(reference = %what, "resource unavailable; handler default applies");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

pub(super) fn node_mut(dom: &mut Dom, node: NodeId) -> Result<&mut NodeData> {
    dom.get_mut(node)
        .ok_or_else(|| Error::template(format!("node {node:?} is not in the tree")))
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

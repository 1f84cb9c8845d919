//! Node types: NodeId, NodeData.

use indexmap::IndexMap;
use slotmap::new_key_type;

use crate::inflate::Manager;
use crate::value::Value;

new_key_type! {
    /// Handle of a live node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single live node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node type name (e.g. "Text", "Container").
    pub node_type: String,
    /// Optional template id (`id` attribute).
    pub id: Option<String>,
    /// Style classes (`class` attribute).
    pub classes: Vec<String>,
    /// Whether this node is visible.
    pub visible: bool,
    /// Whether this node can receive focus.
    pub focusable: bool,
    /// Whether this node is disabled.
    pub disabled: bool,
    /// Resolved attribute values, by attribute name.
    pub props: IndexMap<String, Value>,
    /// Event payloads, by event name.
    pub events: IndexMap<String, Value>,
    /// The template and data this node was built from.
    pub manager: Option<Manager>,
}

impl NodeData {
    /// Create a new `NodeData` with the given type and sensible defaults.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            id: None,
            classes: Vec::new(),
            visible: true,
            focusable: false,
            disabled: false,
            props: IndexMap::new(),
            events: IndexMap::new(),
            manager: None,
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_class(&class);
        self
    }

    /// Set whether this node can receive focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Replace all classes with the whitespace-separated names in `list`.
    pub fn set_classes(&mut self, list: &str) {
        self.classes.clear();
        for class in list.split_whitespace() {
            self.add_class(class);
        }
    }

    /// Resolved value of a property, if it was applied.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Record a resolved property value.
    pub fn set_prop(&mut self, name: impl Into<String>, value: Value) {
        self.props.insert(name.into(), value);
    }

    /// Register the payload delivered when `event` fires on this node.
    pub fn set_event(&mut self, event: impl Into<String>, value: Value) {
        self.events.insert(event.into(), value);
    }

    /// The data index this node was built at, or 0 when not built from a template.
    pub fn data_index(&self) -> usize {
        self.manager.as_ref().map_or(0, |m| m.context().index())
    }
}

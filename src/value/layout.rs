//! Template node: type, resolved attributes, scoped data and children.

use std::sync::Arc;

use serde_json::json;

use super::json::object_from_json;
use super::{Object, Value};
use crate::error::{Error, Result};
use crate::registry::{AttributeId, Registry};

/// Reserved attribute name for the children configuration.
pub const CHILDREN: &str = "children";

/// One attribute of a template node, with its id already resolved against
/// the node type's attribute chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    pub value: Value,
}

/// Parsed, immutable description of one node and its children.
///
/// `children` is kept as a raw [`Value`] and validated when the node is
/// built: either an array of [`Value::Layout`] or an object with
/// `collection` and `layout` members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub node_type: String,
    pub attributes: Vec<Attribute>,
    /// Scoped bindings evaluated into this node's data context.
    pub data: Option<Object>,
    pub extras: Option<Object>,
    pub children: Option<Value>,
}

impl Layout {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    /// Parse a layout from JSON text.
    pub fn parse(text: &str, registry: &Registry) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json, registry)
    }

    /// Build a layout from its JSON shape, resolving attribute names through
    /// `registry`. Names the node type does not know are kept in `extras`.
    pub fn from_json(json: &serde_json::Value, registry: &Registry) -> Result<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| Error::template("layout must be an object"))?;
        let node_type = obj
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::template("layout is missing a string 'type'"))?;

        let mut layout = Layout::new(node_type);

        let mut raw_attributes: Vec<(String, &serde_json::Value)> = Vec::new();
        match obj.get("attributes") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Array(items)) => {
                for item in items {
                    let name = item
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .ok_or_else(|| Error::template("attribute entry is missing 'name'"))?;
                    let value = item.get("value").unwrap_or(&serde_json::Value::Null);
                    raw_attributes.push((name.to_owned(), value));
                }
            }
            Some(serde_json::Value::Object(map)) => {
                raw_attributes.extend(map.iter().map(|(k, v)| (k.clone(), v)));
            }
            Some(_) => return Err(Error::template("'attributes' must be an array or object")),
        }

        let mut extras = match obj.get("extras") {
            Some(serde_json::Value::Object(map)) => object_from_json(map),
            Some(serde_json::Value::Null) | None => Object::new(),
            Some(_) => return Err(Error::template("'extras' must be an object")),
        };

        for (name, raw) in raw_attributes {
            if name == CHILDREN {
                layout.children = Some(children_from_json(raw, registry)?);
                continue;
            }
            match registry.resolve(node_type, &name) {
                Some(id) => layout.attributes.push(Attribute {
                    id,
                    name,
                    value: Value::from_template_json(raw)?,
                }),
                None => {
                    tracing::debug!(node_type, attribute = %name, "unknown attribute kept in extras");
                    extras.insert(name, Value::from_json(raw));
                }
            }
        }

        if let Some(raw) = obj.get(CHILDREN) {
            layout.children = Some(children_from_json(raw, registry)?);
        }

        match obj.get("data") {
            Some(serde_json::Value::Object(map)) => {
                let mut scope = Object::with_capacity(map.len());
                for (key, value) in map {
                    scope.insert(key.clone(), Value::from_template_json(value)?);
                }
                layout.data = Some(scope);
            }
            Some(serde_json::Value::Null) | None => {}
            Some(_) => return Err(Error::template("'data' must be an object")),
        }

        if !extras.is_empty() {
            layout.extras = Some(extras);
        }
        Ok(layout)
    }

    /// Append an attribute (builder).
    pub fn with_attribute(mut self, id: AttributeId, name: impl Into<String>, value: Value) -> Self {
        self.attributes.push(Attribute {
            id,
            name: name.into(),
            value,
        });
        self
    }

    /// Set the children configuration (builder).
    pub fn with_children(mut self, children: Value) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the scoped data map (builder).
    pub fn with_data(mut self, data: Object) -> Self {
        self.data = Some(data);
        self
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Deep copy, including nested child layouts.
    pub fn copy(&self) -> Layout {
        Layout {
            node_type: self.node_type.clone(),
            attributes: self
                .attributes
                .iter()
                .map(|a| Attribute {
                    id: a.id,
                    name: a.name.clone(),
                    value: a.value.copy(),
                })
                .collect(),
            data: self.data.as_ref().map(copy_object),
            extras: self.extras.as_ref().map(copy_object),
            children: self.children.as_ref().map(copy_children),
        }
    }

    /// Union of attributes, data and extras; `other` wins on conflicts. The
    /// node type stays `self`'s, so `other` must share its id space.
    pub fn merge(&self, other: &Layout) -> Layout {
        let mut merged = self.copy();

        for attr in &other.attributes {
            match merged.attributes.iter_mut().find(|a| a.id == attr.id) {
                Some(existing) => existing.value = attr.value.copy(),
                None => merged.attributes.push(Attribute {
                    id: attr.id,
                    name: attr.name.clone(),
                    value: attr.value.copy(),
                }),
            }
        }

        merged.data = merge_objects(merged.data.take(), other.data.as_ref());
        merged.extras = merge_objects(merged.extras.take(), other.extras.as_ref());
        if let Some(children) = &other.children {
            merged.children = Some(copy_children(children));
        }
        merged
    }

    /// Serialize to the template JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("type".into(), json!(self.node_type));
        if !self.attributes.is_empty() {
            let attrs = self
                .attributes
                .iter()
                .map(|a| json!({ "name": a.name, "value": a.value.to_json() }))
                .collect();
            out.insert("attributes".into(), serde_json::Value::Array(attrs));
        }
        if let Some(data) = &self.data {
            out.insert("data".into(), Value::Object(data.clone()).to_json());
        }
        if let Some(extras) = &self.extras {
            out.insert("extras".into(), Value::Object(extras.clone()).to_json());
        }
        if let Some(children) = &self.children {
            out.insert(CHILDREN.into(), children.to_json());
        }
        serde_json::Value::Object(out)
    }
}

fn copy_object(map: &Object) -> Object {
    map.iter().map(|(k, v)| (k.clone(), v.copy())).collect()
}

fn copy_children(children: &Value) -> Value {
    match children {
        Value::Layout(layout) => Value::Layout(Arc::new(layout.copy())),
        Value::Array(items) => Value::Array(items.iter().map(copy_children).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), copy_children(v)))
                .collect(),
        ),
        other => other.copy(),
    }
}

fn merge_objects(base: Option<Object>, other: Option<&Object>) -> Option<Object> {
    match (base, other) {
        (None, None) => None,
        (Some(base), None) => Some(base),
        (None, Some(other)) => Some(copy_object(other)),
        (Some(mut base), Some(other)) => {
            for (k, v) in other {
                base.insert(k.clone(), v.copy());
            }
            Some(base)
        }
    }
}

/// Convert the children member. Objects carrying a `type` become nested
/// layouts; the collection form keeps its binding and parses its template.
/// Anything else is kept as-is and rejected when the node is built.
fn children_from_json(raw: &serde_json::Value, registry: &Registry) -> Result<Value> {
    match raw {
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if item.get("type").is_some() {
                    out.push(Value::from(Layout::from_json(item, registry)?));
                } else {
                    out.push(Value::from_template_json(item)?);
                }
            }
            Ok(Value::Array(out))
        }
        serde_json::Value::Object(map) if map.contains_key("type") => {
            Ok(Value::Array(vec![Value::from(Layout::from_json(raw, registry)?)]))
        }
        serde_json::Value::Object(map) => {
            let mut out = Object::new();
            for (key, value) in map {
                let converted = if key == "layout" && value.is_object() {
                    Value::from(Layout::from_json(value, registry)?)
                } else {
                    Value::from_template_json(value)?
                };
                out.insert(key.clone(), converted);
            }
            Ok(Value::Object(out))
        }
        other => Value::from_template_json(other),
    }
}

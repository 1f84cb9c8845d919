//! Value model: JSON-like data plus the binding and reference variants that
//! only appear inside templates.

pub mod json;
pub mod layout;
pub mod primitive;
pub mod reference;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::binding::Binding;
use crate::error::{Error, Result};

pub use layout::{Attribute, Layout};
pub use primitive::Primitive;
pub use reference::{AttributeRef, ResourceRef, StyleRef};

/// String-keyed map. Lookup ignores insertion order; iteration and
/// serialization follow it.
pub type Object = IndexMap<String, Value>;

/// Tagged value used for data snapshots, attribute values and function
/// arguments.
///
/// `Array` and `Object` own their contents, so [`Value::copy`] never aliases
/// the original containers. `Layout` is shared behind an [`Arc`] because
/// templates are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Primitive(Primitive),
    Array(Vec<Value>),
    Object(Object),
    /// Unevaluated expression.
    Binding(Binding),
    Resource(ResourceRef),
    Attribute(AttributeRef),
    Style(StyleRef),
    Layout(Arc<Layout>),
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Primitive(Primitive::String(s.into()))
    }

    /// Build a number value.
    pub fn number(n: f64) -> Self {
        Value::Primitive(Primitive::Number(n))
    }

    /// Build a boolean value.
    pub fn bool(b: bool) -> Self {
        Value::Primitive(Primitive::Bool(b))
    }

    /// Build an empty object value.
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Primitive(p) => p.kind(),
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Binding(_) => "binding",
            Value::Resource(_) => "resource",
            Value::Attribute(_) => "attribute",
            Value::Style(_) => "style",
            Value::Layout(_) => "layout",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_binding(&self) -> bool {
        matches!(self, Value::Binding(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Value::Resource(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Value::Attribute(_))
    }

    pub fn is_style(&self) -> bool {
        matches!(self, Value::Style(_))
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, Value::Layout(_))
    }

    pub fn as_primitive(&self) -> Result<&Primitive> {
        match self {
            Value::Primitive(p) => Ok(p),
            other => Err(Error::mismatch("primitive", other.kind())),
        }
    }

    pub fn as_array(&self) -> Result<&Vec<Value>> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(Error::mismatch("array", other.kind())),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(Error::mismatch("array", other.kind())),
        }
    }

    pub fn as_object(&self) -> Result<&Object> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(Error::mismatch("object", other.kind())),
        }
    }

    pub fn as_object_mut(&mut self) -> Result<&mut Object> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(Error::mismatch("object", other.kind())),
        }
    }

    pub fn as_binding(&self) -> Result<&Binding> {
        match self {
            Value::Binding(b) => Ok(b),
            other => Err(Error::mismatch("binding", other.kind())),
        }
    }

    pub fn as_layout(&self) -> Result<&Arc<Layout>> {
        match self {
            Value::Layout(layout) => Ok(layout),
            other => Err(Error::mismatch("layout", other.kind())),
        }
    }

    /// Narrow to a number.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Primitive(p) => p.as_f64(),
            other => Err(Error::mismatch("number", other.kind())),
        }
    }

    /// Narrow to a boolean.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Primitive(p) => p.as_bool(),
            other => Err(Error::mismatch("boolean", other.kind())),
        }
    }

    /// String form of the value. `Null` is the empty string; containers
    /// serialize as compact JSON.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Primitive(p) => p.as_string(),
            Value::Array(_) | Value::Object(_) => self.to_json().to_string(),
            Value::Binding(b) => b.to_string(),
            Value::Resource(r) => r.to_string(),
            Value::Attribute(r) => r.to_string(),
            Value::Style(r) => r.to_string(),
            Value::Layout(layout) => layout.node_type.clone(),
        }
    }

    /// Loose truthiness used by the logical functions.
    ///
    /// `Null` is false, strings are true unless empty or `"false"`, numbers
    /// are true unless zero or NaN, containers are true unless empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Primitive(Primitive::Bool(b)) => *b,
            Value::Primitive(Primitive::Number(n)) => *n != 0.0 && !n.is_nan(),
            Value::Primitive(Primitive::String(s)) => !s.is_empty() && s != "false",
            Value::Primitive(Primitive::Char(_)) => true,
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    /// Copy with no aliasing of mutable containers.
    pub fn copy(&self) -> Value {
        match self {
            Value::Array(items) => Value::Array(items.iter().map(Value::copy).collect()),
            Value::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.copy())).collect(),
            ),
            other => other.clone(),
        }
    }

    /// Object member lookup. Anything that is not an object yields `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Array element lookup. Anything that is not an array yields `None`.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Whether any binding is reachable from this value.
    pub fn contains_binding(&self) -> bool {
        match self {
            Value::Binding(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_binding),
            Value::Object(map) => map.values().any(Value::contains_binding),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Value::Primitive(p)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl From<Layout> for Value {
    fn from(layout: Layout) -> Self {
        Value::Layout(Arc::new(layout))
    }
}

//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! Data snapshots convert verbatim: a string is always a string. Template
//! values go through [`Value::from_template_json`], which recognises
//! `@{...}` bindings, `@kind/name` resources, `@style/name` styles and
//! `?attr/name` theme attributes.

use serde_json::{Map, Number};

use super::{AttributeRef, Object, Primitive, ResourceRef, StyleRef, Value};
use crate::binding::Binding;
use crate::error::{Error, Result};

impl Value {
    /// Convert plain JSON data. No string is interpreted.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::bool(*b),
            serde_json::Value::Number(n) => Value::number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(object_from_json(map)),
        }
    }

    /// Convert a template value, classifying strings into bindings and
    /// references. Fails only on malformed binding expressions.
    pub fn from_template_json(json: &serde_json::Value) -> Result<Value> {
        Ok(match json {
            serde_json::Value::String(s) => classify(s)?,
            serde_json::Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Value::from_template_json)
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(map) => {
                let mut out = Object::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), Value::from_template_json(value)?);
                }
                Value::Object(out)
            }
            other => Value::from_json(other),
        })
    }

    /// Serialize back to JSON. Integral numbers become JSON integers;
    /// bindings and references serialize as their template text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Primitive(Primitive::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Primitive(Primitive::Number(n)) => number_to_json(*n),
            Value::Primitive(Primitive::String(s)) => serde_json::Value::String(s.clone()),
            Value::Primitive(Primitive::Char(c)) => serde_json::Value::String(c.to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Binding(b) => serde_json::Value::String(b.to_string()),
            Value::Resource(r) => serde_json::Value::String(r.to_string()),
            Value::Attribute(r) => serde_json::Value::String(r.to_string()),
            Value::Style(r) => serde_json::Value::String(r.to_string()),
            Value::Layout(layout) => layout.to_json(),
        }
    }
}

/// Parse a JSON document into a data object.
pub fn parse_data(text: &str) -> Result<Object> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    match Value::from_json(&json) {
        Value::Object(map) => Ok(map),
        other => Err(Error::mismatch("object", other.kind())),
    }
}

pub(crate) fn object_from_json(map: &Map<String, serde_json::Value>) -> Object {
    map.iter()
        .map(|(k, v)| (k.clone(), Value::from_json(v)))
        .collect()
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Classify one template string.
pub fn classify(s: &str) -> Result<Value> {
    if let Some(rest) = s.strip_prefix('\\') {
        if rest.starts_with('@') || rest.starts_with('?') {
            return Ok(Value::string(rest));
        }
    }
    if s.starts_with("@{") {
        return Binding::parse(s).map(Value::Binding);
    }
    if let Some(attr) = AttributeRef::parse(s) {
        return Ok(Value::Attribute(attr));
    }
    if let Some(res) = ResourceRef::parse(s) {
        if res.kind == "style" {
            return Ok(Value::Style(StyleRef {
                package: res.package,
                name: res.name,
            }));
        }
        return Ok(Value::Resource(res));
    }
    Ok(Value::string(s))
}

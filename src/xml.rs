//! XML front-end for templates.
//!
//! Elements map onto the JSON template shape: the tag's local name is the
//! node type, attributes become template attributes, nested elements become
//! `children`. Two prefixes are special:
//!
//! - `data:key="..."` adds `key` to the node's scoped data map.
//! - `xmlns` / `xmlns:*` declarations are dropped.
//!
//! An element carrying a `collection` attribute must contain exactly one
//! child element, which becomes the per-item layout:
//!
//! ```xml
//! <Column collection="@{items}">
//!   <Text text="@{name}"/>
//! </Column>
//! ```
//!
//! Text content and comments are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{json, Map};

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::value::layout::{Layout, CHILDREN};

const COLLECTION: &str = "collection";

struct Frame {
    node_type: String,
    attributes: Map<String, serde_json::Value>,
    data: Map<String, serde_json::Value>,
    collection: Option<serde_json::Value>,
    children: Vec<serde_json::Value>,
}

impl Frame {
    fn open(element: &BytesStart<'_>) -> Result<Self> {
        let node_type = utf8(element.local_name().as_ref())?.to_owned();
        let mut frame = Frame {
            node_type,
            attributes: Map::new(),
            data: Map::new(),
            collection: None,
            children: Vec::new(),
        };

        for attr in element.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            let (prefix, local) = match key.split_once(':') {
                Some((prefix, local)) => (Some(prefix), local),
                None => (None, key),
            };
            match (prefix, local) {
                (None, "xmlns") | (Some("xmlns"), _) => {}
                (Some("data"), name) => {
                    frame.data.insert(name.to_owned(), json!(value));
                }
                (_, COLLECTION) => frame.collection = Some(json!(value)),
                (_, name) => {
                    frame.attributes.insert(name.to_owned(), json!(value));
                }
            }
        }
        Ok(frame)
    }

    fn close(self) -> Result<serde_json::Value> {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.node_type));
        if !self.attributes.is_empty() {
            out.insert("attributes".into(), serde_json::Value::Object(self.attributes));
        }
        if !self.data.is_empty() {
            out.insert("data".into(), serde_json::Value::Object(self.data));
        }

        match self.collection {
            Some(collection) => {
                let mut children = self.children;
                if children.len() != 1 {
                    return Err(Error::Xml(format!(
                        "<{}> with a collection needs exactly one item element, found {}",
                        self.node_type,
                        children.len()
                    )));
                }
                let layout = children.remove(0);
                out.insert(
                    CHILDREN.into(),
                    json!({ "collection": collection, "layout": layout }),
                );
            }
            None if !self.children.is_empty() => {
                out.insert(CHILDREN.into(), serde_json::Value::Array(self.children));
            }
            None => {}
        }
        Ok(serde_json::Value::Object(out))
    }
}

/// Convert an XML template into its JSON template shape.
pub fn to_json(xml: &str) -> Result<serde_json::Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<serde_json::Value> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => stack.push(Frame::open(&e)?),
            Event::Empty(e) => {
                let node = Frame::open(&e)?.close()?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unexpected closing tag".into()))?;
                let node = frame.close()?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unclosed element at end of input".into()));
    }
    root.ok_or_else(|| Error::Xml("template has no root element".into()))
}

/// Parse an XML template straight into a [`Layout`].
pub fn parse_layout(xml: &str, registry: &Registry) -> Result<Layout> {
    Layout::from_json(&to_json(xml)?, registry)
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<serde_json::Value>,
    node: serde_json::Value,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(Error::Xml("template has more than one root element".into())),
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(xml_error)
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::Xml(err.to_string())
}

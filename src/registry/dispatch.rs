//! The prepared registry: node types, their attribute chains and dispatch.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::attributes::{AttributeId, AttributeSet, AttributeTable, Resolved};
use super::parser::{ChildDispatch, NodeTypeParser};
use crate::dom::{Dom, NodeData, NodeId};
use crate::error::{Error, Result};

struct Entry {
    parser: Box<dyn NodeTypeParser>,
    attributes: Arc<AttributeSet>,
}

/// Every known node type with its prepared [`AttributeSet`] chain.
///
/// Built once by [`Registry::prepare`] and immutable afterwards, so one
/// registry can be shared by any number of engines and trees.
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    /// Prepare `parsers` in one pass. Order does not matter: a parser whose
    /// parent appears later in the list is prepared after it. An unknown
    /// parent type, a duplicate type name or an inheritance cycle is an error.
    pub fn prepare(parsers: Vec<Box<dyn NodeTypeParser>>) -> Result<Self> {
        let mut pending: HashMap<String, Box<dyn NodeTypeParser>> = HashMap::new();
        let mut order = Vec::with_capacity(parsers.len());
        for parser in parsers {
            let name = parser.type_name().to_owned();
            if pending.contains_key(&name) {
                return Err(Error::template(format!("node type '{name}' registered twice")));
            }
            order.push(name.clone());
            pending.insert(name, parser);
        }

        let mut prepared: HashMap<String, Arc<AttributeSet>> = HashMap::new();
        for name in &order {
            let mut visiting = HashSet::new();
            prepare_one(name, &pending, &mut prepared, &mut visiting)?;
        }

        let mut entries = IndexMap::with_capacity(order.len());
        for name in order {
            let (Some(parser), Some(attributes)) = (pending.remove(&name), prepared.remove(&name))
            else {
                continue;
            };
            entries.insert(name, Entry { parser, attributes });
        }

        tracing::debug!(types = entries.len(), "registry prepared");
        Ok(Self { entries })
    }

    /// Whether `node_type` has a parser.
    pub fn contains(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// Registered type names in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The parser for `node_type`.
    pub fn parser(&self, node_type: &str) -> Result<&dyn NodeTypeParser> {
        self.entry(node_type).map(|e| e.parser.as_ref())
    }

    /// The most-derived attribute set for `node_type`.
    pub fn attributes(&self, node_type: &str) -> Option<&Arc<AttributeSet>> {
        self.entries.get(node_type).map(|e| &e.attributes)
    }

    /// `node_type` followed by each of its ancestors, most derived first.
    pub fn lineage(&self, node_type: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self.entries.get(node_type).map(|e| e.parser.as_ref());
        while let Some(parser) = current {
            out.push(parser.type_name());
            current = parser
                .parent_type()
                .and_then(|p| self.entries.get(p))
                .map(|e| e.parser.as_ref());
        }
        out
    }

    /// Resolve an attribute name for `node_type`. `None` when neither the
    /// type nor any ancestor defines it, or when the type is unknown.
    pub fn resolve(&self, node_type: &str, name: &str) -> Option<AttributeId> {
        self.attributes(node_type)?.resolve(name)
    }

    /// Apply a resolved attribute value to `node` through the level owning `id`.
    pub fn dispatch(
        &self,
        node_type: &str,
        node: &mut NodeData,
        id: AttributeId,
        resolved: Resolved<'_>,
    ) -> Result<()> {
        self.entry(node_type)?.attributes.dispatch(node, id, resolved)
    }

    /// Offer `child` to `parent`, walking from `parent_type` towards the
    /// root until some level accepts it. Refusal by every level is a
    /// template error.
    pub fn add_child(
        &self,
        parent_type: &str,
        dom: &mut Dom,
        parent: NodeId,
        child: NodeId,
    ) -> Result<()> {
        for level in self.lineage(parent_type) {
            let parser = self.parser(level)?;
            if parser.add_child(dom, parent, child) == ChildDispatch::Handled {
                return Ok(());
            }
        }
        Err(Error::template(format!(
            "node type '{parent_type}' does not accept children"
        )))
    }

    fn entry(&self, node_type: &str) -> Result<&Entry> {
        self.entries
            .get(node_type)
            .ok_or_else(|| Error::UnknownType(node_type.to_owned()))
    }
}

/// Depth-first preparation so a parent is always prepared before its child.
fn prepare_one(
    name: &str,
    pending: &HashMap<String, Box<dyn NodeTypeParser>>,
    prepared: &mut HashMap<String, Arc<AttributeSet>>,
    visiting: &mut HashSet<String>,
) -> Result<Arc<AttributeSet>> {
    if let Some(set) = prepared.get(name) {
        return Ok(set.clone());
    }
    let parser = pending
        .get(name)
        .ok_or_else(|| Error::UnknownType(name.to_owned()))?;
    if !visiting.insert(name.to_owned()) {
        return Err(Error::template(format!(
            "node type '{name}' inherits from itself"
        )));
    }

    let parent = match parser.parent_type() {
        Some(parent) => Some(prepare_one(parent, pending, prepared, visiting)?),
        None => None,
    };
    let mut table = AttributeTable::new();
    parser.attributes(&mut table);
    let set = Arc::new(AttributeSet::new(name, table, parent));
    tracing::debug!(
        node_type = name,
        parent = parser.parent_type().unwrap_or("-"),
        offset = set.offset(),
        end = set.end(),
        "prepared node type"
    );
    prepared.insert(name.to_owned(), set.clone());
    Ok(set)
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types().collect::<Vec<_>>())
            .finish()
    }
}

//! Plain-text tree dumps.

use std::fmt::Write;

use crate::dom::{Dom, NodeData, NodeId};

/// Render the subtree at `root` as one line per node, indented two spaces
/// per level.
///
/// Each line reads `Type#id.class {prop=json, on:event=json}` followed by
/// `!disabled` / `!hidden` markers when they apply. Props and events keep
/// their insertion order. Lines are separated by `'\n'` with no trailing
/// newline.
///
/// # Examples
///
/// ```
/// use gilt_inflate::dom::{Dom, NodeData};
/// use gilt_inflate::testing::dump;
/// use gilt_inflate::Value;
///
/// let mut dom = Dom::new();
/// let root = dom.insert(NodeData::new("Column").with_id("list"));
/// let mut label = NodeData::new("Text");
/// label.set_prop("text", Value::string("Hello"));
/// dom.insert_child(root, label);
///
/// assert_eq!(dump(&dom, root), "Column#list\n  Text {text=\"Hello\"}");
/// ```
pub fn dump(dom: &Dom, root: NodeId) -> String {
    let mut lines = Vec::new();
    write_node(dom, root, 0, &mut lines);
    lines.join("\n")
}

fn write_node(dom: &Dom, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = dom.get(id) else {
        return;
    };
    lines.push(format!("{}{}", "  ".repeat(depth), describe(node)));
    for &child in dom.children(id) {
        write_node(dom, child, depth + 1, lines);
    }
}

fn describe(node: &NodeData) -> String {
    let mut line = node.node_type.clone();
    if let Some(id) = &node.id {
        let _ = write!(line, "#{id}");
    }
    for class in &node.classes {
        let _ = write!(line, ".{class}");
    }

    let fields: Vec<String> = node
        .props
        .iter()
        .map(|(name, value)| format!("{name}={}", value.to_json()))
        .chain(
            node.events
                .iter()
                .map(|(name, value)| format!("on:{name}={}", value.to_json())),
        )
        .collect();
    if !fields.is_empty() {
        let _ = write!(line, " {{{}}}", fields.join(", "));
    }

    if node.disabled {
        line.push_str(" !disabled");
    }
    if !node.visible {
        line.push_str(" !hidden");
    }
    line
}

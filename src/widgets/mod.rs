//! Built-in node types: View, Container, Row, Column, Text, Button, Input.
//!
//! ```text
//! View ─┬─ Container ─┬─ Row
//!       │             └─ Column
//!       └─ Text ──────┬─ Button
//!                     └─ Input
//! ```
//!
//! Resolved attribute values land in [`NodeData::props`] so hosts can read
//! them back; interactive attributes land in [`NodeData::events`].

pub mod button;
pub mod container;
pub mod input;
pub mod text;
pub mod view;

pub use button::ButtonParser;
pub use container::{ColumnParser, ContainerParser, RowParser};
pub use input::InputParser;
pub use text::TextParser;
pub use view::ViewParser;

use crate::dom::NodeData;
use crate::error::Result;
use crate::registry::NodeTypeParser;
use crate::value::Value;

/// Every built-in parser, ready for [`Registry::prepare`](crate::registry::Registry::prepare).
pub fn builtin_parsers() -> Vec<Box<dyn NodeTypeParser>> {
    vec![
        Box::new(ViewParser),
        Box::new(ContainerParser),
        Box::new(RowParser),
        Box::new(ColumnParser),
        Box::new(TextParser),
        Box::new(ButtonParser),
        Box::new(InputParser),
    ]
}

/// Boolean attribute: `Null` keeps `default`, anything else by truthiness.
pub(crate) fn flag(value: &Value, default: bool) -> bool {
    if value.is_null() {
        default
    } else {
        value.is_truthy()
    }
}

/// Store `value` under `name`, or drop the property when it is `Null`.
pub(crate) fn store(node: &mut NodeData, name: &str, value: &Value) {
    if value.is_null() {
        node.props.shift_remove(name);
    } else {
        node.set_prop(name, value.clone());
    }
}

/// Handler for an event attribute: the value is the payload delivered when
/// the event fires. `Null` unregisters it.
pub(crate) fn event(
    name: &'static str,
) -> impl Fn(&mut NodeData, &Value) -> Result<()> + Send + Sync + 'static {
    move |node, value| {
        if value.is_null() {
            node.events.shift_remove(name);
        } else {
            node.set_event(name, value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn builtin_registry_prepares() {
        let reg = Registry::prepare(builtin_parsers()).unwrap();
        assert_eq!(reg.len(), 7);
        assert_eq!(reg.lineage("Button"), vec!["Button", "Text", "View"]);
        assert_eq!(reg.lineage("Row"), vec!["Row", "Container", "View"]);
    }

    #[test]
    fn inherited_attributes_share_ids() {
        let reg = Registry::prepare(builtin_parsers()).unwrap();
        assert_eq!(reg.resolve("Button", "id"), reg.resolve("View", "id"));
        assert_eq!(reg.resolve("Button", "text"), reg.resolve("Text", "text"));
        assert_ne!(reg.resolve("Button", "onClick"), reg.resolve("View", "onClick"));
        assert_eq!(reg.resolve("Row", "text"), None);
    }

    #[test]
    fn flag_and_store() {
        assert!(flag(&Value::Null, true));
        assert!(!flag(&Value::string("false"), true));
        let mut node = NodeData::new("View");
        store(&mut node, "x", &Value::number(1.0));
        assert!(node.prop("x").is_some());
        store(&mut node, "x", &Value::Null);
        assert!(node.prop("x").is_none());
    }
}

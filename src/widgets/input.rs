//! Input: editable text with a placeholder.

use super::event;
use crate::context::DataContext;
use crate::dom::NodeData;
use crate::registry::{AttributeProcessor, AttributeTable, NodeTypeParser};
use crate::value::layout::Layout;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct InputParser;

impl NodeTypeParser for InputParser {
    fn type_name(&self) -> &str {
        "Input"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("Text")
    }

    fn attributes(&self, table: &mut AttributeTable) {
        table
            .add(
                "placeholder",
                AttributeProcessor::resolving(Value::string(""), |node, value| {
                    node.set_prop("placeholder", Value::string(value.as_string()));
                    Ok(())
                }),
            )
            .value("value", |node, value| {
                node.set_prop("value", Value::string(value.as_string()));
                Ok(())
            })
            .value("onChange", event("onChange"));
    }

    fn create(&self, layout: &Layout, _: &DataContext) -> NodeData {
        let mut node = NodeData::new(layout.node_type.clone()).focusable(true);
        node.set_prop("value", Value::string(""));
        node
    }
}

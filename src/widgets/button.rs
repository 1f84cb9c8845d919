//! Button: clickable text.

use super::{event, flag};
use crate::context::DataContext;
use crate::dom::NodeData;
use crate::registry::{AttributeTable, NodeTypeParser};
use crate::value::layout::Layout;

#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonParser;

impl NodeTypeParser for ButtonParser {
    fn type_name(&self) -> &str {
        "Button"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("Text")
    }

    fn attributes(&self, table: &mut AttributeTable) {
        let on_click = event("onClick");
        table
            .value("disabled", |node, value| {
                node.disabled = flag(value, false);
                Ok(())
            })
            // Shadows View's onClick: a clickable button is also focusable.
            .value("onClick", move |node, value| {
                on_click(node, value)?;
                node.focusable = true;
                Ok(())
            });
    }

    fn create(&self, layout: &Layout, _: &DataContext) -> NodeData {
        NodeData::new(layout.node_type.clone()).focusable(true)
    }
}

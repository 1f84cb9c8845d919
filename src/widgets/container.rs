//! Container, Row and Column: the node types that accept children.

use crate::context::DataContext;
use crate::dom::{Dom, NodeData, NodeId};
use crate::error::Error;
use crate::registry::{AttributeTable, ChildDispatch, NodeTypeParser};
use crate::value::layout::Layout;
use crate::value::Value;

/// Generic container; children stack vertically unless told otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerParser;

impl NodeTypeParser for ContainerParser {
    fn type_name(&self) -> &str {
        "Container"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("View")
    }

    fn attributes(&self, table: &mut AttributeTable) {
        table
            .value("orientation", |node, value| {
                let orientation = match value {
                    Value::Null => "vertical".to_owned(),
                    other => other.as_string(),
                };
                if orientation != "vertical" && orientation != "horizontal" {
                    return Err(Error::mismatch("vertical or horizontal", orientation));
                }
                node.set_prop("orientation", Value::string(orientation));
                Ok(())
            })
            .value("gap", |node, value| {
                if value.is_null() {
                    node.props.shift_remove("gap");
                    return Ok(());
                }
                let gap = value.as_f64()?;
                if gap < 0.0 {
                    return Err(Error::mismatch("non-negative gap", gap.to_string()));
                }
                node.set_prop("gap", Value::number(gap));
                Ok(())
            });
    }

    fn create(&self, layout: &Layout, _: &DataContext) -> NodeData {
        with_orientation(layout, "vertical")
    }

    fn add_child(&self, dom: &mut Dom, parent: NodeId, child: NodeId) -> ChildDispatch {
        if dom.append_child(parent, child) {
            ChildDispatch::Handled
        } else {
            ChildDispatch::Delegate
        }
    }
}

/// Horizontal container.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowParser;

impl NodeTypeParser for RowParser {
    fn type_name(&self) -> &str {
        "Row"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("Container")
    }

    fn attributes(&self, _: &mut AttributeTable) {}

    fn create(&self, layout: &Layout, _: &DataContext) -> NodeData {
        with_orientation(layout, "horizontal")
    }
}

/// Vertical container.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnParser;

impl NodeTypeParser for ColumnParser {
    fn type_name(&self) -> &str {
        "Column"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("Container")
    }

    fn attributes(&self, _: &mut AttributeTable) {}

    fn create(&self, layout: &Layout, _: &DataContext) -> NodeData {
        with_orientation(layout, "vertical")
    }
}

fn with_orientation(layout: &Layout, orientation: &str) -> NodeData {
    let mut node = NodeData::new(layout.node_type.clone());
    node.set_prop("orientation", Value::string(orientation));
    node
}

//! Text: a leaf showing a string.

use super::store;
use crate::error::Error;
use crate::registry::{AttributeProcessor, AttributeTable, NodeTypeParser};
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl NodeTypeParser for TextParser {
    fn type_name(&self) -> &str {
        "Text"
    }

    fn parent_type(&self) -> Option<&str> {
        Some("View")
    }

    fn attributes(&self, table: &mut AttributeTable) {
        table
            .add(
                "text",
                AttributeProcessor::resolving(Value::string(""), |node, value| {
                    node.set_prop("text", Value::string(value.as_string()));
                    Ok(())
                }),
            )
            .add(
                "textColor",
                AttributeProcessor::resolving(Value::string("inherit"), |node, value| {
                    store(node, "textColor", value);
                    Ok(())
                }),
            )
            .value("maxLines", |node, value| {
                if value.is_null() {
                    node.props.shift_remove("maxLines");
                    return Ok(());
                }
                let lines = value.as_f64()?;
                if lines < 1.0 || lines.fract() != 0.0 {
                    return Err(Error::mismatch("positive whole number", lines.to_string()));
                }
                node.set_prop("maxLines", Value::number(lines));
                Ok(())
            });
    }
}

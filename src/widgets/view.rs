//! View: root of the built-in hierarchy. Identity, visibility, interaction.

use super::{event, flag, store};
use crate::dom::NodeData;
use crate::error::{Error, Result};
use crate::registry::{AttributeProcessor, AttributeTable, NodeTypeParser};
use crate::value::{Primitive, Value};

/// Root node type. Refuses children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewParser;

impl NodeTypeParser for ViewParser {
    fn type_name(&self) -> &str {
        "View"
    }

    fn attributes(&self, table: &mut AttributeTable) {
        table
            .value("id", |node, value| {
                node.id = (!value.is_null()).then(|| value.as_string());
                Ok(())
            })
            .value("class", |node, value| {
                node.set_classes(&value.as_string());
                Ok(())
            })
            .value("visibility", visibility)
            .value("enabled", |node, value| {
                node.disabled = !flag(value, true);
                Ok(())
            })
            .value("focusable", |node, value| {
                node.focusable = flag(value, node.focusable);
                Ok(())
            })
            .add(
                "background",
                AttributeProcessor::resolving(Value::string("transparent"), |node, value| {
                    store(node, "background", value);
                    Ok(())
                }),
            )
            .value("onClick", event("onClick"));
    }
}

/// `visible` / `invisible` / `gone`, or a boolean.
fn visibility(node: &mut NodeData, value: &Value) -> Result<()> {
    let state = match value {
        Value::Null => "visible".to_owned(),
        Value::Primitive(Primitive::Bool(true)) => "visible".to_owned(),
        Value::Primitive(Primitive::Bool(false)) => "gone".to_owned(),
        other => other.as_string(),
    };
    match state.as_str() {
        "visible" => node.visible = true,
        "invisible" | "gone" => node.visible = false,
        _ => return Err(Error::mismatch("visible, invisible or gone", state)),
    }
    node.set_prop("visibility", Value::string(state));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, Resolved};
    use crate::value::reference::ResourceRef;

    fn apply(node: &mut NodeData, name: &str, value: Value) -> Result<()> {
        let reg = Registry::prepare(vec![Box::new(ViewParser)]).unwrap();
        let id = reg.resolve("View", name).unwrap();
        reg.dispatch("View", node, id, Resolved::Value(&value))
    }

    #[test]
    fn identity_attributes() {
        let mut node = NodeData::new("View");
        apply(&mut node, "id", Value::string("main")).unwrap();
        apply(&mut node, "class", Value::string("card wide")).unwrap();
        assert_eq!(node.id.as_deref(), Some("main"));
        assert_eq!(node.classes, vec!["card", "wide"]);

        apply(&mut node, "id", Value::Null).unwrap();
        assert_eq!(node.id, None);
    }

    #[test]
    fn visibility_values() {
        let mut node = NodeData::new("View");
        apply(&mut node, "visibility", Value::string("gone")).unwrap();
        assert!(!node.visible);
        apply(&mut node, "visibility", Value::bool(true)).unwrap();
        assert!(node.visible);
        assert_eq!(node.prop("visibility"), Some(&Value::string("visible")));
        assert!(matches!(
            apply(&mut node, "visibility", Value::string("sideways")),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn enabled_defaults_when_null() {
        let mut node = NodeData::new("View");
        apply(&mut node, "enabled", Value::bool(false)).unwrap();
        assert!(node.disabled);
        apply(&mut node, "enabled", Value::Null).unwrap();
        assert!(!node.disabled);
    }

    #[test]
    fn missing_background_falls_back_to_transparent() {
        let reg = Registry::prepare(vec![Box::new(ViewParser)]).unwrap();
        let id = reg.resolve("View", "background").unwrap();
        let mut node = NodeData::new("View");
        let r = ResourceRef::new("color", "nope");
        reg.dispatch("View", &mut node, id, Resolved::Resource(&r, None))
            .unwrap();
        assert_eq!(node.prop("background"), Some(&Value::string("transparent")));
    }

    #[test]
    fn on_click_registers_an_event() {
        let mut node = NodeData::new("View");
        apply(&mut node, "onClick", Value::string("open")).unwrap();
        assert_eq!(node.events.get("onClick"), Some(&Value::string("open")));
        apply(&mut node, "onClick", Value::Null).unwrap();
        assert!(node.events.is_empty());
    }
}

//! Child resolution: static child lists and collection-bound children.
//!
//! Collection children are reconciled by index. With `N` live children and
//! a collection of length `M`, children `[M, N)` are removed, children
//! `[0, min(N, M))` are updated in place, and `[N, M)` are built and
//! appended. Reordering a collection therefore shows up as every index
//! taking new data, never as a node move.

use std::sync::Arc;

use super::engine::Engine;
use crate::context::DataContext;
use crate::document::Document;
use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::value::layout::Layout;
use crate::value::{Object, Value};

/// A validated children configuration.
enum Children<'a> {
    Static(Vec<&'a Arc<Layout>>),
    Collection {
        collection: &'a Value,
        layout: &'a Arc<Layout>,
    },
}

impl<'a> Children<'a> {
    fn parse(value: &'a Value) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_layout().map_err(|_| {
                        Error::template(format!(
                            "malformed children array: item {i} is {}, not a layout",
                            item.kind()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Children::Static),
            Value::Object(config) => Self::collection(config),
            other => Err(Error::template(format!(
                "children must be an array or a collection binding, found {}",
                other.kind()
            ))),
        }
    }

    fn collection(config: &'a Object) -> Result<Self> {
        let collection = config
            .get("collection")
            .ok_or_else(|| Error::template("collection children need a 'collection' binding"))?;
        if !collection.is_binding() {
            return Err(Error::template(format!(
                "'collection' must be a binding, found {}",
                collection.kind()
            )));
        }
        let layout = config
            .get("layout")
            .ok_or_else(|| Error::template("collection children need a 'layout' template"))?
            .as_layout()
            .map_err(|_| Error::template("'layout' of collection children must be a layout"))?;
        Ok(Children::Collection { collection, layout })
    }
}

impl Engine {
    /// Build or refresh the children of `node` from its manager's template.
    pub(super) fn resolve_children(&self, doc: &mut Document, node: NodeId, depth: usize) -> Result<()> {
        let (layout, context) = match doc.manager(node) {
            Some(m) => (m.layout().clone(), m.context().clone()),
            None => return Ok(()),
        };
        let Some(children) = &layout.children else {
            return Ok(());
        };

        match Children::parse(children)? {
            Children::Static(layouts) => self.static_children(doc, node, &layouts, &context, depth),
            Children::Collection { collection, layout } => {
                let items = self.evaluate(collection, &context, "children.collection")?;
                match items {
                    // Absent data leaves any existing children alone.
                    Value::Null => Ok(()),
                    Value::Array(items) => {
                        self.reconcile(doc, node, items.len(), layout, &context, depth)
                    }
                    other => Err(Error::template(format!(
                        "collection must evaluate to an array, found {}",
                        other.kind()
                    ))),
                }
            }
        }
    }

    /// Static children share the parent's index. Existing ones are refreshed
    /// in place; missing ones are built.
    fn static_children(
        &self,
        doc: &mut Document,
        node: NodeId,
        layouts: &[&Arc<Layout>],
        context: &DataContext,
        depth: usize,
    ) -> Result<()> {
        let existing = doc.children(node).to_vec();
        for (i, layout) in layouts.iter().enumerate() {
            match existing.get(i) {
                Some(&child) => self.refresh_node(doc, child, context.data())?,
                None => {
                    self.build_node(doc, layout, context, Some(node), context.index(), depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn reconcile(
        &self,
        doc: &mut Document,
        node: NodeId,
        len: usize,
        layout: &Arc<Layout>,
        context: &DataContext,
        depth: usize,
    ) -> Result<()> {
        let existing = doc.children(node).to_vec();
        let live = existing.len();

        for &stale in existing.iter().skip(len) {
            doc.remove(stale);
        }
        for (i, &child) in existing.iter().take(len).enumerate() {
            self.refresh_node(doc, child, context.data())
                .map_err(|err| annotate(err, i))?;
        }
        for i in live..len {
            self.build_node(doc, layout, context, Some(node), i, depth + 1)?;
        }

        tracing::debug!(
            removed = live.saturating_sub(len),
            updated = live.min(len),
            created = len.saturating_sub(live),
            "reconciled collection children"
        );
        Ok(())
    }
}

fn annotate(err: Error, index: usize) -> Error {
    match err {
        Error::Template(msg) => Error::template(format!("collection item {index}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::widgets;
    use crate::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn text() -> Value {
        Value::Layout(Arc::new(Layout::new("Text")))
    }

    fn binding(text: &str) -> Value {
        Value::Binding(Binding::parse(text).unwrap())
    }

    #[test]
    fn parse_accepts_both_forms() {
        let list = Value::Array(vec![text(), text()]);
        assert!(matches!(Children::parse(&list), Ok(Children::Static(ref l)) if l.len() == 2));

        let mut config = Object::new();
        config.insert("collection".into(), binding("@{items}"));
        config.insert("layout".into(), text());
        let config = Value::Object(config);
        assert!(matches!(
            Children::parse(&config),
            Ok(Children::Collection { .. })
        ));
    }

    #[test]
    fn parse_rejects_malformed_configs() {
        let stray = Value::Array(vec![text(), Value::string("oops")]);
        assert!(matches!(Children::parse(&stray), Err(Error::Template(ref m)) if m.contains("item 1")));

        let mut no_collection = Object::new();
        no_collection.insert("layout".into(), text());
        assert!(matches!(
            Children::parse(&Value::Object(no_collection)),
            Err(Error::Template(_))
        ));

        let mut no_layout = Object::new();
        no_layout.insert("collection".into(), binding("@{items}"));
        assert!(matches!(
            Children::parse(&Value::Object(no_layout)),
            Err(Error::Template(_))
        ));

        let mut literal = Object::new();
        literal.insert("collection".into(), Value::Array(vec![]));
        literal.insert("layout".into(), text());
        assert!(matches!(
            Children::parse(&Value::Object(literal)),
            Err(Error::Template(_))
        ));

        assert!(matches!(
            Children::parse(&Value::number(3.0)),
            Err(Error::Template(_))
        ));
    }

    fn list_engine() -> (Engine, Arc<Layout>) {
        let registry = Arc::new(Registry::prepare(widgets::builtin_parsers()).unwrap());
        let engine = Engine::new(registry);
        let layout = engine
            .parse_layout(
                r#"{"type":"Column","children":{"collection":"@{items}",
                    "layout":{"type":"Text","attributes":{"text":"@{items[$index]}"}}}}"#,
            )
            .unwrap();
        (engine, layout)
    }

    fn items(values: serde_json::Value) -> Object {
        match Value::from_json(&json!({ "items": values })) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn reconcile_shrinks_to_zero() {
        let (engine, layout) = list_engine();
        let mut doc = Document::new();
        let root = engine
            .build(&mut doc, &layout, items(json!([1, 2, 3])), None, 0)
            .unwrap();
        assert_eq!(doc.dom.len(), 4);

        engine.update(&mut doc, root, items(json!([]))).unwrap();
        assert!(doc.children(root).is_empty());
        assert_eq!(doc.dom.len(), 1);
    }

    #[test]
    fn reconcile_grows_from_zero() {
        let (engine, layout) = list_engine();
        let mut doc = Document::new();
        let root = engine
            .build(&mut doc, &layout, items(json!([])), None, 0)
            .unwrap();
        assert!(doc.children(root).is_empty());

        engine.update(&mut doc, root, items(json!(["a", "b"]))).unwrap();
        let indices: Vec<usize> = doc
            .children(root)
            .iter()
            .map(|&c| doc.get(c).unwrap().data_index())
            .collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(
            doc.get(doc.children(root)[1]).unwrap().prop("text"),
            Some(&Value::string("b"))
        );
    }
}

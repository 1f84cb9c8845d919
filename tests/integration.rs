//! Integration tests for gilt-inflate.
//!
//! These tests exercise the public API from outside the crate: templates are
//! parsed, built into a document, refreshed with new data and inspected
//! through node properties, lifecycle events and tree dumps.

use std::sync::Arc;

use gilt_inflate::event::EventQueue;
use gilt_inflate::inflate::LifecycleEvent;
use gilt_inflate::resolve::{MapResources, MapTheme};
use gilt_inflate::testing::dump;
use gilt_inflate::{
    widgets, Document, Engine, EngineConfig, Error, Object, Registry, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn registry() -> Arc<Registry> {
    Arc::new(Registry::prepare(widgets::builtin_parsers()).unwrap())
}

fn engine() -> Engine {
    Engine::new(registry())
}

fn data(json: serde_json::Value) -> Object {
    match Value::from_json(&json) {
        Value::Object(map) => map,
        other => panic!("test data must be an object, got {other:?}"),
    }
}

fn text_of(doc: &Document, id: gilt_inflate::dom::NodeId) -> String {
    doc.get(id)
        .and_then(|n| n.prop("text"))
        .map(Value::as_string)
        .unwrap_or_default()
}

fn texts(doc: &Document, parent: gilt_inflate::dom::NodeId) -> Vec<String> {
    doc.children(parent).iter().map(|&c| text_of(doc, c)).collect()
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

#[test]
fn test_path_binding_resolves_nested_data() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{"type":"Text","attributes":[{"name":"text","value":"@{path.to.greeting}"}]}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(
            &mut doc,
            &layout,
            data(json!({"path": {"to": {"greeting": "hi"}}})),
            None,
            0,
        )
        .unwrap();
    assert_eq!(text_of(&doc, root), "hi");
}

#[test]
fn test_missing_path_renders_empty() {
    let engine = engine();
    let layout = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"@{nobody.home}"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let root = engine.build(&mut doc, &layout, Object::new(), None, 0).unwrap();
    assert_eq!(text_of(&doc, root), "");
}

#[test]
fn test_format_function_in_template() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{"type":"Text","attributes":{"text":"@{format('Hi %s, age %d', name, age)}"}}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"name": "Ann", "age": 30})), None, 0)
        .unwrap();
    assert_eq!(text_of(&doc, root), "Hi Ann, age 30");
}

#[test]
fn test_scoped_data_feeds_attributes() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{
                "type": "Text",
                "data": {"greeting": "@{format('Hi %s', name)}"},
                "attributes": {"text": "@{greeting}"}
            }"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"name": "Ann"})), None, 0)
        .unwrap();
    assert_eq!(text_of(&doc, root), "Hi Ann");

    engine
        .update(&mut doc, root, data(json!({"name": "Bo"})))
        .unwrap();
    assert_eq!(text_of(&doc, root), "Hi Bo");
}

#[test]
fn test_lenient_bindings_recover_to_empty() {
    let engine = engine();
    let layout = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"@{nosuch(1)}"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let root = engine.build(&mut doc, &layout, Object::new(), None, 0).unwrap();
    assert_eq!(text_of(&doc, root), "");
}

#[test]
fn test_strict_bindings_abort_the_build() {
    let engine = Engine::builder(registry())
        .with_config(EngineConfig::new().with_strict_bindings(true))
        .build();
    let layout = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"@{nosuch(1)}"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, Object::new(), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Binding(_)));
    assert!(doc.dom.is_empty());
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

const LIST: &str = r#"{
    "type": "Column",
    "children": {
        "collection": "@{items}",
        "layout": {"type": "Text", "attributes": {"text": "@{items[$index]}"}}
    }
}"#;

#[test]
fn test_collection_builds_one_child_per_item() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": [1, 2, 3]})), None, 0)
        .unwrap();

    assert_eq!(texts(&doc, root), vec!["1", "2", "3"]);
    let indices: Vec<usize> = doc
        .children(root)
        .iter()
        .map(|&c| doc.get(c).unwrap().data_index())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_collection_update_keeps_identity() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": [1, 2, 3]})), None, 0)
        .unwrap();
    let before = doc.children(root).to_vec();
    let count = doc.dom.len();

    engine
        .update(&mut doc, root, data(json!({"items": [9, 2, 3]})))
        .unwrap();

    assert_eq!(doc.children(root), before.as_slice());
    assert_eq!(doc.dom.len(), count);
    assert_eq!(texts(&doc, root), vec!["9", "2", "3"]);
}

#[test]
fn test_collection_shrink_removes_trailing_children() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": [1, 2, 3]})), None, 0)
        .unwrap();
    let before = doc.children(root).to_vec();

    engine
        .update(&mut doc, root, data(json!({"items": [2, 3]})))
        .unwrap();

    assert_eq!(doc.children(root), &before[..2]);
    assert!(!doc.dom.contains(before[2]));
    assert_eq!(texts(&doc, root), vec!["2", "3"]);
}

#[test]
fn test_collection_grows_at_the_end() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": ["a"]})), None, 0)
        .unwrap();
    let first = doc.children(root)[0];

    engine
        .update(&mut doc, root, data(json!({"items": ["x", "y", "z"]})))
        .unwrap();

    assert_eq!(doc.children(root)[0], first);
    assert_eq!(texts(&doc, root), vec!["x", "y", "z"]);
}

#[test]
fn test_missing_collection_builds_no_children() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine.build(&mut doc, &layout, Object::new(), None, 0).unwrap();
    assert!(doc.children(root).is_empty());
}

#[test]
fn test_null_collection_on_update_keeps_children() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": [1, 2]})), None, 0)
        .unwrap();
    let before = doc.children(root).to_vec();

    engine.update(&mut doc, root, Object::new()).unwrap();

    assert_eq!(doc.children(root), before.as_slice());
    assert_eq!(texts(&doc, root), vec!["1", "2"]);
}

#[test]
fn test_non_array_collection_is_a_template_error() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, data(json!({"items": 5})), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Template(_)));
    assert!(doc.dom.is_empty());
}

// ---------------------------------------------------------------------------
// Structural errors
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_type_creates_nothing() {
    let engine = engine();
    let layout = engine.parse_layout(r#"{"type":"Frobnicator"}"#).unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, Object::new(), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownType(ref t) if t == "Frobnicator"));
    assert!(doc.dom.is_empty());
}

#[test]
fn test_unknown_child_type_discards_the_whole_subtree() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{"type":"Column","children":[{"type":"Text"},{"type":"Frobnicator"}]}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, Object::new(), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownType(_)));
    assert!(doc.dom.is_empty());
    assert_eq!(doc.root(), None);
}

#[test]
fn test_text_refuses_children() {
    let engine = engine();
    let layout = engine
        .parse_layout(r#"{"type":"Text","children":[{"type":"Text"}]}"#)
        .unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, Object::new(), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Template(_)));
    assert!(doc.dom.is_empty());
}

#[test]
fn test_nesting_limit() {
    let engine = Engine::builder(registry())
        .with_config(EngineConfig::new().with_max_depth(2))
        .build();
    let layout = engine
        .parse_layout(
            r#"{"type":"Column","children":[{"type":"Column","children":[{"type":"Text"}]}]}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let err = engine
        .build(&mut doc, &layout, Object::new(), None, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Template(ref m) if m.contains("nesting")));
    assert!(doc.dom.is_empty());
}

// ---------------------------------------------------------------------------
// Host containers
// ---------------------------------------------------------------------------

const PANEL: &str = r#"{
    "type": "Column",
    "children": [{"type": "Text", "attributes": {"text": "@{title}"}}]
}"#;

#[test]
fn test_build_into_container_appends_last() {
    let engine = engine();
    let panel = engine.parse_layout(PANEL).unwrap();
    let extra = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"extra"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &panel, data(json!({"title": "Inbox"})), None, 0)
        .unwrap();

    let added = engine
        .build(&mut doc, &extra, Object::new(), Some(root), 0)
        .unwrap();

    assert_eq!(doc.children(root).len(), 2);
    assert_eq!(doc.children(root).last(), Some(&added));
    assert_eq!(doc.dom.parent(added), Some(root));
    assert_eq!(doc.root(), Some(root));
}

#[test]
fn test_refusing_container_leaves_no_orphan() {
    let engine = Engine::builder(registry())
        .with_config(EngineConfig::new().with_strict_bindings(true))
        .build();
    let panel = engine.parse_layout(PANEL).unwrap();
    // Attachment runs before attributes, so the broken binding is never reached.
    let child = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"@{nosuch(1)}"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &panel, data(json!({"title": "Inbox"})), None, 0)
        .unwrap();
    let label = doc.children(root)[0];
    let count = doc.dom.len();

    let err = engine
        .build(&mut doc, &child, Object::new(), Some(label), 0)
        .unwrap_err();

    assert!(matches!(err, Error::Template(ref m) if m.contains("does not accept children")));
    assert_eq!(doc.dom.len(), count);
    assert!(doc.children(label).is_empty());
}

#[test]
fn test_container_update_keeps_host_children() {
    let engine = engine();
    let panel = engine.parse_layout(PANEL).unwrap();
    let extra = engine
        .parse_layout(r#"{"type":"Text","attributes":{"text":"extra"}}"#)
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &panel, data(json!({"title": "Inbox"})), None, 0)
        .unwrap();
    let added = engine
        .build(&mut doc, &extra, Object::new(), Some(root), 0)
        .unwrap();
    let before = doc.children(root).to_vec();

    engine
        .update(&mut doc, root, data(json!({"title": "Archive"})))
        .unwrap();

    assert_eq!(doc.children(root), before.as_slice());
    assert_eq!(texts(&doc, root), vec!["Archive", "extra"]);
    assert!(doc.lifecycle.is_mounted(added));
}

// ---------------------------------------------------------------------------
// Resources and theme
// ---------------------------------------------------------------------------

#[test]
fn test_resources_resolve_or_fall_back() {
    let engine = Engine::builder(registry())
        .with_resources(MapResources::new().with("string", "title", Value::string("Welcome")))
        .with_theme(MapTheme::new().with_attr("colorAccent", Value::string("#ff00aa")))
        .build();
    let layout = engine
        .parse_layout(
            r#"{"type":"Column","attributes":{"background":"@color/missing"},"children":[
                {"type":"Text","attributes":{"text":"@string/title","textColor":"?attr/colorAccent"}},
                {"type":"Text","attributes":{"text":"@string/nope","textColor":"?attr/nope"}}
            ]}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine.build(&mut doc, &layout, Object::new(), None, 0).unwrap();

    let column = doc.get(root).unwrap();
    assert_eq!(column.prop("background"), Some(&Value::string("transparent")));

    let found = doc.get(doc.children(root)[0]).unwrap();
    assert_eq!(found.prop("text"), Some(&Value::string("Welcome")));
    assert_eq!(found.prop("textColor"), Some(&Value::string("#ff00aa")));

    let missing = doc.get(doc.children(root)[1]).unwrap();
    assert_eq!(missing.prop("text"), Some(&Value::string("")));
    assert_eq!(missing.prop("textColor"), Some(&Value::string("inherit")));
}

// ---------------------------------------------------------------------------
// Events and lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_events_bubble_to_the_nearest_handler() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{"type":"Column","attributes":{"onClick":"background"},"children":[
                {"type":"Button","attributes":{"text":"Save","onClick":"@{action}"}},
                {"type":"Text","attributes":{"text":"label"}},
                {"type":"Button","attributes":{"text":"Off","onClick":"never","disabled":true}}
            ]}"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"action": "save"})), None, 0)
        .unwrap();
    let kids = doc.children(root).to_vec();
    let mut queue = EventQueue::new();

    assert_eq!(engine.fire(&doc, kids[0], "onClick", &mut queue), Some(kids[0]));
    assert_eq!(engine.fire(&doc, kids[1], "onClick", &mut queue), Some(root));
    assert_eq!(engine.fire(&doc, kids[2], "onClick", &mut queue), None);

    let delivered: Vec<(String, Value)> = queue
        .drain()
        .into_iter()
        .map(|e| (e.name, e.value))
        .collect();
    assert_eq!(
        delivered,
        vec![
            ("onClick".to_owned(), Value::string("save")),
            ("onClick".to_owned(), Value::string("background")),
        ]
    );
}

#[test]
fn test_lifecycle_events_follow_build_update_and_shrink() {
    let engine = engine();
    let layout = engine.parse_layout(LIST).unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(&mut doc, &layout, data(json!({"items": [1, 2, 3]})), None, 0)
        .unwrap();

    let mounted = doc.pending_events();
    assert_eq!(mounted.len(), 4);
    assert!(mounted
        .iter()
        .all(|e| matches!(e, LifecycleEvent::Mount { .. })));
    assert_eq!(mounted.last(), Some(&LifecycleEvent::Mount { node_id: root }));

    let last = doc.children(root)[2];
    engine
        .update(&mut doc, root, data(json!({"items": [1, 2]})))
        .unwrap();
    let events = doc.pending_events();
    assert_eq!(events[0], LifecycleEvent::Unmount { node_id: last });
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Update { .. }))
            .count(),
        3
    );
    assert_eq!(events.last(), Some(&LifecycleEvent::Update { node_id: root }));
}

// ---------------------------------------------------------------------------
// XML templates
// ---------------------------------------------------------------------------

#[test]
fn test_xml_template_builds_like_json() {
    let engine = engine();
    let layout = engine
        .parse_xml(
            r#"<?xml version="1.0"?>
               <Column id="people" collection="@{people}">
                 <Text text="@{people[$index].name}"/>
               </Column>"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(
            &mut doc,
            &layout,
            data(json!({"people": [{"name": "Ann"}, {"name": "Bo"}]})),
            None,
            0,
        )
        .unwrap();

    assert_eq!(doc.dom.query_by_id("people"), Some(root));
    assert_eq!(texts(&doc, root), vec!["Ann", "Bo"]);
    assert_eq!(doc.dom.query_by_type("Text").len(), 2);
}

// ---------------------------------------------------------------------------
// Tree dump
// ---------------------------------------------------------------------------

#[test]
fn test_built_tree_dump() {
    let engine = engine();
    let layout = engine
        .parse_layout(
            r#"{
                "type": "Column",
                "attributes": [
                    {"name": "id", "value": "inbox"},
                    {"name": "gap", "value": 2}
                ],
                "children": [
                    {"type": "Text", "attributes": [
                        {"name": "text", "value": "@{title}"},
                        {"name": "maxLines", "value": 1}
                    ]},
                    {"type": "Button", "attributes": [
                        {"name": "text", "value": "Archive"},
                        {"name": "onClick", "value": "archive"},
                        {"name": "disabled", "value": "@{locked}"}
                    ]}
                ]
            }"#,
        )
        .unwrap();
    let mut doc = Document::new();
    let root = engine
        .build(
            &mut doc,
            &layout,
            data(json!({"title": "Inbox", "locked": true})),
            None,
            0,
        )
        .unwrap();

    insta::assert_snapshot!(dump(&doc.dom, root), @r###"
    Column#inbox {orientation="vertical", gap=2}
      Text {text="Inbox", maxLines=1}
      Button {text="Archive", on:onClick="archive"} !disabled
    "###);
}

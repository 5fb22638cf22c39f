//! Tests for `{{path}}` data binding.
mod common;
use common::*;
use hyouji::binder::{bind_node_with_warnings, item_scope, resolve_path};
use hyouji::prelude::*;
use serde_json::json;

#[test]
fn test_bind_simple_placeholder() {
    let record = record(&[("name", Value::from("Sam"))]);
    assert_eq!(bind_string("Hello {{name}}", &record), "Hello Sam");
}

#[test]
fn test_unresolved_placeholder_becomes_empty() {
    let record = record(&[("name", Value::from("Sam"))]);
    assert_eq!(bind_string("{{missing}}", &record), "");
    assert_eq!(bind_string("Hi {{ missing }}!", &record), "Hi !");
}

#[test]
fn test_nested_path() {
    let record = record(&[("a", Value::from(json!({ "b": { "c": 42 } })))]);
    assert_eq!(bind_string("{{a.b.c}}", &record), "42");
    assert_eq!(resolve_path(&record, "a.b.c"), Some(&Value::Number(42.0)));
    // Walking into a non-map stops resolution.
    assert_eq!(resolve_path(&record, "a.b.c.d"), None);
}

#[test]
fn test_string_without_placeholders_is_unchanged() {
    let record = Record::new();
    assert_eq!(bind_string("plain text", &record), "plain text");
    assert_eq!(bind_string("{single}", &record), "{single}");
}

#[test]
fn test_null_value_binds_as_empty() {
    let record = record(&[("gone", Value::Null)]);
    assert_eq!(bind_string("[{{gone}}]", &record), "[]");
}

#[test]
fn test_bind_action_params_and_destination() {
    let record = record(&[("id", Value::from(7i64)), ("kind", Value::from("shoe"))]);
    let action = Action {
        action_type: "navigate".to_string(),
        destination: Some("detail/{{kind}}".to_string()),
        params: [("id".to_string(), "{{id}}".to_string())].into(),
    };
    let bound = bind_action(&action, &record);
    assert_eq!(bound.action_type, "navigate");
    assert_eq!(bound.destination.as_deref(), Some("detail/shoe"));
    assert_eq!(bound.params["id"], "7");
    assert_eq!(action.params["id"], "{{id}}");
}

#[test]
fn test_bind_node_recurses_and_leaves_template_untouched() {
    let template = node_from(json!({
        "type": "card",
        "id": "card-{{id}}",
        "children": [
            { "type": "text", "properties": { "text": "{{title}}", "style": "headline2" } },
            { "type": "text", "properties": { "text": "{{details.color}}", "tags": ["{{title}}", 3] } }
        ]
    }));
    let record = record(&[
        ("id", Value::from(3i64)),
        ("title", Value::from("Boots")),
        ("details", Value::from(json!({ "color": "red" }))),
    ]);

    let bound = bind_node(&template, &record);
    assert_eq!(bound.id.as_deref(), Some("card-3"));
    assert_eq!(bound.children[0].prop_str("text"), Some("Boots"));
    assert_eq!(bound.children[0].prop_str("style"), Some("headline2"));
    assert_eq!(bound.children[1].prop_str("text"), Some("red"));
    assert_eq!(
        bound.children[1].prop_list("tags"),
        Some(&[Value::from("Boots"), Value::Number(3.0)][..])
    );

    assert_eq!(template.children[0].prop_str("text"), Some("{{title}}"));
    assert_eq!(template.id.as_deref(), Some("card-{{id}}"));
}

#[test]
fn test_bind_node_collects_warnings() {
    let template = Node::new("column")
        .with_child(Node::new("text").with_property("text", "{{title}}"))
        .with_child(Node::new("text").with_property("text", "{{subtitle}} / {{price.amount}}"));
    let record = record(&[("title", Value::from("Lamp"))]);

    let (bound, warnings) = bind_node_with_warnings(&template, &record);
    assert_eq!(bound.children[0].prop_str("text"), Some("Lamp"));
    assert_eq!(bound.children[1].prop_str("text"), Some(" / "));
    let exprs: Vec<&str> = warnings.iter().map(|w| w.expr.as_str()).collect();
    assert_eq!(exprs, vec!["subtitle", "price.amount"]);
}

#[test]
fn test_nested_list_templates_are_not_bound() {
    let template = node_from(json!({
        "type": "column",
        "children": [{
            "type": "lazy_row",
            "dataSource": { "type": "api", "url": "https://api.test/{{category}}" },
            "itemTemplate": { "layout": { "type": "text", "properties": { "text": "{{title}}" } } }
        }]
    }));
    let record = record(&[("category", Value::from("books")), ("title", Value::from("outer"))]);

    let bound = bind_node(&template, &record);
    let nested = &bound.children[0];
    assert_eq!(
        nested.data_source.as_ref().and_then(|ds| ds.url.as_deref()),
        Some("https://api.test/{{category}}")
    );
    assert_eq!(
        nested
            .item_template
            .as_ref()
            .and_then(|t| t.layout.prop_str("text")),
        Some("{{title}}")
    );
}

#[test]
fn test_item_scope_exposes_record_and_item() {
    let item = products(1, 1).remove(0);
    let scope = item_scope(&item);
    assert_eq!(bind_string("{{title}}", &scope), "Product 1");
    assert_eq!(bind_string("{{item.title}} #{{item.id}}", &scope), "Product 1 #1");

    let scalar_scope = item_scope(&Value::from("just text"));
    assert_eq!(bind_string("{{item}}", &scalar_scope), "just text");
}

//! Tests for structural validation of node trees.
mod common;
use common::*;
use hyouji::prelude::*;
use hyouji::validator::validate_node;
use serde_json::json;

#[test]
fn test_button_without_text_is_invalid() {
    let result = validate(&Node::new("button"));
    assert_eq!(
        result,
        ValidationResult::Invalid(vec!["Button component requires 'text' property".to_string()])
    );
    assert!(!result.is_valid());
}

#[test]
fn test_text_without_text_is_a_warning() {
    let result = validate(&Node::new("text"));
    assert_eq!(
        result,
        ValidationResult::Warning(vec!["Text component missing 'text' property".to_string()])
    );
    assert!(result.is_valid());
}

#[test]
fn test_valid_leaves() {
    assert_eq!(
        validate(&Node::new("text").with_property("text", "Hi")),
        ValidationResult::Valid
    );
    assert_eq!(
        validate(&Node::new("image").with_property("url", "https://cdn.test/a.png")),
        ValidationResult::Valid
    );
    assert_eq!(validate(&Node::new("mystery_widget")), ValidationResult::Valid);
}

#[test]
fn test_blank_type_is_invalid() {
    let result = validate(&Node::new("  "));
    assert_eq!(result.errors(), ["Component type cannot be blank"]);
}

#[test]
fn test_null_property_counts_as_missing() {
    let result = validate(&Node::new("image").with_property("url", Value::Null));
    assert_eq!(result.errors(), ["Image component requires 'url' property"]);
}

#[test]
fn test_top_app_bar_title_warning() {
    let result = validate(&Node::new("top_app_bar"));
    assert_eq!(result.warnings(), ["TopAppBar missing 'title' property"]);
}

#[test]
fn test_chart_requires_data() {
    let bar = validate(&Node::new("bar_chart"));
    assert_eq!(bar.errors(), ["bar_chart component requires 'data' property"]);

    let line = validate(&Node::new("line_chart").with_property("data", Value::List(vec![])));
    assert_eq!(line.errors(), ["line_chart component requires 'series' property"]);

    let pie = node_from(json!({
        "type": "pie_chart",
        "properties": { "data": [{ "label": "a", "value": 1 }] }
    }));
    assert_eq!(validate(&pie), ValidationResult::Valid);
}

#[test]
fn test_lazy_list_requirements() {
    let result = validate(&Node::new("lazy_column"));
    assert_eq!(
        result.errors(),
        [
            "Lazy components require dataSource",
            "Lazy components require itemTemplate"
        ]
    );

    let grid = node_from(json!({
        "type": "lazy_grid",
        "columns": 3,
        "dataSource": { "type": "static", "items": [] },
        "itemTemplate": product_template()
    }));
    assert_eq!(validate(&grid), ValidationResult::Valid);
}

#[test]
fn test_errors_aggregate_across_subtree() {
    let root = Node::new("column")
        .with_child(Node::new("text"))
        .with_child(Node::new("row").with_child(Node::new("button")))
        .with_child(Node::new("image"));

    let result = validate(&root);
    assert_eq!(
        result.errors(),
        [
            "Button component requires 'text' property",
            "Image component requires 'url' property"
        ]
    );
    // Warnings do not survive once an error is found.
    assert!(result.warnings().is_empty());
}

#[test]
fn test_warnings_aggregate_when_no_errors() {
    let root = Node::new("column")
        .with_child(Node::new("text"))
        .with_child(Node::new("top_app_bar"));
    assert_eq!(
        validate(&root).warnings(),
        [
            "Text component missing 'text' property",
            "TopAppBar missing 'title' property"
        ]
    );
}

#[test]
fn test_validate_node_ignores_children() {
    let root = Node::new("column").with_child(Node::new("button"));
    assert_eq!(validate_node(&root), ValidationResult::Valid);
    assert!(!validate(&root).is_valid());
}

#[test]
fn test_action_without_type_is_invalid() {
    let button = node_from(json!({
        "type": "button",
        "properties": { "text": "Go" },
        "actions": { "onClick": { "destination": "home" } }
    }));
    assert_eq!(
        validate_node(&button),
        ValidationResult::Invalid(vec!["Action 'onClick' requires 'type'".to_string()])
    );
}

#[test]
fn test_lazy_list_with_untyped_source_and_empty_template() {
    let list = node_from(json!({
        "type": "lazy_column",
        "dataSource": { "url": "https://api.test/items" },
        "itemTemplate": {
            "actions": { "onClick": { "type": "" } }
        }
    }));
    assert_eq!(
        validate_node(&list),
        ValidationResult::Invalid(vec![
            "dataSource requires 'type'".to_string(),
            "itemTemplate requires 'layout'".to_string(),
            "Action 'onClick' requires 'type'".to_string(),
        ])
    );
}

//! `{{path.to.value}}` interpolation of records into template nodes.
//!
//! Binding is pure: templates are never mutated, every call returns a new
//! node, so one template can be shared by every record of a list.

use crate::error::DataBindingWarning;
use crate::node::{Action, Node};
use crate::value::{Record, Value};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::trace;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Walks a dotted path through nested maps.
///
/// Resolution stops with `None` as soon as a step lands on something that is
/// not a map, or a key is missing.
pub fn resolve_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.trim().split('.').map(str::trim);
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

/// Replaces every placeholder in `template`. Unresolved ones become `""`.
pub fn bind_string(template: &str, record: &Record) -> String {
    bind_string_collecting(template, record, &mut Vec::new())
}

fn bind_string_collecting(
    template: &str,
    record: &Record,
    warnings: &mut Vec<DataBindingWarning>,
) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let expr = caps[1].trim();
            match resolve_path(record, expr).filter(|v| !v.is_null()) {
                Some(value) => value.to_text(),
                None => {
                    trace!(expr, "unresolved placeholder");
                    warnings.push(DataBindingWarning {
                        expr: expr.to_string(),
                    });
                    String::new()
                }
            }
        })
        .into_owned()
}

fn bind_value(value: &Value, record: &Record, warnings: &mut Vec<DataBindingWarning>) -> Value {
    match value {
        Value::String(s) => Value::String(bind_string_collecting(s, record, warnings)),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| bind_value(item, record, warnings))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), bind_value(v, record, warnings)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn bind_action_collecting(
    action: &Action,
    record: &Record,
    warnings: &mut Vec<DataBindingWarning>,
) -> Action {
    Action {
        action_type: action.action_type.clone(),
        destination: action
            .destination
            .as_deref()
            .map(|d| bind_string_collecting(d, record, warnings)),
        params: action
            .params
            .iter()
            .map(|(k, v)| (k.clone(), bind_string_collecting(v, record, warnings)))
            .collect(),
    }
}

/// Binds a record into an action's destination and parameters.
pub fn bind_action(action: &Action, record: &Record) -> Action {
    bind_action_collecting(action, record, &mut Vec::new())
}

/// Binds a record into a template node and its children.
///
/// Nested data sources and item templates are left untouched; they belong
/// to a nested list and are bound by that list's own records.
pub fn bind_node(template: &Node, record: &Record) -> Node {
    bind_node_with_warnings(template, record).0
}

/// Like [`bind_node`], also returning every placeholder that did not resolve.
pub fn bind_node_with_warnings(template: &Node, record: &Record) -> (Node, Vec<DataBindingWarning>) {
    let mut warnings = Vec::new();
    let bound = bind_node_collecting(template, record, &mut warnings);
    (bound, warnings)
}

fn bind_node_collecting(
    template: &Node,
    record: &Record,
    warnings: &mut Vec<DataBindingWarning>,
) -> Node {
    Node {
        id: template
            .id
            .as_deref()
            .map(|id| bind_string_collecting(id, record, warnings)),
        properties: template
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), bind_value(v, record, warnings)))
            .collect(),
        children: template
            .children
            .iter()
            .map(|child| bind_node_collecting(child, record, warnings))
            .collect(),
        actions: template
            .actions
            .iter()
            .map(|(k, a)| (k.clone(), bind_action_collecting(a, record, warnings)))
            .collect(),
        node_type: template.node_type.clone(),
        modifier: template.modifier.clone(),
        data_source: template.data_source.clone(),
        item_template: template.item_template.clone(),
        loading_template: template.loading_template.clone(),
        empty_template: template.empty_template.clone(),
        error_template: template.error_template.clone(),
        arrangement: template.arrangement.clone(),
        columns: template.columns,
    }
}

/// The scope a list record is bound against: the record's own fields, plus
/// the whole record under `item`. Both `{{title}}` and `{{item.title}}` resolve.
pub fn item_scope(record: &Value) -> Record {
    let mut scope = record.as_map().cloned().unwrap_or_default();
    scope.insert("item".to_string(), record.clone());
    scope
}

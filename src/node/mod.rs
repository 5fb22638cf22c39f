//! The node model: one immutable description of a UI element and its subtree.
//!
//! Nodes are deserialized straight from the screen document. Field names
//! follow the document's camelCase wire format.

mod color;
mod kind;
mod props;

pub use color::Color;
pub use kind::{ChartKind, ComponentType};
pub use props::{
    ButtonProps, CardProps, ChartDataPoint, ChartSeries, ChartSpec, ColumnProps, ImageProps,
    SpacerProps, TextProps, TextStyle, TopAppBarProps,
};

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_template: Option<Box<ItemTemplate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_template: Option<LoadingTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_template: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_template: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrangement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

impl Node {
    /// Creates a bare node of the given type.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(&self) -> ComponentType {
        ComponentType::from_tag(&self.node_type)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        self.property(key).and_then(Value::as_f64)
    }

    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        self.property(key).and_then(Value::as_bool)
    }

    pub fn prop_list(&self, key: &str) -> Option<&[Value]> {
        self.property(key).and_then(Value::as_list)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.property(key).is_some()
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }
}

/// Declarative layout hints. Resolved into concrete constraints by
/// [`crate::modifier::resolve`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_horizontal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_vertical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_max_size: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_max_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(rename = "type", default = "default_gradient_type")]
    pub gradient_type: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

fn default_gradient_type() -> String {
    "linear".to_string()
}

/// An interaction binding handed to the host's action handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Where a lazy list gets its records from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl DataSource {
    pub fn is_static(&self) -> bool {
        self.source_type == "static"
    }

    pub fn is_api(&self) -> bool {
        self.source_type == "api"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(rename = "type", default = "default_pagination_type")]
    pub pagination_type: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_param: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            pagination_type: default_pagination_type(),
            page_size: default_page_size(),
            offset_param: None,
            limit_param: None,
            cursor_param: None,
            page_param: None,
        }
    }
}

fn default_pagination_type() -> String {
    "page".to_string()
}

fn default_page_size() -> u32 {
    20
}

/// A node subtree with placeholders, instantiated once per record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemTemplate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub layout: Node,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadingTemplate {
    #[serde(rename = "type", default)]
    pub template_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

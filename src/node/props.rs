//! Typed views over a node's open property map.
//!
//! Each view reads only the keys its component type understands. Missing or
//! mistyped properties fall back to defaults instead of failing.

use super::{ChartKind, Color, Node};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    Headline1,
    Headline2,
    Subtitle1,
    #[default]
    Body1,
    Body2,
}

impl TextStyle {
    pub fn from_name(name: &str) -> Self {
        match name {
            "headline1" => TextStyle::Headline1,
            "headline2" => TextStyle::Headline2,
            "subtitle1" => TextStyle::Subtitle1,
            "body2" => TextStyle::Body2,
            _ => TextStyle::Body1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextProps {
    pub text: String,
    pub style: TextStyle,
    pub color: Option<Color>,
}

impl TextProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            text: node.prop_str("text").unwrap_or_default().to_string(),
            style: node
                .prop_str("style")
                .map(TextStyle::from_name)
                .unwrap_or_default(),
            color: node.prop_str("color").and_then(Color::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    pub text: String,
    pub enabled: bool,
}

impl ButtonProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            text: node.prop_str("text").unwrap_or_default().to_string(),
            enabled: node.prop_bool("enabled").unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageProps {
    pub url: String,
    pub circular: bool,
    pub size: Option<f64>,
    pub centered: bool,
    pub content_description: Option<String>,
}

impl ImageProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            url: node.prop_str("url").unwrap_or_default().to_string(),
            circular: node.prop_str("shape") == Some("circle"),
            size: node.prop_f64("size"),
            centered: node.prop_str("alignment") == Some("center"),
            content_description: node.prop_str("contentDescription").map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpacerProps {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl SpacerProps {
    pub fn from_node(node: &Node) -> Self {
        let width = node.prop_f64("width");
        let height = node.prop_f64("height");
        Self {
            width,
            height: height.or(if width.is_none() { Some(8.0) } else { None }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardProps {
    pub elevation: f64,
    pub background_color: Option<Color>,
}

impl CardProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            elevation: node.prop_f64("elevation").unwrap_or(1.0),
            background_color: node.prop_str("backgroundColor").and_then(Color::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnProps {
    pub background_color: Option<Color>,
}

impl ColumnProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            background_color: node.prop_str("backgroundColor").and_then(Color::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopAppBarProps {
    pub title: String,
    pub center_title: bool,
    pub background_color: Option<Color>,
    pub title_color: Option<Color>,
}

impl TopAppBarProps {
    pub fn from_node(node: &Node) -> Self {
        Self {
            title: node.prop_str("title").unwrap_or_default().to_string(),
            center_title: node.prop_bool("centerTitle").unwrap_or(false),
            background_color: node.prop_str("backgroundColor").and_then(Color::parse),
            title_color: node.prop_str("titleColor").and_then(Color::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataPoint {
    pub label: String,
    pub value: f64,
    pub color: Option<Color>,
}

impl ChartDataPoint {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            label: value.get("label").map(Value::to_text).unwrap_or_default(),
            value: value.get("value").and_then(Value::as_f64)?,
            color: value.get("color").and_then(Value::as_str).and_then(Color::parse),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub color: Option<Color>,
    pub data: Vec<ChartDataPoint>,
}

impl ChartSeries {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: value.get("name").map(Value::to_text).unwrap_or_default(),
            color: value.get("color").and_then(Value::as_str).and_then(Color::parse),
            data: points(value.get("data")?.as_list()?),
        })
    }
}

/// Everything a backend needs to draw a chart. Drawing itself is the backend's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub show_legend: bool,
    pub show_grid: bool,
    pub show_labels: bool,
    pub show_values: bool,
    pub height: Option<f64>,
    pub colors: Vec<Color>,
    pub data: Vec<ChartDataPoint>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn from_node(kind: ChartKind, node: &Node) -> Self {
        let flag = |key: &str, default: bool| node.prop_bool(key).unwrap_or(default);
        Self {
            kind,
            title: node.prop_str("title").map(str::to_string),
            subtitle: node.prop_str("subtitle").map(str::to_string),
            show_legend: flag("showLegend", true),
            show_grid: flag("showGrid", true),
            show_labels: flag("showLabels", true),
            show_values: flag("showValues", false),
            height: node.prop_f64("height"),
            colors: node
                .prop_list("colors")
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .filter_map(Color::parse)
                .collect(),
            data: node.prop_list("data").map(points).unwrap_or_default(),
            series: node
                .prop_list("series")
                .unwrap_or_default()
                .iter()
                .filter_map(ChartSeries::from_value)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.series.iter().all(|s| s.data.is_empty())
    }
}

fn points(values: &[Value]) -> Vec<ChartDataPoint> {
    values.iter().filter_map(ChartDataPoint::from_value).collect()
}

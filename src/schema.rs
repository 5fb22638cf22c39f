//! The top-level screen document and its parser.

use crate::error::ParseError;
use crate::node::Node;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A parsed screen document. Parsing is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub version: String,
    pub screen: ScreenLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub id: String,
    pub title: String,
    pub layout: Node,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataConfig {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub api_endpoints: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub static_data: BTreeMap<String, Value>,
}

// The wire shape, where every field is optional so missing required
// fields are reported by name instead of as a generic serde error.
#[derive(Deserialize)]
struct RawScreen {
    version: Option<Value>,
    screen: Option<RawScreenLayout>,
    theme: Option<Theme>,
    data: Option<DataConfig>,
}

#[derive(Deserialize)]
struct RawScreenLayout {
    id: Option<String>,
    title: Option<String>,
    layout: Option<Node>,
}

/// Parses a screen document.
///
/// Returns `ParseError::Json` for malformed input and `ParseError::Schema`
/// when `screen` or `screen.layout` is absent.
pub fn parse_screen(json: &str) -> Result<Screen, ParseError> {
    let raw: RawScreen =
        serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;

    let screen = raw.screen.ok_or_else(|| ParseError::Schema {
        field: "screen".to_string(),
    })?;
    let layout = screen.layout.ok_or_else(|| ParseError::Schema {
        field: "screen.layout".to_string(),
    })?;

    let parsed = Screen {
        version: raw.version.map(|v| v.to_text()).unwrap_or_default(),
        screen: ScreenLayout {
            id: screen.id.unwrap_or_default(),
            title: screen.title.unwrap_or_default(),
            layout,
        },
        theme: raw.theme,
        data: raw.data,
    };
    debug!(
        screen_id = %parsed.screen.id,
        root = %parsed.screen.layout.node_type,
        "parsed screen document"
    );
    Ok(parsed)
}

impl Screen {
    /// Serializes back into the document format accepted by [`parse_screen`].
    pub fn to_json(&self) -> Result<String, ParseError> {
        serde_json::to_string(self).map_err(|e| ParseError::Json(e.to_string()))
    }
}

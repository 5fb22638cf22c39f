//! Common test utilities: fixture documents, scripted collaborators and spies.
use async_trait::async_trait;
use hyouji::error::{NetworkError, PreparationError};
use hyouji::factory::{ComponentBuilder, ComponentFactory, PreparationResult, RenderStrategy};
use hyouji::list::{DataFetcher, PageRequest};
use hyouji::node::{Action, Node, TextProps};
use hyouji::render::ActionHandler;
use hyouji::value::{Record, Value};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wraps a layout node in a complete screen document.
#[allow(dead_code)]
pub fn screen_json(id: &str, layout: serde_json::Value) -> String {
    json!({
        "version": "1.0",
        "screen": { "id": id, "title": "Test Screen", "layout": layout }
    })
    .to_string()
}

/// `{screen:{id:"s1",title:"T",layout:{type:"text",properties:{text:"Hi"}}}}`
#[allow(dead_code)]
pub fn hello_screen() -> String {
    json!({
        "screen": {
            "id": "s1",
            "title": "T",
            "layout": { "type": "text", "properties": { "text": "Hi" } }
        }
    })
    .to_string()
}

/// A product-card template bound against `{{item.*}}` fields.
#[allow(dead_code)]
pub fn product_template() -> serde_json::Value {
    json!({
        "layout": {
            "type": "card",
            "children": [
                { "type": "text", "properties": { "text": "{{item.title}}" } },
                { "type": "text", "properties": { "text": "{{price}}" } }
            ]
        },
        "actions": {
            "onClick": { "type": "navigate", "destination": "detail", "params": { "id": "{{item.id}}" } }
        }
    })
}

/// Builds a record from `(key, value)` pairs.
#[allow(dead_code)]
pub fn record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// `n` product records with ids starting at `first_id`.
#[allow(dead_code)]
pub fn products(first_id: i64, n: usize) -> Vec<Value> {
    (0..n as i64)
        .map(|i| {
            let id = first_id + i;
            Value::Map(record(&[
                ("id", Value::from(id)),
                ("title", Value::from(format!("Product {}", id))),
                ("price", Value::from(9.5)),
            ]))
        })
        .collect()
}

#[allow(dead_code)]
pub fn node_from(json: serde_json::Value) -> Node {
    serde_json::from_value(json).expect("fixture node is valid")
}

/// A fetcher that replays scripted pages and logs every page requested.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: Mutex<BTreeMap<u32, Result<Vec<Value>, NetworkError>>>,
    calls: Mutex<Vec<u32>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, records: Vec<Value>) -> Self {
        self.pages.lock().unwrap().insert(page, Ok(records));
        self
    }

    pub fn with_failure(self, page: u32) -> Self {
        self.pages.lock().unwrap().insert(
            page,
            Err(NetworkError::Request {
                url: "https://api.test/items".to_string(),
                page,
                message: "connection reset".to_string(),
            }),
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the script for `page`, e.g. to let a retry succeed.
    pub fn set_page(&self, page: u32, records: Vec<Value>) {
        self.pages.lock().unwrap().insert(page, Ok(records));
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataFetcher for ScriptedFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, NetworkError> {
        self.calls.lock().unwrap().push(request.page);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.pages.lock().unwrap().get(&request.page).cloned();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A text builder that counts how often it is asked to build.
#[allow(dead_code)]
pub struct CountingBuilder {
    pub tag: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl ComponentBuilder for CountingBuilder {
    fn component_type(&self) -> &str {
        self.tag
    }

    fn build(&self, node: &Node) -> Result<RenderStrategy, PreparationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RenderStrategy::Text(TextProps::from_node(node)))
    }
}

/// A builder that always fails, to exercise the error fallback.
#[allow(dead_code)]
pub struct FailingBuilder;

impl ComponentBuilder for FailingBuilder {
    fn component_type(&self) -> &str {
        "exploding"
    }

    fn build(&self, node: &Node) -> Result<RenderStrategy, PreparationError> {
        Err(PreparationError::Failed {
            node_type: node.node_type.clone(),
            message: "boom".to_string(),
        })
    }
}

/// Delays `prepare` for nodes of type `slow`, then defers to `inner`.
#[allow(dead_code)]
pub struct SlowFactory<F> {
    pub inner: F,
    pub delay: Duration,
}

#[async_trait]
impl<F: ComponentFactory> ComponentFactory for SlowFactory<F> {
    async fn prepare(&self, node: &Node) -> PreparationResult {
        if node.node_type == "slow" {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.prepare(node).await
    }

    fn create_component(&self, node: &Node) -> RenderStrategy {
        self.inner.create_component(node)
    }

    fn clear_cache(&self) {
        self.inner.clear_cache();
    }

    fn cache_size(&self) -> usize {
        self.inner.cache_size()
    }
}

/// Records every action it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingActionHandler {
    pub actions: Mutex<Vec<Action>>,
}

impl ActionHandler for RecordingActionHandler {
    fn handle_action(&self, action: &Action) {
        self.actions.lock().unwrap().push(action.clone());
    }
}

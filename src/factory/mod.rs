//! Compilation of nodes into render strategies.
//!
//! Preparation has two phases. `prepare` is asynchronous, validates and
//! analyzes a node, and is memoized per node shape. `create_component` is the
//! synchronous type dispatch underneath it, also used directly for list items
//! that are bound fresh on every render.

mod default;
pub mod dispatch;

pub use default::{DefaultComponentFactory, FactoryBuilder};
pub use dispatch::ComponentBuilder;

use crate::analysis::RenderMetadata;
use crate::binder::{bind_action, bind_node, item_scope};
use crate::modifier::{self, ResolvedModifier};
use crate::node::{
    Action, ButtonProps, CardProps, ChartSpec, ColumnProps, DataSource, ImageProps, ItemTemplate,
    LoadingTemplate, Node, SpacerProps, TextProps, TopAppBarProps,
};
use crate::validator::{ValidationResult, validate_node};
use crate::value::Value;
use async_trait::async_trait;
use futures::future::{BoxFuture, join_all};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a compiled node is drawn. Chosen once per node at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderStrategy {
    Column(ColumnProps),
    Row,
    ScrollableColumn,
    Card(CardProps),
    Text(TextProps),
    Button(ButtonProps),
    Image(ImageProps),
    Spacer(SpacerProps),
    TopAppBar(TopAppBarProps),
    ProgressIndicator,
    Chart(ChartSpec),
    LazyList(Arc<LazyListPlan>),
    /// A type with no registered builder.
    Unknown(String),
    /// A labeled stand-in for a subtree that failed validation or preparation.
    Fallback(String),
}

impl RenderStrategy {
    /// Whether the node's `children` are compiled and drawn.
    pub fn has_children(&self) -> bool {
        matches!(
            self,
            RenderStrategy::Column(_)
                | RenderStrategy::Row
                | RenderStrategy::ScrollableColumn
                | RenderStrategy::Card(_)
        )
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderStrategy::Fallback(_) | RenderStrategy::Unknown(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAxis {
    Vertical,
    Horizontal,
    Grid { columns: u32 },
}

/// Everything a list controller needs, fixed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyListPlan {
    pub axis: ListAxis,
    pub source: DataSource,
    pub template: Option<CompiledItemTemplate>,
    pub loading: Option<LoadingTemplate>,
    pub empty_template: Option<Node>,
    pub error_template: Option<Node>,
}

impl LazyListPlan {
    pub fn from_node(node: &Node, axis: ListAxis) -> Option<Self> {
        Some(Self {
            axis,
            source: node.data_source.clone()?,
            template: None,
            loading: node.loading_template.clone(),
            empty_template: node.empty_template.as_deref().cloned(),
            error_template: node.error_template.as_deref().cloned(),
        })
    }

    /// Attaches an item template whose unbound form compiled to `shape`.
    pub fn with_template(&self, template: &ItemTemplate, shape: PreparedComponent) -> Self {
        Self {
            template: Some(CompiledItemTemplate {
                layout: template.layout.clone(),
                actions: template.actions.clone(),
                shape: Arc::new(shape),
            }),
            ..self.clone()
        }
    }
}

/// An item template compiled once per list and reused for every record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledItemTemplate {
    pub layout: Node,
    pub actions: BTreeMap<String, Action>,
    /// The unbound template run through `prepare`.
    pub shape: Arc<PreparedComponent>,
}

/// One record bound into a list's item template.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundItem {
    pub component: PreparedComponent,
    pub on_click: Option<Action>,
}

impl CompiledItemTemplate {
    /// Binds `record` into the template. Bound copies are never cached.
    pub fn instantiate(&self, factory: &dyn ComponentFactory, record: &Value) -> BoundItem {
        let scope = item_scope(record);
        let on_click = self.actions.get("onClick").map(|a| bind_action(a, &scope));
        // A template that failed to compile fails the same way for every record.
        if self.shape.strategy.is_fallback() {
            return BoundItem {
                component: (*self.shape).clone(),
                on_click,
            };
        }
        BoundItem {
            component: build_tree(factory, &bind_node(&self.layout, &scope)),
            on_click,
        }
    }
}

/// The compiled form of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedComponent {
    pub component_type: String,
    pub id: Option<String>,
    pub properties: BTreeMap<String, Value>,
    pub modifier: ResolvedModifier,
    pub actions: BTreeMap<String, Action>,
    pub children: Vec<PreparedComponent>,
    pub strategy: RenderStrategy,
}

impl PreparedComponent {
    pub fn assemble(node: &Node, strategy: RenderStrategy, children: Vec<PreparedComponent>) -> Self {
        Self {
            component_type: node.node_type.clone(),
            id: node.id.clone(),
            properties: node.properties.clone(),
            modifier: modifier::resolve(node.modifier.as_ref()),
            actions: node.actions.clone(),
            children,
            strategy,
        }
    }

    /// Number of components in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(PreparedComponent::size).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreparationResult {
    Success {
        strategy: RenderStrategy,
        metadata: RenderMetadata,
    },
    Error {
        message: String,
        fallback: Option<RenderStrategy>,
    },
}

/// The type-dispatch table that turns nodes into render strategies.
#[async_trait]
pub trait ComponentFactory: Send + Sync {
    /// Validates, analyzes and compiles one node. Never fails: problems come
    /// back as `PreparationResult::Error` carrying a fallback.
    async fn prepare(&self, node: &Node) -> PreparationResult;

    /// Synchronous dispatch on the node's type tag.
    fn create_component(&self, node: &Node) -> RenderStrategy;

    fn clear_cache(&self);

    fn cache_size(&self) -> usize;
}

/// Prepares a node and its children, siblings concurrently and in order.
///
/// A failing node becomes its fallback and its subtree is dropped; siblings
/// are unaffected.
pub fn prepare_tree<'a>(
    factory: &'a dyn ComponentFactory,
    node: &'a Node,
) -> BoxFuture<'a, PreparedComponent> {
    Box::pin(async move {
        match factory.prepare(node).await {
            PreparationResult::Success { strategy, .. } => {
                let children = if strategy.has_children() {
                    join_all(node.children.iter().map(|child| prepare_tree(factory, child))).await
                } else {
                    Vec::new()
                };
                PreparedComponent::assemble(node, strategy, children)
            }
            PreparationResult::Error { message, fallback } => {
                warn!(node_type = %node.node_type, %message, "rendering fallback");
                let strategy = fallback
                    .unwrap_or_else(|| RenderStrategy::Fallback(format!("Error: {}", node.node_type)));
                PreparedComponent::assemble(node, strategy, Vec::new())
            }
        }
    })
}

/// Synchronous counterpart of [`prepare_tree`] for freshly bound nodes.
/// Only node-local validation runs; nothing is cached.
pub fn build_tree(factory: &dyn ComponentFactory, node: &Node) -> PreparedComponent {
    if let ValidationResult::Invalid(errors) = validate_node(node) {
        debug!(node_type = %node.node_type, ?errors, "bound node is invalid");
        return PreparedComponent::assemble(
            node,
            RenderStrategy::Fallback(format!("Invalid component: {}", node.node_type)),
            Vec::new(),
        );
    }
    let strategy = factory.create_component(node);
    let children = if strategy.has_children() {
        node.children
            .iter()
            .map(|child| build_tree(factory, child))
            .collect()
    } else {
        Vec::new()
    };
    PreparedComponent::assemble(node, strategy, children)
}

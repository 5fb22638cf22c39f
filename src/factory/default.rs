use super::dispatch::{ComponentBuilder, create_builder_by_name, register_default_builders};
use super::{
    ComponentFactory, LazyListPlan, PreparationResult, RenderStrategy, build_tree, prepare_tree,
};
use crate::analysis::{ComponentComplexity, analyze_keyed};
use crate::cache::{CacheStore, CachePolicy, build_store};
use crate::config::EngineConfig;
use crate::error::PreparationError;
use crate::fingerprint::node_key;
use crate::node::Node;
use crate::validator::{ValidationResult, validate_node};
use ahash::AHashMap;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The built-in factory: a builder registry plus a memoizing prepare cache.
pub struct DefaultComponentFactory {
    registry: AHashMap<String, Box<dyn ComponentBuilder>>,
    cache: Arc<dyn CacheStore<String, PreparationResult>>,
    medium_child_threshold: usize,
}

pub struct FactoryBuilder {
    registry: AHashMap<String, Box<dyn ComponentBuilder>>,
    cache_policy: CachePolicy,
    cache_capacity: usize,
    medium_child_threshold: usize,
}

impl Default for FactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryBuilder {
    pub fn new() -> Self {
        let mut registry: AHashMap<String, Box<dyn ComponentBuilder>> = AHashMap::new();
        register_default_builders(&mut registry);
        let defaults = EngineConfig::default();
        Self {
            registry,
            cache_policy: defaults.cache_policy,
            cache_capacity: defaults.prepared_cache_capacity,
            medium_child_threshold: defaults.medium_child_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new()
            .with_cache(config.cache_policy, config.prepared_cache_capacity)
            .with_medium_child_threshold(config.medium_child_threshold)
    }

    /// Renders `user_type_name` nodes with the built-in builder for `builtin_type_name`.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Some(builder) = create_builder_by_name(builtin_type_name) {
            self.registry.insert(user_type_name.to_string(), builder);
        }
        self
    }

    pub fn with_custom_builder(mut self, builder: Box<dyn ComponentBuilder>) -> Self {
        self.registry
            .insert(builder.component_type().to_string(), builder);
        self
    }

    pub fn with_cache(mut self, policy: CachePolicy, capacity: usize) -> Self {
        self.cache_policy = policy;
        self.cache_capacity = capacity;
        self
    }

    pub fn with_medium_child_threshold(mut self, threshold: usize) -> Self {
        self.medium_child_threshold = threshold;
        self
    }

    pub fn build(self) -> DefaultComponentFactory {
        DefaultComponentFactory {
            registry: self.registry,
            cache: build_store(self.cache_policy, self.cache_capacity),
            medium_child_threshold: self.medium_child_threshold,
        }
    }
}

impl DefaultComponentFactory {
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    fn build_strategy(&self, node: &Node) -> Result<RenderStrategy, PreparationError> {
        if node.node_type.trim().is_empty() {
            return Err(PreparationError::MissingType);
        }
        match self.registry.get(&node.node_type) {
            Some(builder) => builder.build(node),
            None => {
                debug!(node_type = %node.node_type, "no builder registered");
                Ok(RenderStrategy::Unknown(node.node_type.clone()))
            }
        }
    }

    /// Runs the item template through `prepare` once, ahead of any record.
    async fn precompile_template(&self, node: &Node, plan: &LazyListPlan) -> LazyListPlan {
        let Some(template) = &node.item_template else {
            return plan.clone();
        };
        let shape = prepare_tree(self, &template.layout).await;
        debug!(
            list = %node.node_type,
            template = %template.layout.node_type,
            components = shape.size(),
            "compiled item template"
        );
        plan.with_template(template, shape)
    }
}

#[async_trait]
impl ComponentFactory for DefaultComponentFactory {
    async fn prepare(&self, node: &Node) -> PreparationResult {
        // Only successful preparations are stored, so a hit needs no validation.
        let key = node_key(node);
        if let Some(cached) = self.cache.get(&key) {
            trace!(%key, "prepare cache hit");
            return cached;
        }

        match validate_node(node) {
            ValidationResult::Invalid(errors) => {
                let error = PreparationError::Validation {
                    node_type: node.node_type.clone(),
                    errors,
                };
                warn!("{}", error);
                return PreparationResult::Error {
                    message: error.to_string(),
                    fallback: Some(RenderStrategy::Fallback(format!(
                        "Invalid component: {}",
                        node.node_type
                    ))),
                };
            }
            ValidationResult::Warning(warnings) => {
                debug!(node_type = %node.node_type, ?warnings, "rendering with warnings");
            }
            ValidationResult::Valid => {}
        }

        let metadata = analyze_keyed(node, self.medium_child_threshold, key);

        let strategy = match self.build_strategy(node) {
            Ok(strategy) => strategy,
            Err(e) => {
                return PreparationResult::Error {
                    message: e.to_string(),
                    fallback: Some(RenderStrategy::Fallback(format!(
                        "Error: {}",
                        node.node_type
                    ))),
                };
            }
        };

        let strategy = match (metadata.complexity, strategy) {
            (ComponentComplexity::High, RenderStrategy::LazyList(plan)) => {
                RenderStrategy::LazyList(Arc::new(self.precompile_template(node, &plan).await))
            }
            (ComponentComplexity::Medium, strategy) => {
                trace!(node_type = %node.node_type, "medium tier, direct dispatch");
                strategy
            }
            (_, strategy) => strategy,
        };

        let key = metadata.cache_key.clone();
        self.cache
            .insert_if_absent(key, PreparationResult::Success { strategy, metadata })
    }

    fn create_component(&self, node: &Node) -> RenderStrategy {
        match self.build_strategy(node) {
            // Lists built outside `prepare`, e.g. inside another list's items,
            // compile their template here.
            Ok(RenderStrategy::LazyList(plan)) => match &node.item_template {
                Some(template) if plan.template.is_none() => {
                    let shape = build_tree(self, &template.layout);
                    RenderStrategy::LazyList(Arc::new(plan.with_template(template, shape)))
                }
                _ => RenderStrategy::LazyList(plan),
            },
            Ok(strategy) => strategy,
            Err(e) => {
                warn!("{}", e);
                RenderStrategy::Fallback(format!("Error: {}", node.node_type))
            }
        }
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }

    fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

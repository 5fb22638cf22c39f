use super::{Analytics, AnalyticsEvent};
use crate::factory::{ComponentFactory, PreparationResult, RenderStrategy};
use crate::node::Node;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Wraps a factory and reports how long each `prepare` took.
pub struct AnalyticsComponentFactory<F> {
    inner: F,
    analytics: Arc<dyn Analytics>,
}

impl<F: ComponentFactory> AnalyticsComponentFactory<F> {
    pub fn new(inner: F, analytics: Arc<dyn Analytics>) -> Self {
        Self { inner, analytics }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: ComponentFactory> ComponentFactory for AnalyticsComponentFactory<F> {
    async fn prepare(&self, node: &Node) -> PreparationResult {
        let started = Instant::now();
        let result = self.inner.prepare(node).await;
        self.analytics.track(AnalyticsEvent::ComponentPreparation {
            component_id: node.id.clone(),
            component_type: node.node_type.clone(),
            duration_us: started.elapsed().as_micros() as u64,
            children_count: node.children.len(),
            properties_count: node.properties.len(),
            success: matches!(result, PreparationResult::Success { .. }),
        });
        result
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

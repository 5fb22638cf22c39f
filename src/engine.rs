//! The explicit engine context shared by every renderer of an application.

use crate::analytics::{Analytics, AnalyticsComponentFactory, AnalyticsEvent};
use crate::cache::{CacheStore, build_store};
use crate::config::EngineConfig;
use crate::factory::{ComponentBuilder, ComponentFactory, FactoryBuilder};
use crate::list::{DataFetcher, MockFetcher};
use crate::render::{ActionHandler, ImageLoader, LoggingActionHandler, PassthroughImageLoader};
use crate::renderer::{CompiledScreen, Renderer};
use std::sync::Arc;
use tokio::sync::Semaphore;

struct EngineParts {
    config: EngineConfig,
    factory: Arc<dyn ComponentFactory>,
    actions: Arc<dyn ActionHandler>,
    images: Arc<dyn ImageLoader>,
    fetcher: Arc<dyn DataFetcher>,
    analytics: Option<Arc<dyn Analytics>>,
    screens: Arc<dyn CacheStore<String, Arc<CompiledScreen>>>,
    parse_permits: Semaphore,
}

/// Built once at startup and cloned into each renderer. Cloning is cheap.
#[derive(Clone)]
pub struct Engine {
    parts: Arc<EngineParts>,
}

pub struct EngineBuilder {
    config: EngineConfig,
    factory: Option<Arc<dyn ComponentFactory>>,
    type_mappings: Vec<(String, String)>,
    custom_builders: Vec<Box<dyn ComponentBuilder>>,
    actions: Arc<dyn ActionHandler>,
    images: Arc<dyn ImageLoader>,
    fetcher: Arc<dyn DataFetcher>,
    analytics: Option<Arc<dyn Analytics>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            factory: None,
            type_mappings: Vec::new(),
            custom_builders: Vec::new(),
            actions: Arc::new(LoggingActionHandler),
            images: Arc::new(PassthroughImageLoader),
            fetcher: Arc::new(MockFetcher::new()),
            analytics: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the built-in factory. Type mappings and custom builders are
    /// then ignored, and the factory is used as given.
    pub fn with_factory(mut self, factory: Arc<dyn ComponentFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        self.type_mappings
            .push((user_type_name.to_string(), builtin_type_name.to_string()));
        self
    }

    pub fn with_custom_builder(mut self, builder: Box<dyn ComponentBuilder>) -> Self {
        self.custom_builders.push(builder);
        self
    }

    pub fn with_action_handler(mut self, actions: Arc<dyn ActionHandler>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_image_loader(mut self, images: Arc<dyn ImageLoader>) -> Self {
        self.images = images;
        self
    }

    pub fn with_data_fetcher(mut self, fetcher: Arc<dyn DataFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Installs an analytics sink. The built-in factory is wrapped so every
    /// preparation is timed.
    pub fn with_analytics(mut self, analytics: Arc<dyn Analytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn build(self) -> Engine {
        let factory: Arc<dyn ComponentFactory> = match self.factory {
            Some(factory) => factory,
            None => {
                let mut builder = FactoryBuilder::from_config(&self.config);
                for (user, builtin) in &self.type_mappings {
                    builder = builder.with_type_mapping(user, builtin);
                }
                for custom in self.custom_builders {
                    builder = builder.with_custom_builder(custom);
                }
                let factory = builder.build();
                match &self.analytics {
                    Some(analytics) => {
                        Arc::new(AnalyticsComponentFactory::new(factory, analytics.clone()))
                    }
                    None => Arc::new(factory),
                }
            }
        };
        let screens = build_store(self.config.cache_policy, self.config.screen_cache_capacity);
        let parse_permits = Semaphore::new(self.config.parse_parallelism);
        Engine {
            parts: Arc::new(EngineParts {
                config: self.config,
                factory,
                actions: self.actions,
                images: self.images,
                fetcher: self.fetcher,
                analytics: self.analytics,
                screens,
                parse_permits,
            }),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Creates a renderer bound to this engine.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.clone())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.parts.config
    }

    pub fn factory(&self) -> &dyn ComponentFactory {
        self.parts.factory.as_ref()
    }

    pub fn action_handler(&self) -> &Arc<dyn ActionHandler> {
        &self.parts.actions
    }

    pub fn image_loader(&self) -> &dyn ImageLoader {
        self.parts.images.as_ref()
    }

    pub fn data_fetcher(&self) -> &Arc<dyn DataFetcher> {
        &self.parts.fetcher
    }

    pub(crate) fn screens(&self) -> &dyn CacheStore<String, Arc<CompiledScreen>> {
        self.parts.screens.as_ref()
    }

    pub(crate) fn parse_permits(&self) -> &Semaphore {
        &self.parts.parse_permits
    }

    pub(crate) fn track(&self, event: AnalyticsEvent) {
        if let Some(analytics) = &self.parts.analytics {
            analytics.track(event);
        }
    }

    /// Drops every prepared component and compiled screen.
    pub fn clear_cache(&self) {
        self.parts.factory.clear_cache();
        self.parts.screens.clear();
    }

    /// Prepared components plus compiled screens currently cached.
    pub fn cache_size(&self) -> usize {
        self.parts.factory.cache_size() + self.parts.screens.len()
    }
}

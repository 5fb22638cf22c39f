//! The per-screen state machine: `Loading -> Success | Error`, with retry.
//!
//! A new document resets the renderer to `Loading`. The compiled tree is
//! looked up by document fingerprint first; on a miss the full pipeline
//! runs on the worker pool. Only the most recent request may publish its
//! result: anything finishing after a newer `load` or `retry` is dropped.

mod pipeline;

use crate::analysis::TreeMetadata;
use crate::analytics::AnalyticsEvent;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::factory::{PreparedComponent, RenderStrategy};
use crate::fingerprint::document_fingerprint;
use crate::list::{ListController, ListRegistry, spawn_detached};
use crate::node::{Action, ButtonProps, ColumnProps, TextStyle};
use crate::render::{
    ActionHandler, Attributes, ClickTarget, Painter, Primitive, RETRY_LIST_ACTION, RenderBackend,
    list_key, text,
};
use crate::schema::Theme;
use crate::validator::ValidationResult;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, error, info, warn};

/// Action type of the retry button on the screen-level error view.
pub const RETRY_SCREEN_ACTION: &str = "retry_screen";

/// A screen compiled and ready to draw. Shared through the screen cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledScreen {
    pub screen_id: String,
    pub title: String,
    pub version: String,
    pub theme: Option<Theme>,
    pub root: PreparedComponent,
    pub metadata: TreeMetadata,
    pub validation: ValidationResult,
    pub fingerprint: String,
    pub compile_time_ms: u64,
}

#[derive(Debug, Clone)]
pub enum RenderState {
    Loading,
    Success(Arc<CompiledScreen>),
    Error { message: String, cause: RenderError },
}

impl RenderState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RenderState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RenderState::Error { .. })
    }

    fn from_error(cause: RenderError) -> Self {
        RenderState::Error {
            message: cause.to_string(),
            cause,
        }
    }
}

struct Slot {
    state: RenderState,
    source: Option<Arc<str>>,
    fingerprint: String,
    generation: u64,
}

struct RendererCore {
    engine: Engine,
    slot: Mutex<Slot>,
    lists: ListRegistry,
}

/// Renders one screen at a time.
///
/// Cloning a renderer yields another handle to the same state.
#[derive(Clone)]
pub struct Renderer {
    core: Arc<RendererCore>,
}

impl Renderer {
    pub fn new(engine: Engine) -> Self {
        Self {
            core: Arc::new(RendererCore {
                engine,
                slot: Mutex::new(Slot {
                    state: RenderState::Loading,
                    source: None,
                    fingerprint: String::new(),
                    generation: 0,
                }),
                lists: ListRegistry::default(),
            }),
        }
    }

    /// Loads a screen document and drives it to `Success` or `Error`.
    ///
    /// Returns the renderer's state once this request settles. If a newer
    /// request started meanwhile, that is the newer request's state.
    pub async fn load(&self, json: &str) -> RenderState {
        let source: Arc<str> = Arc::from(json);
        let fingerprint = document_fingerprint(json);
        let generation = self.core.begin(Some(source.clone()), fingerprint.clone());
        debug!(%fingerprint, generation, "loading screen");
        self.core.run(generation, source, fingerprint, true).await
    }

    /// Compiles the current document again, bypassing the screen cache.
    pub async fn retry(&self) -> RenderState {
        self.core.retry().await
    }

    pub fn state(&self) -> RenderState {
        self.core.slot().state.clone()
    }

    /// Draws the current state. Safe to call on every redraw.
    pub fn render(&self, backend: &mut dyn RenderBackend) {
        let router: Arc<dyn ActionHandler> = Arc::new(ActionRouter {
            core: Arc::downgrade(&self.core),
        });
        match self.state() {
            RenderState::Loading => backend.leaf(Primitive::ProgressIndicator, Attributes::default()),
            RenderState::Error { message, .. } => {
                backend.enter(Primitive::Column(ColumnProps::default()), Attributes::default());
                backend.leaf(
                    Primitive::Text(text("Failed to render screen", TextStyle::Headline2)),
                    Attributes::default(),
                );
                backend.leaf(Primitive::Text(text(&message, TextStyle::Body1)), Attributes::default());
                backend.leaf(
                    Primitive::Button(ButtonProps {
                        text: "Retry".to_string(),
                        enabled: true,
                    }),
                    Attributes {
                        on_click: Some(ClickTarget::new(Action::new(RETRY_SCREEN_ACTION), router)),
                        ..Default::default()
                    },
                );
                backend.exit();
            }
            RenderState::Success(compiled) => {
                let engine = &self.core.engine;
                let painter = Painter {
                    factory: engine.factory(),
                    actions: router,
                    images: engine.image_loader(),
                    lists: &self.core.lists,
                    fetcher: engine.data_fetcher(),
                    config: engine.config(),
                };
                if let Some(theme) = &compiled.theme {
                    backend.enter(Primitive::Screen(theme.clone()), Attributes::default());
                    painter.paint(&compiled.root, "0", backend);
                    backend.exit();
                } else {
                    painter.paint(&compiled.root, "0", backend);
                }
            }
        }
    }

    /// Routes an interaction: list and screen retries are handled here,
    /// everything else goes to the host's action handler.
    pub fn handle_action(&self, action: &Action) {
        self.core.dispatch(action);
    }

    pub fn list(&self, key: &str) -> Option<Arc<ListController>> {
        self.core.lists.get(key)
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.core.lists.keys()
    }

    pub fn clear_cache(&self) {
        self.core.engine.clear_cache();
    }

    pub fn cache_size(&self) -> usize {
        self.core.engine.cache_size()
    }
}

impl RendererCore {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resets to `Loading` and claims a new generation.
    fn begin(&self, source: Option<Arc<str>>, fingerprint: String) -> u64 {
        self.lists.clear();
        let mut slot = self.slot();
        slot.generation += 1;
        slot.state = RenderState::Loading;
        if let Some(source) = source {
            slot.source = Some(source);
            slot.fingerprint = fingerprint;
        }
        slot.generation
    }

    async fn retry(self: &Arc<Self>) -> RenderState {
        let (source, fingerprint) = {
            let slot = self.slot();
            (slot.source.clone(), slot.fingerprint.clone())
        };
        let Some(source) = source else {
            warn!("retry requested before any screen was loaded");
            let generation = self.slot().generation;
            return self.commit(generation, RenderState::from_error(RenderError::NoDocument));
        };
        let generation = self.begin(None, String::new());
        info!(%fingerprint, generation, "retrying screen");
        self.run(generation, source, fingerprint, false).await
    }

    async fn run(
        self: &Arc<Self>,
        generation: u64,
        source: Arc<str>,
        fingerprint: String,
        use_cache: bool,
    ) -> RenderState {
        let engine = &self.engine;
        if use_cache {
            if let Some(hit) = engine.screens().get(&fingerprint) {
                debug!(%fingerprint, "screen cache hit");
                engine.track(screen_render_event(&hit, true));
                return self.commit(generation, RenderState::Success(hit));
            }
        }

        let worker_engine = engine.clone();
        let worker_fingerprint = fingerprint.clone();
        let outcome = tokio::spawn(async move {
            pipeline::compile_document(&worker_engine, source, worker_fingerprint).await
        })
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))
        .and_then(|result| result);

        let state = match outcome {
            Ok(compiled) => {
                let compiled = engine
                    .screens()
                    .insert_if_absent(fingerprint, Arc::new(compiled));
                engine.track(screen_render_event(&compiled, false));
                RenderState::Success(compiled)
            }
            Err(cause) => {
                error!("Failed to render screen: {}", cause);
                engine.track(AnalyticsEvent::ScreenError {
                    screen_id: None,
                    error_type: error_type(&cause).to_string(),
                    message: cause.to_string(),
                });
                RenderState::from_error(cause)
            }
        };
        self.commit(generation, state)
    }

    /// Publishes `state` unless a newer generation has started.
    fn commit(self: &Arc<Self>, generation: u64, state: RenderState) -> RenderState {
        {
            let mut slot = self.slot();
            if slot.generation != generation {
                debug!(
                    stale = generation,
                    current = slot.generation,
                    "discarding stale render result"
                );
                return slot.state.clone();
            }
            slot.state = state.clone();
        }
        if let RenderState::Success(compiled) = &state {
            self.mount_lists(&compiled.root, "0");
        }
        state
    }

    fn mount_lists(&self, component: &PreparedComponent, path: &str) {
        if let RenderStrategy::LazyList(plan) = &component.strategy {
            self.lists.get_or_mount(
                &list_key(component, path),
                plan,
                self.engine.data_fetcher(),
                self.engine.config(),
            );
        }
        for (i, child) in component.children.iter().enumerate() {
            self.mount_lists(child, &format!("{}.{}", path, i));
        }
    }

    fn dispatch(self: &Arc<Self>, action: &Action) {
        self.engine.track(AnalyticsEvent::ComponentAction {
            action_type: action.action_type.clone(),
            destination: action.destination.clone(),
        });
        match action.action_type.as_str() {
            RETRY_LIST_ACTION => {
                let Some(controller) = action.params.get("list").and_then(|key| self.lists.get(key))
                else {
                    warn!(params = ?action.params, "retry for unknown list");
                    return;
                };
                spawn_detached(async move {
                    controller.retry().await;
                });
            }
            RETRY_SCREEN_ACTION => {
                let core = self.clone();
                spawn_detached(async move {
                    core.retry().await;
                });
            }
            _ => self.engine.action_handler().handle_action(action),
        }
    }
}

/// Forwards clicks from drawn elements back into their renderer.
struct ActionRouter {
    core: Weak<RendererCore>,
}

impl ActionHandler for ActionRouter {
    fn handle_action(&self, action: &Action) {
        match self.core.upgrade() {
            Some(core) => core.dispatch(action),
            None => debug!(action = %action.action_type, "renderer dropped; ignoring action"),
        }
    }
}

fn screen_render_event(compiled: &CompiledScreen, cache_hit: bool) -> AnalyticsEvent {
    AnalyticsEvent::ScreenRender {
        screen_id: compiled.screen_id.clone(),
        screen_title: compiled.title.clone(),
        render_time_ms: if cache_hit { 0 } else { compiled.compile_time_ms },
        component_count: compiled.metadata.component_count,
        chart_count: compiled.metadata.chart_count,
        complexity: compiled.metadata.complexity,
        cache_hit,
    }
}

fn error_type(error: &RenderError) -> &'static str {
    match error {
        RenderError::Parse(crate::error::ParseError::Json(_)) => "parse_error",
        RenderError::Parse(crate::error::ParseError::Schema { .. }) => "schema_error",
        RenderError::Worker(_) => "worker_error",
        RenderError::NoDocument => "no_document",
    }
}

//! Per-list state machines for static and paginated collections.
//!
//! A controller moves through `Idle -> Loading -> Loaded | Empty | Error`,
//! and `Loaded -> LoadingMore -> Loaded` while paginating. At most one fetch
//! per list is in flight; page N+1 is never requested before page N settles.

pub mod fetcher;

pub use fetcher::{DataFetcher, InMemoryFetcher, MockFetcher, PageRequest};

use crate::config::EngineConfig;
use crate::error::NetworkError;
use crate::factory::{BoundItem, ComponentFactory, LazyListPlan, PreparedComponent, build_tree};
use crate::value::Value;
use ahash::AHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    Empty,
    Error(String),
    LoadingMore,
}

impl ListPhase {
    fn is_busy(&self) -> bool {
        matches!(self, ListPhase::Loading | ListPhase::LoadingMore)
    }
}

/// What a list looks like right now, ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading {
        shimmer_rows: Option<u32>,
    },
    Items {
        items: Vec<BoundItem>,
        loading_more: bool,
    },
    Empty {
        template: Option<PreparedComponent>,
        message: &'static str,
    },
    Error {
        message: String,
        template: Option<PreparedComponent>,
    },
    Unsupported(String),
}

#[derive(Debug)]
struct ListState {
    phase: ListPhase,
    records: Vec<Value>,
    next_page: u32,
    has_more: bool,
}

pub struct ListController {
    key: String,
    plan: Arc<LazyListPlan>,
    fetcher: Arc<dyn DataFetcher>,
    prefetch_distance: usize,
    page_size: u32,
    state: Mutex<ListState>,
}

impl ListController {
    pub fn new(
        key: impl Into<String>,
        plan: Arc<LazyListPlan>,
        fetcher: Arc<dyn DataFetcher>,
        config: &EngineConfig,
    ) -> Self {
        let page_size = plan
            .source
            .pagination
            .as_ref()
            .map(|p| p.page_size)
            .unwrap_or(config.default_page_size)
            .max(1);
        Self {
            key: key.into(),
            plan,
            fetcher,
            prefetch_distance: config.prefetch_distance,
            page_size,
            state: Mutex::new(ListState {
                phase: ListPhase::Idle,
                records: Vec::new(),
                next_page: 0,
                has_more: true,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn plan(&self) -> &LazyListPlan {
        &self.plan
    }

    pub fn phase(&self) -> ListPhase {
        self.state().phase.clone()
    }

    pub fn records(&self) -> Vec<Value> {
        self.state().records.clone()
    }

    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.state().has_more
    }

    pub fn is_api(&self) -> bool {
        self.plan.source.is_api()
    }

    /// Static lists resolve immediately. Api lists stay idle until
    /// [`ListController::load_initial`] runs.
    pub fn mount(&self) {
        if !self.plan.source.is_static() {
            return;
        }
        let items = self.plan.source.items.clone().unwrap_or_default();
        let mut state = self.state();
        state.phase = if items.is_empty() {
            ListPhase::Empty
        } else {
            ListPhase::Loaded
        };
        state.has_more = false;
        state.records = items;
        debug!(list = %self.key, records = state.records.len(), "mounted static list");
    }

    fn request(&self, page: u32) -> Result<PageRequest, NetworkError> {
        let source = &self.plan.source;
        let url = source.url.clone().ok_or(NetworkError::MissingUrl)?;
        Ok(PageRequest {
            url,
            page,
            page_size: self.page_size,
            method: source.method.clone().unwrap_or_else(|| "GET".to_string()),
            headers: source.headers.clone(),
        })
    }

    async fn fetch(&self, page: u32) -> Result<Vec<Value>, NetworkError> {
        let request = self.request(page)?;
        self.fetcher.fetch_page(&request).await
    }

    /// Fetches the first page, replacing whatever the list held.
    pub async fn load_initial(&self) -> ListPhase {
        let source = &self.plan.source;
        if source.is_static() {
            self.mount();
            return self.phase();
        }
        if !source.is_api() {
            let error = NetworkError::UnsupportedSource(source.source_type.clone());
            warn!(list = %self.key, "{}", error);
            let mut state = self.state();
            state.phase = ListPhase::Error(error.to_string());
            state.has_more = false;
            return state.phase.clone();
        }
        {
            let mut state = self.state();
            if state.phase.is_busy() {
                return state.phase.clone();
            }
            state.phase = ListPhase::Loading;
            state.records.clear();
            state.next_page = 0;
            state.has_more = true;
        }

        let outcome = self.fetch(0).await;
        let mut state = self.state();
        match outcome {
            Ok(records) if records.is_empty() => {
                state.phase = ListPhase::Empty;
                state.has_more = false;
            }
            Ok(records) => {
                info!(list = %self.key, records = records.len(), "loaded first page");
                state.records = records;
                state.next_page = 1;
                state.phase = ListPhase::Loaded;
            }
            Err(e) => {
                warn!(list = %self.key, "initial load failed: {}", e);
                state.phase = ListPhase::Error(e.to_string());
            }
        }
        state.phase.clone()
    }

    /// Re-enters `Loading` and fetches the first page again.
    pub async fn retry(&self) -> ListPhase {
        self.load_initial().await
    }

    /// Reports that the item at `index` became visible. When it is within the
    /// prefetch distance of the end, the next page is fetched. Returns whether
    /// a fetch was issued.
    ///
    /// A failed page is logged and dropped; the items already shown stay.
    pub async fn on_item_visible(&self, index: usize) -> bool {
        let page = {
            let mut state = self.state();
            let near_end = index + self.prefetch_distance >= state.records.len();
            if state.phase != ListPhase::Loaded || !state.has_more || !near_end {
                return false;
            }
            state.phase = ListPhase::LoadingMore;
            state.next_page
        };

        debug!(list = %self.key, page, "prefetching next page");
        let outcome = self.fetch(page).await;
        let mut state = self.state();
        match outcome {
            Ok(records) if records.is_empty() => {
                debug!(list = %self.key, page, "reached end of list");
                state.has_more = false;
            }
            Ok(records) => {
                state.records.extend(records);
                state.next_page = page + 1;
            }
            Err(e) => warn!(list = %self.key, page, "pagination failed: {}", e),
        }
        state.phase = ListPhase::Loaded;
        true
    }

    /// Builds the current view. Items are bound fresh on every call.
    pub fn view(&self, factory: &dyn ComponentFactory) -> ListView {
        let source = &self.plan.source;
        if !source.is_static() && !source.is_api() {
            return ListView::Unsupported(source.source_type.clone());
        }
        let (phase, records) = {
            let state = self.state();
            (state.phase.clone(), state.records.clone())
        };

        match phase {
            ListPhase::Idle | ListPhase::Loading => ListView::Loading {
                shimmer_rows: self
                    .plan
                    .loading
                    .as_ref()
                    .filter(|t| t.template_type == "shimmer")
                    .map(|t| t.count.unwrap_or(5)),
            },
            ListPhase::Empty => ListView::Empty {
                template: self
                    .plan
                    .empty_template
                    .as_ref()
                    .map(|t| build_tree(factory, t)),
                message: if source.is_static() {
                    "No items to display"
                } else {
                    "No items found"
                },
            },
            ListPhase::Error(message) => ListView::Error {
                message,
                template: self
                    .plan
                    .error_template
                    .as_ref()
                    .map(|t| build_tree(factory, t)),
            },
            ListPhase::Loaded | ListPhase::LoadingMore => {
                let Some(template) = &self.plan.template else {
                    return ListView::Empty {
                        template: None,
                        message: "No item template",
                    };
                };
                ListView::Items {
                    items: records
                        .iter()
                        .map(|record| template.instantiate(factory, record))
                        .collect(),
                    loading_more: phase == ListPhase::LoadingMore,
                }
            }
        }
    }
}

/// Runs `task` on the current tokio runtime, if there is one.
pub(crate) fn spawn_detached<F>(task: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
        }
        Err(_) => warn!("no async runtime available; task dropped"),
    }
}

/// The mounted lists of one renderer, keyed by list key.
#[derive(Default)]
pub struct ListRegistry {
    lists: Mutex<AHashMap<String, Arc<ListController>>>,
}

impl ListRegistry {
    fn lists(&self) -> MutexGuard<'_, AHashMap<String, Arc<ListController>>> {
        self.lists.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Arc<ListController>> {
        self.lists().get(key).cloned()
    }

    pub fn insert(&self, controller: Arc<ListController>) {
        self.lists().insert(controller.key().to_string(), controller);
    }

    /// Returns the controller mounted under `key`, creating it on first use.
    ///
    /// A new static list resolves right away. Any other source starts its
    /// first load in the background.
    pub fn get_or_mount(
        &self,
        key: &str,
        plan: &Arc<LazyListPlan>,
        fetcher: &Arc<dyn DataFetcher>,
        config: &EngineConfig,
    ) -> Arc<ListController> {
        let controller = {
            let mut lists = self.lists();
            if let Some(existing) = lists.get(key) {
                return existing.clone();
            }
            let controller = Arc::new(ListController::new(key, plan.clone(), fetcher.clone(), config));
            lists.insert(key.to_string(), controller.clone());
            controller
        };
        debug!(list = %key, "mounting list");
        if controller.plan.source.is_static() {
            controller.mount();
        } else {
            let loader = controller.clone();
            spawn_detached(async move {
                loader.load_initial().await;
            });
        }
        controller
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lists().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.lists().clear();
    }

    pub fn len(&self) -> usize {
        self.lists().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

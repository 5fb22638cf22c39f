use crate::error::NetworkError;
use crate::value::{Record, Value};
use async_trait::async_trait;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// One page request issued by a list controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub page: u32,
    pub page_size: u32,
    pub method: String,
    pub headers: BTreeMap<String, String>,
}

/// Pluggable I/O behind api-backed lists.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, NetworkError>;
}

const CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Books", "Home"];

/// Generates plausible product records. Stands in for a real backend.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    latency: Duration,
    max_pages: Option<u32>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pages at or beyond `max_pages` come back empty.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    fn generate(page: u32, page_size: u32) -> Vec<Value> {
        let mut rng = rand::rng();
        (0..page_size)
            .map(|i| {
                let id = page * page_size + i + 1;
                let price = (rng.random_range(10.0..=100.0_f64) * 100.0).round() / 100.0;
                let category = CATEGORIES[rng.random_range(0..CATEGORIES.len())];
                let mut record = Record::new();
                record.insert("id".into(), Value::from(id as i64));
                record.insert("title".into(), format!("Item {}", id).into());
                record.insert(
                    "description".into(),
                    format!("Description for item {}", id).into(),
                );
                record.insert(
                    "imageUrl".into(),
                    format!("https://picsum.photos/seed/{}/200/200", id).into(),
                );
                record.insert("price".into(), price.into());
                record.insert("category".into(), category.into());
                Value::Map(record)
            })
            .collect()
    }
}

#[async_trait]
impl DataFetcher for MockFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, NetworkError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.max_pages.is_some_and(|max| request.page >= max) {
            debug!(url = %request.url, page = request.page, "mock source exhausted");
            return Ok(Vec::new());
        }
        Ok(Self::generate(request.page, request.page_size))
    }
}

/// Serves a fixed set of records, sliced into pages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
    records: Vec<Value>,
}

impl InMemoryFetcher {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DataFetcher for InMemoryFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, NetworkError> {
        let size = request.page_size.max(1) as usize;
        let start = (request.page as usize).saturating_mul(size);
        Ok(self
            .records
            .iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect())
    }
}

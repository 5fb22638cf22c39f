//! Observers of the rendering lifecycle.
//!
//! Analytics sinks only watch. Nothing they do can change what is rendered.

mod factory;

pub use factory::AnalyticsComponentFactory;

use crate::analysis::ScreenComplexity;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    ScreenRender {
        screen_id: String,
        screen_title: String,
        render_time_ms: u64,
        component_count: usize,
        chart_count: usize,
        complexity: ScreenComplexity,
        cache_hit: bool,
    },
    ScreenError {
        screen_id: Option<String>,
        error_type: String,
        message: String,
    },
    ComponentPreparation {
        component_id: Option<String>,
        component_type: String,
        duration_us: u64,
        children_count: usize,
        properties_count: usize,
        success: bool,
    },
    ComponentAction {
        action_type: String,
        destination: Option<String>,
    },
    ParseStarted {
        fingerprint: String,
    },
    Custom {
        name: String,
        properties: BTreeMap<String, String>,
    },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::ScreenRender { .. } => "screen_render",
            AnalyticsEvent::ScreenError { .. } => "screen_error",
            AnalyticsEvent::ComponentPreparation { .. } => "component_preparation",
            AnalyticsEvent::ComponentAction { .. } => "component_action",
            AnalyticsEvent::ParseStarted { .. } => "parse_started",
            AnalyticsEvent::Custom { .. } => "custom",
        }
    }
}

/// An event stamped with its session and time of capture.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalyticsEvent,
}

pub trait Analytics: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
    fn session_id(&self) -> &str;
    fn flush(&self) {}
}

/// Receives flushed batches, e.g. to ship them off-device.
pub trait EventProcessor: Send + Sync {
    fn process(&self, batch: Vec<TrackedEvent>);
}

#[derive(Default)]
struct Recorded {
    buffer: Vec<TrackedEvent>,
    screen_renders: AHashMap<String, u64>,
    component_types: AHashMap<String, u64>,
}

/// Buffers events in memory and hands full batches to an optional processor.
pub struct MemoryAnalytics {
    session_id: String,
    batch_size: usize,
    processor: Option<Arc<dyn EventProcessor>>,
    recorded: Mutex<Recorded>,
}

impl Default for MemoryAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAnalytics {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            batch_size: 50,
            processor: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn EventProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Events captured since the last flush.
    pub fn buffered(&self) -> Vec<TrackedEvent> {
        self.recorded().buffer.clone()
    }

    pub fn screen_render_count(&self, screen_id: &str) -> u64 {
        self.recorded()
            .screen_renders
            .get(screen_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn component_type_count(&self, component_type: &str) -> u64 {
        self.recorded()
            .component_types
            .get(component_type)
            .copied()
            .unwrap_or(0)
    }
}

impl Analytics for MemoryAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        let full = {
            let mut recorded = self.recorded();
            match &event {
                AnalyticsEvent::ScreenRender { screen_id, .. } => {
                    *recorded.screen_renders.entry(screen_id.clone()).or_default() += 1;
                }
                AnalyticsEvent::ComponentPreparation { component_type, .. } => {
                    *recorded
                        .component_types
                        .entry(component_type.clone())
                        .or_default() += 1;
                }
                _ => {}
            }
            recorded.buffer.push(TrackedEvent {
                session_id: self.session_id.clone(),
                timestamp: Utc::now(),
                event,
            });
            recorded.buffer.len() >= self.batch_size
        };
        if full && self.processor.is_some() {
            self.flush();
        }
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Hands the buffer to the processor. Without one, events stay buffered.
    fn flush(&self) {
        let Some(processor) = &self.processor else {
            return;
        };
        let batch = std::mem::take(&mut self.recorded().buffer);
        if batch.is_empty() {
            return;
        }
        debug!(events = batch.len(), "flushing analytics batch");
        processor.process(batch);
    }
}

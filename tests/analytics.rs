//! Tests for the in-memory analytics sink.
use hyouji::analysis::ScreenComplexity;
use hyouji::analytics::{Analytics, AnalyticsEvent, EventProcessor, MemoryAnalytics, TrackedEvent};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingProcessor {
    batches: Mutex<Vec<Vec<TrackedEvent>>>,
}

impl EventProcessor for CollectingProcessor {
    fn process(&self, batch: Vec<TrackedEvent>) {
        self.batches.lock().unwrap().push(batch);
    }
}

fn custom(name: &str) -> AnalyticsEvent {
    AnalyticsEvent::Custom {
        name: name.to_string(),
        properties: BTreeMap::from([("source".to_string(), "test".to_string())]),
    }
}

#[test]
fn test_events_are_stamped_with_session() {
    let analytics = MemoryAnalytics::new();
    analytics.track(custom("opened"));

    let buffered = analytics.buffered();
    assert_eq!(buffered.len(), 1);
    assert_eq!(buffered[0].session_id, analytics.session_id());
    assert_eq!(buffered[0].event.name(), "custom");
    assert!(!analytics.session_id().is_empty());
    assert_ne!(analytics.session_id(), MemoryAnalytics::new().session_id());
}

#[test]
fn test_full_batch_is_flushed_to_processor() {
    let processor = Arc::new(CollectingProcessor::default());
    let analytics = MemoryAnalytics::new()
        .with_batch_size(3)
        .with_processor(processor.clone());

    for i in 0..7 {
        analytics.track(custom(&format!("event-{}", i)));
    }

    let sizes: Vec<usize> = processor
        .batches
        .lock()
        .unwrap()
        .iter()
        .map(Vec::len)
        .collect();
    assert_eq!(sizes, vec![3, 3]);
    assert_eq!(analytics.buffered().len(), 1);

    analytics.flush();
    assert_eq!(processor.batches.lock().unwrap().len(), 3);
    assert!(analytics.buffered().is_empty());
}

#[test]
fn test_without_processor_events_stay_buffered() {
    let analytics = MemoryAnalytics::new().with_batch_size(2);
    for i in 0..5 {
        analytics.track(custom(&format!("event-{}", i)));
    }
    analytics.flush();
    assert_eq!(analytics.buffered().len(), 5);
}

#[test]
fn test_counters() {
    let analytics = MemoryAnalytics::new();
    for cache_hit in [false, true] {
        analytics.track(AnalyticsEvent::ScreenRender {
            screen_id: "home".to_string(),
            screen_title: "Home".to_string(),
            render_time_ms: 4,
            component_count: 3,
            chart_count: 0,
            complexity: ScreenComplexity::Low,
            cache_hit,
        });
    }
    analytics.track(AnalyticsEvent::ComponentPreparation {
        component_id: None,
        component_type: "card".to_string(),
        duration_us: 12,
        children_count: 2,
        properties_count: 1,
        success: true,
    });

    assert_eq!(analytics.screen_render_count("home"), 2);
    assert_eq!(analytics.screen_render_count("other"), 0);
    assert_eq!(analytics.component_type_count("card"), 1);
}

use super::CompiledScreen;
use crate::analysis::analyze_tree;
use crate::analytics::AnalyticsEvent;
use crate::engine::Engine;
use crate::error::{ParseError, RenderError};
use crate::factory::prepare_tree;
use crate::schema::parse_screen;
use crate::validator::{ValidationResult, validate};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs parse, validate, analyze and compile for one document.
///
/// Parsing and analysis run on the blocking pool, limited by the engine's
/// parse permits. Preparation runs on the async workers.
pub(super) async fn compile_document(
    engine: &Engine,
    source: Arc<str>,
    fingerprint: String,
) -> Result<CompiledScreen, RenderError> {
    let started = Instant::now();
    engine.track(AnalyticsEvent::ParseStarted {
        fingerprint: fingerprint.clone(),
    });

    let (screen, validation, metadata) = {
        let _permit = engine
            .parse_permits()
            .acquire()
            .await
            .map_err(|e| RenderError::Worker(e.to_string()))?;
        tokio::task::spawn_blocking(move || -> Result<_, ParseError> {
            let screen = parse_screen(&source)?;
            let validation = validate(&screen.screen.layout);
            let metadata = analyze_tree(&screen.screen.layout);
            Ok((screen, validation, metadata))
        })
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))??
    };

    match &validation {
        ValidationResult::Invalid(errors) => warn!(
            screen_id = %screen.screen.id,
            ?errors,
            "screen has invalid components; they will render as placeholders"
        ),
        ValidationResult::Warning(warnings) => {
            debug!(screen_id = %screen.screen.id, ?warnings, "screen validated with warnings")
        }
        ValidationResult::Valid => {}
    }
    debug!(
        components = metadata.component_count,
        depth = metadata.max_depth,
        complexity = %metadata.complexity,
        "analyzed screen"
    );

    let root = prepare_tree(engine.factory(), &screen.screen.layout).await;
    let elapsed = started.elapsed();
    info!(
        screen_id = %screen.screen.id,
        components = root.size(),
        elapsed_ms = elapsed.as_millis() as u64,
        "compiled screen"
    );

    Ok(CompiledScreen {
        screen_id: screen.screen.id,
        title: screen.screen.title,
        version: screen.version,
        theme: screen.theme,
        root,
        metadata,
        validation,
        fingerprint,
        compile_time_ms: elapsed.as_millis() as u64,
    })
}

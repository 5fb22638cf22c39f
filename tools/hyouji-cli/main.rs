use clap::Parser;
use hyouji::analysis::TreeMetadata;
use hyouji::list::{InMemoryFetcher, ListPhase};
use hyouji::prelude::*;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile a server-driven UI screen document and print what it would draw
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the screen document JSON file
    screen_path: String,

    /// Optional engine config TOML file
    #[arg(short, long)]
    config: Option<String>,

    /// Serve every api list from this JSON array of records instead of mock data
    #[arg(short, long)]
    records: Option<String>,

    /// Only parse and validate, do not compile or render
    #[arg(long)]
    validate_only: bool,

    /// Log pipeline details at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "hyouji=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let total_start = Instant::now();

    // --- 1. File Loading ---
    let json = fs::read_to_string(&cli.screen_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read screen file '{}': {}",
            cli.screen_path, e
        ))
    });
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };

    // --- 2. Parse and Validate ---
    let parse_start = Instant::now();
    let screen = parse_screen(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let validation = validate(&screen.screen.layout);
    let parse_duration = parse_start.elapsed();

    println!(
        "Screen '{}' ({}) version {}",
        screen.screen.id, screen.screen.title, screen.version
    );
    match &validation {
        ValidationResult::Valid => println!("Validation: ok"),
        ValidationResult::Warning(warnings) => {
            println!("Validation: {} warning(s)", warnings.len());
            warnings.iter().for_each(|w| println!("  - warning: {}", w));
        }
        ValidationResult::Invalid(errors) => {
            println!("Validation: {} error(s)", errors.len());
            errors.iter().for_each(|e| println!("  - error: {}", e));
        }
    }
    print_metadata(&analyze_tree(&screen.screen.layout));

    if cli.validate_only {
        std::process::exit(if validation.is_valid() { 0 } else { 2 });
    }

    // --- 3. Compile ---
    let mut builder = Engine::builder().with_config(config);
    if let Some(path) = &cli.records {
        let raw = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read records file '{}': {}", path, e))
        });
        let records: Vec<Value> = serde_json::from_str(&raw)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse records JSON: {}", e)));
        info!(records = records.len(), "serving api lists from file");
        builder = builder.with_data_fetcher(Arc::new(InMemoryFetcher::new(records)));
    }
    let engine = builder.build();
    let renderer = engine.renderer();

    let compile_start = Instant::now();
    let state = renderer.load(&json).await;
    let compile_duration = compile_start.elapsed();
    if let RenderState::Error { message, .. } = &state {
        exit_with_error(&format!("Render failed: {}", message));
    }
    wait_for_lists(&renderer).await;

    // --- 4. Render ---
    let render_start = Instant::now();
    let mut backend = TreeBackend::new();
    renderer.render(&mut backend);
    let render_duration = render_start.elapsed();

    println!("\n--- Rendered Tree ---");
    print!("{}", backend.outline());

    println!("\n--- Performance Summary ---");
    println!("Parse + Validate:     {:?}", parse_duration);
    println!("Compile:              {:?}", compile_duration);
    println!("Render:               {:?}", render_duration);
    println!("Cached entries:       {}", renderer.cache_size());
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
}

/// Waits, bounded, for api lists to finish their first page.
async fn wait_for_lists(renderer: &Renderer) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let pending = renderer
            .list_keys()
            .iter()
            .filter_map(|key| renderer.list(key))
            .any(|list| matches!(list.phase(), ListPhase::Idle | ListPhase::Loading) && list.is_api());
        if !pending || Instant::now() >= deadline {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn print_metadata(metadata: &TreeMetadata) {
    println!("\n--- Tree Summary ---");
    println!("Components:           {}", metadata.component_count);
    println!("Max Depth:            {}", metadata.max_depth);
    println!("Charts:               {}", metadata.chart_count);
    println!("Async Components:     {}", metadata.has_async_components);
    println!("Complexity:           {}", metadata.complexity);
    println!(
        "Estimated Render:     {} ms",
        metadata.estimated_render_time_ms
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

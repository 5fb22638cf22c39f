use clap::Parser;
use hyouji::list::{DataFetcher, MockFetcher, PageRequest};
use serde_json::json;
use std::fs;

/// A CLI tool to generate large screen documents for load-testing the renderer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_screen.json")]
    output: String,

    /// Number of records in the static list
    #[arg(short, long, default_value_t = 100)]
    records: u32,

    /// Number of extra text components above the list
    #[arg(long, default_value_t = 10)]
    header_items: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!(
        "Generating screen with {} list records and {} header items...",
        cli.records, cli.header_items
    );

    let request = PageRequest {
        url: "mock://products".to_string(),
        page: 0,
        page_size: cli.records,
        method: "GET".to_string(),
        headers: Default::default(),
    };
    let records = MockFetcher::new().fetch_page(&request).await?;

    let header: Vec<_> = (0..cli.header_items)
        .map(|i| {
            json!({
                "type": "text",
                "properties": { "text": format!("Header line {}", i + 1), "style": "body2" }
            })
        })
        .collect();

    let screen = json!({
        "version": "1.0",
        "screen": {
            "id": "generated",
            "title": "Generated Screen",
            "layout": {
                "type": "column",
                "modifier": { "fillMaxSize": true },
                "children": [
                    { "type": "top_app_bar", "properties": { "title": "Generated" } },
                    { "type": "column", "children": header },
                    {
                        "type": "lazy_column",
                        "id": "products",
                        "modifier": { "weight": 1 },
                        "dataSource": { "type": "static", "items": records },
                        "itemTemplate": {
                            "layout": {
                                "type": "card",
                                "modifier": { "padding": 8 },
                                "children": [
                                    { "type": "text", "properties": { "text": "{{title}}", "style": "subtitle1" } },
                                    { "type": "text", "properties": { "text": "{{category}} - ${{price}}" } }
                                ]
                            },
                            "actions": {
                                "onClick": { "type": "navigate", "destination": "product", "params": { "id": "{{id}}" } }
                            }
                        }
                    }
                ]
            }
        }
    });

    fs::write(&cli.output, serde_json::to_string_pretty(&screen)?)?;
    println!(
        "Successfully generated and saved screen to '{}'",
        cli.output
    );
    Ok(())
}

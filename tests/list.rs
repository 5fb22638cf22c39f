//! Tests for list controllers: static sources, pagination and list states.
mod common;
use common::*;
use hyouji::factory::{LazyListPlan, ListAxis};
use hyouji::list::{InMemoryFetcher, ListRegistry, ListView};
use hyouji::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const API_URL: &str = "https://api.test/items";

async fn compile_plan(factory: &DefaultComponentFactory, node: serde_json::Value) -> Arc<LazyListPlan> {
    match factory.prepare(&node_from(node)).await {
        PreparationResult::Success {
            strategy: RenderStrategy::LazyList(plan),
            ..
        } => plan,
        other => panic!("expected a lazy list, got {:?}", other),
    }
}

fn api_list(page_size: u32) -> serde_json::Value {
    json!({
        "type": "lazy_column",
        "id": "products",
        "dataSource": { "type": "api", "url": API_URL, "pagination": { "pageSize": page_size } },
        "itemTemplate": product_template()
    })
}

fn static_list(items: Vec<Value>) -> serde_json::Value {
    json!({
        "type": "lazy_column",
        "dataSource": { "type": "static", "items": items },
        "itemTemplate": product_template()
    })
}

fn controller(plan: Arc<LazyListPlan>, fetcher: Arc<ScriptedFetcher>) -> ListController {
    ListController::new("products", plan, fetcher, &EngineConfig::default())
}

fn item_texts(view: &ListView) -> Vec<String> {
    let ListView::Items { items, .. } = view else {
        panic!("expected items, got {:?}", view);
    };
    items
        .iter()
        .map(|item| {
            item.component
                .children
                .iter()
                .filter_map(|child| child.properties.get("text"))
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect()
}

#[tokio::test]
async fn test_static_empty_list() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, static_list(vec![])).await;
    let list = controller(plan, Arc::new(ScriptedFetcher::new()));

    list.mount();
    assert_eq!(list.phase(), ListPhase::Empty);
    assert_eq!(
        list.view(&factory),
        ListView::Empty {
            template: None,
            message: "No items to display"
        }
    );
}

#[tokio::test]
async fn test_static_list_binds_every_record() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, static_list(products(1, 3))).await;
    let fetcher = Arc::new(ScriptedFetcher::new());
    let list = controller(plan, fetcher.clone());

    assert_eq!(list.load_initial().await, ListPhase::Loaded);
    assert!(!list.has_more());
    assert!(fetcher.calls().is_empty());

    let view = list.view(&factory);
    assert_eq!(
        item_texts(&view),
        vec!["Product 1|9.5", "Product 2|9.5", "Product 3|9.5"]
    );
    let ListView::Items { items, loading_more } = view else {
        unreachable!();
    };
    assert!(!loading_more);
    let click = items[1].on_click.as_ref().expect("item is clickable");
    assert_eq!(click.destination.as_deref(), Some("detail"));
    assert_eq!(click.params["id"], "2");
}

#[tokio::test]
async fn test_view_before_load_shows_loading() {
    let factory = DefaultComponentFactory::builder().build();
    let mut node = api_list(20);
    node["loadingTemplate"] = json!({ "type": "shimmer" });
    let plan = compile_plan(&factory, node).await;
    let list = controller(plan, Arc::new(ScriptedFetcher::new()));

    assert_eq!(list.phase(), ListPhase::Idle);
    assert_eq!(
        list.view(&factory),
        ListView::Loading {
            shimmer_rows: Some(5)
        }
    );

    let plain = compile_plan(&factory, api_list(10)).await;
    let list = controller(plain, Arc::new(ScriptedFetcher::new()));
    assert_eq!(list.view(&factory), ListView::Loading { shimmer_rows: None });
}

#[tokio::test]
async fn test_scrolling_near_end_fetches_next_page_once() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, api_list(20)).await;
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_page(0, products(1, 20))
            .with_page(1, products(21, 20)),
    );
    let list = controller(plan, fetcher.clone());

    assert_eq!(list.load_initial().await, ListPhase::Loaded);
    assert_eq!(list.len(), 20);
    assert_eq!(fetcher.calls(), vec![0]);

    // Far from the end: nothing happens.
    assert!(!list.on_item_visible(5).await);
    assert_eq!(fetcher.calls(), vec![0]);

    // Within three items of the end.
    assert!(list.on_item_visible(17).await);
    assert_eq!(fetcher.calls(), vec![0, 1]);
    assert_eq!(list.len(), 40);
    assert_eq!(list.phase(), ListPhase::Loaded);
}

#[tokio::test]
async fn test_concurrent_visibility_issues_single_request() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, api_list(20)).await;
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_page(0, products(1, 20))
            .with_page(1, products(21, 20))
            .with_delay(Duration::from_millis(20)),
    );
    let list = controller(plan, fetcher.clone());
    list.load_initial().await;

    let (a, b) = tokio::join!(list.on_item_visible(18), list.on_item_visible(19));
    assert!(a ^ b, "exactly one visibility report should fetch");
    assert_eq!(fetcher.calls(), vec![0, 1]);
    assert_eq!(list.len(), 40);
}

#[tokio::test]
async fn test_empty_page_ends_pagination() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, api_list(5)).await;
    let fetcher = Arc::new(ScriptedFetcher::new().with_page(0, products(1, 5)));
    let list = controller(plan, fetcher.clone());

    list.load_initial().await;
    assert!(list.on_item_visible(4).await);
    assert!(!list.has_more());
    assert!(!list.on_item_visible(4).await);
    assert_eq!(fetcher.calls(), vec![0, 1]);
    assert_eq!(list.len(), 5);
}

#[tokio::test]
async fn test_pagination_error_keeps_items() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, api_list(5)).await;
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_page(0, products(1, 5))
            .with_failure(1),
    );
    let list = controller(plan, fetcher.clone());

    list.load_initial().await;
    assert!(list.on_item_visible(4).await);
    assert_eq!(list.phase(), ListPhase::Loaded);
    assert_eq!(list.len(), 5);
    assert!(list.has_more());

    // The failed page is requested again on the next report.
    fetcher.set_page(1, products(6, 5));
    assert!(list.on_item_visible(4).await);
    assert_eq!(list.len(), 10);
    assert_eq!(fetcher.calls(), vec![0, 1, 1]);
}

#[tokio::test]
async fn test_initial_error_then_retry() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, api_list(20)).await;
    let fetcher = Arc::new(ScriptedFetcher::new().with_failure(0));
    let list = controller(plan, fetcher.clone());

    let phase = list.load_initial().await;
    let ListPhase::Error(message) = phase else {
        panic!("expected an error phase, got {:?}", phase);
    };
    assert!(message.contains("connection reset"));
    assert!(matches!(
        list.view(&factory),
        ListView::Error { template: None, .. }
    ));

    fetcher.set_page(0, products(1, 2));
    assert_eq!(list.retry().await, ListPhase::Loaded);
    assert_eq!(list.len(), 2);
    assert_eq!(fetcher.calls(), vec![0, 0]);
}

#[tokio::test]
async fn test_api_empty_first_page() {
    let factory = DefaultComponentFactory::builder().build();
    let mut node = api_list(20);
    node["emptyTemplate"] = json!({ "type": "text", "properties": { "text": "Nothing here" } });
    let plan = compile_plan(&factory, node).await;
    let list = controller(plan, Arc::new(ScriptedFetcher::new()));

    assert_eq!(list.load_initial().await, ListPhase::Empty);
    match list.view(&factory) {
        ListView::Empty {
            template: Some(template),
            message,
        } => {
            assert_eq!(message, "No items found");
            assert_eq!(template.component_type, "text");
        }
        other => panic!("expected the empty template, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_source_without_url_fails() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(
        &factory,
        json!({
            "type": "lazy_row",
            "dataSource": { "type": "api" },
            "itemTemplate": product_template()
        }),
    )
    .await;
    assert_eq!(plan.axis, ListAxis::Horizontal);
    let list = controller(plan, Arc::new(ScriptedFetcher::new()));
    assert_eq!(
        list.load_initial().await,
        ListPhase::Error("Data source has no url".to_string())
    );
}

#[tokio::test]
async fn test_unsupported_source_type() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(
        &factory,
        json!({
            "type": "lazy_column",
            "dataSource": { "type": "graphql", "url": API_URL },
            "itemTemplate": product_template()
        }),
    )
    .await;
    let fetcher = Arc::new(ScriptedFetcher::new());
    let list = controller(plan, fetcher.clone());
    assert_eq!(
        list.load_initial().await,
        ListPhase::Error("Unsupported data source: graphql".to_string())
    );
    assert!(fetcher.calls().is_empty());
    assert_eq!(
        list.view(&factory),
        ListView::Unsupported("graphql".to_string())
    );
}

#[tokio::test]
async fn test_in_memory_and_mock_fetchers() {
    let records = products(1, 5);
    let fetcher = InMemoryFetcher::new(records.clone());
    let request = |page| PageRequest {
        url: API_URL.to_string(),
        page,
        page_size: 2,
        method: "GET".to_string(),
        headers: Default::default(),
    };
    assert_eq!(fetcher.fetch_page(&request(0)).await.unwrap(), records[..2]);
    assert_eq!(fetcher.fetch_page(&request(2)).await.unwrap(), records[4..]);
    assert!(fetcher.fetch_page(&request(3)).await.unwrap().is_empty());

    let mock = MockFetcher::new().with_max_pages(1);
    let page = mock.fetch_page(&request(0)).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[1].get("title"), Some(&Value::from("Item 2")));
    let price = page[0].get("price").and_then(Value::as_f64).unwrap();
    assert!((10.0..=100.0).contains(&price));
    assert!(mock.fetch_page(&request(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_registry_keys_are_sorted() {
    let factory = DefaultComponentFactory::builder().build();
    let plan = compile_plan(&factory, static_list(vec![])).await;
    let registry = ListRegistry::default();
    for key in ["list@0.2", "feed", "list@0.1"] {
        registry.insert(Arc::new(ListController::new(
            key,
            plan.clone(),
            Arc::new(ScriptedFetcher::new()),
            &EngineConfig::default(),
        )));
    }
    assert_eq!(registry.keys(), vec!["feed", "list@0.1", "list@0.2"]);
    assert_eq!(registry.get("feed").map(|l| l.key().to_string()), Some("feed".to_string()));
    registry.clear();
    assert!(registry.is_empty());
}

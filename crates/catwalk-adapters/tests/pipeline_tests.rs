//! End-to-end tests wiring the adapters into the core services.

use std::{fs, path::Path, sync::Arc};

use catwalk_adapters::{
    DefaultFieldVisitorFactory, FixtureStreamHandler, InMemoryTasticStore, LimitTrimOptimizer,
    TasticDefinitionLoader,
};
use catwalk_core::{
    domain::{Cell, Project, Region},
    prelude::*,
};
use serde_json::{Map, json};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn workspace() -> TempDir {
    let root = TempDir::new().unwrap();
    write(
        root.path(),
        "tastics/product-slider/tastic.json",
        r#"{
            "tasticType": "product-slider",
            "name": "Product Slider",
            "schema": [{
                "name": "Stream",
                "fields": [
                    { "field": "title", "type": "string", "translatable": true },
                    { "field": "stream", "type": "stream", "streamType": "product-list" },
                    { "field": "productCount", "type": "integer" }
                ]
            }]
        }"#,
    );
    write(
        root.path(),
        "fixtures/product-list.json",
        &json!({ "items": [1, 2, 3, 4, 5, 6, 7, 8], "total": 8 }).to_string(),
    );
    root
}

fn page() -> Page {
    Page::new("home").with_region(
        Region::new("main").with_cell(
            Cell::new("c1")
                .with_tastic(
                    TasticInstance::new("t1", "product-slider")
                        .with_value("title", json!({ "en_GB": "Bestsellers", "de_DE": "Renner" }))
                        .with_value("stream", json!("bestsellers"))
                        .with_value("productCount", json!(3))
                        .with_value("mobile", json!({ "hidden": true })),
                )
                .with_tastic(
                    TasticInstance::new("t2", "product-slider")
                        .with_value("stream", json!("bestsellers"))
                        .with_value("productCount", json!(5)),
                ),
        ),
    )
}

#[tokio::test]
async fn builds_a_page_view_from_files_on_disk() {
    let root = workspace();

    let store = Arc::new(InMemoryTasticStore::new());
    let loaded = TasticDefinitionLoader::new(root.path().join("tastics"))
        .load_into(store.as_ref())
        .unwrap();
    assert_eq!(loaded, 1);

    let mut registry = StreamHandlerRegistry::new();
    for handler in FixtureStreamHandler::discover(&root.path().join("fixtures")).unwrap() {
        registry.register(Arc::new(handler));
    }

    let streams = StreamService::new(registry, store.clone())
        .with_optimizer(Arc::new(LimitTrimOptimizer::new()));
    let completion = PageDataCompletionService::new(store, Arc::new(DefaultFieldVisitorFactory));
    let service = PageViewService::new(completion, streams);

    let node = Node::new("home")
        .with_stream(Stream::new("bestsellers", "product-list"))
        .with_stream(Stream::new("unused", "product-list"));
    let context = Context::new("de_DE", Project::new("demo", vec!["en_GB".into()], "en_GB"));

    let view = service
        .build(node, page(), &context, &Map::new(), ParameterMap::new())
        .await
        .unwrap();

    assert_eq!(
        view.data["bestsellers"],
        json!({ "items": [1, 2, 3, 4, 5], "total": 8 })
    );
    assert!(!view.data.contains_key("unused"));

    let first = view.page.tastics().next().unwrap();
    assert_eq!(first.configuration["title"], json!("Renner"));
    assert_eq!(first.configuration["mobile"], json!({ "hidden": true }));
}

#[tokio::test]
async fn unknown_stream_type_fails_in_place() {
    let root = workspace();
    let store = Arc::new(InMemoryTasticStore::new());
    TasticDefinitionLoader::new(root.path().join("tastics"))
        .load_into(store.as_ref())
        .unwrap();

    let service = StreamService::new(StreamHandlerRegistry::new(), store);
    let node = Node::new("home").with_stream(Stream::new("bestsellers", "product-list"));

    let data = service
        .get_stream_data(&node, &Context::default(), ParameterMap::new(), Some(&page()))
        .await
        .unwrap();

    assert_eq!(
        data["bestsellers"],
        json!({
            "ok": false,
            "message": "No stream handler for stream type product-list configured."
        })
    );
}

#[tokio::test]
async fn caller_limits_are_trimmed_by_the_optimizer() {
    let root = workspace();
    let mut registry = StreamHandlerRegistry::new();
    for handler in FixtureStreamHandler::discover(&root.path().join("fixtures")).unwrap() {
        registry.register(Arc::new(handler));
    }
    let service = StreamService::new(registry, Arc::new(InMemoryTasticStore::new()))
        .with_optimizer(Arc::new(LimitTrimOptimizer::new()));
    let node = Node::new("home")
        .with_stream(Stream::new("top", "product-list"))
        .with_stream(Stream::new("all", "product-list"));

    let mut parameters = ParameterMap::new();
    parameters
        .entry("top".into())
        .or_default()
        .insert("limit".into(), json!("2"));
    parameters
        .entry("all".into())
        .or_default()
        .insert("limit".into(), json!("lots"));

    let data = service
        .get_stream_data(&node, &Context::default(), parameters, None)
        .await
        .unwrap();

    assert_eq!(data["top"], json!({ "items": [1, 2], "total": 8 }));
    assert_eq!(
        data["all"],
        json!({ "items": [1, 2, 3, 4, 5, 6, 7, 8], "total": 8 })
    );
}

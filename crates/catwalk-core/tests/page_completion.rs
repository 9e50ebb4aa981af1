//! Integration tests for page data completion and the page view façade.

use std::sync::Arc;

use async_trait::async_trait;
use catwalk_core::{
    domain::{Cell, Region, SchemaGroup},
    prelude::*,
};
use mockall::mock;
use serde_json::{Map, Value, json};

mock! {
    pub Store {}

    impl TasticDefinitionStore for Store {
        fn tastics_by_type(&self) -> CatwalkResult<TasticMap>;
        fn get(&self, tastic_type: &str) -> CatwalkResult<TasticDefinition>;
        fn list(&self) -> CatwalkResult<Vec<TasticDefinition>>;
        fn insert(&self, definition: TasticDefinition) -> CatwalkResult<()>;
        fn remove(&self, tastic_type: &str) -> CatwalkResult<()>;
    }
}

/// Picks the `en` entry of translatable objects.
struct English;

impl FieldVisitor for English {
    fn process_field(&self, field: &FieldDefinition, value: Value, _path: &[String]) -> Value {
        if !field.translatable {
            return value;
        }
        value.get("en").cloned().unwrap_or(Value::Null)
    }
}

struct EnglishFactory;

impl FieldVisitorFactory for EnglishFactory {
    fn create_node_data_visitor(&self, _context: &Context) -> Box<dyn FieldVisitor> {
        Box::new(English)
    }

    fn create_tastic_data_visitor(
        &self,
        _context: &Context,
        _field_data: &Value,
    ) -> Box<dyn FieldVisitor> {
        Box::new(English)
    }
}

struct Products;

#[async_trait]
impl StreamHandler for Products {
    fn stream_type(&self) -> &str {
        "product-list"
    }

    async fn handle(
        &self,
        _stream: &Stream,
        _context: &Context,
        parameters: &Parameters,
    ) -> Result<Value, StreamError> {
        Ok(json!({ "limit": parameters.get("limit").cloned().unwrap_or(Value::Null) }))
    }
}

fn definitions() -> TasticMap {
    let hero = TasticDefinition::new(
        "hero",
        ConfigurationSchema::new(vec![
            SchemaGroup::new("Content")
                .with_field(FieldDefinition::scalar("headline", "string").translatable())
                .with_field(FieldDefinition::scalar("image", "media")),
        ]),
    );
    let slider = TasticDefinition::new(
        "product-slider",
        ConfigurationSchema::new(vec![
            SchemaGroup::new("Stream")
                .with_field(FieldDefinition::stream("stream", "product-list"))
                .with_field(
                    FieldDefinition::scalar("productCount", "integer").with_default(json!(6)),
                ),
        ]),
    );
    [hero, slider]
        .into_iter()
        .map(|definition| (definition.tastic_type.clone(), definition))
        .collect()
}

fn store() -> Arc<MockStore> {
    let mut store = MockStore::new();
    store.expect_tastics_by_type().returning(|| Ok(definitions()));
    Arc::new(store)
}

fn hero() -> TasticInstance {
    TasticInstance::new("t1", "hero")
        .with_value("headline", json!({ "en": "Hello", "de": "Hallo" }))
        .with_value("mobile", json!({ "headline": { "en": "Hi" }, "hidden": false }))
        .with_value("tablet", json!({ "columns": [1, 2], "hidden": true }))
        .with_value("desktop", json!({ "hidden": false }))
}

fn page() -> Page {
    Page::new("p1").with_region(
        Region::new("main").with_cell(
            Cell::new("c1")
                .with_tastic(hero())
                .with_tastic(TasticInstance::new("t2", "product-slider").with_value("stream", json!("s1")))
                .with_tastic(TasticInstance::new("t3", "removed").with_value("keep", json!(true))),
        ),
    )
}

#[test]
fn breakpoints_survive_completion_unchanged() {
    let service = PageDataCompletionService::new(store(), Arc::new(EnglishFactory));
    let original = hero();
    let mut page = page();

    service
        .complete_page_data(&mut page, &Node::new("n1"), &Context::default(), &Map::new())
        .unwrap();

    let completed = page.tastics().next().unwrap();
    assert_eq!(completed.configuration["headline"], json!("Hello"));
    assert_eq!(completed.configuration["image"], Value::Null);
    for key in ["mobile", "tablet", "desktop"] {
        assert_eq!(
            serde_json::to_string(&completed.configuration[key]).unwrap(),
            serde_json::to_string(&original.configuration[key]).unwrap(),
        );
    }
}

#[test]
fn unknown_tastic_types_are_left_alone() {
    let service = PageDataCompletionService::new(store(), Arc::new(EnglishFactory));
    let mut page = page();

    service
        .complete_page_data(&mut page, &Node::new("n1"), &Context::default(), &Map::new())
        .unwrap();

    let removed = page.tastics().last().unwrap();
    assert_eq!(removed.configuration["keep"], json!(true));
}

#[tokio::test]
async fn page_view_resolves_streams_of_the_completed_page() {
    let store = store();
    let completion = PageDataCompletionService::new(store.clone(), Arc::new(EnglishFactory));
    let streams = StreamService::new(
        StreamHandlerRegistry::new().with_handler(Arc::new(Products)),
        store,
    );
    let view_service = PageViewService::new(completion, streams);

    let node = Node::new("n1")
        .with_stream(Stream::new("s1", "product-list"))
        .with_stream(Stream::new("s2", "product-list"));

    let view = view_service
        .build(node, page(), &Context::default(), &Map::new(), ParameterMap::new())
        .await
        .unwrap();

    // productCount is only present after completion filled in its default.
    assert_eq!(view.data["s1"], json!({ "limit": 6 }));
    assert!(!view.data.contains_key("s2"));
    assert_eq!(view.page.tastic_count(), 3);
}

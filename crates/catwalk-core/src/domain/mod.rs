//! Core domain layer for Catwalk.
//!
//! This module contains pure business logic. All handler invocation,
//! definition storage and visitor construction go through ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Plain data**: Page, Node and schema types are serde documents
//! - **Pure analysis**: Usage analysis and schema completion never mutate input
//!
// Public API - what the world sees
pub mod action;
pub mod entities;
pub mod error;
pub mod usage;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use action::{ActionDispatchTable, ActionOutcome, ActionOverrides, ActionTarget};
pub use entities::{
    Account, Cell, Configuration, ConfigurationSchema, Context, FieldDefinition, FieldVisitor,
    Node, Page, Parameters, Project, Region, SchemaGroup, Session, Stream, TasticDefinition,
    TasticInstance, TasticMap,
};
pub use error::{DomainError, ErrorCategory};
pub use usage::{
    LIMIT_PARAMETER, ParameterMap, StreamUsage, UsageAnalyzer, UsageMap, UsedStream,
};
pub use value_objects::{Breakpoint, FieldKind, Limit};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    /// Visitor that upper-cases strings, for observing traversal.
    struct Shout;

    impl FieldVisitor for Shout {
        fn process_field(&self, _field: &FieldDefinition, value: Value, _path: &[String]) -> Value {
            match value {
                Value::String(s) => Value::String(s.to_uppercase()),
                other => other,
            }
        }
    }

    /// Visitor that records the path of every visited field.
    struct PathRecorder;

    impl FieldVisitor for PathRecorder {
        fn process_field(&self, field: &FieldDefinition, value: Value, path: &[String]) -> Value {
            if field.kind.is_group() {
                return value;
            }
            let mut full = path.to_vec();
            full.push(field.field.clone());
            Value::String(full.join("."))
        }
    }

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn field_kind_parses_from_schema_type() {
        assert_eq!(FieldKind::from("stream"), FieldKind::Stream);
        assert_eq!(FieldKind::from("group"), FieldKind::Group);
        assert_eq!(
            FieldKind::from("media"),
            FieldKind::Scalar("media".to_string())
        );
        assert_eq!(FieldKind::from("media").to_string(), "media");
    }

    #[test]
    fn limit_merge_is_max_with_unbounded_absorbing() {
        assert_eq!(
            Limit::Bounded(5).merge(Limit::Bounded(10)),
            Limit::Bounded(10)
        );
        assert_eq!(Limit::Bounded(5).merge(Limit::Unbounded), Limit::Unbounded);
        assert_eq!(Limit::Unbounded.merge(Limit::Bounded(5)), Limit::Unbounded);
    }

    #[test]
    fn limit_count_values() {
        assert_eq!(Limit::from_count_value(&json!(12)), Some(12));
        assert_eq!(Limit::from_count_value(&json!("7")), Some(7));
        assert_eq!(Limit::from_count_value(&json!(0)), None);
        assert_eq!(Limit::from_count_value(&json!(-3)), None);
        assert_eq!(Limit::from_count_value(&json!("many")), None);
        assert_eq!(Limit::from_count_value(&json!(null)), None);
    }

    // ========================================================================
    // Schema Tests
    // ========================================================================

    fn hero_schema() -> ConfigurationSchema {
        ConfigurationSchema::new(vec![
            SchemaGroup::new("Content")
                .with_field(FieldDefinition::scalar("title", "string"))
                .with_field(FieldDefinition::scalar("align", "enum").with_default(json!("left"))),
            SchemaGroup::new("Links").with_field(FieldDefinition::group(
                "links",
                vec![FieldDefinition::scalar("label", "string")],
            )),
        ])
    }

    #[test]
    fn schema_deserializes_wire_format() {
        let definition: TasticDefinition = serde_json::from_value(json!({
            "tasticType": "product-slider",
            "name": "Product Slider",
            "configurationSchema": {
                "schema": [{
                    "name": "Stream",
                    "fields": [
                        { "field": "stream", "type": "stream", "streamType": "product-list" },
                        { "field": "productCount", "type": "integer", "default": 6 }
                    ]
                }]
            }
        }))
        .unwrap();

        let fields: Vec<_> = definition.configuration_schema.fields().collect();
        assert_eq!(fields.len(), 2);
        assert!(fields[0].kind.is_stream());
        assert_eq!(fields[0].stream_type.as_deref(), Some("product-list"));
        assert_eq!(fields[1].default, Some(json!(6)));
    }

    #[test]
    fn complete_values_applies_defaults_and_visitor() {
        let configuration = json!({ "title": "hello", "unknown": 1 });
        let completed = hero_schema().complete_values(configuration.as_object().unwrap(), &Shout);

        assert_eq!(completed["title"], json!("HELLO"));
        assert_eq!(completed["align"], json!("LEFT"));
        assert_eq!(completed["links"], json!([]));
        assert!(!completed.contains_key("unknown"));
    }

    #[test]
    fn complete_values_walks_groups_with_paths() {
        let configuration = json!({ "links": [{ "label": "a" }, { "label": "b" }] });
        let completed =
            hero_schema().complete_values(configuration.as_object().unwrap(), &PathRecorder);

        assert_eq!(completed["title"], json!("title"));
        assert_eq!(
            completed["links"],
            json!([{ "label": "links.0.label" }, { "label": "links.1.label" }])
        );
    }

    #[test]
    fn complete_values_treats_malformed_group_as_empty() {
        let configuration = json!({ "links": { "label": "not a list" } });
        let completed = hero_schema().complete_values(configuration.as_object().unwrap(), &Shout);

        assert_eq!(completed["links"], json!([]));
    }

    #[test]
    fn definition_validation() {
        assert!(TasticDefinition::new("hero", hero_schema()).validate().is_ok());

        let duplicate = TasticDefinition::new(
            "hero",
            ConfigurationSchema::new(vec![
                SchemaGroup::new("A").with_field(FieldDefinition::scalar("title", "string")),
                SchemaGroup::new("B").with_field(FieldDefinition::scalar("title", "string")),
            ]),
        );
        assert!(matches!(
            duplicate.validate(),
            Err(DomainError::DuplicateField { .. })
        ));

        let empty_group = TasticDefinition::new(
            "hero",
            ConfigurationSchema::new(vec![
                SchemaGroup::new("A").with_field(FieldDefinition::group("links", vec![])),
            ]),
        );
        assert!(empty_group.validate().is_err());

        assert!(TasticDefinition::new(" ", hero_schema()).validate().is_err());
    }

    // ========================================================================
    // Node Tests
    // ========================================================================

    #[test]
    fn node_validation_rejects_duplicates() {
        let node = Node::new("n1")
            .with_stream(Stream::new("s1", "product-list"))
            .with_stream(Stream::new("s1", "content"));

        assert!(DomainValidator::validate_node(&node).is_err());
        assert_eq!(node.unique_streams().len(), 1);
        assert_eq!(
            node.unique_streams()[0].stream_type.as_deref(),
            Some("product-list")
        );
    }

    #[test]
    fn stream_parameters_take_precedence() {
        let stream = Stream::new("s1", "product-list")
            .with_configuration("limit", json!(50))
            .with_configuration("category", json!("shoes"));
        let parameters = Parameters::from_iter([("limit".to_string(), json!(5))]);

        let merged = stream.with_parameters(&parameters);

        assert_eq!(merged.configuration["limit"], json!(5));
        assert_eq!(merged.configuration["category"], json!("shoes"));
        assert_eq!(stream.configuration["limit"], json!(50));
    }

    #[test]
    fn empty_stream_type_has_no_dispatch_type() {
        let mut stream = Stream::new("s1", "  ");
        assert_eq!(stream.dispatch_type(), None);
        stream.stream_type = None;
        assert_eq!(stream.dispatch_type(), None);
    }

    #[test]
    fn stream_deserializes_type_key() {
        let stream: Stream = serde_json::from_value(json!({
            "streamId": "s1",
            "type": "product-list",
            "configuration": { "category": "shoes" }
        }))
        .unwrap();

        assert_eq!(stream.dispatch_type(), Some("product-list"));
        assert!(stream.tastics.is_empty());
    }
}

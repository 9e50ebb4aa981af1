//! Inlines externally supplied field data into a tastic's configuration.

use serde_json::Value;

use catwalk_core::domain::{FieldDefinition, FieldVisitor};

/// Replaces top-level fields with values from the tastic's field data.
///
/// `field_data` is an object keyed by field name. Nested fields and fields
/// without an entry keep their configured value.
#[derive(Debug, Clone)]
pub struct FieldDataInlineVisitor {
    field_data: Value,
}

impl FieldDataInlineVisitor {
    pub fn new(field_data: Value) -> Self {
        Self { field_data }
    }
}

impl FieldVisitor for FieldDataInlineVisitor {
    fn process_field(&self, field: &FieldDefinition, value: Value, path: &[String]) -> Value {
        if !path.is_empty() {
            return value;
        }
        match self.field_data.get(&field.field) {
            Some(data) => data.clone(),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inlines_top_level_fields_only() {
        let visitor = FieldDataInlineVisitor::new(json!({ "stream": { "items": [1] } }));
        let field = FieldDefinition::stream("stream", "product-list");

        assert_eq!(
            visitor.process_field(&field, json!("s1"), &[]),
            json!({ "items": [1] })
        );
        assert_eq!(
            visitor.process_field(&field, json!("s1"), &["teasers".into(), "0".into()]),
            json!("s1")
        );
    }

    #[test]
    fn null_field_data_changes_nothing() {
        let visitor = FieldDataInlineVisitor::new(Value::Null);

        assert_eq!(
            visitor.process_field(&FieldDefinition::scalar("title", "string"), json!("a"), &[]),
            json!("a")
        );
    }
}

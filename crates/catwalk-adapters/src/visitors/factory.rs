//! Default field visitor factory.

use serde_json::Value;

use catwalk_core::{
    application::ports::FieldVisitorFactory,
    domain::{Context, FieldVisitor},
};

use super::{FieldDataInlineVisitor, SelectTranslationVisitor, SequentialVisitor};

/// Node data: translation selection.
/// Tastic data: field data inlining, then translation selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldVisitorFactory;

impl DefaultFieldVisitorFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FieldVisitorFactory for DefaultFieldVisitorFactory {
    fn create_node_data_visitor(&self, context: &Context) -> Box<dyn FieldVisitor> {
        Box::new(SelectTranslationVisitor::new(context))
    }

    fn create_tastic_data_visitor(
        &self,
        context: &Context,
        field_data: &Value,
    ) -> Box<dyn FieldVisitor> {
        Box::new(
            SequentialVisitor::default()
                .then(Box::new(FieldDataInlineVisitor::new(field_data.clone())))
                .then(Box::new(SelectTranslationVisitor::new(context))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catwalk_core::domain::{FieldDefinition, Project};
    use serde_json::json;

    #[test]
    fn tastic_visitor_inlines_then_translates() {
        let context = Context::new("fr_CH", Project::new("demo", vec![], "de_CH"));
        let visitor = DefaultFieldVisitorFactory::new().create_tastic_data_visitor(
            &context,
            &json!({ "headline": { "de_CH": "Hallo", "fr_CH": "Bonjour" } }),
        );
        let field = FieldDefinition::scalar("headline", "string").translatable();

        assert_eq!(
            visitor.process_field(&field, json!({ "de_CH": "stale" }), &[]),
            json!("Bonjour")
        );
    }
}

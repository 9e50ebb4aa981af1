//! Page Data Completion Service.
//!
//! Replaces each tastic instance's configuration with the completed values
//! of its schema, as produced by a request-scoped field visitor. The node's
//! custom data goes through the same walk against an optional node schema.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    application::ports::{FieldVisitorFactory, TasticDefinitionStore},
    domain::{ConfigurationSchema, Context, Node, Page},
    error::CatwalkResult,
};

/// Completes tastic and node configuration in place.
pub struct PageDataCompletionService {
    tastics: Arc<dyn TasticDefinitionStore>,
    visitors: Arc<dyn FieldVisitorFactory>,
    node_schema: Option<ConfigurationSchema>,
}

impl PageDataCompletionService {
    pub fn new(
        tastics: Arc<dyn TasticDefinitionStore>,
        visitors: Arc<dyn FieldVisitorFactory>,
    ) -> Self {
        Self {
            tastics,
            visitors,
            node_schema: None,
        }
    }

    /// Schema for the node's custom configuration.
    pub fn with_node_schema(mut self, schema: ConfigurationSchema) -> Self {
        self.node_schema = Some(schema);
        self
    }

    /// Complete the node's custom configuration.
    ///
    /// Without a node schema the node is left untouched.
    #[instrument(skip_all, fields(node_id = %node.node_id))]
    pub fn complete_node_data(&self, node: &mut Node, context: &Context) {
        let Some(schema) = &self.node_schema else {
            debug!("No node schema configured, skipping node data completion");
            return;
        };

        let visitor = self.visitors.create_node_data_visitor(context);
        node.configuration = schema.complete_values(&node.configuration, visitor.as_ref());
    }

    /// Complete the configuration of every tastic instance on `page`.
    ///
    /// `tastic_field_data` holds externally supplied field data keyed by
    /// tastic instance id. Instances of unknown tastic types are left as they
    /// are. The `mobile`, `tablet` and `desktop` keys survive unchanged.
    #[instrument(skip_all, fields(page_id = %page.page_id, node_id = %node.node_id))]
    pub fn complete_page_data(
        &self,
        page: &mut Page,
        node: &Node,
        context: &Context,
        tastic_field_data: &Map<String, Value>,
    ) -> CatwalkResult<()> {
        let tastics = self.tastics.tastics_by_type()?;

        let mut completed = 0usize;
        for tastic in page.tastics_mut() {
            let Some(definition) = tastics.get(&tastic.tastic_type) else {
                debug!(
                    tastic_id = %tastic.tastic_id,
                    tastic_type = %tastic.tastic_type,
                    "No definition for tastic type, skipping completion"
                );
                continue;
            };

            let field_data = tastic_field_data
                .get(&tastic.tastic_id)
                .cloned()
                .unwrap_or(Value::Null);
            let visitor = self
                .visitors
                .create_tastic_data_visitor(context, &field_data);

            let backup = tastic.breakpoint_backup();
            let configuration = definition
                .configuration_schema
                .complete_values(&tastic.configuration, visitor.as_ref());
            tastic.replace_configuration(configuration, backup);
            completed += 1;
        }

        debug!(completed, total = page.tastic_count(), "Page data completed");
        Ok(())
    }
}

//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `catwalk-adapters` crate provides implementations.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::StreamError;
use crate::domain::{Context, FieldVisitor, Node, Page, Parameters, Stream, TasticDefinition, TasticMap};
use crate::error::CatwalkResult;

/// Port for resolving one stream type.
///
/// Implemented by:
/// - `catwalk_adapters::stream_handlers::FixtureStreamHandler` (JSON fixtures)
/// - `catwalk_adapters::stream_handlers::AccountWishlists` (wishlist API)
///
/// ## Design Notes
///
/// - Handlers are shared across concurrently running resolutions
/// - `stream` arrives with its configuration already extended by `parameters`
/// - A returned error or a panic only fails this stream's result slot
#[async_trait]
pub trait StreamHandler: Send + Sync {
    /// Stream type this handler is registered for.
    fn stream_type(&self) -> &str;

    /// Resolve the stream to its payload.
    async fn handle(
        &self,
        stream: &Stream,
        context: &Context,
        parameters: &Parameters,
    ) -> Result<Value, StreamError>;
}

/// Everything an optimizer may look at besides the payload itself.
#[derive(Debug, Clone, Copy)]
pub struct StreamContext<'a> {
    pub node: &'a Node,
    pub page: Option<&'a Page>,
    pub context: &'a Context,
    /// Parameters the stream was resolved with.
    pub parameters: &'a Parameters,
    /// Ids of the tastic instances consuming the stream.
    pub using_tastics: &'a [String],
}

/// Port for post-processing resolved stream payloads.
///
/// Optimizers run in registration order; each receives the previous one's
/// output. Failure payloads (`ok: false`) are expected to pass through
/// unchanged.
pub trait StreamOptimizer: Send + Sync {
    /// Name used in logs and error reports.
    fn optimizer_type(&self) -> &str;

    fn optimize_stream_data(
        &self,
        stream: &Stream,
        stream_context: &StreamContext<'_>,
        payload: Value,
    ) -> Result<Value, StreamError>;
}

/// Port for tastic definition storage and retrieval.
///
/// Implemented by:
/// - `catwalk_adapters::tastic_store::InMemoryTasticStore`
#[cfg_attr(test, mockall::automock)]
pub trait TasticDefinitionStore: Send + Sync {
    /// All definitions keyed by tastic type.
    fn tastics_by_type(&self) -> CatwalkResult<TasticMap>;

    /// Get a specific definition.
    fn get(&self, tastic_type: &str) -> CatwalkResult<TasticDefinition>;

    /// List all definitions.
    fn list(&self) -> CatwalkResult<Vec<TasticDefinition>>;

    /// Insert or update a definition.
    fn insert(&self, definition: TasticDefinition) -> CatwalkResult<()>;

    /// Remove a definition.
    fn remove(&self, tastic_type: &str) -> CatwalkResult<()>;
}

/// Port for building field visitors for one request.
///
/// Implemented by:
/// - `catwalk_adapters::visitors::DefaultFieldVisitorFactory`
pub trait FieldVisitorFactory: Send + Sync {
    /// Visitor for the node's custom data.
    fn create_node_data_visitor(&self, context: &Context) -> Box<dyn FieldVisitor>;

    /// Visitor for one tastic instance, given its externally supplied field data.
    fn create_tastic_data_visitor(
        &self,
        context: &Context,
        field_data: &Value,
    ) -> Box<dyn FieldVisitor>;
}

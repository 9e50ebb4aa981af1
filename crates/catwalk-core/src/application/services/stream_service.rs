//! Stream Service - resolves a node's streams for one request.
//!
//! The resolution workflow:
//! 1. Analyse which streams the page uses and compute their limits
//! 2. Spawn one task per stream on the registered handler (fan-out)
//! 3. Join every task, turning errors and panics into failure payloads (fan-in)
//! 4. Run each payload through the optimizer chain
//!
//! A failing stream only affects its own slot in the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::task::JoinError;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::{
    application::{
        ApplicationError, StreamError,
        ports::{StreamContext, StreamHandler, StreamOptimizer, TasticDefinitionStore},
        services::StreamHandlerRegistry,
    },
    domain::{Context, Node, Page, ParameterMap, Parameters, Stream, UsageAnalyzer, UsedStream},
    error::CatwalkResult,
};

/// Stream id → payload (or failure payload).
pub type StreamData = BTreeMap<String, Value>;

/// Resolves streams through registered handlers and optimizers.
pub struct StreamService {
    handlers: StreamHandlerRegistry,
    optimizers: Vec<Arc<dyn StreamOptimizer>>,
    tastics: Arc<dyn TasticDefinitionStore>,
    analyzer: UsageAnalyzer,
    debug: bool,
}

/// One stream ready to be resolved.
struct Job {
    stream: Stream,
    parameters: Parameters,
    using_tastics: Vec<String>,
}

impl StreamService {
    /// Create a new stream service.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use catwalk_core::application::{StreamHandlerRegistry, StreamService};
    ///
    /// let service = StreamService::new(registry, tastic_store)
    ///     .with_optimizer(limit_trim)
    ///     .with_debug(true);
    /// ```
    pub fn new(handlers: StreamHandlerRegistry, tastics: Arc<dyn TasticDefinitionStore>) -> Self {
        Self {
            handlers,
            optimizers: Vec::new(),
            tastics,
            analyzer: UsageAnalyzer::default(),
            debug: false,
        }
    }

    /// Append an optimizer; optimizers run in the order they were added.
    pub fn with_optimizer(mut self, optimizer: Arc<dyn StreamOptimizer>) -> Self {
        self.optimizers.push(optimizer);
        self
    }

    pub fn with_analyzer(mut self, analyzer: UsageAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Include trace and source location in failure payloads.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn handlers(&self) -> &StreamHandlerRegistry {
        &self.handlers
    }

    /// Streams of `node` used on `page`, writing computed limits into
    /// `parameter_map`.
    #[instrument(skip_all, fields(node_id = %node.node_id, page_id = %page.page_id))]
    pub fn get_used_streams(
        &self,
        node: &Node,
        page: &Page,
        parameter_map: &mut ParameterMap,
    ) -> CatwalkResult<Vec<UsedStream>> {
        let tastics = self.tastics.tastics_by_type()?;
        let used = self
            .analyzer
            .used_streams(node, page, &tastics, parameter_map);

        debug!(
            declared = node.streams.len(),
            used = used.len(),
            "Stream usage analysed"
        );
        Ok(used)
    }

    /// Resolve stream data for a request.
    ///
    /// With a `page`, only the streams it uses are resolved and their limits
    /// are added to the parameters. Without one, every stream of the node is
    /// resolved with the caller's parameters.
    ///
    /// Only a failure to read tastic definitions fails the call; everything
    /// that goes wrong for a single stream ends up in that stream's slot.
    #[instrument(
        skip_all,
        fields(
            node_id = %node.node_id,
            page_id = page.map(|p| p.page_id.as_str()).unwrap_or("-")
        )
    )]
    pub async fn get_stream_data(
        &self,
        node: &Node,
        context: &Context,
        mut parameter_map: ParameterMap,
        page: Option<&Page>,
    ) -> CatwalkResult<StreamData> {
        let streams: Vec<(Stream, Vec<String>)> = match page {
            Some(page) => self
                .get_used_streams(node, page, &mut parameter_map)?
                .into_iter()
                .map(|used| (used.stream, used.usage.tastics))
                .collect(),
            None => node
                .unique_streams()
                .into_iter()
                .map(|stream| (stream.clone(), stream.tastics.clone()))
                .collect(),
        };

        let jobs: Vec<Job> = streams
            .into_iter()
            .map(|(stream, using_tastics)| {
                let parameters = parameter_map
                    .get(&stream.stream_id)
                    .cloned()
                    .unwrap_or_default();
                Job {
                    stream: stream.with_parameters(&parameters),
                    parameters,
                    using_tastics,
                }
            })
            .collect();

        info!(streams = jobs.len(), "Resolving streams");

        let results = self.resolve_all(&jobs, context).await;

        let mut data = StreamData::new();
        for (job, result) in jobs.iter().zip(results) {
            let payload = match result {
                Ok(payload) => payload,
                Err(error) => error.into_payload(self.debug),
            };

            let stream_context = StreamContext {
                node,
                page,
                context,
                parameters: &job.parameters,
                using_tastics: &job.using_tastics,
            };
            let payload = self.optimize(&job.stream, &stream_context, payload);
            data.insert(job.stream.stream_id.clone(), payload);
        }

        Ok(data)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Fan out one task per job and collect the results in job order.
    async fn resolve_all(&self, jobs: &[Job], context: &Context) -> Vec<Result<Value, StreamError>> {
        let context = Arc::new(context.clone());

        let mut results: Vec<Option<Result<Value, StreamError>>> = Vec::with_capacity(jobs.len());
        let mut spawned = Vec::new();

        for (index, job) in jobs.iter().enumerate() {
            match self.handler_for(&job.stream) {
                Ok(handler) => {
                    let stream = job.stream.clone();
                    let parameters = job.parameters.clone();
                    let context = Arc::clone(&context);
                    let span = info_span!("stream", stream_id = %stream.stream_id);

                    let handle = tokio::spawn(
                        async move { handler.handle(&stream, &context, &parameters).await }
                            .instrument(span),
                    );
                    spawned.push((index, handle));
                    results.push(None);
                }
                Err(error) => {
                    warn!(error = %error, "Stream not dispatched");
                    results.push(Some(Err(StreamError::from_application(&error))));
                }
            }
        }

        let (indices, handles): (Vec<_>, Vec<_>) = spawned.into_iter().unzip();
        for (index, joined) in indices.into_iter().zip(join_all(handles).await) {
            let result = joined.unwrap_or_else(|error| Err(join_failure(error)));
            if let Err(error) = &result {
                warn!(
                    error = %ApplicationError::HandlerExecution {
                        stream_id: jobs[index].stream.stream_id.clone(),
                        message: error.message().to_string(),
                    },
                    "Stream failed"
                );
            }
            results[index] = Some(result);
        }

        results
            .into_iter()
            .map(|result| result.unwrap_or_else(|| Err(StreamError::new("Stream was not resolved"))))
            .collect()
    }

    fn handler_for(&self, stream: &Stream) -> Result<Arc<dyn StreamHandler>, ApplicationError> {
        let stream_type =
            stream
                .dispatch_type()
                .ok_or_else(|| ApplicationError::MissingStreamType {
                    stream_id: stream.stream_id.clone(),
                })?;
        self.handlers.lookup(stream_type)
    }

    /// Run the optimizer chain; the first failing optimizer ends it.
    fn optimize(&self, stream: &Stream, stream_context: &StreamContext<'_>, payload: Value) -> Value {
        let mut payload = payload;
        for optimizer in &self.optimizers {
            match optimizer.optimize_stream_data(stream, stream_context, payload) {
                Ok(optimized) => payload = optimized,
                Err(error) => {
                    warn!(
                        error = %ApplicationError::OptimizerFailed {
                            optimizer: optimizer.optimizer_type().to_string(),
                            stream_id: stream.stream_id.clone(),
                            message: error.message().to_string(),
                        },
                        "Optimizer failed"
                    );
                    return error.into_payload(self.debug);
                }
            }
        }
        payload
    }
}

/// Failure for a handler task that did not complete.
fn join_failure(error: JoinError) -> StreamError {
    if !error.is_panic() {
        return StreamError::new("Stream task was cancelled");
    }

    let panic = error.into_panic();
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    StreamError::panicked(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{is_failure_payload, ports::MockTasticDefinitionStore};
    use crate::domain::TasticMap;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl StreamHandler for Echo {
        fn stream_type(&self) -> &str {
            "echo"
        }

        async fn handle(
            &self,
            stream: &Stream,
            _context: &Context,
            parameters: &Parameters,
        ) -> Result<Value, StreamError> {
            Ok(json!({
                "configuration": stream.configuration,
                "parameters": parameters,
            }))
        }
    }

    fn service() -> StreamService {
        let mut store = MockTasticDefinitionStore::new();
        store.expect_tastics_by_type().returning(|| Ok(TasticMap::new()));
        StreamService::new(
            StreamHandlerRegistry::new().with_handler(Arc::new(Echo)),
            Arc::new(store),
        )
    }

    #[tokio::test]
    async fn resolves_all_node_streams_without_page() {
        let node = Node::new("n1")
            .with_stream(Stream::new("a", "echo").with_configuration("category", json!("shoes")))
            .with_stream(Stream::new("b", "echo"));
        let mut parameters = ParameterMap::new();
        parameters
            .entry("a".into())
            .or_default()
            .insert("category".into(), json!("boots"));

        let data = service()
            .get_stream_data(&node, &Context::default(), parameters, None)
            .await
            .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data["a"]["configuration"]["category"], json!("boots"));
        assert_eq!(data["a"]["parameters"]["category"], json!("boots"));
        assert_eq!(data["b"]["parameters"], json!({}));
    }

    #[tokio::test]
    async fn missing_type_fails_only_its_slot() {
        let node = Node::new("n1")
            .with_stream(Stream::untyped("a"))
            .with_stream(Stream::new("b", "echo"));

        let data = service()
            .get_stream_data(&node, &Context::default(), ParameterMap::new(), None)
            .await
            .unwrap();

        assert!(is_failure_payload(&data["a"]));
        assert!(!is_failure_payload(&data["b"]));
    }

    struct Boom;

    #[async_trait]
    impl StreamHandler for Boom {
        fn stream_type(&self) -> &str {
            "boom"
        }

        async fn handle(
            &self,
            _stream: &Stream,
            _context: &Context,
            _parameters: &Parameters,
        ) -> Result<Value, StreamError> {
            Err(StreamError::new("boom"))
        }
    }

    /// Log sink shared with a fmt subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn failed_slots_are_logged_with_their_own_error() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut store = MockTasticDefinitionStore::new();
        store.expect_tastics_by_type().returning(|| Ok(TasticMap::new()));
        let service = StreamService::new(
            StreamHandlerRegistry::new().with_handler(Arc::new(Boom)),
            Arc::new(store),
        );
        let node = Node::new("n1")
            .with_stream(Stream::untyped("a"))
            .with_stream(Stream::new("b", "boom"))
            .with_stream(Stream::new("c", "nope"));

        service
            .get_stream_data(&node, &Context::default(), ParameterMap::new(), None)
            .await
            .unwrap();

        let logs = logs.contents();
        assert!(logs.contains("The stream a has no type"));
        assert!(!logs.contains("Stream a failed"));
        assert!(logs.contains("No stream handler for stream type nope configured."));
        assert!(!logs.contains("Stream c failed"));
        assert!(logs.contains("Stream b failed: boom"));
    }

    #[tokio::test]
    async fn definition_store_failure_fails_the_call() {
        let mut store = MockTasticDefinitionStore::new();
        store
            .expect_tastics_by_type()
            .returning(|| Err(ApplicationError::StoreLockError.into()));
        let service = StreamService::new(StreamHandlerRegistry::new(), Arc::new(store));

        let result = service
            .get_stream_data(
                &Node::new("n1"),
                &Context::default(),
                ParameterMap::new(),
                Some(&Page::new("p1")),
            )
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn cancelled_task_is_a_failure() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let error = runtime.block_on(async {
            let handle = tokio::spawn(std::future::pending::<()>());
            handle.abort();
            handle.await.unwrap_err()
        });

        assert_eq!(join_failure(error).message(), "Stream task was cancelled");
    }
}

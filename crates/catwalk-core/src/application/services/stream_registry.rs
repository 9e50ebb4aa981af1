//! Stream handler registry.
//!
//! Maps stream types to the handler resolving them. Built once at startup
//! and shared read-only by every resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ports::StreamHandler};

/// Stream type → handler.
#[derive(Clone, Default)]
pub struct StreamHandlerRegistry {
    handlers: HashMap<String, Arc<dyn StreamHandler>>,
}

impl StreamHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own stream type.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn StreamHandler>) {
        let stream_type = handler.stream_type().to_string();
        if self.handlers.insert(stream_type.clone(), handler).is_some() {
            debug!(%stream_type, "Replaced stream handler");
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_handler(mut self, handler: Arc<dyn StreamHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn lookup(&self, stream_type: &str) -> Result<Arc<dyn StreamHandler>, ApplicationError> {
        self.handlers
            .get(stream_type)
            .cloned()
            .ok_or_else(|| ApplicationError::UnknownStreamHandler {
                stream_type: stream_type.to_string(),
            })
    }

    pub fn contains(&self, stream_type: &str) -> bool {
        self.handlers.contains_key(stream_type)
    }

    /// Registered stream types, sorted.
    pub fn stream_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for StreamHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandlerRegistry")
            .field("stream_types", &self.stream_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::StreamError;
    use crate::domain::{Context, Parameters, Stream};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Fixed(&'static str, Value);

    #[async_trait]
    impl StreamHandler for Fixed {
        fn stream_type(&self) -> &str {
            self.0
        }

        async fn handle(
            &self,
            _stream: &Stream,
            _context: &Context,
            _parameters: &Parameters,
        ) -> Result<Value, StreamError> {
            Ok(self.1.clone())
        }
    }

    #[test]
    fn lookup_unknown_type_fails() {
        let registry = StreamHandlerRegistry::new().with_handler(Arc::new(Fixed("content", json!(1))));

        assert!(registry.contains("content"));
        assert!(matches!(
            registry.lookup("product-list"),
            Err(ApplicationError::UnknownStreamHandler { stream_type }) if stream_type == "product-list"
        ));
    }

    #[tokio::test]
    async fn later_registration_wins() {
        let registry = StreamHandlerRegistry::new()
            .with_handler(Arc::new(Fixed("content", json!(1))))
            .with_handler(Arc::new(Fixed("content", json!(2))));

        assert_eq!(registry.len(), 1);
        let handler = registry.lookup("content").unwrap();
        let payload = handler
            .handle(
                &Stream::new("s1", "content"),
                &Context::default(),
                &Parameters::new(),
            )
            .await
            .unwrap();
        assert_eq!(payload, json!(2));
    }
}

//! Trims list payloads to the stream's `limit` parameter.

use serde_json::Value;
use tracing::{trace, warn};

use catwalk_core::{
    application::{StreamContext, StreamError, is_failure_payload, ports::StreamOptimizer},
    domain::{LIMIT_PARAMETER, Limit, Stream},
};

/// Cuts array payloads (or an object's `items` array) down to `limit`.
///
/// Handlers may return more results than the page displays; this keeps the
/// rendered payload to what the consuming tastics asked for. A `limit` is
/// read like a tastic count, so `5` and `"5"` both trim. Payloads without a
/// usable `limit` and failure payloads pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitTrimOptimizer;

impl LimitTrimOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl StreamOptimizer for LimitTrimOptimizer {
    fn optimizer_type(&self) -> &str {
        "limit-trim"
    }

    fn optimize_stream_data(
        &self,
        stream: &Stream,
        stream_context: &StreamContext<'_>,
        payload: Value,
    ) -> Result<Value, StreamError> {
        if is_failure_payload(&payload) {
            return Ok(payload);
        }

        let Some(raw) = stream_context.parameters.get(LIMIT_PARAMETER) else {
            return Ok(payload);
        };
        let Some(limit) = Limit::from_count_value(raw).and_then(|limit| usize::try_from(limit).ok())
        else {
            warn!(stream_id = %stream.stream_id, limit = %raw, "Ignoring unusable limit parameter");
            return Ok(payload);
        };

        trace!(stream_id = %stream.stream_id, limit, "Trimming stream payload");
        Ok(truncate(payload, limit))
    }
}

/// Truncate an array payload, or the `items` array of an object payload.
fn truncate(mut payload: Value, limit: usize) -> Value {
    let items = match &mut payload {
        Value::Array(items) => Some(items),
        Value::Object(object) => object.get_mut("items").and_then(Value::as_array_mut),
        _ => None,
    };
    if let Some(items) = items {
        items.truncate(limit);
    }
    payload
}

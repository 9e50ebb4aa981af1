//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.
//!
//! [`StreamError`] is the error type of the handler and optimizer ports. It
//! records where it was raised so that debug builds of the failure payload
//! can point at the offending code.

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The stream has no `type` to dispatch on.
    #[error("The stream {stream_id} has no type")]
    MissingStreamType { stream_id: String },

    /// No handler is registered for the stream's type.
    #[error("No stream handler for stream type {stream_type} configured.")]
    UnknownStreamHandler { stream_type: String },

    /// A handler failed while resolving a stream.
    #[error("Stream {stream_id} failed: {message}")]
    HandlerExecution { stream_id: String, message: String },

    /// An optimizer failed while post-processing a stream.
    #[error("Optimizer {optimizer} failed on stream {stream_id}: {message}")]
    OptimizerFailed {
        optimizer: String,
        stream_id: String,
        message: String,
    },

    /// No tastic definition is registered for the type.
    #[error("Tastic definition not found: {tastic_type}")]
    DefinitionNotFound { tastic_type: String },

    /// Tastic definitions could not be loaded.
    #[error("Failed to load tastic definitions from {path}: {reason}")]
    DefinitionLoad { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Tastic store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingStreamType { stream_id } => vec![
                format!("Stream '{}' is declared without a type", stream_id),
                "Set \"type\" on the stream in the node definition".into(),
            ],
            Self::UnknownStreamHandler { stream_type } => vec![
                format!("No handler is registered for '{}'", stream_type),
                "Register a StreamHandler for this type".into(),
                "Or fix the stream type in the node definition".into(),
            ],
            Self::DefinitionNotFound { tastic_type } => vec![
                format!("No tastic definition for '{}'", tastic_type),
                "Try: catwalk tastics to list known definitions".into(),
            ],
            Self::DefinitionLoad { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Each tastic directory needs a valid tastic.json".into(),
            ],
            Self::StoreLockError => vec![
                "The tastic store is locked".into(),
                "Try again in a moment".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingStreamType { .. } => ErrorCategory::Validation,
            Self::UnknownStreamHandler { .. } => ErrorCategory::Configuration,
            Self::HandlerExecution { .. } | Self::OptimizerFailed { .. } => {
                ErrorCategory::Internal
            }
            Self::DefinitionNotFound { .. } => ErrorCategory::NotFound,
            Self::DefinitionLoad { .. } => ErrorCategory::Configuration,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

// ── StreamError ───────────────────────────────────────────────────────────────

/// Failure raised by a stream handler or optimizer.
///
/// Any `std::error::Error` converts into a `StreamError` with `?`; the
/// source chain is kept as the trace and the conversion site as the location.
/// `StreamError` must not implement `std::error::Error`: the blanket `From`
/// impl would overlap with `From<T> for T`.
pub struct StreamError {
    message: String,
    trace: Vec<String>,
    location: &'static Location<'static>,
}

impl StreamError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Vec::new(),
            location: Location::caller(),
        }
    }

    /// Build a `StreamError` from an application error.
    #[track_caller]
    pub fn from_application(error: &ApplicationError) -> Self {
        Self::new(error.to_string())
    }

    /// Build a `StreamError` for a handler task that panicked.
    #[track_caller]
    pub fn panicked(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            message: format!("Stream handler panicked: {detail}"),
            trace: vec![detail],
            location: Location::caller(),
        }
    }

    /// Add a line to the trace.
    pub fn with_trace(mut self, line: impl Into<String>) -> Self {
        self.trace.push(line.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// Convert into the wire-visible failure payload.
    ///
    /// `trace`, `file` and `line` are only included when `debug` is set.
    pub fn into_payload(self, debug: bool) -> Value {
        let failure = StreamFailure {
            ok: false,
            message: self.message,
            debug: debug.then(|| FailureDetail {
                trace: self.trace,
                file: self.location.file().to_string(),
                line: self.location.line(),
            }),
        };
        serde_json::to_value(failure).unwrap_or_else(|_| {
            serde_json::json!({ "ok": false, "message": "failed to serialize stream failure" })
        })
    }
}

impl<E> From<E> for StreamError
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let mut trace = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            trace,
            location: Location::caller(),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamError")
            .field("message", &self.message)
            .field("trace", &self.trace)
            .field("location", &format_args!("{}", self.location))
            .finish()
    }
}

/// `{ ok: false, message, [trace, file, line] }`
#[derive(Debug, Serialize)]
struct StreamFailure {
    ok: bool,
    message: String,
    #[serde(flatten)]
    debug: Option<FailureDetail>,
}

#[derive(Debug, Serialize)]
struct FailureDetail {
    trace: Vec<String>,
    file: String,
    line: u32,
}

/// Whether a payload is the failure shape produced by [`StreamError::into_payload`].
pub fn is_failure_payload(payload: &Value) -> bool {
    payload.get("ok").and_then(Value::as_bool) == Some(false)
}

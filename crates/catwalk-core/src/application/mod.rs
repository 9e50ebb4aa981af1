//! Application layer for Catwalk.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (StreamService, PageDataCompletionService, PageViewService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Usage analysis and schema completion live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    PageDataCompletionService, PageView, PageViewService, StreamData, StreamHandlerRegistry,
    StreamService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    FieldVisitorFactory, StreamContext, StreamHandler, StreamOptimizer, TasticDefinitionStore,
};

pub use error::{ApplicationError, StreamError, is_failure_payload};

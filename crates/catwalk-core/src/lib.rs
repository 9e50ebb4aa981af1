//! Catwalk Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Catwalk, the
//! request-scoped core of a storefront page renderer: it works out which
//! streams a page uses, resolves them concurrently and completes tastic
//! configuration data.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           catwalk-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (StreamService, PageDataCompletion,    │
//! │   PageViewService)                      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (StreamHandler, StreamOptimizer,        │
//! │  TasticDefinitionStore, VisitorFactory) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    catwalk-adapters (Infrastructure)    │
//! │ (InMemoryTasticStore, handlers, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Page, Node, Schema, UsageAnalyzer)    │
//! │         No I/O, no async                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catwalk_core::prelude::*;
//!
//! # async fn run(
//! #     handler: Arc<dyn StreamHandler>,
//! #     store: Arc<dyn TasticDefinitionStore>,
//! #     node: Node,
//! #     page: Page,
//! # ) -> CatwalkResult<()> {
//! let registry = StreamHandlerRegistry::new().with_handler(handler);
//! let service = StreamService::new(registry, store);
//!
//! let data = service
//!     .get_stream_data(&node, &Context::default(), ParameterMap::new(), Some(&page))
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Domain layer (pure, synchronous)
pub mod domain;

// Application layer (orchestration logic)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        PageDataCompletionService, PageView, PageViewService, StreamData, StreamError,
        StreamHandlerRegistry, StreamService,
        ports::{
            FieldVisitorFactory, StreamContext, StreamHandler, StreamOptimizer,
            TasticDefinitionStore,
        },
    };
    pub use crate::domain::{
        ConfigurationSchema, Context, FieldDefinition, FieldVisitor, Limit, Node, Page,
        ParameterMap, Parameters, Stream, TasticDefinition, TasticInstance, TasticMap,
        UsageAnalyzer,
    };
    pub use crate::error::{CatwalkError, CatwalkResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

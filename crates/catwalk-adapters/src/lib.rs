//! Infrastructure adapters for Catwalk.
//!
//! This crate implements the ports defined in `catwalk_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod definition_loader;
pub mod optimizers;
pub mod stream_handlers;
pub mod tastic_store;
pub mod visitors;

// Re-export commonly used adapters
pub use definition_loader::TasticDefinitionLoader;
pub use optimizers::LimitTrimOptimizer;
pub use stream_handlers::{AccountWishlists, FixtureStreamHandler, InMemoryWishlistApi, WishlistApi};
pub use tastic_store::InMemoryTasticStore;
pub use visitors::{
    DefaultFieldVisitorFactory, FieldDataInlineVisitor, SelectTranslationVisitor,
    SequentialVisitor,
};

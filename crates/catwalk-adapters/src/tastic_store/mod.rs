//! Tastic definition store implementations.

pub mod memory;

pub use memory::InMemoryTasticStore;

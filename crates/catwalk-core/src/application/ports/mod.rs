//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `catwalk-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `StreamHandler`: Resolves one stream type
//!   - `StreamOptimizer`: Post-processes resolved payloads
//!   - `TasticDefinitionStore`: Tastic definition storage/retrieval
//!   - `FieldVisitorFactory`: Builds field visitors per request
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    FieldVisitorFactory, StreamContext, StreamHandler, StreamOptimizer, TasticDefinitionStore,
};

#[cfg(test)]
pub use output::MockTasticDefinitionStore;

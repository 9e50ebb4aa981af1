//! Stream optimizer implementations.

pub mod limit_trim;

pub use limit_trim::LimitTrimOptimizer;

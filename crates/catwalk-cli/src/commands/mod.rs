//! Command handlers, one module per subcommand.

pub mod complete;
pub mod completions;
pub mod config;
pub mod init;
pub mod resolve;
pub mod route;
pub mod tastics;
pub mod usage;
pub mod view;

mod workspace;

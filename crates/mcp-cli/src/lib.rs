//! MCP skill CLI library.
//!
//! Holds the command implementations behind the `mcp-skill` binary so they
//! can be tested without spawning the executable.

#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod config;
pub mod formatters;

pub use commands::convert::{ConvertOptions, ConvertReport};
pub use commands::introspect::IntrospectReport;
pub use config::{CliConfig, load_config};

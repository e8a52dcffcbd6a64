//! Core types and errors for MCP skill generation.
//!
//! This crate provides the foundational types shared by the discovery
//! client, the code generator, the package assembler and the CLI.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`ServerId`, `ToolName`)
//! - The error taxonomy used by every stage of a conversion run
//! - Server launch configuration and credential masking for display
//! - Discovery limits (timeouts and pagination cap)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod server_config;
mod types;

pub mod cli;
pub mod redact;

pub use config::DiscoveryConfig;
pub use error::{Error, Result};
pub use server_config::{ServerConfig, ServerConfigBuilder};
pub use types::{ServerId, ToolName};

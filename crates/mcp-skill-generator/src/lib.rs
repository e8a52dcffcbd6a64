//! MCP Skill Generator - assemble skill packages from MCP servers.
//!
//! This crate is the last stage of a conversion run. It takes the
//! categorized, generated interfaces from `mcp-codegen` and the server
//! details from `mcp-introspector`, renders the package files with
//! Handlebars templates and writes them to disk.
//!
//! # Examples
//!
//! ```no_run
//! use mcp_codegen::{Classifier, InterfaceGenerator};
//! use mcp_core::{DiscoveryConfig, ServerConfig};
//! use mcp_skill_generator::{SkillAssembler, SkillMetadata, SkillName, write_package};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_command_line("terraform-mcp-server")?;
//! let server = mcp_introspector::discover(&config, DiscoveryConfig::default()).await?;
//!
//! let name = SkillName::derive(&server.id);
//! let metadata = SkillMetadata::new(name, &server, &config);
//! let categorization = Classifier::with_default_rules()?.classify(server.tools);
//! let categories = InterfaceGenerator::default().generate(&categorization)?;
//!
//! let code = SkillAssembler::new()?.assemble(&metadata, &categories)?;
//! write_package(&code, Path::new("./skills/terraform"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Skill Naming Rules
//!
//! Skill names must:
//! - be 1-64 characters
//! - contain only lowercase letters, numbers, hyphens, underscores
//! - start with a letter
//! - end with a letter or number

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembler;
pub mod export;
pub mod types;

pub use assembler::{MANIFEST_FILE, SkillAssembler};
pub use export::write_package;
pub use types::{SkillMetadata, SkillName, sanitize_string, summary_line};

//! Convert command implementation.
//!
//! Runs the whole pipeline against one server: discover its tools, classify
//! them, generate TypeScript declarations and write the skill package.

use super::common::{build_server_config, load_classifier};
use crate::config::CliConfig;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use mcp_codegen::{Classifier, GeneratedCode, GenerationConfig, InterfaceGenerator};
use mcp_core::ServerConfig;
use mcp_core::cli::{ExitCode, OutputFormat};
use mcp_introspector::ServerInfo;
use mcp_skill_generator::{SkillAssembler, SkillMetadata, SkillName, write_package};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Arguments of `mcp-skill convert`.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Whitespace-separated server command line
    pub server_command: String,
    /// Package destination
    pub output_dir: PathBuf,
    /// Explicit skill name; derived from the server when absent
    pub name: Option<String>,
    /// `KEY=VALUE` assignments for the server process
    pub env: Vec<String>,
    /// Rule file replacing the configured or built-in rules
    pub rules: Option<PathBuf>,
}

/// Summary printed after a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// Package name
    pub skill_name: String,
    /// Identifier the generated functions call tools with
    pub server_id: String,
    /// Self-reported server name
    pub server_name: String,
    /// Self-reported server version
    pub server_version: String,
    /// Launch command with credentials masked
    pub server_command: String,
    /// Package destination
    pub output_dir: String,
    /// Tools in the package
    pub tool_count: usize,
    /// Files in the package
    pub file_count: usize,
    /// Schema features that degraded to `unknown`
    pub schema_warnings: usize,
    /// Tool counts per category, in package order
    pub categories: Vec<CategorySummary>,
}

/// One category line of a [`ConvertReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Directory name
    pub key: String,
    /// Display name
    pub name: String,
    /// Tools in the category
    pub tool_count: usize,
}

/// A rendered package that has not been written yet.
#[derive(Debug)]
pub struct SkillPackage {
    /// Package files
    pub code: GeneratedCode,
    /// Summary of what was generated
    pub report: ConvertReport,
}

/// Runs the convert command.
///
/// The server process is released before this returns, whether discovery
/// succeeds or not. A server without tools produces a warning and a package
/// with no categories.
///
/// # Errors
///
/// Returns an error if the arguments or rules are invalid, the server cannot
/// be reached or listed, generation fails, or the package cannot be written.
pub async fn run(
    options: &ConvertOptions,
    config: &CliConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let server_config = build_server_config(&options.server_command, &options.env)?;
    let classifier = load_classifier(options.rules.as_deref(), config)?;
    let name = options
        .name
        .as_deref()
        .map(SkillName::new)
        .transpose()
        .context("invalid --name")?;

    info!("Converting MCP server: {}", server_config.display());

    let server = mcp_introspector::discover(&server_config, config.discovery.to_discovery_config())
        .await
        .with_context(|| format!("failed to discover tools of '{}'", server_config.display()))?;

    let package = build_package(
        server,
        &server_config,
        &classifier,
        config.generation,
        name,
        &options.output_dir,
    )?;

    write_package(&package.code, &options.output_dir).with_context(|| {
        format!(
            "failed to write skill package to {}",
            options.output_dir.display()
        )
    })?;

    println!("{}", format_output(&package.report, output_format)?);
    Ok(ExitCode::SUCCESS)
}

/// Classifies, generates and assembles a package for discovered tools.
///
/// # Errors
///
/// Returns an error if an identifier collision is rejected or a template
/// fails to render.
pub fn build_package(
    server: ServerInfo,
    server_config: &ServerConfig,
    classifier: &Classifier,
    generation: GenerationConfig,
    name: Option<SkillName>,
    output_dir: &Path,
) -> Result<SkillPackage> {
    if server.tools.is_empty() {
        warn!(
            "Server '{}' reported no tools; the package will contain no functions",
            server.id
        );
    }

    let name = name.unwrap_or_else(|| SkillName::derive(&server.id));
    let metadata = SkillMetadata::new(name, &server, server_config);

    let categorization = classifier.classify(server.tools);
    info!(
        "Classified {} tools into {} categories",
        categorization.tool_count(),
        categorization.categories().len()
    );

    let categories = InterfaceGenerator::new(generation)
        .generate(&categorization)
        .context("failed to generate TypeScript interfaces")?;

    let code = SkillAssembler::new()?
        .assemble(&metadata, &categories)
        .context("failed to assemble skill package")?;

    let report = ConvertReport {
        skill_name: metadata.name.to_string(),
        server_id: metadata.server_id.to_string(),
        server_name: metadata.server_name.clone(),
        server_version: metadata.server_version.clone(),
        server_command: metadata.server_command.clone(),
        output_dir: output_dir.display().to_string(),
        tool_count: metadata.tool_count,
        file_count: code.file_count(),
        schema_warnings: categories
            .iter()
            .flat_map(|c| &c.interfaces)
            .map(|i| i.warnings.len())
            .sum(),
        categories: categories
            .iter()
            .map(|c| CategorySummary {
                key: c.key.clone(),
                name: c.name.clone(),
                tool_count: c.interfaces.len(),
            })
            .collect(),
    };

    Ok(SkillPackage { code, report })
}

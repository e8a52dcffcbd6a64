//! Introspect command implementation.
//!
//! Connects to an MCP server and prints its tools grouped by category,
//! without generating or writing anything.

use super::common::{build_server_config, load_classifier};
use crate::config::CliConfig;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use mcp_codegen::Classifier;
use mcp_core::ServerConfig;
use mcp_core::cli::{ExitCode, OutputFormat};
use mcp_introspector::ServerInfo;
use mcp_skill_generator::sanitize_string;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What `mcp-skill introspect` prints.
#[derive(Debug, Clone, Serialize)]
pub struct IntrospectReport {
    /// Identifier derived from the server command
    pub server_id: String,
    /// Self-reported server name
    pub server_name: String,
    /// Self-reported server version
    pub server_version: String,
    /// Launch command with credentials masked
    pub server_command: String,
    /// Number of tools listed
    pub tool_count: usize,
    /// Tools grouped by category
    pub categories: Vec<CategoryReport>,
}

/// Tools of one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    /// Category key
    pub key: String,
    /// Display name
    pub name: String,
    /// Tools in discovery order
    pub tools: Vec<ToolReport>,
}

/// One tool line.
#[derive(Debug, Clone, Serialize)]
pub struct ToolReport {
    /// Tool name as the server reports it
    pub name: String,
    /// First line of the tool description
    pub description: String,
}

/// Runs the introspect command.
///
/// # Errors
///
/// Returns an error if the arguments or rules are invalid or the server
/// cannot be reached or listed.
pub async fn run(
    server_command: &str,
    env: &[String],
    rules: Option<&Path>,
    config: &CliConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let server_config = build_server_config(server_command, env)?;
    let classifier = load_classifier(rules, config)?;

    info!("Introspecting MCP server: {}", server_config.display());

    let server = mcp_introspector::discover(&server_config, config.discovery.to_discovery_config())
        .await
        .with_context(|| format!("failed to discover tools of '{}'", server_config.display()))?;

    let report = build_report(server, &server_config, &classifier);
    println!("{}", format_output(&report, output_format)?);

    Ok(ExitCode::SUCCESS)
}

/// Groups discovered tools into a printable report.
#[must_use]
pub fn build_report(
    server: ServerInfo,
    server_config: &ServerConfig,
    classifier: &Classifier,
) -> IntrospectReport {
    let server_id = server.id.to_string();
    let server_name = server.name;
    let server_version = server.version;
    let categorization = classifier.classify(server.tools);

    IntrospectReport {
        server_id,
        server_name,
        server_version,
        server_command: server_config.display(),
        tool_count: categorization.tool_count(),
        categories: categorization
            .into_categories()
            .into_iter()
            .map(|category| CategoryReport {
                key: category.key,
                name: category.name,
                tools: category
                    .tools
                    .into_iter()
                    .map(|tool| ToolReport {
                        description: first_line(tool.description.as_deref().unwrap_or_default()),
                        name: tool.name.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn first_line(text: &str) -> String {
    sanitize_string(text)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_introspector::ToolInfo;
    use serde_json::json;

    fn server() -> (ServerInfo, ServerConfig) {
        let config = build_server_config("terraform-mcp-server", &["TFE_TOKEN=abc".to_string()])
            .unwrap();
        let info = ServerInfo {
            id: config.server_id(),
            name: "terraform".to_string(),
            version: "0.2.1".to_string(),
            tools: vec![
                ToolInfo::new("list_runs", Some("List runs\n\nPaged."), json!({})),
                ToolInfo::new("list_workspaces", None, json!({})),
                ToolInfo::new("get_run", Some("Fetch one run"), json!({})),
                ToolInfo::new("ping", None, json!({})),
            ],
        };
        (info, config)
    }

    #[test]
    fn test_report_groups_tools() {
        let (info, config) = server();
        let report = build_report(info, &config, &Classifier::with_default_rules().unwrap());

        assert_eq!(report.server_id, "terraform-mcp-server");
        assert_eq!(report.server_command, "TFE_TOKEN=***REDACTED*** terraform-mcp-server");
        assert_eq!(report.tool_count, 4);

        let keys: Vec<&str> = report.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["runs", "workspaces", "other"]);

        let runs: Vec<&str> = report.categories[0]
            .tools
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(runs, ["list_runs", "get_run"]);
        assert_eq!(report.categories[0].tools[0].description, "List runs");
    }

    #[test]
    fn test_report_serializes() {
        let (info, config) = server();
        let report = build_report(info, &config, &Classifier::with_default_rules().unwrap());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"][2]["tools"][0]["name"], "ping");
        assert_eq!(json["categories"][2]["tools"][0]["description"], "");
    }

    #[tokio::test]
    async fn test_run_rejects_empty_command() {
        let err = run("  ", &[], None, &CliConfig::default(), OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid server command"));
    }
}

//! Common utilities shared across CLI commands.

use crate::config::CliConfig;
use anyhow::{Context, Result, bail};
use mcp_codegen::Classifier;
use mcp_core::ServerConfig;
use std::path::Path;
use tracing::debug;

/// Parses a `KEY=VALUE` environment assignment.
///
/// The value may itself contain `=`.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_env_var(assignment: &str) -> Result<(String, String)> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("invalid environment variable format: '{assignment}' (expected KEY=VALUE)"),
    }
}

/// Builds a `ServerConfig` from the whitespace-separated server command and
/// `--env` assignments.
///
/// # Errors
///
/// Returns an error if the command is empty or an assignment is malformed.
///
/// # Examples
///
/// ```
/// use mcp_skill_cli::commands::common::build_server_config;
///
/// let config = build_server_config(
///     "terraform-mcp-server stdio",
///     &["TFE_TOKEN=abc".to_string()],
/// ).unwrap();
///
/// assert_eq!(config.command(), "terraform-mcp-server");
/// assert_eq!(config.args(), &["stdio"]);
/// assert_eq!(config.display(), "TFE_TOKEN=***REDACTED*** terraform-mcp-server stdio");
/// ```
pub fn build_server_config(server_command: &str, env: &[String]) -> Result<ServerConfig> {
    let parsed = ServerConfig::from_command_line(server_command).context("invalid server command")?;

    let mut builder = ServerConfig::builder()
        .command(parsed.command())
        .args(parsed.args().to_vec());
    for assignment in env {
        let (key, value) = parse_env_var(assignment)?;
        builder = builder.env(key, value);
    }

    Ok(builder.build()?)
}

/// Picks the classification rules for a run.
///
/// A `--rules` file wins over `[[rules]]` in the config file, which wins
/// over the built-in set.
///
/// # Errors
///
/// Returns an error if the chosen rules cannot be loaded or compiled.
pub fn load_classifier(rules_file: Option<&Path>, config: &CliConfig) -> Result<Classifier> {
    if let Some(path) = rules_file {
        debug!("Using classification rules from {}", path.display());
        return Classifier::from_toml_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display()));
    }
    if !config.rules.is_empty() {
        debug!("Using {} classification rules from config", config.rules.len());
        return Classifier::from_specs(&config.rules).context("invalid [[rules]] in config");
    }
    Ok(Classifier::with_default_rules()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_codegen::RuleSpec;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_env_var() {
        assert_eq!(
            parse_env_var("TOKEN=abc").unwrap(),
            ("TOKEN".to_string(), "abc".to_string())
        );
        assert_eq!(
            parse_env_var("URL=http://x?a=b").unwrap(),
            ("URL".to_string(), "http://x?a=b".to_string())
        );
        assert_eq!(parse_env_var("EMPTY=").unwrap().1, "");
        assert!(parse_env_var("NOVALUE").is_err());
        assert!(parse_env_var("=value").is_err());
    }

    #[test]
    fn test_build_server_config() {
        let config = build_server_config(
            "npx -y @hashicorp/terraform-mcp-server",
            &["TFE_TOKEN=abc123".to_string(), "LOG_LEVEL=debug".to_string()],
        )
        .unwrap();

        assert_eq!(config.command(), "npx");
        assert_eq!(config.args(), &["-y", "@hashicorp/terraform-mcp-server"]);
        assert_eq!(config.env().get("TFE_TOKEN"), Some(&"abc123".to_string()));
        assert_eq!(config.server_id().as_str(), "terraform-mcp-server");

        let shown = config.display();
        assert!(shown.contains("TFE_TOKEN=***REDACTED***"));
        assert!(shown.contains("LOG_LEVEL=debug"));
        assert!(!shown.contains("abc123"));
    }

    #[test]
    fn test_build_server_config_rejects_empty_command() {
        assert!(build_server_config("   ", &[]).is_err());
    }

    #[test]
    fn test_build_server_config_rejects_bad_env() {
        assert!(build_server_config("server", &["BROKEN".to_string()]).is_err());
    }

    #[test]
    fn test_load_classifier_precedence() {
        let temp = TempDir::new().unwrap();
        let rules_path = temp.path().join("rules.toml");
        fs::write(
            &rules_path,
            "[[rules]]\nkey = \"from-file\"\nname = \"From File\"\nmatch = [\"x\"]\n",
        )
        .unwrap();

        let config = CliConfig {
            rules: vec![RuleSpec {
                key: "from-config".to_string(),
                name: "From Config".to_string(),
                description: String::new(),
                match_patterns: vec!["x".to_string()],
                exclude: Vec::new(),
            }],
            ..CliConfig::default()
        };

        let file = load_classifier(Some(&rules_path), &config).unwrap();
        assert_eq!(file.rules()[0].category().key, "from-file");

        let configured = load_classifier(None, &config).unwrap();
        assert_eq!(configured.rules()[0].category().key, "from-config");

        let builtin = load_classifier(None, &CliConfig::default()).unwrap();
        assert_eq!(builtin.rules()[0].category().key, "variables");
    }

    #[test]
    fn test_load_classifier_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_classifier(Some(&temp.path().join("none.toml")), &CliConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to load rules"));
    }
}

//! MCP server launch configuration.
//!
//! A [`ServerConfig`] describes how to spawn an MCP server over its standard
//! input/output: the program, its arguments, extra environment variables and
//! an optional working directory. Only process-pipe transport is supported.
//!
//! The configuration always holds the literal values that are passed to the
//! process. Anything meant for humans goes through [`ServerConfig::display`],
//! which masks credentials.
//!
//! # Examples
//!
//! ```
//! use mcp_core::ServerConfig;
//!
//! let config = ServerConfig::from_command_line("npx -y terraform-mcp-server TFE_TOKEN=abc123")?;
//! assert_eq!(config.command(), "npx");
//! assert_eq!(config.args().len(), 3);
//! assert_eq!(config.args()[2], "TFE_TOKEN=abc123");
//! assert_eq!(config.display(), "npx -y terraform-mcp-server TFE_TOKEN=***REDACTED***");
//! # Ok::<(), mcp_core::Error>(())
//! ```

use crate::redact::{redact_command_line, redact_env_value};
use crate::{Error, Result, ServerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// MCP server configuration with command, arguments, and environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Command to execute (binary name resolved via PATH, or a path).
    pub command: String,

    /// Arguments to pass to the command, each passed separately.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variables added to (or overriding) the inherited environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working directory for the subprocess. Inherits the parent's when `None`.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl ServerConfig {
    /// Creates a new builder for `ServerConfig`.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Builds a configuration from a whitespace-separated command string.
    ///
    /// The first token is the program, the remaining tokens are its
    /// arguments. No shell quoting is interpreted.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the string contains no tokens.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let command = tokens
            .next()
            .ok_or_else(|| Error::InvalidArgument("server command is empty".to_string()))?;

        Ok(Self {
            command,
            args: tokens.collect(),
            env: BTreeMap::new(),
            cwd: None,
        })
    }

    /// Returns the command as a string slice.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns a slice of arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the extra environment variables.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Derives a server identifier from the program name.
    ///
    /// Uses the file name of the command, so `/usr/local/bin/github-mcp`
    /// becomes `github-mcp`. For package runners and interpreters such as
    /// `npx` or `python` the first positional argument names the server
    /// instead, with any scope, version suffix and script extension removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::ServerConfig;
    ///
    /// let config = ServerConfig::from_command_line("/opt/bin/terraform-mcp-server stdio")?;
    /// assert_eq!(config.server_id().as_str(), "terraform-mcp-server");
    ///
    /// let config = ServerConfig::from_command_line("npx -y @hashicorp/terraform-mcp-server@0.2.1")?;
    /// assert_eq!(config.server_id().as_str(), "terraform-mcp-server");
    /// # Ok::<(), mcp_core::Error>(())
    /// ```
    #[must_use]
    pub fn server_id(&self) -> ServerId {
        let program = file_name(&self.command);

        if LAUNCHERS.contains(&program) {
            let target = self
                .args
                .iter()
                .find(|arg| !arg.starts_with('-') && !arg.contains('='));
            if let Some(target) = target {
                let name = file_name(target);
                let name = match name.rfind('@') {
                    Some(at) if at > 0 => &name[..at],
                    _ => name,
                };
                let name = SCRIPT_EXTENSIONS
                    .iter()
                    .find_map(|ext| name.strip_suffix(ext))
                    .unwrap_or(name);
                if !name.is_empty() {
                    return ServerId::new(name);
                }
            }
        }

        ServerId::new(program)
    }

    /// Renders the command line for humans with credentials masked.
    ///
    /// Environment variables set through the configuration are shown as a
    /// `KEY=value` prefix, with sensitive values masked as well.
    #[must_use]
    pub fn display(&self) -> String {
        let command_line = redact_command_line(&self.command, &self.args);
        if self.env.is_empty() {
            return command_line;
        }

        let env = self
            .env
            .iter()
            .map(|(key, value)| format!("{key}={}", redact_env_value(key, value)))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{env} {command_line}")
    }
}

/// Programs whose first positional argument is the actual server.
const LAUNCHERS: &[&str] = &["npx", "bunx", "pnpx", "uvx", "node", "bun", "deno", "python", "python3"];

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".ts", ".py"];

fn file_name(path: &str) -> &str {
    path.rsplit('/').find(|part| !part.is_empty()).unwrap_or(path)
}

/// Builder for constructing `ServerConfig` instances.
///
/// # Examples
///
/// ```
/// use mcp_core::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .command("docker")
///     .arg("run")
///     .arg("-i")
///     .env("GITHUB_TOKEN", "ghp_xxx")
///     .build()?;
///
/// assert_eq!(config.args(), &["run", "-i"]);
/// assert!(config.display().contains("GITHUB_TOKEN=***REDACTED***"));
/// # Ok::<(), mcp_core::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct ServerConfigBuilder {
    command: Option<String>,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Sets the command to execute.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets all arguments at once, replacing any previously added.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Adds a single environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets the working directory for the subprocess.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Builds the `ServerConfig`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if no command was set or it is blank.
    pub fn build(self) -> Result<ServerConfig> {
        let command = self
            .command
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::InvalidArgument("server command is required".to_string()))?;

        Ok(ServerConfig {
            command,
            args: self.args,
            env: self.env,
            cwd: self.cwd,
        })
    }
}

//! MCP skill CLI.
//!
//! Converts an MCP server into a TypeScript skill package.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `convert` - Discover, classify, generate and write a skill package
//! - `introspect` - Print a server's tools grouped by category
//!
//! # Examples
//!
//! ```bash
//! # Generate a skill for the Terraform MCP server
//! mcp-skill convert "npx -y @hashicorp/terraform-mcp-server" ./skills/terraform \
//!     --env TFE_TOKEN=xxx
//!
//! # Look at the categories before generating
//! mcp-skill introspect github-mcp-server --format text
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mcp_core::cli::{ExitCode, OutputFormat};
use mcp_skill_cli::commands::{self, convert::ConvertOptions};
use mcp_skill_cli::load_config;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// MCP Skill - turn an MCP server's tools into a typed TypeScript skill.
#[derive(Parser, Debug)]
#[command(name = "mcp-skill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,

    /// Configuration file (default: <config dir>/mcp-skill/config.toml)
    #[arg(long, global = true, env = "MCP_SKILL_CONFIG")]
    config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a skill package from an MCP server.
    ///
    /// Starts the server, lists all of its tools, groups them into
    /// categories and writes one typed TypeScript function per tool.
    ///
    /// # Examples
    ///
    /// ```bash
    /// mcp-skill convert "docker run -i --rm ghcr.io/github/github-mcp-server" ./github \
    ///     --env GITHUB_PERSONAL_ACCESS_TOKEN=ghp_xxx --name github
    /// ```
    Convert {
        /// Server command line, split on whitespace
        server_command: String,

        /// Directory the package is written to
        output_dir: PathBuf,

        /// Skill name (default: derived from the server command)
        #[arg(long)]
        name: Option<String>,

        /// Environment variables for the server in KEY=VALUE format
        #[arg(short, long = "env", num_args = 1)]
        env: Vec<String>,

        /// TOML rule file replacing the built-in categories
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// List a server's tools grouped by category.
    ///
    /// Nothing is written to disk.
    Introspect {
        /// Server command line, split on whitespace
        server_command: String,

        /// Environment variables for the server in KEY=VALUE format
        #[arg(short, long = "env", num_args = 1)]
        env: Vec<String>,

        /// TOML rule file replacing the built-in categories
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    };

    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.log_json)?;

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .context("invalid --format")?;
    let config = load_config(cli.config.as_deref())?;

    execute_command(cli.command, &config, output_format).await
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` is honored unless `--verbose` forces debug level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

async fn execute_command(
    command: Commands,
    config: &mcp_skill_cli::CliConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Convert {
            server_command,
            output_dir,
            name,
            env,
            rules,
        } => {
            let options = ConvertOptions {
                server_command,
                output_dir,
                name,
                env,
                rules,
            };
            commands::convert::run(&options, config, output_format).await
        }
        Commands::Introspect {
            server_command,
            env,
            rules,
        } => {
            commands::introspect::run(
                &server_command,
                &env,
                rules.as_deref(),
                config,
                output_format,
            )
            .await
        }
    }
}

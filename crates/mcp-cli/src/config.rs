//! CLI configuration file.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/mcp-skill/config.toml`
//! - macOS: `~/Library/Application Support/mcp-skill/config.toml`
//! - Windows: `%APPDATA%\mcp-skill\config.toml`
//!
//! An explicit `--config <path>` takes precedence. A missing default file is
//! not an error; a missing explicit file is.

use anyhow::{Context, Result, bail};
use mcp_codegen::{Classifier, GenerationConfig, RuleSpec};
use mcp_core::DiscoveryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_DIR_NAME: &str = "mcp-skill";
const CONFIG_FILE_NAME: &str = "config.toml";

/// CLI configuration.
///
/// # Examples
///
/// ```toml
/// [discovery]
/// handshake_timeout_secs = 30
/// page_timeout_secs = 30
/// max_pages = 1000
///
/// [generation]
/// collision_policy = "suffix"
///
/// [[rules]]
/// key = "runs"
/// name = "Runs"
/// match = ["run"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Discovery limits
    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Code generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Classification rules replacing the built-in set when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSpec>,
}

/// `[discovery]` table, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoverySettings {
    /// Spawn plus handshake limit
    pub handshake_timeout_secs: u64,

    /// Limit for one `tools/list` page
    pub page_timeout_secs: u64,

    /// Page cap for one listing
    pub max_pages: usize,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            handshake_timeout_secs: DiscoveryConfig::DEFAULT_HANDSHAKE_TIMEOUT_SECS,
            page_timeout_secs: DiscoveryConfig::DEFAULT_PAGE_TIMEOUT_SECS,
            max_pages: DiscoveryConfig::DEFAULT_MAX_PAGES,
        }
    }
}

impl DiscoverySettings {
    /// Converts the table into the discovery client's configuration.
    #[must_use]
    pub const fn to_discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            handshake_timeout: Duration::from_secs(self.handshake_timeout_secs),
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            max_pages: self.max_pages,
        }
    }
}

impl CliConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this layout or a
    /// value fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout or `max_pages` is zero, or if the rules
    /// do not form a valid classifier.
    pub fn validate(&self) -> Result<()> {
        if self.discovery.handshake_timeout_secs == 0 {
            bail!("discovery.handshake_timeout_secs must be greater than 0");
        }
        if self.discovery.page_timeout_secs == 0 {
            bail!("discovery.page_timeout_secs must be greater than 0");
        }
        if self.discovery.max_pages == 0 {
            bail!("discovery.max_pages must be at least 1");
        }
        self.discovery.to_discovery_config().validate()?;

        if !self.rules.is_empty() {
            Classifier::from_specs(&self.rules).context("invalid [[rules]] table")?;
        }

        Ok(())
    }
}

/// Returns the platform config file path, if the platform has a config
/// directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the configuration.
///
/// Looks at `explicit` first, then at [`default_config_path`]. Falls back to
/// defaults when no explicit path is given and the default file does not
/// exist.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read, parsed or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<CliConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("Config file not found, using defaults");
                return Ok(CliConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = CliConfig::from_toml_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_codegen::generator::CollisionPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discovery.to_discovery_config(), DiscoveryConfig::default());
        assert_eq!(config.generation.collision_policy, CollisionPolicy::Suffix);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(CliConfig::from_toml_str("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = CliConfig::from_toml_str(
            r#"
            [discovery]
            handshake_timeout_secs = 5
            page_timeout_secs = 10
            max_pages = 50

            [generation]
            collision_policy = "reject"

            [[rules]]
            key = "runs"
            name = "Runs"
            match = ["run"]
            exclude = ["runtime"]
            "#,
        )
        .unwrap();

        let discovery = config.discovery.to_discovery_config();
        assert_eq!(discovery.handshake_timeout, Duration::from_secs(5));
        assert_eq!(discovery.page_timeout, Duration::from_secs(10));
        assert_eq!(discovery.max_pages, 50);
        assert_eq!(config.generation.collision_policy, CollisionPolicy::Reject);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].key, "runs");
    }

    #[test]
    fn test_partial_discovery_table_keeps_defaults() {
        let config = CliConfig::from_toml_str("[discovery]\nmax_pages = 3\n").unwrap();
        assert_eq!(config.discovery.max_pages, 3);
        assert_eq!(
            config.discovery.page_timeout_secs,
            DiscoveryConfig::DEFAULT_PAGE_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        for source in [
            "[discovery]\nhandshake_timeout_secs = 0\n",
            "[discovery]\npage_timeout_secs = 0\n",
            "[discovery]\nmax_pages = 0\n",
            "[generation]\ncollision_policy = \"rename\"\n",
            "[unknown]\nx = 1\n",
            "[[rules]]\nkey = \"bad\"\nname = \"Bad\"\nmatch = [\"(\"]\n",
            "[[rules]]\nkey = \"other\"\nname = \"Other\"\nmatch = [\"x\"]\n",
            "[[rules]]\nkey = \"a\"\nname = \"A\"\nmatch = [\"x\"]\n[[rules]]\nkey = \"a\"\nname = \"A\"\nmatch = [\"y\"]\n",
        ] {
            assert!(CliConfig::from_toml_str(source).is_err(), "{source}");
        }
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[generation]\ncollision_policy = \"reject\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.generation.collision_policy, CollisionPolicy::Reject);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}

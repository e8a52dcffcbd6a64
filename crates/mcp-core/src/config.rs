//! Discovery configuration.
//!
//! Bounds on how long, and how far, a tool listing may run against a server
//! that misbehaves.
//!
//! # Examples
//!
//! ```
//! use mcp_core::DiscoveryConfig;
//! use std::time::Duration;
//!
//! let config = DiscoveryConfig {
//!     page_timeout: Duration::from_secs(5),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.max_pages, 1000);
//! ```

use crate::{Error, Result};
use std::time::Duration;

/// Limits applied while connecting to a server and listing its tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Maximum time for spawning the server and completing the MCP handshake.
    ///
    /// Default: 30 seconds
    pub handshake_timeout: Duration,

    /// Maximum time for a single `tools/list` page.
    ///
    /// Default: 30 seconds
    pub page_timeout: Duration,

    /// Maximum number of pages fetched before the listing is declared runaway.
    ///
    /// Default: 1000
    pub max_pages: usize,
}

impl DiscoveryConfig {
    /// Default handshake timeout in seconds.
    pub const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 30;

    /// Default per-page timeout in seconds.
    pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

    /// Default page cap.
    pub const DEFAULT_MAX_PAGES: usize = 1000;

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a timeout is zero or `max_pages` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.handshake_timeout.is_zero() {
            return Err(Error::ConfigError {
                message: "handshake timeout must be greater than 0".to_string(),
            });
        }
        if self.page_timeout.is_zero() {
            return Err(Error::ConfigError {
                message: "page timeout must be greater than 0".to_string(),
            });
        }
        if self.max_pages == 0 {
            return Err(Error::ConfigError {
                message: "max_pages must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(Self::DEFAULT_HANDSHAKE_TIMEOUT_SECS),
            page_timeout: Duration::from_secs(Self::DEFAULT_PAGE_TIMEOUT_SECS),
            max_pages: Self::DEFAULT_MAX_PAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DiscoveryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.handshake_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_values_rejected() {
        let zero_handshake = DiscoveryConfig {
            handshake_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(zero_handshake.validate().unwrap_err().is_config_error());

        let zero_page = DiscoveryConfig {
            page_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(zero_page.validate().is_err());

        let zero_pages = DiscoveryConfig {
            max_pages: 0,
            ..Default::default()
        };
        assert!(zero_pages.validate().is_err());
    }
}

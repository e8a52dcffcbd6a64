//! Error types for MCP skill generation.
//!
//! Every library crate in the workspace reports failures through [`Error`].
//! Discovery and connection errors are fatal for a conversion run; schema
//! irregularities are not errors at all and are reported as warnings by the
//! code generator instead.
//!
//! # Examples
//!
//! ```
//! use mcp_core::{Error, Result};
//!
//! fn require_command(command: &str) -> Result<()> {
//!     if command.trim().is_empty() {
//!         return Err(Error::InvalidArgument("server command is empty".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let err = require_command("  ").unwrap_err();
//! assert!(matches!(err, Error::InvalidArgument(_)));
//! ```

use thiserror::Error;

/// Main error type for MCP skill generation.
#[derive(Error, Debug)]
pub enum Error {
    /// MCP server connection failed.
    ///
    /// The server process could not be spawned, exited before the
    /// handshake completed, or did not finish the handshake in time.
    #[error("MCP server connection failed: {server}")]
    ConnectionFailed {
        /// Masked command line of the server that failed to connect
        server: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `connect` was called on a client that already left the unconnected state.
    #[error("client is already connected (or was used) for server: {server}")]
    AlreadyConnected {
        /// Masked command line of the server the client is bound to
        server: String,
    },

    /// An operation that needs a live connection was called without one.
    #[error("client is not connected: cannot {operation}")]
    NotConnected {
        /// Operation that was attempted
        operation: String,
    },

    /// The server violated the listing protocol.
    ///
    /// Raised for repeated pagination cursors, runaway pagination,
    /// duplicate tool names, and responses of an unexpected shape.
    #[error("MCP protocol error: {message}")]
    ProtocolError {
        /// Description of the violation
        message: String,
    },

    /// Timeout error.
    ///
    /// Occurs when a page fetch exceeds its configured timeout.
    #[error("Operation timed out after {duration_secs}s: {operation}")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
        /// Duration in seconds before timeout occurred
        duration_secs: u64,
    },

    /// Two distinct tool names normalize to the same generated identifier.
    #[error("tools '{first}' and '{second}' both map to identifier '{identifier}'")]
    NameCollision {
        /// The colliding generated identifier
        identifier: String,
        /// Tool that claimed the identifier first
        first: String,
        /// Tool that collided with it
        second: String,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, including malformed
    /// classification rules.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation error for domain types such as skill names.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Filesystem error while exporting a generated package.
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// Path involved in the failed operation
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a connection error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::Error;
    ///
    /// let err = Error::ConnectionFailed {
    ///     server: "test".to_string(),
    ///     source: "connection refused".into(),
    /// };
    /// assert!(err.is_connection_error());
    /// ```
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    /// Returns `true` if this error comes from misuse of the client state machine.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::Error;
    ///
    /// let err = Error::NotConnected { operation: "list tools".to_string() };
    /// assert!(err.is_state_error());
    /// ```
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyConnected { .. } | Self::NotConnected { .. }
        )
    }

    /// Returns `true` if this is a protocol error.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::ProtocolError { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "max_pages must be at least 1".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is an identifier collision.
    #[must_use]
    pub const fn is_name_collision(&self) -> bool {
        matches!(self, Self::NameCollision { .. })
    }

    /// Returns `true` if this is a validation error.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

/// Result type alias for MCP operations.
///
/// # Examples
///
/// ```
/// use mcp_core::{Result, Error};
///
/// fn validate_pages(value: usize) -> Result<usize> {
///     if value == 0 {
///         return Err(Error::ConfigError {
///             message: "max_pages must be at least 1".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(validate_pages(5).is_ok());
/// assert!(validate_pages(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_detection() {
        let err = Error::ConnectionFailed {
            server: "test-server".to_string(),
            source: "spawn failed".into(),
        };
        assert!(err.is_connection_error());
        assert!(!err.is_protocol_error());
    }

    #[test]
    fn test_state_error_detection() {
        let already = Error::AlreadyConnected {
            server: "srv".to_string(),
        };
        let not_connected = Error::NotConnected {
            operation: "list tools".to_string(),
        };
        assert!(already.is_state_error());
        assert!(not_connected.is_state_error());
        assert!(!already.is_connection_error());
    }

    #[test]
    fn test_protocol_error_display() {
        let err = Error::ProtocolError {
            message: "cursor 'c1' repeated".to_string(),
        };
        assert!(err.is_protocol_error());
        let display = err.to_string();
        assert!(display.contains("MCP protocol error"));
        assert!(display.contains("c1"));
    }

    #[test]
    fn test_timeout_error_detection() {
        let err = Error::Timeout {
            operation: "tools/list page 3".to_string(),
            duration_secs: 30,
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_name_collision_display() {
        let err = Error::NameCollision {
            identifier: "GetRun".to_string(),
            first: "get_run".to_string(),
            second: "get-run".to_string(),
        };
        assert!(err.is_name_collision());
        let display = err.to_string();
        assert!(display.contains("get_run"));
        assert!(display.contains("get-run"));
        assert!(display.contains("GetRun"));
    }

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "bad regex".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_timeout());
    }
}

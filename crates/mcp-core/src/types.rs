//! Strong domain types for MCP skill generation.
//!
//! Identifiers are newtypes over `String` so tool names, server identifiers
//! and free text cannot be mixed up at call sites.
//!
//! # Examples
//!
//! ```
//! use mcp_core::{ServerId, ToolName};
//!
//! let server = ServerId::new("terraform-mcp-server");
//! let tool = ToolName::new("list_workspaces");
//! assert_eq!(tool.as_str(), "list_workspaces");
//! assert_eq!(server.to_string(), "terraform-mcp-server");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server identifier (newtype over String).
///
/// Derived from the program name of the server command and used to name the
/// generated skill when no explicit name is given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    /// Creates a new server identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the server ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Tool name as reported by the MCP server (newtype over String).
///
/// Tool names are unique within one server and are the key under which
/// classification and translation results are joined.
///
/// # Examples
///
/// ```
/// use mcp_core::ToolName;
///
/// let name = ToolName::new("get_run");
/// let same: ToolName = "get_run".into();
/// assert_eq!(name, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tool name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ToolName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ToolName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToolName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_id_display() {
        let id = ServerId::new("display-test");
        assert_eq!(format!("{id}"), "display-test");
        assert_eq!(id.as_str(), "display-test");
    }

    #[test]
    fn test_tool_name_conversions() {
        let from_string = ToolName::from("tool".to_string());
        let from_str = ToolName::from("tool");
        assert_eq!(from_string, from_str);
        assert_eq!(from_str.into_inner(), "tool");
    }

    #[test]
    fn test_tool_name_serializes_transparently() {
        let name = ToolName::new("list_runs");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"list_runs\"");
    }

    #[test]
    fn test_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServerId>();
        assert_send_sync::<ToolName>();
    }
}

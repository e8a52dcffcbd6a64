//! Types describing what a server exposes.

use mcp_core::{ServerId, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One tool as reported by `tools/list`.
///
/// Immutable once fetched. The input schema is kept as raw JSON; turning it
/// into a typed shape is the code generator's job and must tolerate
/// malformed schemas.
///
/// # Examples
///
/// ```
/// use mcp_introspector::ToolInfo;
/// use serde_json::json;
///
/// let tool = ToolInfo::new(
///     "list_workspaces",
///     Some("List workspaces in an organization"),
///     json!({"type": "object", "properties": {"org": {"type": "string"}}}),
/// );
/// assert_eq!(tool.name.as_str(), "list_workspaces");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name, unique within the server
    pub name: ToolName,
    /// Human-readable description, if the server provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

impl ToolInfo {
    /// Creates a tool description.
    #[must_use]
    pub fn new(name: impl Into<ToolName>, description: Option<&str>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
            input_schema,
        }
    }

    /// Returns the description, or an empty string when absent.
    #[must_use]
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// A single page of a `tools/list` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolPage {
    /// Tools on this page, in server order
    pub tools: Vec<ToolInfo>,
    /// Opaque continuation cursor; `None` when this is the last page
    pub next_cursor: Option<String>,
}

/// Name and version the server reported during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    /// Server implementation name
    pub name: String,
    /// Server implementation version
    pub version: String,
}

/// Everything discovered about a server in one run.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Identifier derived from the server command
    pub id: ServerId,
    /// Self-reported server name, or the identifier when unknown
    pub name: String,
    /// Self-reported server version, or `"unknown"`
    pub version: String,
    /// All tools, in server order across pages
    pub tools: Vec<ToolInfo>,
}

/// Lifecycle of a discovery client.
///
/// `Unconnected -> Connecting -> Connected -> Disconnected`, with `Failed`
/// reachable from `Connecting` when the handshake does not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Freshly created, `connect` not yet called
    Unconnected,
    /// Spawning the server and performing the handshake
    Connecting,
    /// Handshake complete; tools may be listed
    Connected,
    /// Handshake failed; the client cannot be reused
    Failed,
    /// Connection released
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unconnected => "unconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_info_deserializes_mcp_shape() {
        let tool: ToolInfo = serde_json::from_value(json!({
            "name": "get_run",
            "description": "Fetch a run",
            "inputSchema": {"type": "object"}
        }))
        .unwrap();

        assert_eq!(tool.name.as_str(), "get_run");
        assert_eq!(tool.description_or_empty(), "Fetch a run");
        assert_eq!(tool.input_schema, json!({"type": "object"}));
    }

    #[test]
    fn test_tool_info_missing_description() {
        let tool: ToolInfo = serde_json::from_value(json!({"name": "ping"})).unwrap();
        assert!(tool.description.is_none());
        assert_eq!(tool.description_or_empty(), "");
        assert!(tool.input_schema.is_null());
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::Failed.to_string(), "failed");
    }
}

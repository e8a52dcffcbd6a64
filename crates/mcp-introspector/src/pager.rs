//! Page-level access to a server's tool listing.
//!
//! [`ToolPager`] is the seam between the pagination state machine in
//! [`Introspector`](crate::Introspector) and the wire. The production
//! implementation drives an `rmcp` client over a child process; tests plug
//! in scripted pagers.

use crate::types::{ServerIdentity, ToolInfo, ToolPage};
use async_trait::async_trait;
use mcp_core::{Error, Result, ServerConfig};
use rmcp::model::PaginatedRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Fetches single pages of `tools/list` from a live connection.
#[async_trait]
pub trait ToolPager: Send + fmt::Debug {
    /// Requests one page, passing back the cursor of the previous page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<ToolPage>;

    /// Releases the transport and terminates the server process.
    ///
    /// Must be safe to call more than once.
    async fn shutdown(&mut self);

    /// Name and version reported by the server during the handshake.
    fn server_identity(&self) -> Option<ServerIdentity> {
        None
    }
}

/// `ToolPager` backed by an `rmcp` client talking to a child process.
pub struct RmcpPager {
    client: Option<RunningService<RoleClient, ()>>,
    server: String,
}

impl fmt::Debug for RmcpPager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RmcpPager")
            .field("client", &self.client.as_ref().map(|_| "RunningService{..}"))
            .field("server", &self.server)
            .finish()
    }
}

impl RmcpPager {
    /// Spawns the server and performs the MCP handshake.
    ///
    /// The child is spawned with `kill_on_drop`, so abandoning the pager
    /// (including on a handshake timeout) terminates the process.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConnectionFailed` if the process cannot be spawned,
    /// exits before answering, or the handshake exceeds `handshake_timeout`.
    pub async fn spawn(config: &ServerConfig, handshake_timeout: Duration) -> Result<Self> {
        let server = config.display();

        let command = tokio::process::Command::new(config.command()).configure(|cmd| {
            cmd.args(config.args()).envs(config.env()).kill_on_drop(true);
            if let Some(dir) = config.cwd() {
                cmd.current_dir(dir);
            }
        });

        let transport = TokioChildProcess::new(command).map_err(|e| Error::ConnectionFailed {
            server: server.clone(),
            source: Box::new(e),
        })?;

        let client = tokio::time::timeout(handshake_timeout, ().serve(transport))
            .await
            .map_err(|_| Error::ConnectionFailed {
                server: server.clone(),
                source: format!(
                    "handshake did not complete within {}s",
                    handshake_timeout.as_secs()
                )
                .into(),
            })?
            .map_err(|e| Error::ConnectionFailed {
                server: server.clone(),
                source: Box::new(e),
            })?;

        Ok(Self {
            client: Some(client),
            server,
        })
    }
}

#[async_trait]
impl ToolPager for RmcpPager {
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<ToolPage> {
        let client = self.client.as_ref().ok_or_else(|| Error::NotConnected {
            operation: "fetch tools/list page".to_string(),
        })?;

        let result = client
            .list_tools(Some(PaginatedRequestParam { cursor }))
            .await
            .map_err(|e| Error::ProtocolError {
                message: format!("tools/list request to {} failed: {e}", self.server),
            })?;

        let tools = result
            .tools
            .into_iter()
            .map(|tool| ToolInfo {
                name: tool.name.into_owned().into(),
                description: tool.description.map(std::borrow::Cow::into_owned),
                input_schema: Value::Object(tool.input_schema.as_ref().clone()),
            })
            .collect();

        Ok(ToolPage {
            tools,
            next_cursor: result.next_cursor,
        })
    }

    async fn shutdown(&mut self) {
        if let Some(client) = self.client.take() {
            match client.cancel().await {
                Ok(reason) => tracing::debug!("MCP client stopped: {reason:?}"),
                Err(e) => tracing::warn!("MCP client task ended abnormally: {e}"),
            }
        }
    }

    fn server_identity(&self) -> Option<ServerIdentity> {
        let info = self.client.as_ref()?.peer_info()?;
        Some(ServerIdentity {
            name: info.server_info.name.clone(),
            version: info.server_info.version.clone(),
        })
    }
}

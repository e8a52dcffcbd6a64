//! Discovery client: connection lifecycle and paginated tool listing.
//!
//! # Examples
//!
//! ```no_run
//! use mcp_core::{DiscoveryConfig, ServerConfig};
//! use mcp_introspector::Introspector;
//!
//! # async fn example() -> mcp_core::Result<()> {
//! let server = ServerConfig::from_command_line("npx -y @hashicorp/terraform-mcp-server")?;
//!
//! let mut client = Introspector::with_config(DiscoveryConfig::default());
//! client.connect(&server).await?;
//! let info = client.list_and_disconnect().await?;
//! println!("{} exposes {} tools", info.name, info.tools.len());
//! # Ok(())
//! # }
//! ```

use crate::pager::{RmcpPager, ToolPager};
use crate::types::{ConnectionState, ServerIdentity, ServerInfo, ToolInfo};
use mcp_core::{DiscoveryConfig, Error, Result, ServerConfig, ServerId, ToolName};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// MCP discovery client.
///
/// Owns at most one server connection for its whole life. A client is
/// single-use: once `connect` has been attempted, further `connect` calls
/// fail with `Error::AlreadyConnected`.
///
/// Dropping a connected client also terminates the server process, but
/// callers should prefer [`Introspector::disconnect`] (or
/// [`Introspector::list_and_disconnect`]) so release happens at a known
/// point.
#[derive(Debug)]
pub struct Introspector {
    config: DiscoveryConfig,
    state: ConnectionState,
    server_id: Option<ServerId>,
    server_display: Option<String>,
    pager: Option<Box<dyn ToolPager>>,
}

impl Introspector {
    /// Creates an unconnected client with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }

    /// Creates an unconnected client with the given limits.
    #[must_use]
    pub const fn with_config(config: DiscoveryConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Unconnected,
            server_id: None,
            server_display: None,
            pager: None,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the discovery limits in effect.
    #[must_use]
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Spawns the server and performs the MCP handshake.
    ///
    /// # Errors
    ///
    /// - `Error::AlreadyConnected` if `connect` (or `attach`) was already called
    /// - `Error::ConnectionFailed` if the process cannot start, exits
    ///   immediately, or the handshake times out; the client moves to
    ///   `ConnectionState::Failed`
    pub async fn connect(&mut self, server: &ServerConfig) -> Result<()> {
        self.begin_connect(server.server_id(), server.display())?;

        info!("Connecting to MCP server: {}", server.display());

        match RmcpPager::spawn(server, self.config.handshake_timeout).await {
            Ok(pager) => {
                self.finish_connect(Box::new(pager));
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Failed;
                warn!("Connection to MCP server failed: {e}");
                Err(e)
            }
        }
    }

    /// Enters the connected state over an already-established pager.
    ///
    /// Subject to the same single-use rule as [`Introspector::connect`].
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyConnected` if the client was already used.
    pub fn attach(&mut self, server_id: ServerId, pager: Box<dyn ToolPager>) -> Result<()> {
        let display = server_id.to_string();
        self.begin_connect(server_id, display)?;
        self.finish_connect(pager);
        Ok(())
    }

    fn begin_connect(&mut self, server_id: ServerId, display: String) -> Result<()> {
        if self.state != ConnectionState::Unconnected {
            return Err(Error::AlreadyConnected {
                server: self
                    .server_display
                    .clone()
                    .unwrap_or_else(|| display.clone()),
            });
        }
        self.state = ConnectionState::Connecting;
        self.server_id = Some(server_id);
        self.server_display = Some(display);
        Ok(())
    }

    fn finish_connect(&mut self, pager: Box<dyn ToolPager>) {
        if let Some(identity) = pager.server_identity() {
            info!(
                "Connected to MCP server {} v{}",
                identity.name, identity.version
            );
        }
        self.pager = Some(pager);
        self.state = ConnectionState::Connected;
    }

    /// Retrieves every tool the server exposes, following pagination cursors.
    ///
    /// Tools are returned in server order, within and across pages.
    ///
    /// # Errors
    ///
    /// - `Error::NotConnected` unless the client is in `ConnectionState::Connected`
    /// - `Error::ProtocolError` if a cursor repeats, the listing exceeds
    ///   `max_pages`, a tool name appears twice, or a request fails
    /// - `Error::Timeout` if a single page exceeds `page_timeout`
    pub async fn list_tools(&mut self) -> Result<Vec<ToolInfo>> {
        if self.state != ConnectionState::Connected {
            return Err(Error::NotConnected {
                operation: "list tools".to_string(),
            });
        }
        let pager = self.pager.as_mut().ok_or_else(|| Error::NotConnected {
            operation: "list tools".to_string(),
        })?;

        let mut tools = Vec::new();
        let mut seen_names: HashSet<ToolName> = HashSet::new();
        let mut seen_cursors: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;

        for page_number in 1..=self.config.max_pages {
            let page = tokio::time::timeout(self.config.page_timeout, pager.fetch_page(cursor.take()))
                .await
                .map_err(|_| Error::Timeout {
                    operation: format!("tools/list page {page_number}"),
                    duration_secs: self.config.page_timeout.as_secs(),
                })??;

            debug!(
                page = page_number,
                tools = page.tools.len(),
                has_more = page.next_cursor.is_some(),
                "Received tools/list page"
            );

            for tool in page.tools {
                if !seen_names.insert(tool.name.clone()) {
                    return Err(Error::ProtocolError {
                        message: format!(
                            "server listed tool '{}' more than once (page {page_number})",
                            tool.name
                        ),
                    });
                }
                tools.push(tool);
            }

            match page.next_cursor.filter(|c| !c.is_empty()) {
                None => {
                    info!(
                        "Discovered {} tools across {page_number} page(s)",
                        tools.len()
                    );
                    return Ok(tools);
                }
                Some(next) => {
                    if !seen_cursors.insert(next.clone()) {
                        return Err(Error::ProtocolError {
                            message: format!(
                                "server repeated pagination cursor '{next}' (page {page_number})"
                            ),
                        });
                    }
                    cursor = Some(next);
                }
            }
        }

        Err(Error::ProtocolError {
            message: format!(
                "tool listing did not terminate within {} pages",
                self.config.max_pages
            ),
        })
    }

    /// Releases the transport and terminates the server process.
    ///
    /// Idempotent, and safe to call whether or not `connect` succeeded.
    pub async fn disconnect(&mut self) {
        if let Some(mut pager) = self.pager.take() {
            debug!("Disconnecting from MCP server");
            pager.shutdown().await;
        }
        if self.state != ConnectionState::Unconnected {
            self.state = ConnectionState::Disconnected;
        }
    }

    /// Lists all tools, then disconnects regardless of the listing outcome.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Introspector::list_tools`], after the
    /// connection has been released.
    pub async fn list_and_disconnect(&mut self) -> Result<ServerInfo> {
        let identity = self.pager.as_ref().and_then(|p| p.server_identity());
        let listed = self.list_tools().await;
        self.disconnect().await;
        let tools = listed?;

        let id = self
            .server_id
            .clone()
            .unwrap_or_else(|| ServerId::new("unknown"));
        let ServerIdentity { name, version } = identity.unwrap_or_else(|| ServerIdentity {
            name: id.to_string(),
            version: "unknown".to_string(),
        });

        Ok(ServerInfo {
            id,
            name,
            version,
            tools,
        })
    }
}

impl Default for Introspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Connects to a server, lists its tools and releases it on every exit path.
///
/// # Errors
///
/// Returns connection, protocol and timeout errors from the underlying
/// client. The server process is released before the error is returned.
pub async fn discover(server: &ServerConfig, config: DiscoveryConfig) -> Result<ServerInfo> {
    let mut client = Introspector::with_config(config);
    if let Err(e) = client.connect(server).await {
        client.disconnect().await;
        return Err(e);
    }
    client.list_and_disconnect().await
}

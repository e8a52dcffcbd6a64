//! Integration tests for mcp-introspector
//!
//! These tests drive the discovery state machine and the pagination loop
//! through scripted pagers, plus a few real process spawns that must fail.

use async_trait::async_trait;
use mcp_core::{DiscoveryConfig, Error, Result, ServerConfig, ServerId};
use mcp_introspector::{
    ConnectionState, Introspector, ServerIdentity, ToolInfo, ToolPage, ToolPager,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn tool(name: &str) -> ToolInfo {
    ToolInfo::new(name, Some("test tool"), json!({"type": "object"}))
}

fn tools(prefix: &str, count: usize) -> Vec<ToolInfo> {
    (0..count).map(|i| tool(&format!("{prefix}_{i}"))).collect()
}

/// Pager that answers from a cursor-keyed script.
#[derive(Debug, Clone, Default)]
struct ScriptedPager {
    pages: HashMap<Option<String>, ToolPage>,
    requests: Arc<Mutex<Vec<Option<String>>>>,
    shutdowns: Arc<AtomicUsize>,
}

impl ScriptedPager {
    fn page(mut self, cursor: Option<&str>, tools: Vec<ToolInfo>, next: Option<&str>) -> Self {
        self.pages.insert(
            cursor.map(str::to_string),
            ToolPage {
                tools,
                next_cursor: next.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl ToolPager for ScriptedPager {
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<ToolPage> {
        self.requests.lock().unwrap().push(cursor.clone());
        self.pages
            .get(&cursor)
            .cloned()
            .ok_or_else(|| Error::ProtocolError {
                message: format!("unexpected cursor {cursor:?}"),
            })
    }

    async fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }

    fn server_identity(&self) -> Option<ServerIdentity> {
        Some(ServerIdentity {
            name: "scripted".to_string(),
            version: "9.9.9".to_string(),
        })
    }
}

/// Pager that always hands back the same cursor.
#[derive(Debug, Default)]
struct LoopingPager {
    calls: usize,
}

#[async_trait]
impl ToolPager for LoopingPager {
    async fn fetch_page(&mut self, _cursor: Option<String>) -> Result<ToolPage> {
        self.calls += 1;
        Ok(ToolPage {
            tools: vec![tool(&format!("t{}", self.calls))],
            next_cursor: Some("c1".to_string()),
        })
    }

    async fn shutdown(&mut self) {}
}

/// Pager that hands out a fresh cursor forever.
#[derive(Debug, Default)]
struct EndlessPager {
    calls: usize,
}

#[async_trait]
impl ToolPager for EndlessPager {
    async fn fetch_page(&mut self, _cursor: Option<String>) -> Result<ToolPage> {
        self.calls += 1;
        Ok(ToolPage {
            tools: vec![],
            next_cursor: Some(format!("c{}", self.calls)),
        })
    }

    async fn shutdown(&mut self) {}
}

/// Pager whose pages never arrive.
#[derive(Debug, Default)]
struct StalledPager;

#[async_trait]
impl ToolPager for StalledPager {
    async fn fetch_page(&mut self, _cursor: Option<String>) -> Result<ToolPage> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ToolPage::default())
    }

    async fn shutdown(&mut self) {}
}

fn attached(pager: impl ToolPager + 'static) -> Introspector {
    let mut client = Introspector::new();
    client
        .attach(ServerId::new("fake"), Box::new(pager))
        .unwrap();
    client
}

#[tokio::test]
async fn test_pagination_collects_all_pages_in_order() {
    let first = tools("a", 10);
    let second = tools("b", 10);
    let third = tools("c", 4);
    let pager = ScriptedPager::default()
        .page(None, first.clone(), Some("c1"))
        .page(Some("c1"), second.clone(), Some("c2"))
        .page(Some("c2"), third.clone(), None);
    let requests = pager.requests.clone();

    let mut client = attached(pager);
    let listed = client.list_tools().await.unwrap();

    assert_eq!(listed.len(), 24);
    let expected: Vec<ToolInfo> = first.into_iter().chain(second).chain(third).collect();
    assert_eq!(listed, expected);
    assert_eq!(
        *requests.lock().unwrap(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}

#[tokio::test]
async fn test_single_page_without_cursor() {
    let mut client = attached(ScriptedPager::default().page(None, tools("x", 3), None));
    assert_eq!(client.list_tools().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_cursor_ends_listing() {
    let mut client = attached(ScriptedPager::default().page(None, tools("x", 2), Some("")));
    assert_eq!(client.list_tools().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_zero_tools_is_not_an_error() {
    let mut client = attached(ScriptedPager::default().page(None, vec![], None));
    assert!(client.list_tools().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_cursor_is_protocol_error() {
    let mut client = attached(LoopingPager::default());
    let err = client.list_tools().await.unwrap_err();

    assert!(err.is_protocol_error(), "unexpected error: {err}");
    assert!(err.to_string().contains("c1"));
}

#[tokio::test]
async fn test_page_cap_is_protocol_error() {
    let mut client = Introspector::with_config(DiscoveryConfig {
        max_pages: 5,
        ..Default::default()
    });
    client
        .attach(ServerId::new("endless"), Box::new(EndlessPager::default()))
        .unwrap();

    let err = client.list_tools().await.unwrap_err();
    assert!(err.is_protocol_error());
    assert!(err.to_string().contains("5 pages"));
}

#[tokio::test]
async fn test_duplicate_tool_across_pages_is_protocol_error() {
    let pager = ScriptedPager::default()
        .page(None, vec![tool("get_run")], Some("c1"))
        .page(Some("c1"), vec![tool("get_run")], None);
    let mut client = attached(pager);

    let err = client.list_tools().await.unwrap_err();
    assert!(err.is_protocol_error());
    assert!(err.to_string().contains("get_run"));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_page_times_out() {
    let mut client = Introspector::with_config(DiscoveryConfig {
        page_timeout: Duration::from_secs(2),
        ..Default::default()
    });
    client
        .attach(ServerId::new("stalled"), Box::new(StalledPager))
        .unwrap();

    let err = client.list_tools().await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_list_tools_requires_connection() {
    let mut client = Introspector::new();
    assert!(matches!(
        client.list_tools().await,
        Err(Error::NotConnected { .. })
    ));
}

#[tokio::test]
async fn test_list_tools_after_disconnect_fails() {
    let mut client = attached(ScriptedPager::default().page(None, tools("x", 1), None));
    client.disconnect().await;

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(matches!(
        client.list_tools().await,
        Err(Error::NotConnected { .. })
    ));
}

#[tokio::test]
async fn test_second_attach_is_rejected() {
    let mut client = attached(ScriptedPager::default());
    let err = client
        .attach(ServerId::new("again"), Box::new(ScriptedPager::default()))
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyConnected { .. }));
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let pager = ScriptedPager::default();
    let shutdowns = pager.shutdowns.clone();
    let mut client = attached(pager);

    client.disconnect().await;
    client.disconnect().await;

    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_list_and_disconnect_releases_on_success() {
    let pager = ScriptedPager::default().page(None, tools("x", 2), None);
    let shutdowns = pager.shutdowns.clone();
    let mut client = attached(pager);

    let info = client.list_and_disconnect().await.unwrap();

    assert_eq!(info.id.as_str(), "fake");
    assert_eq!(info.name, "scripted");
    assert_eq!(info.version, "9.9.9");
    assert_eq!(info.tools.len(), 2);
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_and_disconnect_releases_on_failure() {
    let pager = ScriptedPager::default().page(None, tools("x", 2), Some("missing"));
    let shutdowns = pager.shutdowns.clone();
    let mut client = attached(pager);

    assert!(client.list_and_disconnect().await.is_err());
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_to_missing_binary_fails() {
    let server = ServerConfig::from_command_line(
        "/nonexistent/definitely-not-an-mcp-server --stdio TFE_TOKEN=abc123",
    )
    .unwrap();
    let mut client = Introspector::new();

    let err = client.connect(&server).await.unwrap_err();

    assert!(err.is_connection_error());
    // the error names the server without leaking credentials
    let message = err.to_string();
    assert!(message.contains("TFE_TOKEN=***REDACTED***"));
    assert!(!message.contains("abc123"));
    assert_eq!(client.state(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_connect_twice_is_rejected() {
    let server = ServerConfig::from_command_line("/nonexistent/mcp-server").unwrap();
    let mut client = Introspector::new();

    assert!(client.connect(&server).await.is_err());
    let err = client.connect(&server).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyConnected { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_server_exiting_immediately_fails_handshake() {
    let server = ServerConfig::from_command_line("true").unwrap();
    let mut client = Introspector::with_config(DiscoveryConfig {
        handshake_timeout: Duration::from_secs(10),
        ..Default::default()
    });

    let err = client.connect(&server).await.unwrap_err();
    assert!(err.is_connection_error());

    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_discover_reports_connection_failure() {
    let server = ServerConfig::from_command_line("/nonexistent/mcp-server").unwrap();
    let err = mcp_introspector::discover(&server, DiscoveryConfig::default())
        .await
        .unwrap_err();
    assert!(err.is_connection_error());
}

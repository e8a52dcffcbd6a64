//! MCP server tool discovery.
//!
//! Connects to an MCP server over a child process's standard input/output,
//! performs the handshake, and retrieves the complete, order-preserved list
//! of tools by following `tools/list` pagination cursors to the end.
//!
//! Listing is hardened against misbehaving servers: repeated cursors, runaway
//! pagination, duplicate tool names and stalled pages all fail the run
//! instead of looping or hanging.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod discovery;
pub mod pager;
pub mod types;

pub use discovery::{Introspector, discover};
pub use pager::{RmcpPager, ToolPager};
pub use types::{ConnectionState, ServerIdentity, ServerInfo, ToolInfo, ToolPage};

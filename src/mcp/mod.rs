//! MCP (Model Context Protocol) implementation
//!
//! This module contains the MCP server adapter that handles protocol
//! communication with MCP clients over HTTP JSON-RPC and stdio.

pub mod errors;
pub mod server;
pub mod stdio;
pub mod types;

pub use errors::{McpError, McpErrorCode};
pub use server::{McpServer, MCP_PROTOCOL_VERSION};
pub use stdio::StdioServer;
pub use types::*;

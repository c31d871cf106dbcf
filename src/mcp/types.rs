//! MCP wire types
//!
//! Type definitions for the JSON-RPC protocol surface spoken to MCP clients
//! such as Claude Desktop and LM Studio.

use crate::registry::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mcp::errors::McpError;

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

/// MCP tool definition as sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpTool {
    /// Tool name (unique identifier)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpTool {
    /// Build the wire representation from a capability descriptor
    pub fn from_descriptor(descriptor: &ToolDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            input_schema: descriptor.input_schema(),
        }
    }
}

/// MCP-compliant content block for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    /// Text content
    #[serde(rename = "text")]
    Text {
        /// Text content
        text: String,
    },
}

impl ToolContent {
    /// Create text content
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Result of a tools/call invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Content blocks for the response
    pub content: Vec<ToolContent>,
    /// Error flag, present only on failure
    #[serde(rename = "isError", skip_serializing_if = "is_false", default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// Create a successful text result
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    /// Create an error-flagged result
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: true,
        }
    }
}

/// Parameters of a tools/call request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    /// Tool name to call
    pub name: String,
    /// Arguments for the tool
    #[serde(default = "default_arguments")]
    pub arguments: Value,
}

/// Server identity reported during initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Result of the initialize handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Supported protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capability flags
    pub capabilities: Value,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// JSON-RPC request message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID (string, number, or null for notifications)
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Parameters
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID this responds to
    pub id: Value,
    /// Result (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

impl McpResponse {
    /// Create a success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

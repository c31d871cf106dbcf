//! MCP-compliant error handling
//!
//! JSON-RPC 2.0 error codes and structures for protocol-level failures.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP-compliant error codes following JSON-RPC 2.0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpErrorCode {
    // Standard JSON-RPC error codes
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,

    // MCP-specific error codes (above -32000 as per spec)
    ToolNotFound = -32000,
    ToolExecutionFailed = -31999,
    ValidationError = -31991,
    TimeoutError = -31988,
}

impl McpErrorCode {
    /// Get the error code as i32
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// MCP-compliant error structure following JSON-RPC 2.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    /// Create a new MCP error
    pub fn new(code: McpErrorCode, message: String) -> Self {
        Self {
            code: code.code(),
            message,
            data: None,
        }
    }

    /// Create a new MCP error with additional data
    pub fn with_data(code: McpErrorCode, message: String, data: Value) -> Self {
        Self {
            code: code.code(),
            message,
            data: Some(data),
        }
    }

    /// Create an invalid params error
    pub fn invalid_params(message: String) -> Self {
        Self::new(McpErrorCode::InvalidParams, message)
    }

    /// Create an internal error
    pub fn internal_error(message: String) -> Self {
        Self::new(McpErrorCode::InternalError, message)
    }

    /// Create a tool not found error
    pub fn tool_not_found(tool_name: String) -> Self {
        Self::with_data(
            McpErrorCode::ToolNotFound,
            format!("Tool '{}' not found", tool_name),
            serde_json::json!({ "tool_name": tool_name }),
        )
    }
}

/// Convert BridgeError to MCP-compliant error
impl From<BridgeError> for McpError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::ToolNotFound { name } => McpError::tool_not_found(name),
            BridgeError::Validation { message } => {
                McpError::new(McpErrorCode::ValidationError, message)
            }
            BridgeError::ToolExecution { tool_name, message } => McpError::with_data(
                McpErrorCode::ToolExecutionFailed,
                format!("Tool '{}' execution failed: {}", tool_name, message),
                serde_json::json!({ "tool_name": tool_name }),
            ),
            BridgeError::Timeout { message } => {
                McpError::new(McpErrorCode::TimeoutError, message)
            }
            BridgeError::Serde(e) => McpError::new(
                McpErrorCode::ParseError,
                format!("Serialization error: {}", e),
            ),
            other => McpError::internal_error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mcp_error_code_values() {
        assert_eq!(McpErrorCode::ParseError.code(), -32700);
        assert_eq!(McpErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(McpErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(McpErrorCode::InvalidParams.code(), -32602);
        assert_eq!(McpErrorCode::InternalError.code(), -32603);
        assert_eq!(McpErrorCode::ToolNotFound.code(), -32000);
    }

    #[test]
    fn test_tool_not_found_conversion() {
        let mcp_error: McpError = BridgeError::tool_not_found("web_search").into();
        assert_eq!(mcp_error.code, -32000);
        assert_eq!(mcp_error.message, "Tool 'web_search' not found");
        assert_eq!(mcp_error.data, Some(json!({"tool_name": "web_search"})));
    }

    #[test]
    fn test_validation_conversion() {
        let mcp_error: McpError =
            BridgeError::validation("Missing required parameter: msg").into();
        assert_eq!(mcp_error.code, McpErrorCode::ValidationError.code());
        assert!(mcp_error.message.contains("msg"));
    }
}

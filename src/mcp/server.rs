//! MCP server adapter
//!
//! Translates JSON-RPC requests into registry lookups and generic tool
//! invocations. Every invocation terminates with a well-formed response:
//! lookup failures, validation failures, tool-reported errors, timeouts, and
//! panics all degrade to error-flagged content rather than crashing the
//! protocol session.

use crate::config::Config;
use crate::mcp::errors::McpError;
use crate::mcp::types::{
    CallToolResult, InitializeResult, McpRequest, McpResponse, McpTool, ServerInfo,
    ToolCallParams,
};
use crate::registry::{ToolArguments, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// MCP protocol version spoken by this server
pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

/// MCP server sitting on top of the tool registry
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    /// Upper bound on a single tool execution
    execution_timeout: Duration,
}

impl McpServer {
    /// Create a new MCP server over the given registry
    pub fn new(registry: Arc<ToolRegistry>, config: &Config) -> Self {
        Self {
            registry,
            execution_timeout: Duration::from_secs(config.server.timeout),
        }
    }

    /// Access the underlying registry
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handle the initialize handshake
    pub fn initialize(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: json!({ "tools": {} }),
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// List all registered tools in wire format
    pub fn list_tools(&self) -> Vec<McpTool> {
        let tools: Vec<McpTool> = self
            .registry
            .list()
            .iter()
            .map(McpTool::from_descriptor)
            .collect();
        info!("Returning {} tools", tools.len());
        tools
    }

    /// Resolve and execute one tool call, always producing a well-formed
    /// result
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> CallToolResult {
        debug!("Handling tools/call for: {}", name);

        let supplied: ToolArguments = match arguments {
            Value::Object(map) => map.clone(),
            Value::Null => ToolArguments::new(),
            _ => {
                return CallToolResult::error(format!(
                    "Arguments for tool '{}' must be a JSON object",
                    name
                ))
            }
        };

        let descriptor = match self.registry.descriptor(name) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Tool lookup failed: {}", e);
                return CallToolResult::error(e.to_string());
            }
        };

        let validated = match descriptor.validate_arguments(&supplied) {
            Ok(validated) => validated,
            Err(e) => {
                warn!("Argument validation failed for '{}': {}", name, e);
                return CallToolResult::error(e.to_string());
            }
        };

        let tool = match self.registry.get(name, None) {
            Ok(tool) => tool,
            Err(e) => {
                error!("Failed to construct tool '{}': {}", name, e);
                return CallToolResult::error(e.to_string());
            }
        };

        // Run on a separate task so a panicking tool surfaces as a JoinError
        // instead of tearing down the protocol session, and bound the whole
        // execution with the server-wide timeout.
        let mut handle = tokio::spawn(async move { tool.execute(&validated).await });
        let output = match tokio::time::timeout(self.execution_timeout, &mut handle).await {
            Err(_) => {
                handle.abort();
                error!("Tool '{}' timed out", name);
                return CallToolResult::error(format!(
                    "Tool '{}' timed out after {}s",
                    name,
                    self.execution_timeout.as_secs()
                ));
            }
            Ok(Err(join_error)) => {
                error!("Tool '{}' execution aborted: {}", name, join_error);
                return CallToolResult::error(format!(
                    "Tool '{}' execution failed unexpectedly",
                    name
                ));
            }
            Ok(Ok(output)) => output,
        };

        if output.success {
            CallToolResult::text(output.render())
        } else {
            let message = output
                .error_message
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("Tool '{}' failed: {}", name, message);
            CallToolResult::error(format!("Error: {}", message))
        }
    }

    /// Dispatch one JSON-RPC request. Returns None for notifications, which
    /// produce no response.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("Handling MCP method: {}", request.method);
        let id = request.id.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => Some(McpResponse::success(id, json!(self.initialize()))),
            "initialized" | "notifications/initialized" => None,
            "tools/list" => Some(McpResponse::success(
                id,
                json!({ "tools": self.list_tools() }),
            )),
            "tools/call" => {
                let params = request.params.unwrap_or_else(|| json!({}));
                match serde_json::from_value::<ToolCallParams>(params) {
                    Ok(call) => {
                        let result = self.call_tool(&call.name, &call.arguments).await;
                        Some(McpResponse::success(id, json!(result)))
                    }
                    Err(e) => Some(McpResponse::error(
                        id,
                        McpError::invalid_params(format!("Invalid tool call parameters: {}", e)),
                    )),
                }
            }
            // Unknown methods come back as error-flagged content, not a
            // protocol-level error, so lenient clients keep their session.
            other => Some(McpResponse::success(
                id,
                json!(CallToolResult::error(format!("Unknown method: {}", other))),
            )),
        }
    }
}

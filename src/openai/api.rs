//! OpenAI-compatible HTTP API
//!
//! Actix-web front-end over the tool registry: function-style tool listing,
//! tool-call resolution for chat completions, a direct execution endpoint,
//! and liveness reporting. A JSON-RPC endpoint delegating to the MCP adapter
//! is mounted on the same server for HTTP-capable MCP clients.

use crate::config::Config;
use crate::mcp::server::McpServer;
use crate::mcp::types::McpRequest;
use crate::openai::types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatUsage,
    ExecuteToolRequest, FunctionCall, FunctionTool, ToolCall, ToolCallResult,
};
use crate::registry::{ToolArguments, ToolOutput, ToolRegistry};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Shared state injected into every HTTP handler
pub struct ApiState {
    registry: Arc<ToolRegistry>,
    /// Upper bound on a single tool execution
    execution_timeout: Duration,
}

impl ApiState {
    /// Create handler state over the given registry
    pub fn new(registry: Arc<ToolRegistry>, config: &Config) -> Self {
        Self {
            registry,
            execution_timeout: Duration::from_secs(config.server.timeout),
        }
    }

    /// Resolve, validate, and execute one tool call, degrading every failure
    /// mode (lookup, validation, timeout, panic) to a `success=false`
    /// envelope so no invocation ever escapes as an HTTP-level error.
    async fn execute_tool(&self, name: &str, arguments: &Value) -> ToolOutput {
        let supplied: ToolArguments = match arguments {
            Value::Object(map) => map.clone(),
            Value::Null => ToolArguments::new(),
            _ => {
                return ToolOutput::error(format!(
                    "Arguments for tool '{}' must be a JSON object",
                    name
                ))
            }
        };

        let descriptor = match self.registry.descriptor(name) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Tool lookup failed: {}", e);
                return ToolOutput::error(e.to_string());
            }
        };

        let validated = match descriptor.validate_arguments(&supplied) {
            Ok(validated) => validated,
            Err(e) => {
                warn!("Argument validation failed for '{}': {}", name, e);
                return ToolOutput::error(e.to_string());
            }
        };

        let tool = match self.registry.get(name, None) {
            Ok(tool) => tool,
            Err(e) => {
                error!("Failed to construct tool '{}': {}", name, e);
                return ToolOutput::error(e.to_string());
            }
        };

        let mut handle = tokio::spawn(async move { tool.execute(&validated).await });
        match tokio::time::timeout(self.execution_timeout, &mut handle).await {
            Err(_) => {
                handle.abort();
                error!("Tool '{}' timed out", name);
                ToolOutput::error(format!(
                    "Tool '{}' timed out after {}s",
                    name,
                    self.execution_timeout.as_secs()
                ))
            }
            Ok(Err(join_error)) => {
                error!("Tool '{}' execution aborted: {}", name, join_error);
                ToolOutput::error(format!("Tool '{}' execution failed unexpectedly", name))
            }
            Ok(Ok(output)) => output,
        }
    }
}

/// List available tools in OpenAI function format
pub async fn list_tools_handler(state: web::Data<ApiState>) -> HttpResponse {
    let tools: Vec<FunctionTool> = state
        .registry
        .list()
        .iter()
        .map(FunctionTool::from_descriptor)
        .collect();

    debug!("Listing {} tools in OpenAI function format", tools.len());
    HttpResponse::Ok().json(json!({ "tools": tools }))
}

/// Process the tool calls of a chat completion request and return a
/// synthesized assistant message carrying each resolved result
pub async fn chat_completions_handler(
    state: web::Data<ApiState>,
    request: web::Json<ChatCompletionRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    // The most recent tool-call-bearing message drives execution
    let calls = request
        .messages
        .iter()
        .rev()
        .find_map(|m| m.tool_calls.as_ref().filter(|calls| !calls.is_empty()));

    let Some(calls) = calls else {
        return HttpResponse::BadRequest().json(json!({
            "error": "No tool calls found in messages"
        }));
    };
    let mut tool_results: Vec<ToolCallResult> = Vec::with_capacity(calls.len());

    for call in calls {
        let content = resolve_tool_call(&state, call).await;
        tool_results.push(ToolCallResult {
            tool_call_id: call.id.clone(),
            role: "tool".to_string(),
            content,
        });
    }

    let response_calls: Vec<ToolCall> = tool_results
        .iter()
        .map(|result| ToolCall {
            id: result.tool_call_id.clone(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: "tool_result".to_string(),
                arguments: Some(Value::String(
                    json!({ "content": result.content }).to_string(),
                )),
            },
        })
        .collect();

    let call_id = uuid::Uuid::new_v4().simple().to_string();
    let completion_id = format!("chatcmpl-{}", &call_id[..20]);

    HttpResponse::Ok().json(ChatCompletionResponse {
        id: completion_id,
        object: "chat.completion".to_string(),
        created: chrono::Utc::now().timestamp(),
        model: request.model,
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: None,
                tool_calls: Some(response_calls),
                tool_call_id: None,
            },
            finish_reason: "tool_calls".to_string(),
        }],
        usage: ChatUsage::default(),
    })
}

/// Execute one tool call and flatten its outcome to a content string
async fn resolve_tool_call(state: &ApiState, call: &ToolCall) -> String {
    let name = &call.function.name;

    // String-encoded arguments are JSON-decoded first
    let arguments = match &call.function.arguments {
        None => Value::Object(ToolArguments::new()),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Invalid JSON arguments for tool '{}': {}", name, e);
                return format!("Error: invalid JSON arguments for tool '{}': {}", name, e);
            }
        },
        Some(other) => other.clone(),
    };

    info!("Executing tool: {}", name);
    let output = state.execute_tool(name, &arguments).await;

    if output.success {
        output.render()
    } else {
        format!(
            "Error: {}",
            output
                .error_message
                .unwrap_or_else(|| "Unknown error".to_string())
        )
    }
}

/// Direct tool execution endpoint (non-OpenAI standard).
///
/// Returns the raw invocation envelope. Lookup and validation failures come
/// back as structured `success=false` bodies, the same discipline as the
/// other endpoints.
pub async fn execute_tool_handler(
    state: web::Data<ApiState>,
    request: web::Json<ExecuteToolRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    info!("Direct execution: {}", request.tool_name);

    let output = state
        .execute_tool(&request.tool_name, &request.arguments)
        .await;
    HttpResponse::Ok().json(output)
}

/// Health check endpoint
pub async fn health_handler(state: web::Data<ApiState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "tools_available": state.registry.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// MCP JSON-RPC endpoint for HTTP-capable MCP clients
pub async fn mcp_jsonrpc_handler(
    mcp_server: web::Data<Arc<McpServer>>,
    request: web::Json<McpRequest>,
) -> HttpResponse {
    match mcp_server.handle_request(request.into_inner()).await {
        Some(response) => HttpResponse::Ok().json(response),
        // Notifications produce no response body
        None => HttpResponse::Ok().json(json!({ "jsonrpc": "2.0" })),
    }
}

/// Register all API routes on an actix service config
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/v1/tools", web::get().to(list_tools_handler))
        .route(
            "/v1/chat/completions",
            web::post().to(chat_completions_handler),
        )
        .route("/v1/tools/execute", web::post().to(execute_tool_handler))
        .route("/health", web::get().to(health_handler))
        .route("/mcp/jsonrpc", web::post().to(mcp_jsonrpc_handler));
}

/// Run the HTTP server until shutdown
pub async fn serve(registry: Arc<ToolRegistry>, config: &Config) -> crate::error::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = web::Data::new(ApiState::new(registry.clone(), config));
    let mcp_server = web::Data::new(Arc::new(McpServer::new(registry, config)));

    info!("HTTP server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(mcp_server.clone())
            .wrap(Cors::permissive())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

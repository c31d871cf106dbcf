//! OpenAI-compatible API types
//!
//! Wire structures for the function-calling surface spoken to LM Studio and
//! other OpenAI-client integrations.

use crate::registry::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_function_type() -> String {
    "function".to_string()
}

fn default_tool_role() -> String {
    "tool".to_string()
}

/// Function definition nested inside an OpenAI tool object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON-Schema object describing the parameters
    pub parameters: Value,
}

/// OpenAI tool definition (`type: function`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type", default = "default_function_type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl FunctionTool {
    /// Build the wire representation from a capability descriptor
    pub fn from_descriptor(descriptor: &ToolDescriptor) -> Self {
        Self {
            tool_type: default_function_type(),
            function: FunctionDefinition {
                name: descriptor.name.clone(),
                description: descriptor.description.clone(),
                parameters: descriptor.input_schema(),
            },
        }
    }
}

/// Function invocation carried by an assistant message.
///
/// `arguments` arrives either as a JSON object or as a JSON-encoded string,
/// depending on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arguments: Option<Value>,
}

/// One tool call within a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_function_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tools: Option<Vec<FunctionTool>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stream: Option<bool>,
}

/// Resolved result for one tool call, keyed by its call id while the batched
/// response is assembled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    #[serde(default = "default_tool_role")]
    pub role: String,
    pub content: String,
}

/// Token usage accounting (always zero here; no model runs in this process)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Default for ChatUsage {
    fn default() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
        }
    }
}

/// One choice in a chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// Chat completion response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: ChatUsage,
}

/// Direct-execution request body for `POST /v1/tools/execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteToolRequest {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Value,
}

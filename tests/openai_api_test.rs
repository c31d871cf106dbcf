//! Integration tests for the OpenAI-compatible HTTP adapter

mod common;

use actix_web::{test, web, App};
use common::{full_test_registry, test_config};
use serde_json::{json, Value};
use std::sync::Arc;
use toolbridge::mcp::McpServer;
use toolbridge::openai::{configure_routes, ApiState};
use toolbridge::registry::ToolRegistry;

async fn spawn_app(
    registry: Arc<ToolRegistry>,
    timeout_secs: u64,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let config = test_config(timeout_secs);
    let state = web::Data::new(ApiState::new(registry.clone(), &config));
    let mcp_server = web::Data::new(Arc::new(McpServer::new(registry, &config)));

    test::init_service(
        App::new()
            .app_data(state)
            .app_data(mcp_server)
            .configure(configure_routes),
    )
    .await
}

#[actix_web::test]
async fn test_list_tools_function_shape() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::get().uri("/v1/tools").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    let tools = body["tools"].as_array().unwrap();
    assert!(!tools.is_empty());
    assert_eq!(tools[0]["type"], "function");
    assert_eq!(tools[0]["function"]["name"], "echo");
    assert_eq!(tools[0]["function"]["parameters"]["type"], "object");
    assert_eq!(
        tools[0]["function"]["parameters"]["required"],
        json!(["msg"])
    );
}

#[actix_web::test]
async fn test_sequential_listings_are_identical() {
    let app = spawn_app(full_test_registry(), 2).await;

    let mut orders = Vec::new();
    for _ in 0..2 {
        let request = test::TestRequest::get().uri("/v1/tools").to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        let names: Vec<String> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap().to_string())
            .collect();
        orders.push(names);
    }
    assert_eq!(orders[0], orders[1]);
}

#[actix_web::test]
async fn test_chat_completions_without_tool_calls_is_client_error() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({
            "model": "local-model",
            "messages": [{"role": "user", "content": "hello"}]
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_chat_completions_executes_string_encoded_arguments() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({
            "model": "local-model",
            "messages": [{
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "echo", "arguments": "{\"msg\": \"hi\"}"}
                }]
            }]
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert!(body["id"].as_str().unwrap().starts_with("chatcmpl-"));
    assert_eq!(body["choices"][0]["finish_reason"], "tool_calls");

    let call = &body["choices"][0]["message"]["tool_calls"][0];
    assert_eq!(call["id"], "call_1");
    assert_eq!(call["function"]["name"], "tool_result");

    let arguments: Value =
        serde_json::from_str(call["function"]["arguments"].as_str().unwrap()).unwrap();
    assert_eq!(arguments["content"], "hi");
}

#[actix_web::test]
async fn test_chat_completions_renders_tool_failure_as_error_text() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({
            "model": "local-model",
            "messages": [{
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_2",
                    "type": "function",
                    "function": {"name": "always_fails", "arguments": {}}
                }]
            }]
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    let call = &body["choices"][0]["message"]["tool_calls"][0];
    let arguments: Value =
        serde_json::from_str(call["function"]["arguments"].as_str().unwrap()).unwrap();
    assert_eq!(arguments["content"], "Error: intentional failure");
}

#[actix_web::test]
async fn test_chat_completions_uses_most_recent_tool_call_message() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({
            "model": "local-model",
            "messages": [
                {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "old",
                        "type": "function",
                        "function": {"name": "echo", "arguments": {"msg": "old"}}
                    }]
                },
                {"role": "user", "content": "again"},
                {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "new",
                        "type": "function",
                        "function": {"name": "echo", "arguments": {"msg": "new"}}
                    }]
                }
            ]
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    let calls = body["choices"][0]["message"]["tool_calls"].as_array().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["id"], "new");
}

#[actix_web::test]
async fn test_direct_execute_returns_raw_envelope() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/tools/execute")
        .set_json(json!({"tool_name": "echo", "arguments": {"msg": "hi"}}))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["result_type"], "text");
    assert_eq!(body["content"], "hi");
    assert!(body["metadata"].is_object());
}

#[actix_web::test]
async fn test_direct_execute_unknown_tool_is_structured_failure() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/tools/execute")
        .set_json(json!({"tool_name": "ghost", "arguments": {}}))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["result_type"], "error");
    assert!(body["error_message"].as_str().unwrap().contains("ghost"));
}

#[actix_web::test]
async fn test_direct_execute_missing_parameter_is_structured_failure() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/tools/execute")
        .set_json(json!({"tool_name": "echo"}))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["success"], false);
    assert!(body["error_message"].as_str().unwrap().contains("msg"));
}

#[actix_web::test]
async fn test_direct_execute_panic_is_structured_failure() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/v1/tools/execute")
        .set_json(json!({"tool_name": "panics", "arguments": {}}))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_health_reports_tool_count() {
    let registry = full_test_registry();
    let expected = registry.len();
    let app = spawn_app(registry, 2).await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tools_available"], json!(expected));
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_mcp_jsonrpc_endpoint_lists_tools() {
    let app = spawn_app(full_test_registry(), 2).await;

    let request = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/list",
            "params": {}
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 7);
    assert!(body["result"]["tools"].as_array().unwrap().len() >= 1);
}

//! Shared test tools exercising the registry contract
#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use toolbridge::config::Config;
use toolbridge::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration, ToolRegistry,
};

/// Echoes its required `msg` parameter back as text
pub struct EchoTool;

#[async_trait::async_trait]
impl Tool for EchoTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        match arguments.get("msg").and_then(Value::as_str) {
            Some(msg) => ToolOutput::text(msg),
            None => ToolOutput::error("Parameter 'msg' must be a string"),
        }
    }
}

pub fn echo_registration() -> ToolRegistration {
    ToolRegistration::new(
        ToolDescriptor::new(
            "echo",
            "Echo a message back",
            vec![ParameterDescriptor::required(
                "msg",
                ParameterType::String,
                "The message to echo",
            )],
        ),
        |_config| Ok(Arc::new(EchoTool) as Arc<dyn Tool>),
    )
}

/// Always reports failure through the envelope
pub struct FailingTool;

#[async_trait::async_trait]
impl Tool for FailingTool {
    async fn execute(&self, _arguments: &ToolArguments) -> ToolOutput {
        ToolOutput::error("intentional failure")
    }
}

pub fn failing_registration() -> ToolRegistration {
    ToolRegistration::new(
        ToolDescriptor::new("always_fails", "Always fails", vec![]),
        |_config| Ok(Arc::new(FailingTool) as Arc<dyn Tool>),
    )
}

/// Panics instead of returning an envelope (a contract violation the
/// adapters must absorb)
pub struct PanickingTool;

#[async_trait::async_trait]
impl Tool for PanickingTool {
    async fn execute(&self, _arguments: &ToolArguments) -> ToolOutput {
        panic!("tool blew up");
    }
}

pub fn panicking_registration() -> ToolRegistration {
    ToolRegistration::new(
        ToolDescriptor::new("panics", "Panics on execution", vec![]),
        |_config| Ok(Arc::new(PanickingTool) as Arc<dyn Tool>),
    )
}

/// Sleeps longer than any reasonable test timeout
pub struct StallingTool;

#[async_trait::async_trait]
impl Tool for StallingTool {
    async fn execute(&self, _arguments: &ToolArguments) -> ToolOutput {
        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
        ToolOutput::text("never reached")
    }
}

pub fn stalling_registration() -> ToolRegistration {
    ToolRegistration::new(
        ToolDescriptor::new("stalls", "Sleeps forever", vec![]),
        |_config| Ok(Arc::new(StallingTool) as Arc<dyn Tool>),
    )
}

/// Returns a fixed JSON payload including non-ASCII text
pub struct JsonTool;

#[async_trait::async_trait]
impl Tool for JsonTool {
    async fn execute(&self, _arguments: &ToolArguments) -> ToolOutput {
        ToolOutput::json(json!({"greeting": "héllo", "count": 2}))
    }
}

pub fn json_registration() -> ToolRegistration {
    ToolRegistration::new(
        ToolDescriptor::new("json_payload", "Returns JSON content", vec![]),
        |_config| Ok(Arc::new(JsonTool) as Arc<dyn Tool>),
    )
}

/// Registry preloaded with the echo tool
pub fn registry_with_echo() -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();
    registry.register(echo_registration()).unwrap();
    Arc::new(registry)
}

/// Registry preloaded with every test tool
pub fn full_test_registry() -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();
    registry.register(echo_registration()).unwrap();
    registry.register(failing_registration()).unwrap();
    registry.register(panicking_registration()).unwrap();
    registry.register(stalling_registration()).unwrap();
    registry.register(json_registration()).unwrap();
    Arc::new(registry)
}

/// Default config with a short tool execution timeout for tests
pub fn test_config(timeout_secs: u64) -> Config {
    let mut config = Config::default();
    config.server.timeout = timeout_secs;
    config
}

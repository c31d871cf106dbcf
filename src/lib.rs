//! toolbridge - Utility tools for LLM clients over MCP and OpenAI-compatible HTTP
//!
//! This crate provides a registry of self-describing tools and two protocol
//! front-ends: an MCP server (JSON-RPC over stdio or HTTP) for clients like
//! Claude Desktop, and an OpenAI-compatible function-calling API for clients
//! like LM Studio. The front-ends know nothing about individual tools; they
//! resolve every call through the registry and translate the uniform result
//! envelope into their wire format.

pub mod config;
pub mod error;
pub mod mcp;
pub mod openai;
pub mod registry;
pub mod tools;

pub use config::Config;
pub use error::{BridgeError, Result};
pub use registry::ToolRegistry;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

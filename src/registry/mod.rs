//! Capability registry for tool descriptors, instances, and dispatch

pub mod service;
pub mod types;

pub use service::ToolRegistry;
pub use types::*;

//! OpenAI API compatibility module
//!
//! This module provides the OpenAI-compatible HTTP surface, enabling
//! function-calling integrations (LM Studio and other OpenAI clients) to
//! discover and execute registry tools.

pub mod api;
pub mod types;

pub use api::{configure_routes, serve, ApiState};
pub use types::*;

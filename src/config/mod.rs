//! Configuration module for toolbridge
//!
//! This module provides configuration management and loading utilities.

mod config;

// Re-export the main configuration types
pub use config::{Config, LoggingConfig, ServerConfig};

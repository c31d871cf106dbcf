//! Configuration management for toolbridge

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_host() -> String {
    crate::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    crate::DEFAULT_PORT
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-invocation tool execution timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variables and CLI
    /// overrides. Precedence: defaults < file < environment < CLI.
    pub fn load<P: AsRef<Path>>(
        path: P,
        host_override: Option<String>,
        port_override: Option<u16>,
    ) -> Result<Self> {
        // .env values become process environment for tools and overrides alike
        dotenvy::dotenv().ok();

        let mut config = if path.as_ref().exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| BridgeError::config(format!("Failed to read config file: {}", e)))?;

            serde_yaml::from_str(&content)
                .map_err(|e| BridgeError::config(format!("Failed to parse config file: {}", e)))?
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Self::default()
        };

        config.apply_environment_overrides()?;

        if let Some(host) = host_override {
            config.server.host = host;
        }
        if let Some(port) = port_override {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("TOOLBRIDGE_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port_str) = std::env::var("TOOLBRIDGE_PORT") {
            if !port_str.is_empty() {
                self.server.port = port_str.parse().map_err(|e| {
                    BridgeError::config(format!(
                        "Invalid TOOLBRIDGE_PORT environment variable: {}",
                        e
                    ))
                })?;
            }
        }

        if let Ok(timeout_str) = std::env::var("TOOLBRIDGE_TIMEOUT") {
            if !timeout_str.is_empty() {
                self.server.timeout = timeout_str.parse().map_err(|e| {
                    BridgeError::config(format!(
                        "Invalid TOOLBRIDGE_TIMEOUT environment variable: {}",
                        e
                    ))
                })?;
            }
        }

        if let Ok(level) = std::env::var("TOOLBRIDGE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }

        Ok(())
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(BridgeError::config("Server host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(BridgeError::config("Server port cannot be 0"));
        }
        if self.server.timeout == 0 {
            return Err(BridgeError::config(
                "Tool execution timeout must be at least 1 second",
            ));
        }
        match self.logging.format.as_str() {
            "json" | "text" => {}
            other => {
                return Err(BridgeError::config(format!(
                    "Unknown log format: {} (expected json or text)",
                    other
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, crate::DEFAULT_HOST);
        assert_eq!(config.server.port, crate::DEFAULT_PORT);
        assert_eq!(config.server.timeout, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config: Config = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, crate::DEFAULT_HOST);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}

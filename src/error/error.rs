//! Error types and handling for toolbridge

use thiserror::Error;

/// Result type alias for toolbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for toolbridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Registry errors
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Unknown tool lookup
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    /// Parameter/argument validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Tool execution errors
    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    /// MCP protocol errors
    #[error("MCP protocol error: {message}")]
    Mcp { message: String },

    /// Execution timeout
    #[error("Timeout: {message}")]
    Timeout { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BridgeError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a registry error
    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a tool-not-found error
    pub fn tool_not_found<S: Into<String>>(name: S) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a tool execution error
    pub fn tool_execution<S: Into<String>>(tool_name: S, message: S) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create an MCP protocol error
    pub fn mcp<S: Into<String>>(message: S) -> Self {
        Self::Mcp {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BridgeError::Config { .. } => "config",
            BridgeError::Registry { .. } => "registry",
            BridgeError::ToolNotFound { .. } => "tool_not_found",
            BridgeError::Validation { .. } => "validation",
            BridgeError::ToolExecution { .. } => "tool_execution",
            BridgeError::Mcp { .. } => "mcp",
            BridgeError::Timeout { .. } => "timeout",
            BridgeError::Io(_) => "io",
            BridgeError::Serde(_) => "serialization",
            BridgeError::Yaml(_) => "yaml",
            BridgeError::Http(_) => "http",
            BridgeError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        let err = BridgeError::tool_not_found("web_search");
        assert_eq!(err.to_string(), "Tool not found: web_search");
        assert_eq!(err.category(), "tool_not_found");

        let err = BridgeError::validation("Missing required parameter: query");
        assert!(err.to_string().contains("query"));
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_tool_execution_error_display() {
        let err = BridgeError::tool_execution("sqlite_query", "no such table: users");
        assert_eq!(
            err.to_string(),
            "Tool execution error: sqlite_query: no such table: users"
        );
    }
}

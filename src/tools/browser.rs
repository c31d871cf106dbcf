//! Browser launch tool

use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Open a URL in the default system browser. Only http(s) URLs are accepted.
pub struct OpenBrowserTool;

impl OpenBrowserTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(OpenBrowserTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "open_browser",
            "Open a URL in the default web browser.",
            vec![ParameterDescriptor::required(
                "url",
                ParameterType::String,
                "The URL to open",
            )],
        )
        .with_category("browser")
    }
}

#[async_trait::async_trait]
impl Tool for OpenBrowserTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(raw_url) = arguments.get("url").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'url' must be a string");
        };

        let url = match url::Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => return ToolOutput::error(format!("Invalid URL '{}': {}", raw_url, e)),
        };
        if !matches!(url.scheme(), "http" | "https") {
            return ToolOutput::error(format!(
                "Only http and https URLs can be opened, got scheme '{}'",
                url.scheme()
            ));
        }

        info!("Opening browser for {}", url);
        let target = url.to_string();
        let opened = tokio::task::spawn_blocking(move || webbrowser::open(&target)).await;

        match opened {
            Ok(Ok(())) => ToolOutput::json(json!({ "opened": true, "url": url.as_str() })),
            Ok(Err(e)) => ToolOutput::error(format!("Failed to open browser: {}", e)),
            Err(e) => ToolOutput::error(format!("Browser task failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let tool = OpenBrowserTool;
        let mut args = ToolArguments::new();
        args.insert("url".to_string(), json!("file:///etc/passwd"));

        let output = tool.execute(&args).await;
        assert!(!output.success);
        assert!(output.error_message.unwrap().contains("scheme"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_url() {
        let tool = OpenBrowserTool;
        let mut args = ToolArguments::new();
        args.insert("url".to_string(), json!("not a url"));

        let output = tool.execute(&args).await;
        assert!(!output.success);
    }
}

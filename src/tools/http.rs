//! HTTP request and file download tools

use crate::error::Result;
use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

fn parse_http_url(raw: &str) -> std::result::Result<url::Url, String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("Invalid URL '{}': {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(format!("Unsupported URL scheme: {}", other)),
    }
}

/// Arbitrary HTTP requests with per-call timeout and redirect control
pub struct HttpRequestTool;

impl HttpRequestTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(HttpRequestTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "http_request",
            "Make an HTTP request to a URL and return status, headers, and body.",
            vec![
                ParameterDescriptor::required(
                    "url",
                    ParameterType::String,
                    "The URL to make the request to",
                ),
                ParameterDescriptor::optional("method", ParameterType::String, "HTTP method")
                    .with_default(json!("GET"))
                    .with_enum_values(vec![
                        json!("GET"),
                        json!("POST"),
                        json!("PUT"),
                        json!("DELETE"),
                        json!("PATCH"),
                        json!("HEAD"),
                    ]),
                ParameterDescriptor::optional(
                    "headers",
                    ParameterType::Object,
                    "HTTP headers as a JSON object",
                ),
                ParameterDescriptor::optional(
                    "body",
                    ParameterType::String,
                    "Request body data",
                ),
                ParameterDescriptor::optional(
                    "timeout",
                    ParameterType::Number,
                    "Request timeout in seconds",
                )
                .with_default(json!(30)),
                ParameterDescriptor::optional(
                    "follow_redirects",
                    ParameterType::Boolean,
                    "Whether to follow HTTP redirects",
                )
                .with_default(json!(true)),
            ],
        )
        .with_category("network")
    }
}

#[async_trait::async_trait]
impl Tool for HttpRequestTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(raw_url) = arguments.get("url").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'url' must be a string");
        };
        let url = match parse_http_url(raw_url) {
            Ok(url) => url,
            Err(message) => return ToolOutput::error(message),
        };

        let method_str = arguments
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_uppercase();
        let method = match method_str.as_str() {
            "GET" => reqwest::Method::GET,
            "POST" => reqwest::Method::POST,
            "PUT" => reqwest::Method::PUT,
            "DELETE" => reqwest::Method::DELETE,
            "PATCH" => reqwest::Method::PATCH,
            "HEAD" => reqwest::Method::HEAD,
            other => return ToolOutput::error(format!("Unsupported HTTP method: {}", other)),
        };

        let timeout = arguments
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let follow_redirects = arguments
            .get("follow_redirects")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let redirect_policy = if follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .redirect(redirect_policy)
            .build()
        {
            Ok(client) => client,
            Err(e) => return ToolOutput::error(format!("Failed to build HTTP client: {}", e)),
        };

        let mut request = client.request(method.clone(), url.clone());

        if let Some(headers) = arguments.get("headers").and_then(Value::as_object) {
            for (name, value) in headers {
                match value.as_str() {
                    Some(value) => request = request.header(name.as_str(), value),
                    None => {
                        return ToolOutput::error(format!(
                            "Header '{}' must be a string value",
                            name
                        ))
                    }
                }
            }
        }

        if let Some(body) = arguments.get("body").and_then(Value::as_str) {
            request = request.body(body.to_string());
        }

        info!("HTTP {} {}", method, url);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ToolOutput::error(format!("HTTP request failed: {}", e)),
        };

        let status = response.status().as_u16();
        let mut response_headers = Map::new();
        for (name, value) in response.headers() {
            response_headers.insert(
                name.to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).to_string()),
            );
        }

        let body_text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ToolOutput::error(format!("Failed to read response body: {}", e)),
        };

        // Surface JSON bodies as structured values when they parse
        let body: Value = serde_json::from_str(&body_text)
            .unwrap_or_else(|_| Value::String(body_text.clone()));

        let mut metadata = Map::new();
        metadata.insert("url".to_string(), json!(url.as_str()));
        metadata.insert("method".to_string(), json!(method.as_str()));
        metadata.insert("status".to_string(), json!(status));

        ToolOutput::json(json!({
            "status": status,
            "headers": response_headers,
            "body": body,
        }))
        .with_metadata(metadata)
    }
}

/// Download a URL to a local file
pub struct DownloadFileTool;

impl DownloadFileTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(DownloadFileTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "download_file",
            "Download a file from a URL to a local path.",
            vec![
                ParameterDescriptor::required(
                    "url",
                    ParameterType::String,
                    "The URL to download from",
                ),
                ParameterDescriptor::required(
                    "local_path",
                    ParameterType::String,
                    "Local file path to save the download to",
                ),
                ParameterDescriptor::optional(
                    "overwrite",
                    ParameterType::Boolean,
                    "Overwrite the destination if it already exists",
                )
                .with_default(json!(false)),
                ParameterDescriptor::optional(
                    "max_size",
                    ParameterType::Number,
                    "Maximum download size in bytes",
                )
                .with_default(json!(DEFAULT_MAX_DOWNLOAD_BYTES)),
            ],
        )
        .with_category("network")
    }
}

#[async_trait::async_trait]
impl Tool for DownloadFileTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(raw_url) = arguments.get("url").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'url' must be a string");
        };
        let url = match parse_http_url(raw_url) {
            Ok(url) => url,
            Err(message) => return ToolOutput::error(message),
        };

        let Some(local_path) = arguments.get("local_path").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'local_path' must be a string");
        };
        let overwrite = arguments
            .get("overwrite")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let max_size = arguments
            .get("max_size")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_DOWNLOAD_BYTES);

        let destination = Path::new(local_path);
        if destination.exists() && !overwrite {
            return ToolOutput::error(format!(
                "Destination '{}' already exists (pass overwrite=true to replace it)",
                local_path
            ));
        }

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(e) => return ToolOutput::error(format!("Failed to build HTTP client: {}", e)),
        };

        info!("Downloading {} to {}", url, local_path);
        let response = match client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return ToolOutput::error(format!("Download request failed: {}", e)),
        };

        if !response.status().is_success() {
            return ToolOutput::error(format!(
                "Download failed with status {}",
                response.status()
            ));
        }

        if let Some(length) = response.content_length() {
            if length > max_size {
                return ToolOutput::error(format!(
                    "Download size {} exceeds maximum of {} bytes",
                    length, max_size
                ));
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return ToolOutput::error(format!("Failed to read download body: {}", e)),
        };

        if bytes.len() as u64 > max_size {
            return ToolOutput::error(format!(
                "Download size {} exceeds maximum of {} bytes",
                bytes.len(),
                max_size
            ));
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    warn!("Failed to create parent directory: {}", e);
                    return ToolOutput::error(format!(
                        "Failed to create parent directory: {}",
                        e
                    ));
                }
            }
        }

        if let Err(e) = tokio::fs::write(destination, &bytes).await {
            return ToolOutput::error(format!("Failed to write '{}': {}", local_path, e));
        }

        let mut metadata = Map::new();
        metadata.insert("url".to_string(), json!(url.as_str()));

        ToolOutput::json(json!({
            "path": local_path,
            "bytes_written": bytes.len(),
            "content_type": content_type,
        }))
        .with_metadata(metadata)
    }
}

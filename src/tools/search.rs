//! Web search tool backed by the Serper.dev API

use crate::error::Result;
use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SERPER_BASE_URL: &str = "https://google.serper.dev";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Google search via Serper.dev. The API key comes from the `SERPER_API_KEY`
/// environment variable or an `api_key` entry in the tool configuration; a
/// missing key is reported at execute time, never at construction.
pub struct WebSearchTool {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |config| {
            Ok(Arc::new(Self::from_config(config)?) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "web_search",
            "Search the web using Google via the Serper.dev API. Returns organic results, \
             knowledge graph, and answer box information.",
            vec![
                ParameterDescriptor::required(
                    "query",
                    ParameterType::String,
                    "The search query to execute",
                ),
                ParameterDescriptor::optional(
                    "num_results",
                    ParameterType::Number,
                    "Number of search results to return (1-100)",
                )
                .with_default(json!(10)),
                ParameterDescriptor::optional(
                    "country",
                    ParameterType::String,
                    "Country code for localized results (e.g. 'us', 'uk', 'ca')",
                )
                .with_default(json!("us")),
                ParameterDescriptor::optional(
                    "language",
                    ParameterType::String,
                    "Language code for results (e.g. 'en', 'es', 'fr')",
                )
                .with_default(json!("en")),
                ParameterDescriptor::optional(
                    "search_type",
                    ParameterType::String,
                    "Type of search to perform",
                )
                .with_default(json!("search"))
                .with_enum_values(vec![
                    json!("search"),
                    json!("images"),
                    json!("videos"),
                    json!("news"),
                    json!("shopping"),
                    json!("scholar"),
                ]),
            ],
        )
        .with_category("search")
    }

    fn from_config(config: Option<&ToolArguments>) -> Result<Self> {
        let api_key = config
            .and_then(|c| c.get("api_key"))
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| std::env::var("SERPER_API_KEY").ok());

        let timeout = config
            .and_then(|c| c.get("timeout"))
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { api_key, client })
    }

    fn process_results(&self, raw: &Value) -> Value {
        let mut processed = Map::new();

        if let Some(organic) = raw.get("organic").and_then(Value::as_array) {
            let results: Vec<Value> = organic
                .iter()
                .map(|entry| {
                    json!({
                        "title": entry.get("title").cloned().unwrap_or(Value::Null),
                        "link": entry.get("link").cloned().unwrap_or(Value::Null),
                        "snippet": entry.get("snippet").cloned().unwrap_or(Value::Null),
                        "position": entry.get("position").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect();
            processed.insert("organic".to_string(), Value::Array(results));
        }

        for key in ["knowledgeGraph", "answerBox", "relatedSearches"] {
            if let Some(section) = raw.get(key) {
                processed.insert(key.to_string(), section.clone());
            }
        }

        Value::Object(processed)
    }
}

#[async_trait::async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(ref api_key) = self.api_key else {
            return ToolOutput::error(
                "Serper API key is not configured. Set the SERPER_API_KEY environment \
                 variable or pass api_key in the tool configuration.",
            );
        };

        let Some(query) = arguments.get("query").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'query' must be a string");
        };

        let num_results = arguments
            .get("num_results")
            .and_then(Value::as_u64)
            .unwrap_or(10)
            .min(100);
        let country = arguments
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or("us");
        let language = arguments
            .get("language")
            .and_then(Value::as_str)
            .unwrap_or("en");
        let search_type = arguments
            .get("search_type")
            .and_then(Value::as_str)
            .unwrap_or("search");

        let url = format!("{}/{}", SERPER_BASE_URL, search_type);
        let payload = json!({
            "q": query,
            "num": num_results,
            "gl": country,
            "hl": language,
        });

        info!("Executing search: {}", query);
        let response = match self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ToolOutput::error(format!("Search request failed: {}", e)),
        };

        if !response.status().is_success() {
            return ToolOutput::error(format!(
                "Search API returned status {}",
                response.status()
            ));
        }

        let raw: Value = match response.json().await {
            Ok(raw) => raw,
            Err(e) => return ToolOutput::error(format!("Invalid search API response: {}", e)),
        };

        let processed = self.process_results(&raw);
        let result_count = processed
            .get("organic")
            .and_then(Value::as_array)
            .map(|a| a.len())
            .unwrap_or(0);
        debug!("Search returned {} organic results", result_count);

        let mut metadata = Map::new();
        metadata.insert("query".to_string(), json!(query));
        metadata.insert("search_type".to_string(), json!(search_type));
        metadata.insert("result_count".to_string(), json!(result_count));

        ToolOutput::json(processed).with_metadata(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_shape() {
        let descriptor = WebSearchTool::descriptor();
        assert_eq!(descriptor.name, "web_search");
        assert_eq!(descriptor.category, "search");

        let schema = descriptor.input_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["num_results"]["default"], json!(10));
        assert!(schema["properties"]["search_type"]["enum"]
            .as_array()
            .unwrap()
            .contains(&json!("news")));
    }

    #[tokio::test]
    async fn test_missing_api_key_reported_at_execute() {
        let tool = WebSearchTool {
            api_key: None,
            client: reqwest::Client::new(),
        };
        let mut args = ToolArguments::new();
        args.insert("query".to_string(), json!("rust"));

        let output = tool.execute(&args).await;
        assert!(!output.success);
        assert!(output.error_message.unwrap().contains("SERPER_API_KEY"));
    }

    #[test]
    fn test_process_results_extracts_organic() {
        let tool = WebSearchTool {
            api_key: None,
            client: reqwest::Client::new(),
        };
        let raw = json!({
            "organic": [
                {"title": "Rust", "link": "https://rust-lang.org", "snippet": "A language", "position": 1, "extra": "dropped"}
            ],
            "answerBox": {"answer": "yes"}
        });

        let processed = tool.process_results(&raw);
        assert_eq!(processed["organic"][0]["title"], "Rust");
        assert!(processed["organic"][0].get("extra").is_none());
        assert_eq!(processed["answerBox"]["answer"], "yes");
    }
}

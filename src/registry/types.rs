//! Registry types and structures
//!
//! The capability contract every tool implements: a self-describing descriptor,
//! a uniform result envelope, and an asynchronous execute operation over a
//! validated argument bag.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Named argument bag passed to tool execution
pub type ToolArguments = Map<String, Value>;

/// Default value for the required field
fn default_required() -> bool {
    true
}

fn default_category() -> String {
    "general".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Closed set of declarable parameter types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParameterType {
    /// JSON-Schema primitive type name for this parameter type
    pub fn json_schema_type(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
        }
    }
}

/// Declared shape of one named tool input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name (unique within its tool)
    pub name: String,
    /// Declared type
    pub param_type: ParameterType,
    /// Human-readable description
    pub description: String,
    /// Whether a value must be supplied when no default exists
    #[serde(default = "default_required")]
    pub required: bool,
    /// Optional default, filled in when the caller omits the parameter
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    /// Optional enumeration of legal values
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<Value>>,
}

impl ParameterDescriptor {
    /// Create a required parameter
    pub fn required(name: &str, param_type: ParameterType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
            default: None,
            enum_values: None,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: &str, param_type: ParameterType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: false,
            default: None,
            enum_values: None,
        }
    }

    /// Set a default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the legal value enumeration
    pub fn with_enum_values(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// JSON-Schema property object for this parameter
    pub fn json_schema_property(&self) -> Value {
        let mut prop = Map::new();
        prop.insert(
            "type".to_string(),
            Value::String(self.param_type.json_schema_type().to_string()),
        );
        prop.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        if let Some(ref values) = self.enum_values {
            prop.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(ref default) = self.default {
            prop.insert("default".to_string(), default.clone());
        }
        Value::Object(prop)
    }
}

/// Static metadata for one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (process-wide unique identifier)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared input parameters, in declaration order
    pub parameters: Vec<ParameterDescriptor>,
    /// Category tag
    #[serde(default = "default_category")]
    pub category: String,
    /// Version string
    #[serde(default = "default_version")]
    pub version: String,
}

impl ToolDescriptor {
    /// Create a new descriptor with default category and version
    pub fn new(name: &str, description: &str, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            category: default_category(),
            version: default_version(),
        }
    }

    /// Set the category tag
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::validation("Tool name cannot be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(BridgeError::validation("Tool description cannot be empty"));
        }

        let mut seen = std::collections::HashSet::new();
        for param in &self.parameters {
            if param.name.trim().is_empty() {
                return Err(BridgeError::validation(format!(
                    "Tool '{}' declares a parameter with an empty name",
                    self.name
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(BridgeError::validation(format!(
                    "Tool '{}' declares duplicate parameter: {}",
                    self.name, param.name
                )));
            }
        }

        Ok(())
    }

    /// Build the JSON-Schema input object shared by every protocol adapter:
    /// `{type: "object", properties: {...}, required: [...]}`
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(param.name.clone(), param.json_schema_property());
        }

        let required: Vec<Value> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| Value::String(p.name.clone()))
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate supplied arguments against the declared parameters.
    ///
    /// Missing required parameters without a default fail; declared defaults
    /// are filled in for absent parameters; unknown extra arguments are
    /// dropped rather than rejected so forward-compatible clients keep working.
    pub fn validate_arguments(&self, arguments: &ToolArguments) -> Result<ToolArguments> {
        let mut validated = ToolArguments::new();

        for param in &self.parameters {
            match arguments.get(&param.name) {
                Some(value) if !value.is_null() => {
                    validated.insert(param.name.clone(), value.clone());
                }
                _ => {
                    if let Some(ref default) = param.default {
                        validated.insert(param.name.clone(), default.clone());
                    } else if param.required {
                        return Err(BridgeError::validation(format!(
                            "Missing required parameter: {}",
                            param.name
                        )));
                    }
                }
            }
        }

        Ok(validated)
    }
}

/// Result-kind tag carried by every invocation result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Text,
    Json,
    Image,
    File,
    Error,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Text => write!(f, "text"),
            OutputKind::Json => write!(f, "json"),
            OutputKind::Image => write!(f, "image"),
            OutputKind::File => write!(f, "file"),
            OutputKind::Error => write!(f, "error"),
        }
    }
}

/// Uniform outcome envelope returned by every tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the execution succeeded
    pub success: bool,
    /// Result-kind tag determining the shape of `content`
    pub result_type: OutputKind,
    /// Opaque content payload
    pub content: Value,
    /// Arbitrary metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Error message, populated only when `success` is false
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
}

impl ToolOutput {
    /// Create a successful text result
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            success: true,
            result_type: OutputKind::Text,
            content: Value::String(content.into()),
            metadata: Map::new(),
            error_message: None,
        }
    }

    /// Create a successful JSON result
    pub fn json(content: Value) -> Self {
        Self {
            success: true,
            result_type: OutputKind::Json,
            content,
            metadata: Map::new(),
            error_message: None,
        }
    }

    /// Create a successful file result (content is the file path)
    pub fn file<S: Into<String>>(path: S) -> Self {
        Self {
            success: true,
            result_type: OutputKind::File,
            content: Value::String(path.into()),
            metadata: Map::new(),
            error_message: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        Self {
            success: false,
            result_type: OutputKind::Error,
            content: Value::String(message.clone()),
            metadata: Map::new(),
            error_message: Some(message),
        }
    }

    /// Attach metadata to this result
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate envelope consistency
    pub fn validate(&self) -> Result<()> {
        if !self.success {
            match self.error_message {
                Some(ref message) if !message.trim().is_empty() => {}
                _ => {
                    return Err(BridgeError::validation(
                        "Failed result must carry a non-empty error message",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Flatten the content payload to a single string for text-block wire
    /// responses. JSON content is pretty-printed with 2-space indentation and
    /// non-ASCII characters preserved; other kinds are stringified.
    pub fn render(&self) -> String {
        match self.result_type {
            OutputKind::Json => serde_json::to_string_pretty(&self.content)
                .unwrap_or_else(|_| self.content.to_string()),
            _ => match &self.content {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

/// The polymorphic contract all tools implement.
///
/// `execute` catches every expected failure mode internally (missing
/// credentials, downstream API errors, I/O failures) and reports it as a
/// `success=false` envelope. Only truly unexpected conditions may escape, and
/// the calling adapter converts those into an error response rather than
/// letting them terminate the protocol session.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with validated named arguments
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput;
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").finish_non_exhaustive()
    }
}

/// Constructor closure building a runtime tool instance from an optional
/// configuration map
pub type ToolConstructor = dyn Fn(Option<&ToolArguments>) -> Result<Arc<dyn Tool>> + Send + Sync;

/// Association of a tool's static descriptor with its runtime constructor.
///
/// Schema declaration is decoupled from construction so registration never
/// needs credentials: the descriptor is supplied up front and the constructor
/// runs only when an instance is actually requested.
pub struct ToolRegistration {
    /// Static descriptor, available without constructing the tool
    pub descriptor: ToolDescriptor,
    constructor: Box<ToolConstructor>,
}

impl ToolRegistration {
    /// Create a registration from a descriptor and constructor
    pub fn new<F>(descriptor: ToolDescriptor, constructor: F) -> Self
    where
        F: Fn(Option<&ToolArguments>) -> Result<Arc<dyn Tool>> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            constructor: Box::new(constructor),
        }
    }

    /// Construct a runtime instance with the given configuration
    pub fn construct(&self, config: Option<&ToolArguments>) -> Result<Arc<dyn Tool>> {
        (self.constructor)(config)
    }
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "sample",
            "A sample tool",
            vec![
                ParameterDescriptor::required("query", ParameterType::String, "Search query"),
                ParameterDescriptor::optional("limit", ParameterType::Number, "Result limit")
                    .with_default(json!(10)),
                ParameterDescriptor::optional("mode", ParameterType::String, "Search mode")
                    .with_enum_values(vec![json!("fast"), json!("deep")]),
            ],
        )
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = sample_descriptor().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["limit"]["default"], json!(10));
        assert_eq!(
            schema["properties"]["mode"]["enum"],
            json!(["fast", "deep"])
        );
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_schema_round_trip_with_enum_and_default() {
        let descriptor = ToolDescriptor::new(
            "echo",
            "Echo",
            vec![ParameterDescriptor::required(
                "choice",
                ParameterType::String,
                "Pick one",
            )
            .with_enum_values(vec![json!("a"), json!("b")])
            .with_default(json!("a"))],
        );
        let prop = &descriptor.input_schema()["properties"]["choice"];
        assert_eq!(prop["type"], "string");
        assert_eq!(prop["enum"], json!(["a", "b"]));
        assert_eq!(prop["default"], "a");
    }

    #[test]
    fn test_validate_arguments_missing_required() {
        let descriptor = sample_descriptor();
        let err = descriptor
            .validate_arguments(&ToolArguments::new())
            .unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_validate_arguments_fills_defaults_and_drops_unknown() {
        let descriptor = sample_descriptor();
        let mut args = ToolArguments::new();
        args.insert("query".to_string(), json!("rust"));
        args.insert("unexpected".to_string(), json!(true));

        let validated = descriptor.validate_arguments(&args).unwrap();
        assert_eq!(validated["query"], "rust");
        assert_eq!(validated["limit"], json!(10));
        assert!(!validated.contains_key("unexpected"));
    }

    #[test]
    fn test_validate_arguments_null_treated_as_absent() {
        let descriptor = sample_descriptor();
        let mut args = ToolArguments::new();
        args.insert("query".to_string(), Value::Null);
        assert!(descriptor.validate_arguments(&args).is_err());
    }

    #[test]
    fn test_descriptor_rejects_duplicate_parameters() {
        let descriptor = ToolDescriptor::new(
            "dup",
            "Duplicate params",
            vec![
                ParameterDescriptor::required("x", ParameterType::String, "one"),
                ParameterDescriptor::required("x", ParameterType::Number, "two"),
            ],
        );
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_output_render_pretty_json_preserves_non_ascii() {
        let output = ToolOutput::json(json!({"greeting": "héllo", "n": 1}));
        let rendered = output.render();
        assert!(rendered.contains("héllo"));
        assert!(rendered.contains("  \"greeting\""));
    }

    #[test]
    fn test_output_render_text_without_quotes() {
        let output = ToolOutput::text("plain text");
        assert_eq!(output.render(), "plain text");
    }

    #[test]
    fn test_error_output_invariant() {
        let output = ToolOutput::error("boom");
        assert!(!output.success);
        assert_eq!(output.result_type, OutputKind::Error);
        assert_eq!(output.error_message.as_deref(), Some("boom"));
        assert!(output.validate().is_ok());

        let mut broken = output.clone();
        broken.error_message = None;
        assert!(broken.validate().is_err());
    }
}

//! File management tools: listing, reading, and writing

use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

const DEFAULT_MAX_ITEMS: u64 = 200;
const DEFAULT_MAX_READ_BYTES: u64 = 1024 * 1024;

/// Directory listing with optional recursion and glob filtering
pub struct FileListTool;

impl FileListTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(FileListTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "list_files",
            "List files and directories at a path, optionally recursive and filtered \
             by a glob pattern.",
            vec![
                ParameterDescriptor::optional(
                    "path",
                    ParameterType::String,
                    "Directory to list",
                )
                .with_default(json!(".")),
                ParameterDescriptor::optional(
                    "pattern",
                    ParameterType::String,
                    "Glob pattern applied to file names (e.g. '*.rs')",
                ),
                ParameterDescriptor::optional(
                    "recursive",
                    ParameterType::Boolean,
                    "Recurse into subdirectories",
                )
                .with_default(json!(false)),
                ParameterDescriptor::optional(
                    "max_items",
                    ParameterType::Number,
                    "Maximum number of entries to return",
                )
                .with_default(json!(DEFAULT_MAX_ITEMS)),
            ],
        )
        .with_category("files")
    }
}

fn modified_timestamp(metadata: &std::fs::Metadata) -> Option<String> {
    metadata
        .modified()
        .ok()
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339())
}

#[async_trait::async_trait]
impl Tool for FileListTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let path = arguments
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or(".")
            .to_string();
        let recursive = arguments
            .get("recursive")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let max_items = arguments
            .get("max_items")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_ITEMS) as usize;

        let pattern = match arguments.get("pattern").and_then(Value::as_str) {
            Some(raw) => match glob::Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    return ToolOutput::error(format!("Invalid glob pattern '{}': {}", raw, e))
                }
            },
            None => None,
        };

        if !Path::new(&path).is_dir() {
            return ToolOutput::error(format!("'{}' is not a directory", path));
        }

        let root = path.clone();
        let listing = tokio::task::spawn_blocking(move || {
            let max_depth = if recursive { usize::MAX } else { 1 };
            let mut entries = Vec::new();
            let mut truncated = false;

            for entry in WalkDir::new(&root)
                .min_depth(1)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let file_name = entry.file_name().to_string_lossy().to_string();
                if let Some(ref pattern) = pattern {
                    if !pattern.matches(&file_name) {
                        continue;
                    }
                }

                if entries.len() >= max_items {
                    truncated = true;
                    break;
                }

                let metadata = entry.metadata().ok();
                entries.push(json!({
                    "path": entry.path().to_string_lossy(),
                    "name": file_name,
                    "is_dir": entry.file_type().is_dir(),
                    "size": metadata.as_ref().map(|m| m.len()),
                    "modified": metadata.as_ref().and_then(modified_timestamp),
                }));
            }

            (entries, truncated)
        })
        .await;

        let (entries, truncated) = match listing {
            Ok(result) => result,
            Err(e) => return ToolOutput::error(format!("Directory walk failed: {}", e)),
        };

        debug!("Listed {} entries under {}", entries.len(), path);

        let mut metadata = Map::new();
        metadata.insert("path".to_string(), json!(path));
        metadata.insert("count".to_string(), json!(entries.len()));
        metadata.insert("truncated".to_string(), json!(truncated));

        ToolOutput::json(Value::Array(entries)).with_metadata(metadata)
    }
}

/// UTF-8 file reading with a size cap
pub struct FileReadTool;

impl FileReadTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(FileReadTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "read_file",
            "Read a UTF-8 text file and return its contents.",
            vec![
                ParameterDescriptor::required(
                    "path",
                    ParameterType::String,
                    "Path of the file to read",
                ),
                ParameterDescriptor::optional(
                    "max_size",
                    ParameterType::Number,
                    "Maximum file size in bytes",
                )
                .with_default(json!(DEFAULT_MAX_READ_BYTES)),
            ],
        )
        .with_category("files")
    }
}

#[async_trait::async_trait]
impl Tool for FileReadTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(path) = arguments.get("path").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'path' must be a string");
        };
        let max_size = arguments
            .get("max_size")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_READ_BYTES);

        let file_metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => return ToolOutput::error(format!("Cannot access '{}': {}", path, e)),
        };
        if !file_metadata.is_file() {
            return ToolOutput::error(format!("'{}' is not a regular file", path));
        }
        if file_metadata.len() > max_size {
            return ToolOutput::error(format!(
                "File '{}' is {} bytes, larger than the {} byte limit",
                path,
                file_metadata.len(),
                max_size
            ));
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => return ToolOutput::error(format!("Failed to read '{}': {}", path, e)),
        };

        let mut metadata = Map::new();
        metadata.insert("path".to_string(), json!(path));
        metadata.insert("bytes".to_string(), json!(content.len()));

        ToolOutput::text(content).with_metadata(metadata)
    }
}

/// File writing with append and parent-directory creation support
pub struct FileWriteTool;

impl FileWriteTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(FileWriteTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "write_file",
            "Write text content to a file, creating or appending.",
            vec![
                ParameterDescriptor::required(
                    "path",
                    ParameterType::String,
                    "Path of the file to write",
                ),
                ParameterDescriptor::required(
                    "content",
                    ParameterType::String,
                    "Text content to write",
                ),
                ParameterDescriptor::optional(
                    "append",
                    ParameterType::Boolean,
                    "Append to the file instead of replacing it",
                )
                .with_default(json!(false)),
                ParameterDescriptor::optional(
                    "create_dirs",
                    ParameterType::Boolean,
                    "Create missing parent directories",
                )
                .with_default(json!(true)),
            ],
        )
        .with_category("files")
    }
}

#[async_trait::async_trait]
impl Tool for FileWriteTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(path) = arguments.get("path").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'path' must be a string");
        };
        let Some(content) = arguments.get("content").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'content' must be a string");
        };
        let append = arguments
            .get("append")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let create_dirs = arguments
            .get("create_dirs")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        if create_dirs {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = tokio::fs::create_dir_all(parent).await {
                        return ToolOutput::error(format!(
                            "Failed to create parent directory: {}",
                            e
                        ));
                    }
                }
            }
        }

        let result = if append {
            use tokio::io::AsyncWriteExt;
            match tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
            {
                Ok(mut file) => file.write_all(content.as_bytes()).await,
                Err(e) => Err(e),
            }
        } else {
            tokio::fs::write(path, content).await
        };

        if let Err(e) = result {
            return ToolOutput::error(format!("Failed to write '{}': {}", path, e));
        }

        info!("Wrote {} bytes to {}", content.len(), path);

        ToolOutput::json(json!({
            "path": path,
            "bytes_written": content.len(),
            "appended": append,
        }))
    }
}

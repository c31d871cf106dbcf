//! SQLite query tool

use crate::registry::{
    ParameterDescriptor, ParameterType, Tool, ToolArguments, ToolDescriptor, ToolOutput,
    ToolRegistration,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ROWS: u64 = 500;

/// Parameterized SQLite queries over a database file. Statements run on the
/// blocking pool; rusqlite is synchronous.
pub struct SqliteQueryTool;

impl SqliteQueryTool {
    /// Build the registration entry for this tool
    pub fn registration() -> ToolRegistration {
        ToolRegistration::new(Self::descriptor(), |_config| {
            Ok(Arc::new(SqliteQueryTool) as Arc<dyn Tool>)
        })
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            "sqlite_query",
            "Execute a SQL statement against a SQLite database file. SELECT statements \
             return rows; other statements return the affected row count.",
            vec![
                ParameterDescriptor::required(
                    "database_path",
                    ParameterType::String,
                    "Path to the SQLite database file",
                ),
                ParameterDescriptor::required(
                    "query",
                    ParameterType::String,
                    "SQL statement to execute, with '?' placeholders for parameters",
                ),
                ParameterDescriptor::optional(
                    "parameters",
                    ParameterType::Array,
                    "Positional values bound to the statement placeholders",
                )
                .with_default(json!([])),
                ParameterDescriptor::optional(
                    "max_rows",
                    ParameterType::Number,
                    "Maximum number of rows to return",
                )
                .with_default(json!(DEFAULT_MAX_ROWS)),
            ],
        )
        .with_category("database")
    }
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as SqlValue;
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(value: rusqlite::types::Value) -> Value {
    use rusqlite::types::Value as SqlValue;
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => json!(i),
        SqlValue::Real(f) => json!(f),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(bytes) => json!(format!("<blob: {} bytes>", bytes.len())),
    }
}

fn run_query(
    database_path: String,
    query: String,
    parameters: Vec<Value>,
    max_rows: usize,
) -> Result<Value, String> {
    let connection = rusqlite::Connection::open(&database_path)
        .map_err(|e| format!("Failed to open database '{}': {}", database_path, e))?;

    let sql_params: Vec<rusqlite::types::Value> = parameters.iter().map(to_sql_value).collect();
    let is_read_query = {
        let head = query.trim_start().to_uppercase();
        head.starts_with("SELECT") || head.starts_with("PRAGMA") || head.starts_with("WITH")
    };

    if is_read_query {
        let mut statement = connection
            .prepare(&query)
            .map_err(|e| format!("Failed to prepare query: {}", e))?;
        let columns: Vec<String> = statement
            .column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();

        let mut rows = statement
            .query(rusqlite::params_from_iter(sql_params))
            .map_err(|e| format!("Query failed: {}", e))?;

        let mut results = Vec::new();
        let mut truncated = false;
        while let Some(row) = rows.next().map_err(|e| format!("Row fetch failed: {}", e))? {
            if results.len() >= max_rows {
                truncated = true;
                break;
            }
            let mut object = Map::new();
            for (index, column) in columns.iter().enumerate() {
                let value: rusqlite::types::Value = row
                    .get(index)
                    .map_err(|e| format!("Column read failed: {}", e))?;
                object.insert(column.clone(), from_sql_value(value));
            }
            results.push(Value::Object(object));
        }

        Ok(json!({
            "columns": columns,
            "rows": results,
            "row_count": results.len(),
            "truncated": truncated,
        }))
    } else {
        let affected = connection
            .execute(&query, rusqlite::params_from_iter(sql_params))
            .map_err(|e| format!("Statement failed: {}", e))?;
        Ok(json!({ "rows_affected": affected }))
    }
}

#[async_trait::async_trait]
impl Tool for SqliteQueryTool {
    async fn execute(&self, arguments: &ToolArguments) -> ToolOutput {
        let Some(database_path) = arguments.get("database_path").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'database_path' must be a string");
        };
        let Some(query) = arguments.get("query").and_then(Value::as_str) else {
            return ToolOutput::error("Parameter 'query' must be a string");
        };
        let parameters: Vec<Value> = arguments
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let max_rows = arguments
            .get("max_rows")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_ROWS) as usize;

        info!("SQLite query against {}", database_path);
        debug!("SQL: {}", query);

        let database_path = database_path.to_string();
        let query_string = query.to_string();
        let result = tokio::task::spawn_blocking(move || {
            run_query(database_path, query_string, parameters, max_rows)
        })
        .await;

        match result {
            Ok(Ok(content)) => {
                let mut metadata = Map::new();
                metadata.insert("query".to_string(), json!(query));
                ToolOutput::json(content).with_metadata(metadata)
            }
            Ok(Err(message)) => ToolOutput::error(message),
            Err(e) => ToolOutput::error(format!("Query task failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(tool: &SqliteQueryTool, path: &str, query: &str, params: Value) -> ToolOutput {
        let mut args = ToolArguments::new();
        args.insert("database_path".to_string(), json!(path));
        args.insert("query".to_string(), json!(query));
        args.insert("parameters".to_string(), params);
        tool.execute(&args).await
    }

    #[tokio::test]
    async fn test_create_insert_select() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("test.db");
        let db_path = db.to_string_lossy().to_string();
        let tool = SqliteQueryTool;

        let output = run(
            &tool,
            &db_path,
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)",
            json!([]),
        )
        .await;
        assert!(output.success, "{:?}", output.error_message);

        let output = run(
            &tool,
            &db_path,
            "INSERT INTO users (name) VALUES (?)",
            json!(["alice"]),
        )
        .await;
        assert!(output.success);
        assert_eq!(output.content["rows_affected"], 1);

        let output = run(
            &tool,
            &db_path,
            "SELECT id, name FROM users WHERE name = ?",
            json!(["alice"]),
        )
        .await;
        assert!(output.success);
        assert_eq!(output.content["row_count"], 1);
        assert_eq!(output.content["rows"][0]["name"], "alice");
        assert_eq!(output.content["columns"], json!(["id", "name"]));
    }

    #[tokio::test]
    async fn test_bad_sql_is_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("test.db");
        let tool = SqliteQueryTool;

        let output = run(
            &tool,
            &db.to_string_lossy(),
            "SELECT * FROM missing_table",
            json!([]),
        )
        .await;
        assert!(!output.success);
        assert!(output.error_message.unwrap().contains("missing_table"));
    }
}

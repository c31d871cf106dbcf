//! Newline-delimited JSON-RPC over stdio
//!
//! The transport used by desktop MCP clients: one JSON object per line on
//! stdin, one response per line on stdout, processed strictly in arrival
//! order. Logs go to stderr so clients that read stdout never see them.

use crate::error::Result;
use crate::mcp::server::McpServer;
use crate::mcp::types::McpRequest;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// Stdio front-end over an MCP server
pub struct StdioServer {
    server: McpServer,
}

impl StdioServer {
    /// Create a stdio front-end
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    /// Run the read-dispatch-respond loop until stdin closes.
    ///
    /// Malformed JSON lines are logged and skipped; they never terminate the
    /// session. Responses are emitted in request order because each line is
    /// handled to completion before the next is read.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        info!(
            "stdio MCP server ready with {} tools",
            self.server.registry().len()
        );

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("stdin closed, shutting down stdio server");
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let request: McpRequest = match serde_json::from_str(trimmed) {
                        Ok(request) => request,
                        Err(e) => {
                            warn!("Skipping malformed JSON line: {}", e);
                            continue;
                        }
                    };

                    if let Some(response) = self.server.handle_request(request).await {
                        let payload = serde_json::to_string(&response)?;
                        debug!("Sending response: {}", payload);
                        stdout.write_all(payload.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use toolbridge::config::Config;
use toolbridge::mcp::{McpServer, StdioServer};
use toolbridge::registry::ToolRegistry;
use toolbridge::{openai, tools};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = toolbridge::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// Run in stdio mode for MCP clients (Claude Desktop, LM Studio)
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = Config::load(&cli.config, cli.host, cli.port).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Composition root: build the registry once and hand it to the adapters
    let registry = Arc::new(ToolRegistry::new());
    tools::register_builtins(&registry).map_err(|e| {
        error!("Tool registration failed: {}", e);
        e
    })?;
    info!("Registered {} tools", registry.len());

    if cli.stdio {
        info!("Starting toolbridge in stdio MCP mode");
        let server = StdioServer::new(McpServer::new(registry, &config));
        server.run().await?;
    } else {
        info!(
            "Starting toolbridge HTTP server on {}:{}",
            config.server.host, config.server.port
        );
        openai::serve(registry, &config).await?;
    }

    Ok(())
}

/// Initialize tracing. Logs always go to stderr so stdio-mode clients that
/// read stdout never see them.
fn init_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

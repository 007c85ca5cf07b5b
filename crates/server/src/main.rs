//! mcp-linkdiff server entry point.
//!
//! Boots the MCP server on stdio transport. Configuration comes from
//! `LINKDIFF_*` environment variables and an optional TOML file named by
//! `LINKDIFF_CONFIG_FILE`. Logging goes to stderr to avoid interfering with
//! the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use linkdiff_client::{FetchClient, FetchConfig};
use linkdiff_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let fetcher = FetchClient::new(FetchConfig::from(&config))?;

    tracing::info!(
        user_agent = %config.user_agent,
        timeout_ms = config.timeout_ms,
        max_bytes = config.max_bytes,
        content_links_only = config.content_links_only,
        "Starting mcp-linkdiff server on stdio transport"
    );

    let handler = handler::LinkDiffServer::new(config, Arc::new(fetcher));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

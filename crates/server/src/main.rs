//! medkit server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use medkit_client::{GeminiClient, UnconfiguredModel};
use medkit_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod services;
mod tools;

use services::{Model, Services};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let model: Model = match GeminiClient::from_app_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "Gemini client not configured, only cached answers will be served");
            Arc::new(UnconfiguredModel)
        }
    };

    tracing::info!(db_store = config.db_store, db_dir = %config.db_dir.display(), "Starting medkit server on stdio transport");

    let services = Arc::new(Services::open(&config, model).await);
    let handler = handler::MedkitServer::new(services.clone());
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    if let Some(services) = Arc::into_inner(services) {
        services.close().await;
    }

    Ok(())
}

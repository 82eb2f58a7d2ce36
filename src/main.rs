//! grok-mcp binary entry point
//!
//! Reads configuration from the environment, wires the upstream client into
//! the tool registry, and serves MCP over stdio until the host closes the
//! stream or the process receives SIGINT. Logging goes to stderr; stdout is
//! reserved for protocol traffic.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use grok_mcp::config::Config;
use grok_mcp::mcp::{serve_stdio, GrokMcpServer};
use grok_mcp::tools::ToolRegistry;
use grok_mcp::xai::{XaiApi, XaiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let default_model = config.default_model.clone();
    tracing::info!(
        base_url = %config.base_url,
        default_model = %default_model,
        "starting grok-mcp server"
    );

    let api = Arc::new(XaiClient::new(config));

    // Connectivity check; failure is logged but not fatal, the credential
    // may still work for the endpoints the tools actually use.
    {
        let api = api.clone();
        tokio::spawn(async move {
            match api.list_models().await {
                Ok(models) => {
                    tracing::info!(count = models.data.len(), "upstream reachable");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "upstream connectivity check failed");
                }
            }
        });
    }

    let registry = ToolRegistry::new(api, default_model);
    let cancel = registry.cancellation_token();
    let server = GrokMcpServer::new(registry);

    tokio::select! {
        result = serve_stdio(&server) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
            cancel.cancel();
        }
    }

    Ok(())
}

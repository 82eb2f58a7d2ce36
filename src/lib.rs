//! MCP server exposing the xAI Grok API as tools.
//!
//! Bridges the Model Context Protocol to Grok's generative capabilities:
//! chat completions, image generation, vision analysis, live web/X search,
//! and video generation. Any MCP host can speak to the server over
//! newline-delimited JSON-RPC on stdio.
//!
//! # Architecture
//!
//! ```text
//! MCP host ── stdio ──> mcp::transport ──> mcp::server ──> tools::ToolRegistry
//!                                                               │
//!                                                          xai::XaiApi
//!                                                               │
//!                                                        api.x.ai (HTTPS)
//! ```
//!
//! The upstream client is injected as a trait object ([`xai::XaiApi`]), so
//! every layer above it is testable without the network.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use grok_mcp::config::Config;
//! use grok_mcp::mcp::{serve_stdio, GrokMcpServer};
//! use grok_mcp::tools::ToolRegistry;
//! use grok_mcp::xai::XaiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let default_model = config.default_model.clone();
//!     let api = Arc::new(XaiClient::new(config));
//!     let registry = ToolRegistry::new(api, default_model);
//!     let server = GrokMcpServer::new(registry);
//!     serve_stdio(&server).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod xai;

pub use config::Config;
pub use error::{GrokMcpError, Result};

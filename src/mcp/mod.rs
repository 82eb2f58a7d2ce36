//! Model Context Protocol server layer
//!
//! JSON-RPC 2.0 over newline-delimited stdio. [`types`] holds the wire
//! shapes, [`server`] maps methods to the tool registry, and [`transport`]
//! runs the read/dispatch/write loop.

pub mod server;
pub mod transport;
pub mod types;

pub use server::{GrokMcpServer, ServerConfig};
pub use transport::{serve, serve_stdio};
pub use types::PROTOCOL_VERSION;

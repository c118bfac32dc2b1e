//! MCP server facade for glyphpick.
//!
//! Speaks JSON-RPC 2.0 over stdio (newline-delimited, per the Model
//! Context Protocol) and exposes the icon tools to an agent: searching
//! the catalog, running the local web picker, and polling for the
//! human's selection.
//!
//! # Example
//!
//! ```no_run
//! use glyphpick_mcp::{IconServer, ServerConfig};
//!
//! # async fn run() -> glyphpick_mcp::Result<()> {
//! let server = IconServer::new(ServerConfig::from_env())?;
//! server.run().await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{McpError, Result};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::IconServer;
pub use tools::{tool_specs, ToolSpec};

//! Error types for the MCP facade.

use thiserror::Error;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Error type for the MCP facade.
///
/// Tool-level failures are rendered into `isError` tool results and
/// never tear down the server loop; only stdio failures end it.
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool called with missing or malformed arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// No tool with that name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Catalog search failed.
    #[error(transparent)]
    Catalog(#[from] glyphpick_catalog::CatalogError),

    /// Gateway start/stop failed.
    #[error(transparent)]
    Gateway(#[from] glyphpick_server::GatewayError),

    /// Saving icons to disk failed.
    #[error(transparent)]
    Save(#[from] glyphpick_catalog::SaveError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stdio transport failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Create an invalid-arguments error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

//! glyphpick - MCP icon picker server
//!
//! Main entry point. Runs the MCP server over stdio; stdout belongs to
//! the protocol, so all console logging goes to stderr.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use glyphpick_mcp::{IconServer, ServerConfig};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// glyphpick - icon catalog search with a human-in-the-loop web picker
#[derive(Parser)]
#[command(name = "glyphpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Port for the web picker
    #[arg(long, env = "GLYPHPICK_WEB_PORT")]
    pub port: Option<u16>,

    /// Language tag for the picker page (e.g. en, zh-CN)
    #[arg(long, env = "GLYPHPICK_LANGUAGE")]
    pub language: Option<String>,

    /// Search-cache TTL in seconds
    #[arg(long, env = "GLYPHPICK_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Catalog request timeout in seconds
    #[arg(long, env = "GLYPHPICK_CATALOG_TIMEOUT_SECS")]
    pub catalog_timeout_secs: Option<u64>,

    /// Do not auto-start the web picker on the first search
    #[arg(long)]
    pub no_auto_start: bool,

    /// Directory for rotating JSON log files (disabled when unset)
    #[arg(long, env = "GLYPHPICK_LOG_DIR")]
    pub log_dir: Option<std::path::PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — stderr (human-readable) + optional rotating
    // JSON file. Never stdout: that carries protocol frames.
    let filter = if cli.verbose {
        "glyphpick=debug,glyphpick_mcp=debug,glyphpick_server=debug,glyphpick_catalog=debug,\
         glyphpick_session=debug,glyphpick_cache=debug,info"
    } else {
        "glyphpick=info,glyphpick_mcp=info,glyphpick_server=info,glyphpick_catalog=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    // Keep the appender guard alive for the whole run.
    let _guard = match &cli.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "glyphpick.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_filter(tracing_subscriber::EnvFilter::new(
                            "glyphpick=trace,glyphpick_mcp=trace,glyphpick_server=trace,\
                             glyphpick_catalog=trace,glyphpick_session=trace,glyphpick_cache=trace,info",
                        )),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    };

    // Environment first, CLI flags on top.
    let mut config = ServerConfig::from_env();
    if let Some(port) = cli.port {
        config = config.with_web_port(port);
    }
    if let Some(language) = cli.language {
        config = config.with_language(language);
    }
    if let Some(secs) = cli.cache_ttl_secs {
        config = config.with_cache_ttl(Duration::from_secs(secs));
    }
    if let Some(secs) = cli.catalog_timeout_secs {
        config = config.with_catalog_timeout(Duration::from_secs(secs));
    }
    if cli.no_auto_start {
        config = config.with_auto_start_web(false);
    }

    let server = IconServer::new(config)?;
    server.run().await?;
    Ok(())
}

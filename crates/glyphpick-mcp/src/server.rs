//! The MCP server: stdio loop and tool dispatch.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use glyphpick_cache::TtlCache;
use glyphpick_catalog::{
    saver, CatalogBackend, IconSearcher, IconfontBackend, IconfontConfig,
};
use glyphpick_server::{AppState, Gateway, GatewayHandle};
use glyphpick_session::{Poll, SelectionRegistry, SessionId};
use glyphpick_types::{IconRecord, SearchQuery, SearchResult, SortOrder};

use crate::config::ServerConfig;
use crate::error::{McpError, Result};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
use crate::tools::tool_specs;

/// The glyphpick MCP server.
///
/// Owns the shared coordination state (cache, selection registry) and a
/// handle to the picker gateway, and dispatches tool calls arriving over
/// stdio. The gateway handle lives behind an async mutex because start
/// and stop both await while holding it; no registry or cache lock is
/// ever held across an await.
pub struct IconServer {
    config: ServerConfig,
    cache: Arc<TtlCache<SearchResult>>,
    registry: Arc<SelectionRegistry<IconRecord>>,
    searcher: Arc<IconSearcher>,
    gateway: tokio::sync::Mutex<Option<GatewayHandle>>,
}

impl IconServer {
    /// Create a server talking to the real iconfont.cn catalog.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let backend = IconfontBackend::new(
            IconfontConfig::new().with_timeout(config.catalog_timeout),
        )?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create a server over an arbitrary catalog backend (tests).
    pub fn with_backend(config: ServerConfig, backend: Arc<dyn CatalogBackend>) -> Self {
        let cache = Arc::new(TtlCache::with_default_ttl(config.cache_ttl));
        let searcher = Arc::new(IconSearcher::new(backend, Arc::clone(&cache)));
        Self {
            config,
            cache,
            registry: Arc::new(SelectionRegistry::new()),
            searcher,
            gateway: tokio::sync::Mutex::new(None),
        }
    }

    /// The selection registry (shared with the gateway).
    pub fn registry(&self) -> &Arc<SelectionRegistry<IconRecord>> {
        &self.registry
    }

    /// Run the MCP server over stdio until stdin closes.
    ///
    /// stdout carries protocol frames only; all logging goes to stderr.
    pub async fn run(self) -> Result<()> {
        info!(
            web_port = self.config.web_port,
            language = %self.config.language,
            cache_ttl_secs = self.config.cache_ttl.as_secs(),
            "glyphpick MCP server starting on stdio"
        );

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("dropping unparsable frame: {}", e);
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::new(JsonRpcError::PARSE_ERROR, e.to_string()),
                    );
                    write_frame(&mut stdout, &response).await?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request).await {
                write_frame(&mut stdout, &response).await?;
            }
        }

        // stdin closed: the client is gone, release everything.
        self.cleanup().await;
        info!("glyphpick MCP server stopped");
        Ok(())
    }

    /// Handle one request or notification. Notifications return `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "glyphpick",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_specs() })),
            "tools/call" => self.handle_tool_call(id, request.params).await,
            method => JsonRpcResponse::failure(id, JsonRpcError::method_not_found(method)),
        };
        Some(response)
    }

    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        #[derive(Deserialize)]
        struct CallParams {
            name: String,
            #[serde(default)]
            arguments: Value,
        }

        let params: CallParams = match serde_json::from_value(params.unwrap_or_default()) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::failure(id, JsonRpcError::invalid_params(e.to_string()));
            }
        };

        debug!(tool = %params.name, "tool call");
        match self.dispatch_tool(&params.name, params.arguments).await {
            Ok(result) => JsonRpcResponse::success(id, tool_result(&result, false)),
            Err(e) => {
                // Tool failures are results, not protocol faults; the
                // loop keeps serving.
                warn!(tool = %params.name, error = %e, "tool call failed");
                JsonRpcResponse::success(id, tool_result(&json!({ "error": e.to_string() }), true))
            }
        }
    }

    /// Dispatch a tool call to its handler.
    pub async fn dispatch_tool(&self, name: &str, args: Value) -> Result<Value> {
        match name {
            "search_icons" => self.search_icons(args).await,
            "start_web_server" => self.start_web_server(args).await,
            "stop_web_server" => self.stop_web_server().await,
            "check_selection_status" => Ok(self.check_selection_status()),
            "get_cache_stats" => Ok(self.get_cache_stats()),
            "clear_cache" => self.clear_cache(args),
            "save_icons" => self.save_icons(args).await,
            other => Err(McpError::UnknownTool(other.to_string())),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tool handlers
    // ─────────────────────────────────────────────────────────────────────

    async fn search_icons(&self, args: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct SearchArgs {
            q: String,
            #[serde(default)]
            sort_type: Option<String>,
            #[serde(default = "default_page")]
            page: u32,
            #[serde(default = "default_page_size")]
            page_size: u32,
        }
        fn default_page() -> u32 {
            1
        }
        fn default_page_size() -> u32 {
            100
        }

        let args: SearchArgs =
            serde_json::from_value(args).map_err(|e| McpError::invalid_arguments(e.to_string()))?;

        let sort = match args.sort_type.as_deref() {
            None => SortOrder::default(),
            Some(name) => SortOrder::from_name(name)
                .ok_or_else(|| McpError::invalid_arguments(format!("unknown sort_type: {name}")))?,
        };

        let query = SearchQuery::new(args.q)
            .with_sort(sort)
            .with_page(args.page)
            .with_page_size(args.page_size);
        let result = self.searcher.search(&query).await?;

        // Hand the human a ready-to-open link in the same round trip.
        // A running picker keeps its session: a search must never cost
        // the human a selection they already made.
        let picker = if self.config.auto_start_web {
            Some(self.ensure_gateway(None, false).await?)
        } else {
            let guard = self.gateway.lock().await;
            guard
                .as_ref()
                .map(|handle| (handle.url(), handle.session_id()))
        };

        let mut response = json!({
            "query": result.query,
            "count": result.len(),
            "total_count": result.total_count,
            "page": result.page,
            "page_size": result.page_size,
            "icons": result.icons,
        });
        if let Some((url, session_id)) = picker {
            response["web_url"] = json!(url);
            response["session_id"] = json!(session_id);
            response["instructions"] = json!(
                "Ask the human to open web_url and pick icons, then poll \
                 check_selection_status until the state is selected."
            );
        }
        Ok(response)
    }

    async fn start_web_server(&self, args: Value) -> Result<Value> {
        #[derive(Deserialize, Default)]
        struct StartArgs {
            #[serde(default)]
            port: Option<u16>,
        }

        let args: StartArgs =
            serde_json::from_value(args).map_err(|e| McpError::invalid_arguments(e.to_string()))?;

        let (url, session_id) = self.ensure_gateway(args.port, true).await?;
        Ok(json!({
            "url": url,
            "session_id": session_id,
            "message": format!("web picker running at {url}"),
        }))
    }

    /// Start the gateway if needed and return its URL and session.
    ///
    /// With `fresh_session` an explicit start supersedes the prior
    /// session (last start wins); without it a running gateway keeps its
    /// live session so pending selections survive. If the gateway is
    /// already serving on a compatible port the listener is reused; an
    /// explicit different port restarts it.
    async fn ensure_gateway(
        &self,
        port: Option<u16>,
        fresh_session: bool,
    ) -> Result<(String, SessionId)> {
        let mut guard = self.gateway.lock().await;

        if let Some(handle) = guard.as_ref() {
            let bound = handle.local_addr().port();
            match port {
                Some(requested) if requested != bound => {
                    // Move to the requested port.
                    let old = guard.take().expect("checked above");
                    old.shutdown().await;
                }
                _ => {
                    let session_id = if fresh_session {
                        self.registry.start()
                    } else {
                        // The open picker tab carries this id; minting a
                        // new one would orphan the tab and drop anything
                        // the human already submitted.
                        self.registry
                            .current_session()
                            .unwrap_or_else(|| self.registry.start())
                    };
                    return Ok((handle.url(), session_id));
                }
            }
        }

        let state = AppState::new(Arc::clone(&self.registry), Arc::clone(&self.searcher))
            .with_language(self.config.language.clone());
        let addr = SocketAddr::from(([127, 0, 0, 1], port.unwrap_or(self.config.web_port)));
        let handle = Gateway::spawn(state, addr).await?;

        let url = handle.url();
        let session_id = handle.session_id();
        *guard = Some(handle);
        Ok((url, session_id))
    }

    async fn stop_web_server(&self) -> Result<Value> {
        let handle = self.gateway.lock().await.take();
        match handle {
            Some(handle) => {
                handle.shutdown().await;
                Ok(json!({ "stopped": true, "message": "web picker stopped" }))
            }
            None => {
                // Nothing to stop, but make sure no session lingers.
                self.registry.stop();
                Ok(json!({ "stopped": false, "message": "web picker was not running" }))
            }
        }
    }

    fn check_selection_status(&self) -> Value {
        match self.registry.poll() {
            Poll::Idle => json!({ "state": "idle" }),
            Poll::Awaiting { session_id } => json!({
                "state": "awaiting_selection",
                "session_id": session_id,
            }),
            Poll::Selected { session_id, items } => json!({
                "state": "selected",
                "session_id": session_id,
                "count": items.len(),
                "icons": items,
            }),
            Poll::Consumed { session_id } => json!({
                "state": "consumed",
                "session_id": session_id,
            }),
        }
    }

    fn get_cache_stats(&self) -> Value {
        let stats = self.cache.stats();
        json!({
            "total_entries": stats.total_entries,
            "active_entries": stats.active_entries,
            "expired_entries": stats.expired_entries,
            "ttl_seconds": self.cache.default_ttl().as_secs(),
        })
    }

    fn clear_cache(&self, args: Value) -> Result<Value> {
        #[derive(Deserialize, Default)]
        struct ClearArgs {
            #[serde(default)]
            expired_only: bool,
        }

        let args: ClearArgs =
            serde_json::from_value(args).map_err(|e| McpError::invalid_arguments(e.to_string()))?;

        let cleared = if args.expired_only {
            self.cache.sweep()
        } else {
            self.cache.clear()
        };
        Ok(json!({ "cleared": cleared, "expired_only": args.expired_only }))
    }

    async fn save_icons(&self, args: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct SaveArgs {
            icons: Vec<IconRecord>,
            #[serde(default = "default_save_path")]
            save_path: PathBuf,
        }
        fn default_save_path() -> PathBuf {
            PathBuf::from("./saved-icons")
        }

        let args: SaveArgs =
            serde_json::from_value(args).map_err(|e| McpError::invalid_arguments(e.to_string()))?;

        let report = saver::save_icons(&args.icons, &args.save_path).await?;
        Ok(json!({
            "saved": report.saved,
            "failed": report.failed,
            "save_path": report.save_path,
        }))
    }

    /// Release everything the server holds.
    async fn cleanup(&self) {
        if let Some(handle) = self.gateway.lock().await.take() {
            handle.shutdown().await;
        }
        self.registry.stop();
    }
}

/// Render a tool outcome as an MCP `CallToolResult`.
fn tool_result(payload: &Value, is_error: bool) -> Value {
    let text = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}

async fn write_frame(
    stdout: &mut tokio::io::Stdout,
    response: &JsonRpcResponse,
) -> Result<()> {
    let mut frame = serde_json::to_vec(response)?;
    frame.push(b'\n');
    stdout.write_all(&frame).await?;
    stdout.flush().await?;
    Ok(())
}

//! HTTP and WebSocket gateway for the glyphpick web picker.
//!
//! The gateway terminates one browser session: it serves the picker page
//! over HTTP, and receives the human's selection over a WebSocket, which
//! it forwards into the shared [`SelectionRegistry`] where the polling
//! MCP tool picks it up.
//!
//! Unlike a conventional long-running server, the gateway is started and
//! stopped by tool calls at runtime, so [`Gateway::spawn`] returns a
//! [`GatewayHandle`] that owns the serve task and can tear it down
//! gracefully.
//!
//! # Example
//!
//! ```ignore
//! use glyphpick_server::{AppState, Gateway};
//!
//! let state = AppState::new(registry, searcher);
//! let handle = Gateway::spawn(state, "127.0.0.1:3000".parse()?).await?;
//! println!("picker at {}", handle.url());
//! handle.shutdown().await;
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{GatewayError, Result};
pub use state::{AppState, SharedRegistry};

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use glyphpick_session::SelectionRegistry;
use glyphpick_session::SessionId;

/// The glyphpick picker gateway.
pub struct Gateway;

impl Gateway {
    /// Build the router with all routes and middleware.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .merge(routes::health_routes())
            .route("/", get(routes::index_handler))
            .route("/picker.js", get(routes::picker_js_handler))
            .route("/api/results", get(routes::results_handler))
            .route("/api/session", get(routes::session_handler))
            .route("/ws", get(routes::ws_handler))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind `addr` and start serving in a background task.
    ///
    /// Starts a fresh selection session in the registry (last start
    /// wins). A failed bind is reported as [`GatewayError::PortInUse`]
    /// and leaves the registry untouched.
    pub async fn spawn(state: AppState, addr: SocketAddr) -> Result<GatewayHandle> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                GatewayError::PortInUse(addr.port())
            } else {
                GatewayError::Io(e)
            }
        })?;
        let local_addr = listener.local_addr()?;

        // Only now that the bind succeeded does the session begin.
        let session_id = state.registry.start();

        let registry = state.registry.clone();
        let token = state.shutdown.clone();
        let router = Self::router(state);

        let shutdown = token.clone().cancelled_owned();
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("gateway serve error: {}", e);
            }
        });

        info!(addr = %local_addr, session_id = %session_id, "picker gateway started");

        Ok(GatewayHandle {
            local_addr,
            session_id,
            registry,
            token,
            task,
        })
    }
}

/// Handle to a running gateway.
pub struct GatewayHandle {
    local_addr: SocketAddr,
    session_id: SessionId,
    registry: std::sync::Arc<SelectionRegistry<glyphpick_types::IconRecord>>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl GatewayHandle {
    /// The address the gateway actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The selection session this gateway instance serves.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Browser-facing URL of the picker page.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.local_addr.port())
    }

    /// Stop serving: close WS connections, stop the listener, and reset
    /// the registry to idle.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
        self.registry.stop();
        info!("picker gateway stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use glyphpick_cache::TtlCache;
    use glyphpick_catalog::{IconSearcher, MockCatalog};
    use glyphpick_session::SelectionState;
    use glyphpick_types::SearchQuery;

    fn test_state(icons: i64) -> AppState {
        let registry = Arc::new(SelectionRegistry::new());
        let searcher = Arc::new(IconSearcher::new(
            Arc::new(MockCatalog::with_generated(icons)),
            Arc::new(TtlCache::new()),
        ));
        AppState::new(registry, searcher)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = Gateway::router(test_state(0));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_injects_session_id() {
        let state = test_state(0);
        let sid = state.registry.start();
        let app = Gateway::router(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains(&sid.to_string()));
    }

    #[tokio::test]
    async fn test_results_404_when_nothing_cached() {
        let app = Gateway::router(test_state(0));

        let response = app
            .oneshot(Request::builder().uri("/api/results").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_results_paginates_latest_search() {
        let state = test_state(30);
        state.searcher.search(&SearchQuery::new("x")).await.unwrap();
        let app = Gateway::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/results?page=2&page_size=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page: glyphpick_types::ResultsPage = serde_json::from_slice(&body).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.icons.len(), 10);
        assert_eq!(page.icons[0].id, 10);
    }

    #[tokio::test]
    async fn test_spawn_and_shutdown_reset_registry() {
        let state = test_state(0);
        let registry = state.registry.clone();

        // Port 0 lets the OS pick a free one.
        let handle = Gateway::spawn(state, "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(registry.state(), SelectionState::AwaitingSelection);
        assert_eq!(registry.current_session(), Some(handle.session_id()));
        assert!(handle.url().starts_with("http://localhost:"));

        handle.shutdown().await;
        assert_eq!(registry.state(), SelectionState::Idle);
    }

    #[tokio::test]
    async fn test_spawn_reports_port_in_use() {
        let state = test_state(0);
        let first = Gateway::spawn(state.clone(), "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let taken = first.local_addr();

        let second = Gateway::spawn(test_state(0), taken).await;
        assert!(matches!(second, Err(GatewayError::PortInUse(p)) if p == taken.port()));

        first.shutdown().await;
    }
}

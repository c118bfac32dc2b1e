//! Shared application state for the gateway.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use glyphpick_catalog::IconSearcher;
use glyphpick_session::SelectionRegistry;
use glyphpick_types::IconRecord;

/// Registry instance shared between the gateway and the polling tool.
pub type SharedRegistry = Arc<SelectionRegistry<IconRecord>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The selection registry driven by both the WebSocket and the poller.
    pub registry: SharedRegistry,

    /// Search orchestrator; the gateway reads its cached latest result.
    pub searcher: Arc<IconSearcher>,

    /// BCP 47 language tag forwarded to the page `lang` attribute.
    pub language: String,

    /// Cancelled when the gateway shuts down; closes live WS connections.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create gateway state over the shared registry and searcher.
    pub fn new(registry: SharedRegistry, searcher: Arc<IconSearcher>) -> Self {
        Self {
            registry,
            searcher,
            language: "en".to_string(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Set the UI language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

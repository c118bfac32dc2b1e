//! JSON endpoints backing the picker UI.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use glyphpick_session::RegistrySnapshot;
use glyphpick_types::ResultsPage;

use crate::error::{GatewayError, Result};
use crate::state::AppState;

/// Default UI page size; the picker shows a small grid per page.
const DEFAULT_UI_PAGE_SIZE: u32 = 15;

/// Query parameters for `/api/results`.
#[derive(Debug, Deserialize)]
pub struct ResultsParams {
    /// 1-based UI page.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Icons per UI page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_UI_PAGE_SIZE
}

/// GET /api/results - one UI page of the most recent search.
///
/// The picker paginates client-side over the cached result set; a 404
/// here means no search has run (or the cache entry expired).
pub async fn results_handler(
    State(state): State<AppState>,
    Query(params): Query<ResultsParams>,
) -> Result<Json<ResultsPage>> {
    let result = state
        .searcher
        .latest_result()
        .ok_or_else(|| GatewayError::NotFound("no cached search results".to_string()))?;

    Ok(Json(result.paginate(params.page, params.page_size)))
}

/// GET /api/session - diagnostic view of the selection registry.
pub async fn session_handler(State(state): State<AppState>) -> Json<RegistrySnapshot> {
    Json(state.registry.snapshot())
}

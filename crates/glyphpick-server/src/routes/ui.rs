//! The embedded picker page.
//!
//! Rendering detail lives in the static assets; these handlers only
//! inject the live session id and language tag so a freshly opened tab
//! knows which session its selection belongs to.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::state::AppState;

const PICKER_HTML: &str = include_str!("../../assets/picker.html");
const PICKER_JS: &str = include_str!("../../assets/picker.js");

/// GET / - serve the picker page bound to the live session.
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session_id = state
        .registry
        .current_session()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let page = PICKER_HTML
        .replace("{{SESSION_ID}}", &session_id)
        .replace("{{LANG}}", &state.language);
    Html(page)
}

/// GET /picker.js - the picker's client-side script.
pub async fn picker_js_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], PICKER_JS)
}

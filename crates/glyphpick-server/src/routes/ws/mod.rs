//! WebSocket channel for the picker's selection event.
//!
//! The browser pushes exactly one meaningful message over this channel:
//! the human's selection. Everything else is keepalive. The server never
//! pushes data beyond the initial welcome frame; UI data arrives over
//! the HTTP endpoints.
//!
//! ## Module Structure
//!
//! - `protocol` - message types (ClientMessage, ServerMessage)
//! - `connection` - connection lifecycle

mod connection;
mod protocol;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};

use crate::state::AppState;

pub use protocol::{ClientMessage, ServerMessage};

/// GET /ws - WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| connection::handle_socket(socket, state))
}

//! WebSocket connection lifecycle.

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};

use glyphpick_session::SessionId;

use super::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// Handle a WebSocket connection from one picker tab.
///
/// An abrupt close with no submission leaves the registry untouched: the
/// session stays `AwaitingSelection` until the agent stops the server or
/// starts a new one.
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let welcome = ServerMessage::Welcome {
        session_id: state.registry.current_session().map(|id| id.to_string()),
    };
    if send_message(&mut sender, welcome).await.is_err() {
        return;
    }

    tracing::debug!("picker WebSocket connected");

    loop {
        let msg = tokio::select! {
            msg = receiver.next() => match msg {
                Some(msg) => msg,
                None => break,
            },
            // Gateway shutdown tears down live connections.
            _ = state.shutdown.cancelled() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        };

        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Ping(data)) => {
                let _ = sender.send(Message::Pong(data)).await;
                continue;
            }
            Ok(Message::Pong(_)) | Ok(Message::Binary(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!("WebSocket error: {}", e);
                break;
            }
        };

        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                let reply = ServerMessage::error("parse_error", format!("invalid message: {e}"));
                if send_message(&mut sender, reply).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let reply = handle_message(client_msg, &state);
        if send_message(&mut sender, reply).await.is_err() {
            break;
        }
    }

    tracing::debug!("picker WebSocket closed");
}

/// Process one client message against the registry.
fn handle_message(msg: ClientMessage, state: &AppState) -> ServerMessage {
    match msg {
        ClientMessage::Ping => ServerMessage::Pong,
        ClientMessage::Selection { session_id, icons } => {
            let Some(session_id) = SessionId::parse(&session_id) else {
                return ServerMessage::rejected("malformed session id");
            };
            match state.registry.submit(session_id, icons) {
                Ok(count) => {
                    tracing::info!(session_id = %session_id, count, "selection received");
                    ServerMessage::accepted(count)
                }
                Err(e) => {
                    // Stale tabs are expected under last-start-wins; the
                    // live session is untouched.
                    tracing::warn!(session_id = %session_id, error = %e, "selection dropped");
                    ServerMessage::rejected(e.to_string())
                }
            }
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(&msg).unwrap_or_else(|_| "{}".to_string());
    sender.send(Message::Text(json.into())).await
}

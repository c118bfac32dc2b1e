//! WebSocket protocol types for the selection channel.

use serde::{Deserialize, Serialize};

use glyphpick_types::IconRecord;

/// Messages from the picker page to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The human confirmed a selection.
    Selection {
        /// Session id the page was served with. Stale ids (from a
        /// superseded tab) are rejected without touching the registry.
        session_id: String,
        /// Selected icons, in pick order.
        icons: Vec<IconRecord>,
    },
    /// Keepalive.
    Ping,
}

/// Messages from the server to the picker page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once on connect with the live session id (if any).
    Welcome {
        /// The live session id, absent when no session is active.
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
    /// Result of a selection submission.
    SelectionAck {
        /// Whether the registry accepted the selection.
        accepted: bool,
        /// Number of icons recorded (0 when rejected).
        count: usize,
        /// Why the submission was rejected, when it was.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Keepalive response.
    Pong,
    /// Protocol-level error (bad JSON, unknown message).
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl ServerMessage {
    /// Create an error message.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an acceptance ack.
    pub fn accepted(count: usize) -> Self {
        Self::SelectionAck {
            accepted: true,
            count,
            reason: None,
        }
    }

    /// Create a rejection ack.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::SelectionAck {
            accepted: false,
            count: 0,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_selection_wire_format() {
        let json = r#"{"type":"selection","session_id":"abc","icons":[{"id":1,"name":"x"}]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Selection { session_id, icons } => {
                assert_eq!(session_id, "abc");
                assert_eq!(icons.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_server_ack_skips_absent_reason() {
        let json = serde_json::to_string(&ServerMessage::accepted(3)).unwrap();
        assert!(json.contains("\"accepted\":true"));
        assert!(!json.contains("reason"));

        let json = serde_json::to_string(&ServerMessage::rejected("stale")).unwrap();
        assert!(json.contains("\"reason\":\"stale\""));
    }
}

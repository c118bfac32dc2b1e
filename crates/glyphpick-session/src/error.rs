//! Soft-failure outcomes for selection submission.

use crate::registry::SessionId;

/// Why a submitted selection was not accepted.
///
/// These are recoverable outcomes, not faults: a stale browser tab from a
/// superseded session is expected under the last-start-wins policy, and
/// the gateway logs and drops it rather than crashing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No session is active; `start()` was never called or `stop()` ran.
    #[error("no active selection session")]
    NoActiveSession,

    /// The submission carried a session id that is not the live one.
    #[error("stale submission for session {submitted} (active: {active})")]
    StaleSession {
        /// Session id the submission was tagged with.
        submitted: SessionId,
        /// The currently live session id.
        active: SessionId,
    },

    /// The live session already holds a selection (or it was consumed).
    #[error("session {0} is not awaiting a selection")]
    NotAwaiting(SessionId),
}

//! The selection session registry.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SubmitError;

/// Opaque token identifying one browser-selection round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a new unique session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session id from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of the selection handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// No session exists.
    Idle,
    /// A session is live; the human has not chosen yet.
    AwaitingSelection,
    /// The human submitted a choice; the agent has not retrieved it.
    Selected,
    /// The agent retrieved the choice. Terminal until the next `start`.
    Consumed,
}

/// Outcome of a [`SelectionRegistry::poll`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll<T> {
    /// No session exists; nothing to poll for.
    Idle,
    /// The session is live but no choice has arrived. Keep polling.
    Awaiting {
        /// The live session.
        session_id: SessionId,
    },
    /// The choice, handed out exactly once. The registry is now `Consumed`.
    Selected {
        /// The session the payload belongs to.
        session_id: SessionId,
        /// The selected items, in the order the human picked them.
        items: Vec<T>,
    },
    /// The choice was already retrieved by an earlier poll.
    Consumed {
        /// The consumed session.
        session_id: SessionId,
    },
}

/// Diagnostic view of the registry at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    /// Current lifecycle state.
    pub state: SelectionState,
    /// Live session id, if any.
    pub session_id: Option<SessionId>,
    /// When the live session was created.
    pub created_at: Option<DateTime<Utc>>,
    /// Last transition on the live session.
    pub last_activity_at: Option<DateTime<Utc>>,
}

struct Inner<T> {
    state: SelectionState,
    session_id: Option<SessionId>,
    payload: Vec<T>,
    created_at: Option<DateTime<Utc>>,
    last_activity_at: Option<DateTime<Utc>>,
}

/// Tracks the zero-or-one active selection session.
///
/// All transitions run under one mutex and never block on I/O, so
/// coarse-grained locking is cheap. The notifying side (`submit`, driven
/// by the WebSocket) and the polling side (`poll`, driven by the agent)
/// contend only on this lock, which is what makes exactly-once delivery
/// hold: capturing a `Selected` payload and moving to `Consumed` is a
/// single atomic step.
///
/// The registry is an explicitly owned, injectable instance; there is no
/// process-wide singleton, and tests construct a fresh one per case.
pub struct SelectionRegistry<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for SelectionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionRegistry<T> {
    /// Create a registry with no active session.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SelectionState::Idle,
                session_id: None,
                payload: Vec::new(),
                created_at: None,
                last_activity_at: None,
            }),
        }
    }

    /// Start a fresh session, superseding any prior one.
    ///
    /// Last start wins: a prior session's outcome — including a `Selected`
    /// payload the agent never retrieved — is discarded, because only one
    /// physical browser session can be meaningfully in flight.
    pub fn start(&self) -> SessionId {
        let session_id = SessionId::new();
        let now = Utc::now();
        let mut inner = self.inner.lock();

        if let Some(prior) = inner.session_id {
            info!(
                prior_session = %prior,
                prior_state = ?inner.state,
                new_session = %session_id,
                "superseding selection session"
            );
        }

        inner.state = SelectionState::AwaitingSelection;
        inner.session_id = Some(session_id);
        inner.payload = Vec::new();
        inner.created_at = Some(now);
        inner.last_activity_at = Some(now);

        session_id
    }

    /// Record the human's choice for the live session.
    ///
    /// Valid only while `AwaitingSelection` with a matching session id.
    /// Everything else is a soft failure: the submission is dropped and
    /// the live session is left untouched.
    pub fn submit(&self, session_id: SessionId, items: Vec<T>) -> Result<usize, SubmitError> {
        let mut inner = self.inner.lock();

        let active = match inner.session_id {
            Some(id) => id,
            None => return Err(SubmitError::NoActiveSession),
        };
        if active != session_id {
            return Err(SubmitError::StaleSession {
                submitted: session_id,
                active,
            });
        }
        if inner.state != SelectionState::AwaitingSelection {
            return Err(SubmitError::NotAwaiting(session_id));
        }

        let count = items.len();
        inner.state = SelectionState::Selected;
        inner.payload = items;
        inner.last_activity_at = Some(Utc::now());

        debug!(session_id = %session_id, count, "selection recorded");
        Ok(count)
    }

    /// Non-blocking poll for the human's choice.
    ///
    /// If the state is `Selected`, the payload is captured and the state
    /// moves to `Consumed` within the same locked section, so among any
    /// number of concurrent pollers exactly one observes the payload.
    pub fn poll(&self) -> Poll<T> {
        let mut inner = self.inner.lock();

        let session_id = match inner.session_id {
            Some(id) => id,
            None => return Poll::Idle,
        };

        match inner.state {
            SelectionState::Idle => Poll::Idle,
            SelectionState::AwaitingSelection => Poll::Awaiting { session_id },
            SelectionState::Selected => {
                inner.state = SelectionState::Consumed;
                inner.last_activity_at = Some(Utc::now());
                let items = std::mem::take(&mut inner.payload);
                debug!(session_id = %session_id, count = items.len(), "selection consumed");
                Poll::Selected { session_id, items }
            }
            SelectionState::Consumed => Poll::Consumed { session_id },
        }
    }

    /// Tear down the session, releasing any payload. Any state → `Idle`.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if let Some(session_id) = inner.session_id {
            if inner.state == SelectionState::Selected {
                warn!(session_id = %session_id, "stopping registry with an unconsumed selection");
            }
        }
        inner.state = SelectionState::Idle;
        inner.session_id = None;
        inner.payload = Vec::new();
        inner.created_at = None;
        inner.last_activity_at = None;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SelectionState {
        self.inner.lock().state
    }

    /// The live session id, if a session exists.
    pub fn current_session(&self) -> Option<SessionId> {
        self.inner.lock().session_id
    }

    /// Diagnostic snapshot (state, session id, timestamps).
    pub fn snapshot(&self) -> RegistrySnapshot {
        let inner = self.inner.lock();
        RegistrySnapshot {
            state: inner.state,
            session_id: inner.session_id,
            created_at: inner.created_at,
            last_activity_at: inner.last_activity_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initial_state_is_idle() {
        let registry: SelectionRegistry<String> = SelectionRegistry::new();
        assert_eq!(registry.state(), SelectionState::Idle);
        assert_eq!(registry.poll(), Poll::Idle);
        assert!(registry.current_session().is_none());
    }

    #[test]
    fn test_full_handoff_round_trip() {
        let registry = SelectionRegistry::new();
        let sid = registry.start();

        assert_eq!(registry.poll(), Poll::Awaiting { session_id: sid });

        registry.submit(sid, vec!["c"]).unwrap();
        assert_eq!(registry.state(), SelectionState::Selected);

        assert_eq!(
            registry.poll(),
            Poll::Selected {
                session_id: sid,
                items: vec!["c"]
            }
        );

        // The payload is gone; retries see Consumed.
        assert_eq!(registry.poll(), Poll::Consumed { session_id: sid });
        assert_eq!(registry.poll(), Poll::Consumed { session_id: sid });
    }

    #[test]
    fn test_stale_submission_is_rejected() {
        let registry = SelectionRegistry::new();
        let old = registry.start();
        let new = registry.start();

        let err = registry.submit(old, vec![1]).unwrap_err();
        assert_eq!(
            err,
            SubmitError::StaleSession {
                submitted: old,
                active: new
            }
        );

        // The live session is untouched.
        assert_eq!(registry.poll(), Poll::Awaiting { session_id: new });
    }

    #[test]
    fn test_submit_without_session() {
        let registry: SelectionRegistry<u32> = SelectionRegistry::new();
        assert_eq!(
            registry.submit(SessionId::new(), vec![1]).unwrap_err(),
            SubmitError::NoActiveSession
        );
    }

    #[test]
    fn test_double_submit_is_soft_failure() {
        let registry = SelectionRegistry::new();
        let sid = registry.start();
        registry.submit(sid, vec![1]).unwrap();

        let err = registry.submit(sid, vec![2]).unwrap_err();
        assert_eq!(err, SubmitError::NotAwaiting(sid));

        // The first payload survives.
        assert_eq!(
            registry.poll(),
            Poll::Selected {
                session_id: sid,
                items: vec![1]
            }
        );
    }

    #[test]
    fn test_start_discards_unconsumed_selection() {
        let registry = SelectionRegistry::new();
        let old = registry.start();
        registry.submit(old, vec!["x"]).unwrap();

        // Last start wins: the unconsumed payload is discarded.
        let new = registry.start();
        assert_eq!(registry.poll(), Poll::Awaiting { session_id: new });
    }

    #[test]
    fn test_start_after_consumed_begins_fresh() {
        let registry = SelectionRegistry::new();
        let first = registry.start();
        registry.submit(first, vec![1]).unwrap();
        let _ = registry.poll();

        let second = registry.start();
        assert_ne!(first, second);
        assert_eq!(registry.state(), SelectionState::AwaitingSelection);
    }

    #[test]
    fn test_stop_resets_to_idle() {
        let registry = SelectionRegistry::new();
        let sid = registry.start();
        registry.submit(sid, vec![1]).unwrap();

        registry.stop();
        assert_eq!(registry.state(), SelectionState::Idle);
        assert_eq!(registry.poll(), Poll::Idle);

        // Stop from Idle is fine too.
        registry.stop();
        assert_eq!(registry.state(), SelectionState::Idle);
    }

    #[test]
    fn test_snapshot_tracks_activity() {
        let registry: SelectionRegistry<u32> = SelectionRegistry::new();
        let snap = registry.snapshot();
        assert!(snap.session_id.is_none());
        assert!(snap.created_at.is_none());

        let sid = registry.start();
        let snap = registry.snapshot();
        assert_eq!(snap.session_id, Some(sid));
        assert!(snap.created_at.is_some());
        assert_eq!(snap.state, SelectionState::AwaitingSelection);
    }

    #[test]
    fn test_exactly_once_under_concurrent_polls() {
        let registry = Arc::new(SelectionRegistry::new());
        let sid = registry.start();
        registry.submit(sid, vec![7u32]).unwrap();

        let winners = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            let winners = Arc::clone(&winners);
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    if let Poll::Selected { items, .. } = registry.poll() {
                        assert_eq!(items, vec![7]);
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(registry.state(), SelectionState::Consumed);
    }
}

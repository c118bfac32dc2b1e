//! Selection-handoff state machine.
//!
//! This crate bridges two asynchronous actors that share no channel: a
//! push-capable WebSocket session (the human picking icons in a browser)
//! and a pull-only polling client (the agent calling a tool in a loop).
//! The [`SelectionRegistry`] is the single rendezvous point; every
//! transition happens under one mutex so a selection is delivered to the
//! polling side exactly once and a superseded browser tab can never
//! corrupt the live session.
//!
//! State machine:
//!
//! ```text
//! Idle ──start──▶ AwaitingSelection ──submit──▶ Selected ──poll──▶ Consumed
//!  ▲                    │    ▲                      │                  │
//!  └───────stop─────────┴────┴───start (supersede)──┴──────────────────┘
//! ```

mod error;
mod registry;

pub use error::SubmitError;
pub use registry::{Poll, RegistrySnapshot, SelectionRegistry, SelectionState, SessionId};

//! In-memory TTL cache.
//!
//! This crate provides [`TtlCache`], a process-wide key→value store with:
//! - per-entry expiry, checked lazily on read
//! - explicit invalidation (`invalidate`, `clear`) and reclamation (`sweep`)
//! - on-demand statistics that never mutate the store
//!
//! Expiry is a pure function of "now" versus `created_at + ttl`, so
//! correctness never depends on a background sweep having run. An expired
//! entry is logically absent the instant its TTL elapses even while it is
//! still physically stored.

mod store;

pub use store::{CacheStats, TtlCache, DEFAULT_TTL};

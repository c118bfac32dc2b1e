//! The TTL key→value store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default time-to-live for cache entries (30 minutes).
///
/// Catalog results go stale, and an unbounded map in a long-running
/// process would otherwise leak. Thirty minutes balances freshness
/// against external-call cost for a human iterating on one query.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache statistics, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// All physically stored entries, expired or not.
    pub total_entries: usize,
    /// Entries whose TTL has not elapsed.
    pub active_entries: usize,
    /// Entries past their TTL but not yet swept.
    pub expired_entries: usize,
}

/// A stored value with its expiry clock.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

/// A key→value store with per-entry expiry.
///
/// Reads take a shared lock, so concurrent in-flight searches never
/// contend with each other; writes, `clear` and `sweep` take the
/// exclusive lock. A read racing a write to the same key observes either
/// the old or the new value, never a torn one.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    /// Create a cache with the default 30-minute TTL.
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom default TTL.
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// The TTL applied by [`put`](Self::put).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store or overwrite an entry with the default TTL.
    ///
    /// Overwriting resets the entry's expiry clock. Never fails.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Store or overwrite an entry with an explicit TTL.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        self.entries.write().insert(
            key,
            Entry {
                value,
                created_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove a single entry. Idempotent.
    pub fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Remove all entries. Idempotent. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        debug!(count, "cache cleared");
        count
    }

    /// Physically remove expired entries. Returns how many were removed.
    ///
    /// Purely an eviction pass; visibility of expired entries is already
    /// handled by the lazy check in [`get`](Self::get).
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Classify every physical entry as active or expired, right now.
    ///
    /// Reporting never mutates the store; sweeping is a separate call.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let total_entries = entries.len();
        let active_entries = entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();

        CacheStats {
            total_entries,
            active_entries,
            expired_entries: total_entries - active_entries,
        }
    }

    /// Number of physically stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether an unexpired entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }
}

impl<V: Clone> TtlCache<V> {
    /// Get the value for `key` if it exists and has not expired.
    ///
    /// A hit on an expired-but-unswept entry behaves identically to a
    /// miss. The entry stays physically stored until the next sweep.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.is_expired_at(now) {
            return None;
        }
        Some(entry.value.clone())
    }
}

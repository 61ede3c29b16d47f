//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cache entry: the stored value plus its insertion timestamp.
///
/// Entries are replaced wholesale when a key is re-inserted, never mutated
/// in place, so a reader always observes a complete entry. The expiry
/// deadline is not stored per entry; the cache-wide TTL is applied against
/// `inserted_at` at sweep time.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub(crate) value: V,
    /// When the value was inserted or last replaced
    pub(crate) inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now`.
    pub(crate) fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now` under the given TTL.
    ///
    /// Boundary condition: an entry is expired once the full TTL has
    /// elapsed, i.e. when `now - inserted_at >= ttl`.
    pub(crate) fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }

    // == Age ==
    /// Returns how long the entry has been in the cache as of `now`.
    pub(crate) fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }
}

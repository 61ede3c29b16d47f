//! Cache Handle Module
//!
//! The public cache type: a cheaply clonable handle over the locked store,
//! the fixed configuration, the optional invalidation hook and the stats
//! counters. Every handle clone shares the same underlying cache.

use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::cache::stats::{CacheStats, StatsCounters};
use crate::cache::store::CacheStore;
use crate::config::{CacheConfig, SweepMode};

// == Invalidation Hook ==
/// Host-supplied function invoked once for each entry that leaves the cache
/// via explicit removal, [`Cache::clear`] or expiry.
///
/// Runs synchronously on whichever thread triggered the removal, after the
/// entry has left the store and outside the store lock, so a hook may call
/// back into the cache. Hooks should return quickly; a slow hook stalls the
/// thread that fired it.
pub type InvalidateHook<K, V> = Arc<dyn Fn(&K, &V) + Send + Sync>;

// == Shared State ==
/// State shared by all clones of a cache handle.
struct Shared<K, V> {
    /// The store map, locked per operation
    store: RwLock<CacheStore<K, V>>,
    /// Fixed configuration (mode, TTL, sweep interval)
    config: CacheConfig,
    /// Optional invalidation hook
    on_invalidate: Option<InvalidateHook<K, V>>,
    /// Performance counters
    stats: StatsCounters,
}

// == Cache ==
/// A concurrent in-memory cache with time-based expiration.
///
/// Entries older than the configured TTL are reclaimed by expiration sweeps,
/// driven either by the host ([`SweepMode::Inline`]) or by a background task
/// ([`SweepMode::Background`]). Reads never remove entries: a value past its
/// TTL but not yet swept is still returned.
///
/// Each operation is individually atomic; no transaction spans two
/// operations. Composite check-then-act steps are covered by single
/// primitives ([`Cache::put_if_absent`], [`Cache::remove`]).
pub struct Cache<K, V> {
    inner: Arc<Shared<K, V>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Assembles a cache from an already-validated configuration.
    ///
    /// Only the builder constructs caches; sweeper registration for
    /// background mode happens there as well.
    pub(crate) fn new(config: CacheConfig, on_invalidate: Option<InvalidateHook<K, V>>) -> Self {
        Self {
            inner: Arc::new(Shared {
                store: RwLock::new(CacheStore::new()),
                config,
                on_invalidate,
                stats: StatsCounters::default(),
            }),
        }
    }

    // == Put ==
    /// Unconditionally inserts or replaces the value for `key`, stamping it
    /// with the current time. Replacing an existing entry resets its expiry
    /// window.
    ///
    /// Returns the previous value, if any. No invalidation fires for a
    /// replaced value; the entry never left the cache.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.store.write().put(key, value, Instant::now())
    }

    // == Put If Absent ==
    /// Inserts the value for `key` only if the cache holds no entry for it.
    ///
    /// This is a single atomic primitive; checking with [`Cache::get`] and
    /// then calling [`Cache::put`] would race with concurrent writers.
    /// Returns the existing value (leaving it and its expiry window
    /// untouched) or `None` after inserting.
    pub fn put_if_absent(&self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        self.inner
            .store
            .write()
            .put_if_absent(key, value, Instant::now())
    }

    // == Get ==
    /// Returns the current value for `key`, or `None` if absent.
    ///
    /// Does not refresh the entry's timestamp and does not check expiry —
    /// reclamation is solely the sweeper's job, so a value already past its
    /// TTL may still be returned until the next sweep.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let store = self.inner.store.read();
        match store.get(key) {
            Some(value) => {
                self.inner.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.inner.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes the entry for `key` and returns its value, or `None` if no
    /// entry was present.
    ///
    /// The atomic take primitive: there is no separate existence check to
    /// race against. When an entry is removed, the invalidation hook fires
    /// exactly once with the removed pair, on the calling thread.
    pub fn remove(&self, key: &K) -> Option<V> {
        let value = self.inner.store.write().take(key)?;
        self.notify_invalidate(key, &value);
        Some(value)
    }

    // == Clear ==
    /// Removes every entry, firing the invalidation hook once per entry in
    /// unspecified order.
    pub fn clear(&self) {
        let drained = self.inner.store.write().drain_all();
        for (key, value) in &drained {
            self.notify_invalidate(key, value);
        }
    }

    // == Sweep ==
    /// Runs one expiration sweep: removes every entry whose TTL has fully
    /// elapsed and fires the invalidation hook once per removed entry.
    /// Returns the number of entries removed.
    ///
    /// In [`SweepMode::Inline`] the host calls this from its own periodic
    /// tick loop; in [`SweepMode::Background`] the spawned task calls it on
    /// the configured interval. Calling it by hand in background mode is
    /// harmless; a sweep on an already-clean cache removes nothing.
    pub fn sweep(&self) -> usize
    where
        K: Clone,
    {
        self.sweep_at(Instant::now())
    }

    /// Sweep against an explicit timestamp.
    ///
    /// The scan and removal happen in one write-lock critical section, so a
    /// sweep removes exactly the entries expired when it began: an entry
    /// re-put concurrently cannot be lost, and entries put for other keys
    /// mid-sweep are unaffected.
    pub(crate) fn sweep_at(&self, now: Instant) -> usize
    where
        K: Clone,
    {
        let expired = {
            let mut store = self.inner.store.write();
            store.sweep_expired(self.inner.config.ttl, now)
        };

        self.inner.stats.record_expirations(expired.len() as u64);
        for (key, value) in &expired {
            self.notify_invalidate(key, value);
        }

        expired.len()
    }

    // == Read-Only Views ==
    /// Checks if the cache holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.store.read().contains_key(key)
    }

    /// Checks if any entry holds the given value.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.store.read().contains_value(value)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.store.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.store.read().is_empty()
    }

    /// Returns a point-in-time copy of the live key-value mapping.
    ///
    /// The copy is consistent: it observes the store between two operations,
    /// never mid-write. Later cache mutations do not show through.
    pub fn snapshot(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.inner.store.read().snapshot()
    }

    // == Stats ==
    /// Returns a snapshot of the cache's performance counters.
    pub fn stats(&self) -> CacheStats {
        let total_entries = self.inner.store.read().len();
        self.inner.stats.snapshot(total_entries)
    }

    // == Config Accessors ==
    /// The duration after which entries become eligible for expiry.
    pub fn ttl(&self) -> Duration {
        self.inner.config.ttl
    }

    /// The interval between expiration sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.inner.config.sweep_interval
    }

    /// The sweep execution mode fixed at build time.
    pub fn mode(&self) -> SweepMode {
        self.inner.config.mode
    }

    // == Invalidation Dispatch ==
    /// Fires the invalidation hook for one removed entry.
    ///
    /// Each invocation is isolated: a panicking hook is caught and logged so
    /// it cannot abort the rest of a sweep or clear, nor unwind into the
    /// sweeper task.
    fn notify_invalidate(&self, key: &K, value: &V) {
        self.inner.stats.record_invalidation();

        if let Some(hook) = &self.inner.on_invalidate {
            if panic::catch_unwind(AssertUnwindSafe(|| hook(key, value))).is_err() {
                warn!("invalidation hook panicked; continuing");
            }
        }
    }
}

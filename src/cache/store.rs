//! Cache Store Module
//!
//! The internal map engine: a HashMap of timestamped entries with the
//! primitives the public cache handle composes under its lock. Every method
//! that depends on time takes an explicit `now` so callers (and tests)
//! control the clock.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::entry::CacheEntry;

// == Cache Store ==
/// Key-value storage with per-entry insertion timestamps.
///
/// Not internally synchronized; the public [`Cache`](crate::Cache) wraps it
/// in a lock and holds that lock for exactly one operation at a time.
#[derive(Debug)]
pub(crate) struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Put ==
    /// Unconditionally inserts or replaces the entry for `key`, stamped at
    /// `now`. Replacing resets the entry's expiry window.
    ///
    /// Returns the previous value, if any.
    pub(crate) fn put(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        self.entries
            .insert(key, CacheEntry::new(value, now))
            .map(|entry| entry.value)
    }

    // == Put If Absent ==
    /// Inserts the entry for `key` only if no entry is present.
    ///
    /// A single check-then-insert primitive: when an entry exists its value
    /// is returned and neither the value nor the timestamp changes; when
    /// absent the new entry is inserted, stamped at `now`, and `None` is
    /// returned.
    pub(crate) fn put_if_absent(&mut self, key: K, value: V, now: Instant) -> Option<V>
    where
        V: Clone,
    {
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => Some(occupied.get().value.clone()),
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(value, now));
                None
            }
        }
    }

    // == Get ==
    /// Returns a reference to the current value for `key`, if present.
    ///
    /// Does not refresh the entry's timestamp and does not check expiry;
    /// reclaiming stale entries is solely the sweep's job, so a value past
    /// its TTL but not yet swept is still returned.
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    // == Take ==
    /// Removes the entry for `key` and returns its value, or `None` if no
    /// entry is present. The atomic remove-and-return primitive; callers
    /// never need a separate existence check.
    pub(crate) fn take(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    // == Drain ==
    /// Removes every entry, returning the drained pairs in unspecified
    /// order.
    pub(crate) fn drain_all(&mut self) -> Vec<(K, V)> {
        self.entries
            .drain()
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }

    // == Sweep Expired ==
    /// Removes all entries expired at `now` under the given TTL and returns
    /// the removed pairs.
    ///
    /// Snapshot-then-remove: the expired keys are collected in a first pass
    /// over the map, and only then removed, so the map is never mutated
    /// while it is being iterated.
    pub(crate) fn sweep_expired(&mut self, ttl: Duration, now: Instant) -> Vec<(K, V)>
    where
        K: Clone,
    {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = Vec::with_capacity(expired_keys.len());
        for key in expired_keys {
            if let Some(entry) = self.entries.remove(&key) {
                removed.push((key, entry.value));
            }
        }

        removed
    }

    // == Contains Key ==
    /// Checks if the store holds an entry for `key`.
    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Contains Value ==
    /// Checks if any entry holds the given value.
    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|entry| entry.value == *value)
    }

    // == Length ==
    /// Returns the current number of entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of the live key-value mapping.
    pub(crate) fn snapshot(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Returns how long the entry for `key` has been in the store as of
    /// `now`, if present.
    #[cfg(test)]
    pub(crate) fn age_of(&self, key: &K, now: Instant) -> Option<Duration> {
        self.entries.get(key).map(|entry| entry.age(now))
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's correctness properties over
//! arbitrary operation sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;
use tokio::time::Instant;

use crate::cache::store::CacheStore;
use crate::cache::CacheBuilder;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(60);

// == Strategies ==
/// Generates cache keys from a small alphabet so collisions are common
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    PutIfAbsent { key: String, value: u32 },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        (key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::PutIfAbsent { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of operations, the cache agrees with a plain map
    // model and the statistics reflect exactly the hits, misses and
    // notified removals that occurred.
    #[test]
    fn prop_model_equivalence_and_statistics(
        ops in prop::collection::vec(cache_op_strategy(), 1..50)
    ) {
        let (cache, _sweeper) = CacheBuilder::<String, u32>::new().build().unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_invalidations: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    let previous = cache.put(key.clone(), value);
                    prop_assert_eq!(previous, model.insert(key, value));
                }
                CacheOp::PutIfAbsent { key, value } => {
                    let existing = cache.put_if_absent(key.clone(), value);
                    prop_assert_eq!(existing, model.get(&key).copied());
                    model.entry(key).or_insert(value);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    prop_assert_eq!(got, model.get(&key).copied());
                    if model.contains_key(&key) {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Remove { key } => {
                    let taken = cache.remove(&key);
                    prop_assert_eq!(taken, model.remove(&key));
                    if taken.is_some() {
                        expected_invalidations += 1;
                    }
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.invalidations, expected_invalidations);
        prop_assert_eq!(stats.expirations, 0);
        prop_assert_eq!(stats.total_entries, model.len());
        prop_assert_eq!(cache.len(), model.len());
    }

    // *For any* sequence of puts, each key holds the last value written to
    // it and the cache holds exactly one entry per distinct key.
    #[test]
    fn prop_last_put_wins(
        puts in prop::collection::vec((key_strategy(), any::<u32>()), 1..50)
    ) {
        let (cache, _sweeper) = CacheBuilder::<String, u32>::new().build().unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();

        for (key, value) in puts {
            cache.put(key.clone(), value);
            model.insert(key, value);
        }

        prop_assert_eq!(cache.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(cache.get(key), Some(*value));
        }
    }

    // *For any* mix of stale and fresh entries, a sweep removes exactly the
    // stale ones and reports each removed pair exactly once.
    #[test]
    fn prop_sweep_removes_exactly_the_expired(
        entries in prop::collection::hash_map(key_strategy(), (any::<u32>(), any::<bool>()), 1..30)
    ) {
        let mut store: CacheStore<String, u32> = CacheStore::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(30);

        for (key, (value, stale)) in &entries {
            let stamped_at = if *stale { t0 } else { t1 };
            store.put(key.clone(), *value, stamped_at);
        }

        let removed = store.sweep_expired(TEST_TTL, t0 + TEST_TTL);

        let mut expected: Vec<(String, u32)> = entries
            .iter()
            .filter(|(_, (_, stale))| *stale)
            .map(|(key, (value, _))| (key.clone(), *value))
            .collect();
        expected.sort();
        let mut reported = removed;
        reported.sort();

        prop_assert_eq!(reported, expected);
        for (key, (value, stale)) in &entries {
            if *stale {
                prop_assert!(!store.contains_key(key));
            } else {
                prop_assert_eq!(store.get(key), Some(value));
            }
        }
    }

    // *For any* set of entries, removing some and clearing the rest fires
    // the invalidation hook exactly once per entry, with no extra firings.
    #[test]
    fn prop_invalidation_exactly_once(
        entries in prop::collection::hash_map(key_strategy(), any::<u32>(), 1..30)
    ) {
        let notified: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
        let seen = Arc::clone(&notified);
        let (cache, _sweeper) = CacheBuilder::new()
            .on_invalidate(move |key: &String, _value: &u32| {
                *seen.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
            })
            .build()
            .unwrap();

        for (key, value) in &entries {
            cache.put(key.clone(), *value);
        }

        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        for key in keys.into_iter().step_by(2) {
            prop_assert!(cache.remove(key).is_some());
        }
        cache.clear();

        let notified = notified.lock().unwrap();
        prop_assert_eq!(notified.len(), entries.len());
        for key in entries.keys() {
            prop_assert_eq!(notified.get(key), Some(&1));
        }
    }
}

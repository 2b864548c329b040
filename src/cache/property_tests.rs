//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key determinism, reuse bounds, statistics and persistence.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;

use crate::cache::{CacheEntry, CacheStore, CallArgs, Lookup, PersistenceAdapter};

// == Test Configuration ==
const LONG_EXPIRY: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates keyword names that are never control flags
fn kwarg_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}".prop_map(|s| s)
}

/// Generates keyword names reserved for control flags
fn control_name_strategy() -> impl Strategy<Value = String> {
    "_[a-z]{1,8}".prop_map(|s| s)
}

fn kwargs_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(kwarg_name_strategy(), any::<i64>(), 0..8)
}

/// A sequence of store operations over a small key space
#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: u8, value: i64 },
    Check { key: u8 },
    Remove { key: u8 },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (0u8..8, any::<i64>()).prop_map(|(key, value)| StoreOp::Put { key, value }),
        (0u8..8).prop_map(|key| StoreOp::Check { key }),
        (0u8..8).prop_map(|key| StoreOp::Remove { key }),
    ]
}

fn build_args(positional: &[i64], kwargs: &[(String, i64)]) -> CallArgs {
    let mut args = CallArgs::new();
    for value in positional {
        args = args.arg(value);
    }
    for (name, value) in kwargs {
        args = args.kwarg(name.clone(), value);
    }
    args
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property: Key Determinism**
    // *For any* operation and argument set, inserting the keyword arguments
    // in a different order SHALL produce the identical key.
    #[test]
    fn prop_key_ignores_kwarg_order(
        operation in "[a-z_]{1,16}",
        positional in prop::collection::vec(any::<i64>(), 0..5),
        kwargs in kwargs_strategy()
    ) {
        let forward: Vec<(String, i64)> = kwargs.clone().into_iter().collect();
        let backward: Vec<(String, i64)> = kwargs.into_iter().rev().collect();

        let a = build_args(&positional, &forward).cache_key(&operation).unwrap();
        let b = build_args(&positional, &backward).cache_key(&operation).unwrap();
        prop_assert_eq!(a, b);
    }

    // **Property: Control Flags Are Not Identity**
    // *For any* call, adding keyword arguments with the control prefix
    // SHALL NOT change the key.
    #[test]
    fn prop_control_flags_do_not_change_key(
        positional in prop::collection::vec(any::<i64>(), 0..5),
        kwargs in kwargs_strategy(),
        flags in prop::collection::btree_map(control_name_strategy(), any::<bool>(), 1..4)
    ) {
        let kwargs: Vec<(String, i64)> = kwargs.into_iter().collect();
        let plain = build_args(&positional, &kwargs);

        let mut flagged = build_args(&positional, &kwargs);
        for (name, value) in flags {
            flagged = flagged.kwarg(name, value);
        }

        prop_assert_eq!(plain.cache_key("op").unwrap(), flagged.cache_key("op").unwrap());
    }

    // **Property: Distinct Positional Arguments Give Distinct Keys**
    #[test]
    fn prop_positional_values_change_key(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        let left = CallArgs::new().arg(a).cache_key("op").unwrap();
        let right = CallArgs::new().arg(b).cache_key("op").unwrap();
        prop_assert_ne!(left, right);
    }

    // **Property: Reuse Bound**
    // *For any* reuse limit, a fresh unexpired entry SHALL serve exactly
    // max(1, max_reuse) hits and then report stale.
    #[test]
    fn prop_reuse_bound(max_reuse in 0u32..20, value in any::<i64>()) {
        let now = Utc::now();
        let key = CallArgs::new().arg(value).cache_key("op").unwrap();
        let mut store = CacheStore::new();
        store.put(key.clone(), CacheEntry::new(value, now, LONG_EXPIRY));

        let mut hits = 0;
        while let Lookup::Hit(found) = store.reuse_and_check(&key, now, max_reuse) {
            prop_assert_eq!(found, value);
            hits += 1;
            prop_assert!(hits <= 20, "entry never went stale");
        }

        prop_assert_eq!(hits, max_reuse.max(1));
        prop_assert!(store.is_empty());
    }

    // **Property: Statistics Accuracy**
    // *For any* sequence of store operations, the hit, miss and stale counters
    // SHALL match the lookup outcomes that were observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let now = Utc::now();
        let mut store = CacheStore::new();
        let (mut hits, mut misses, mut stale) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    let key = CallArgs::new().arg(key).cache_key("op").unwrap();
                    store.put(key, CacheEntry::new(value, now, LONG_EXPIRY));
                }
                StoreOp::Check { key } => {
                    let key = CallArgs::new().arg(key).cache_key("op").unwrap();
                    match store.reuse_and_check(&key, now, 2) {
                        Lookup::Hit(_) => hits += 1,
                        Lookup::Miss => misses += 1,
                        Lookup::Stale => stale += 1,
                    }
                }
                StoreOp::Remove { key } => {
                    let key = CallArgs::new().arg(key).cache_key("op").unwrap();
                    store.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, misses, "Misses mismatch");
        prop_assert_eq!(stats.stale, stale, "Stale mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }
}

// Separate block with fewer cases for filesystem round-trips
proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    // **Property: Persistence Round-trip**
    // *For any* store, saving and loading it SHALL reproduce every key with the
    // same value, expiry instant and reuse count.
    #[test]
    fn prop_persistence_round_trip(
        values in prop::collection::btree_map(any::<i32>(), (any::<i64>(), "[a-z ]{0,16}"), 0..16),
        reuse in 0u32..5
    ) {
        let dir = tempfile::tempdir().unwrap();
        let adapter = PersistenceAdapter::new(dir.path());
        let now = Utc::now();

        let mut store = CacheStore::new();
        for (arg, value) in values {
            let key = CallArgs::new().arg(arg).cache_key("round_trip").unwrap();
            let mut entry = CacheEntry::new(value, now, LONG_EXPIRY);
            entry.reuse_count = reuse;
            store.put(key, entry);
        }

        let loaded: CacheStore<(i64, String)> = tokio_test::block_on(async {
            adapter.save("round_trip", &store).await.unwrap();
            adapter.load("round_trip").await.unwrap()
        });

        prop_assert_eq!(loaded.entries(), store.entries());
    }
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's read/write/expiry invariants.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, InMemoryCache, MemoryStore, Ttl};
use crate::config::InMemoryConfig;

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}"
}

fn ttl_secs_strategy() -> impl Strategy<Value = u64> {
    1u64..3600
}

/// A single cache operation
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Flush,
}

fn small_key_strategy() -> impl Strategy<Value = String> {
    // Small key space so operations collide
    "[a-e]"
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (small_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => small_key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => small_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Flush),
    ]
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Against a HashMap model, every read returns exactly what the last
    // write left behind, and hit/miss counters match.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = MemoryStore::new(Some(TEST_DEFAULT_TTL));
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), Ttl::Default);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key).ok();
                    match &got {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                    prop_assert_eq!(got.as_ref(), model.get(&key), "Read mismatch for '{}'", key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Flush => {
                    store.flush();
                    model.clear();
                }
            }
            prop_assert_eq!(store.len(), model.len());
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
    }

    // Unset keys are never found.
    #[test]
    fn prop_unset_key_not_found(
        written in prop::collection::vec(valid_key_strategy(), 0..20),
        unset_key in valid_key_strategy()
    ) {
        prop_assume!(!written.contains(&unset_key));
        let mut store = MemoryStore::new(Some(TEST_DEFAULT_TTL));
        for key in written {
            store.set(key, "v".to_string(), Ttl::Default);
        }

        prop_assert!(store.get(&unset_key).unwrap_err().is_not_found());
    }

    // Delete always succeeds and leaves the key absent.
    #[test]
    fn prop_delete_removes_entry(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        present in any::<bool>()
    ) {
        let mut store = MemoryStore::new(Some(TEST_DEFAULT_TTL));
        if present {
            store.set(key.clone(), value, Ttl::Default);
        }

        prop_assert_eq!(store.delete(&key), present);
        prop_assert!(store.get(&key).is_err(), "Key should not exist after delete");
    }

    // Flush makes every previously written key absent.
    #[test]
    fn prop_flush_clears_everything(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..50)
    ) {
        let mut store = MemoryStore::new(Some(TEST_DEFAULT_TTL));
        for (key, value) in &entries {
            store.set(key.clone(), value.clone(), Ttl::Never);
        }

        store.flush();

        for (key, _) in &entries {
            prop_assert!(store.get(key).is_err());
        }
        prop_assert!(store.is_empty());
    }
}

// Simulated-time properties; the paused clock keeps these instant.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // An entry is readable strictly before its TTL elapses and never after,
    // however many times it is read.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_secs in ttl_secs_strategy(),
        reads_after in 1usize..5
    ) {
        paused_runtime().block_on(async {
            let mut store = MemoryStore::new(Some(TEST_DEFAULT_TTL));
            store.set(key.clone(), value.clone(), Ttl::seconds(ttl_secs));

            tokio::time::advance(Duration::from_secs(ttl_secs) - Duration::from_millis(1)).await;
            prop_assert_eq!(store.get(&key).unwrap(), value, "Value should live until TTL");

            tokio::time::advance(Duration::from_millis(1)).await;
            for _ in 0..reads_after {
                prop_assert!(store.get(&key).unwrap_err().is_not_found());
            }
            Ok(())
        })?;
    }

    // The sweep removes exactly the expired entries and nothing live.
    #[test]
    fn prop_sweep_never_evicts_live_entries(
        entries in prop::collection::hash_map(valid_key_strategy(), prop::option::of(ttl_secs_strategy()), 1..30),
        elapsed_secs in 0u64..3600
    ) {
        paused_runtime().block_on(async {
            let mut store = MemoryStore::new(None);
            for (key, ttl) in &entries {
                let ttl = ttl.map(Ttl::seconds).unwrap_or(Ttl::Never);
                store.set(key.clone(), "v".to_string(), ttl);
            }

            tokio::time::advance(Duration::from_secs(elapsed_secs)).await;
            let removed = store.cleanup_expired();

            let expected_live: Vec<&String> = entries
                .iter()
                .filter(|(_, ttl)| ttl.map_or(true, |t| t > elapsed_secs))
                .map(|(key, _)| key)
                .collect();

            prop_assert_eq!(removed, entries.len() - expected_live.len());
            prop_assert_eq!(store.len(), expected_live.len());
            for key in expected_live {
                prop_assert!(store.get(key).is_ok(), "Live key '{}' was evicted", key);
            }
            Ok(())
        })?;
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent writers to distinct keys through the trait object all land
    // and each reads back its own value.
    #[test]
    fn prop_concurrent_operation_correctness(
        entries in prop::collection::hash_map(valid_key_strategy(), valid_value_strategy(), 1..30)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache: Arc<dyn Cache> =
                Arc::new(InMemoryCache::new(&InMemoryConfig::new(5, 1)).unwrap());

            let mut handles = vec![];
            for (key, value) in entries.clone() {
                let cache = Arc::clone(&cache);
                handles.push(tokio::spawn(async move {
                    cache.set(&key, &value, Ttl::Default).await.unwrap();
                    let read = cache.get(&key).await.unwrap();
                    (key, read)
                }));
            }

            for handle in handles {
                let (key, read) = handle.await.expect("Task should not panic");
                prop_assert_eq!(&read, &entries[&key], "Task for '{}' read another value", key);
            }

            for (key, value) in &entries {
                prop_assert_eq!(&cache.get(key).await.unwrap(), value);
            }
            Ok(())
        })?;
    }
}

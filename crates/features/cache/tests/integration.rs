pub mod fixtures;

use candor_cache::{AnalysisCache, CacheConfig, CacheWarning, WriteStrategy, parse_analysis};
use candor_storage::{Compression, FileStore, KeyValueStore, MemoryStore, StorageKey};
use fixtures::{AlwaysLosingStore, BrokenStore, InterleavingStore, raw_response, record};
use std::num::NonZeroUsize;

fn cache_key() -> StorageKey {
    StorageKey::try_from("analysis_cache").unwrap()
}

#[tokio::test]
async fn lookup_is_normalized() {
    let cache = AnalysisCache::new(MemoryStore::new());
    let jane = record("Jane Doe", 7.0);

    let outcome = cache.store("Jane Doe", jane.clone()).await;
    assert!(outcome.is_persisted());
    assert_eq!(outcome.record, jane);

    assert_eq!(cache.lookup("  jane doe ").await, Some(jane.clone()));
    assert_eq!(cache.lookup("JANE DOE").await, Some(jane));
    assert_eq!(cache.lookup("John Doe").await, None);
}

#[tokio::test]
async fn overwrite_keeps_one_entry() {
    let cache = AnalysisCache::new(MemoryStore::new());

    cache.store("X", record("X", 2.0)).await;
    cache.store("  x", record("x", 9.0)).await;

    assert_eq!(cache.lookup("X").await, Some(record("x", 9.0)));
    assert_eq!(cache.list_known_subjects().await, ["x"]);
}

#[tokio::test]
async fn subjects_listed_in_store_order() {
    let cache = AnalysisCache::new(MemoryStore::new());

    for name in ["Zed", "Ada", "Mia"] {
        cache.store(name, record(name, 5.0)).await;
    }
    cache.store("zed", record("Zed", 6.0)).await;

    assert_eq!(cache.list_known_subjects().await, ["Ada", "Mia", "Zed"]);
}

#[tokio::test]
async fn empty_storage_is_empty_cache() {
    let cache = AnalysisCache::new(MemoryStore::new());

    assert!(cache.list_known_subjects().await.is_empty());
    assert_eq!(cache.lookup("anyone").await, None);
}

#[tokio::test]
async fn corrupt_mapping_is_cold_start() {
    let store = MemoryStore::new();
    let cache = AnalysisCache::new(store.clone());

    let garbage: [&[u8]; 3] = [b"\xff\xfe not json", b"[1,2,3]", br#"{"a": {"name": "A"}}"#];
    for garbage in garbage {
        store.set(&cache_key(), garbage).await.unwrap();
        assert_eq!(cache.lookup("a").await, None);
        assert!(cache.list_known_subjects().await.is_empty());
    }

    let outcome = cache.store("Fresh", record("Fresh", 1.0)).await;
    assert!(outcome.is_persisted());
    assert_eq!(cache.list_known_subjects().await, ["Fresh"]);
}

#[tokio::test]
async fn one_bad_entry_rejects_whole_mapping() {
    let store = MemoryStore::new();
    let cache = AnalysisCache::new(store.clone());
    cache.store("Good", record("Good", 4.0)).await;

    let mut mapping: serde_json::Value =
        serde_json::from_slice(&store.get(&cache_key()).await.unwrap().unwrap()).unwrap();
    let mut bad = mapping["good"].clone();
    bad["authenticity_analysis"]["alignment"]["score"] = serde_json::json!(11);
    mapping["bad"] = bad;
    store.set(&cache_key(), &serde_json::to_vec(&mapping).unwrap()).await.unwrap();

    assert_eq!(cache.lookup("good").await, None);
}

#[tokio::test]
async fn persisted_layout_uses_wire_names() {
    let store = MemoryStore::new();
    let cache = AnalysisCache::new(store.clone());
    cache.store("Jane Doe", record("Jane Doe", 3.0)).await;

    let raw = store.get(&cache_key()).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(value["jane doe"]["name"], "Jane Doe");
    assert_eq!(value["jane doe"]["authenticity_analysis"]["alignment"]["score"], 3.0);
    assert_eq!(value["jane doe"]["narrative_summary"], "Summary of Jane Doe.");
}

#[tokio::test]
async fn unreachable_storage_degrades() {
    let cache = AnalysisCache::new(BrokenStore);

    assert_eq!(cache.lookup("anyone").await, None);
    assert!(cache.list_known_subjects().await.is_empty());

    let outcome = cache.store("Jane", record("Jane", 5.0)).await;
    assert_eq!(outcome.record, record("Jane", 5.0));
    assert!(matches!(outcome.warning, Some(CacheWarning::StorageUnavailable { .. })));
}

#[tokio::test]
async fn quota_exceeded_is_a_warning() {
    let store = MemoryStore::with_quota(64);
    let cache = AnalysisCache::new(store.clone());

    let outcome = cache.store("Jane", record("Jane", 5.0)).await;
    assert!(matches!(outcome.warning, Some(CacheWarning::StorageUnavailable { .. })));
    assert_eq!(outcome.record.subject_name, "Jane");
    assert!(store.is_empty());
}

#[tokio::test]
async fn contention_is_reported_after_retries() {
    let config = CacheConfig { cas_retries: 2, ..CacheConfig::default() };
    let cache = AnalysisCache::with_config(AlwaysLosingStore::default(), config);

    let outcome = cache.store("Jane", record("Jane", 5.0)).await;
    assert_eq!(outcome.warning, Some(CacheWarning::Contention { attempts: 3 }));
}

#[tokio::test]
async fn last_write_wins_ignores_races() {
    let config =
        CacheConfig { write_strategy: WriteStrategy::LastWriteWins, ..CacheConfig::default() };
    let cache = AnalysisCache::with_config(AlwaysLosingStore::default(), config);

    let outcome = cache.store("Jane", record("Jane", 5.0)).await;
    assert!(outcome.is_persisted());
    assert_eq!(cache.lookup("jane").await, Some(record("Jane", 5.0)));
}

#[tokio::test]
async fn concurrent_stores_are_not_lost_with_swap() {
    let config = CacheConfig { cas_retries: 16, ..CacheConfig::default() };
    let cache = AnalysisCache::with_config(InterleavingStore::default(), config);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                let name = format!("Subject {i}");
                cache.store(&name, record(&name, 5.0)).await
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_persisted());
    }

    assert_eq!(cache.list_known_subjects().await.len(), 8);
}

#[tokio::test]
async fn concurrent_stores_can_be_lost_with_last_write_wins() {
    let config =
        CacheConfig { write_strategy: WriteStrategy::LastWriteWins, ..CacheConfig::default() };
    let cache = AnalysisCache::with_config(InterleavingStore::default(), config);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                let name = format!("Subject {i}");
                cache.store(&name, record(&name, 5.0)).await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert!(cache.list_known_subjects().await.len() < 8);
}

#[tokio::test]
async fn bounded_cache_evicts_oldest() {
    let config = CacheConfig { max_entries: NonZeroUsize::new(2), ..CacheConfig::default() };
    let cache = AnalysisCache::with_config(MemoryStore::new(), config);

    for name in ["A", "B", "C"] {
        cache.store(name, record(name, 5.0)).await;
    }

    assert_eq!(cache.list_known_subjects().await, ["B", "C"]);
    assert_eq!(cache.lookup("a").await, None);
}

#[tokio::test]
async fn survives_reopen_on_file_store() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("data");

    {
        let store = FileStore::builder().root(&root).connect().await.unwrap();
        let cache = AnalysisCache::new(store);
        cache.store("Grace Hopper", record("Grace Hopper", 8.0)).await;
        cache.store("Alan Turing", record("Alan Turing", 9.0)).await;
    }

    let store = FileStore::builder().root(&root).connect().await.unwrap();
    let cache = AnalysisCache::new(store);

    assert_eq!(cache.list_known_subjects().await, ["Grace Hopper", "Alan Turing"]);
    assert_eq!(cache.lookup("grace hopper").await, Some(record("Grace Hopper", 8.0)));
}

#[tokio::test]
async fn undecodable_storage_is_replaced_on_store() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("data");

    let plain = FileStore::builder().root(&root).connect().await.unwrap();
    plain.set(&cache_key(), b"{}").await.unwrap();

    let lz4 = || FileStore::builder().root(&root).compression(Compression::Lz4).connect();
    let cache = AnalysisCache::new(lz4().await.unwrap());
    assert!(cache.storage().get(&cache_key()).await.is_err(), "plain bytes do not decode as LZ4");
    assert!(cache.list_known_subjects().await.is_empty());

    let outcome = cache.store("Ada", record("Ada", 6.0)).await;
    assert!(outcome.is_persisted(), "{:?}", outcome.warning);
    assert!(cache.store("Grace", record("Grace", 7.0)).await.is_persisted());

    let reopened = AnalysisCache::new(lz4().await.unwrap());
    assert_eq!(reopened.list_known_subjects().await, ["Ada", "Grace"]);
}

#[tokio::test]
async fn parsed_response_is_cacheable() {
    let cache = AnalysisCache::new(MemoryStore::new());
    let parsed = parse_analysis(&raw_response("Ada Lovelace")).unwrap();

    assert_eq!(parsed.dimension_scores.alignment.evidence.len(), 2);
    cache.store(&parsed.subject_name.clone(), parsed.clone()).await;
    assert_eq!(cache.lookup("ada lovelace").await, Some(parsed));
}

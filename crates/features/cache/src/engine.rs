use crate::error::CacheWarning;
use crate::snapshot::CacheSnapshot;
use candor_domain::config::{CacheConfig, WriteStrategy};
use candor_domain::constants::ANALYSIS_CACHE_KEY;
use candor_domain::{AnalysisRecord, normalize_subject};
use candor_storage::{KeyValueStore, StorageError, StorageKey};
use tracing::{debug, warn};

const CACHE_KEY: StorageKey = StorageKey::from_static(ANALYSIS_CACHE_KEY);

/// Result of [`AnalysisCache::store`].
///
/// `record` is always the record that was passed in; `warning` is set when it could not be
/// made durable.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOutcome {
    pub record: AnalysisRecord,
    pub warning: Option<CacheWarning>,
}

impl StoreOutcome {
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }
}

/// A persisted, name-normalized cache of analyses on top of a [`KeyValueStore`].
///
/// The whole mapping lives under one storage key and is rewritten on every
/// [`store`](Self::store). Reads never fail: unreadable storage or a corrupt
/// mapping behave like an empty cache.
///
/// # Example
///
/// ```rust
/// use candor_cache::{AnalysisCache, parse_analysis};
/// use candor_storage::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = AnalysisCache::new(MemoryStore::new());
/// # let dim = r#"{"score": 7, "evidence": ["e"]}"#;
/// # let raw = format!(
/// #     r#"{{"name": "Jane Doe", "authenticity_analysis": {{"alignment": {dim},
/// #     "boundary_consistency": {dim}, "shadow_integration": {dim},
/// #     "ethical_string_influence": {dim}, "self_expression": {dim}}}}}"#
/// # );
/// let record = parse_analysis(&raw)?;
///
/// let outcome = cache.store("Jane Doe", record.clone()).await;
/// assert!(outcome.is_persisted());
/// assert_eq!(cache.lookup("  jane DOE ").await, Some(record));
/// assert_eq!(cache.list_known_subjects().await, ["Jane Doe"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisCache<S> {
    store: S,
    key: StorageKey,
    config: CacheConfig,
}

impl<S: KeyValueStore> AnalysisCache<S> {
    /// Creates a cache with the default configuration (unbounded, compare-and-swap writes).
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(store: S, config: CacheConfig) -> Self {
        Self { store, key: CACHE_KEY, config }
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.store
    }

    /// Returns a copy of the record cached for `subject_name`, matched case- and
    /// whitespace-insensitively.
    pub async fn lookup(&self, subject_name: &str) -> Option<AnalysisRecord> {
        let key = normalize_subject(subject_name);
        let record = self.load().await.0.get(&key).cloned();
        debug!(subject = %key, hit = record.is_some(), "Analysis cache lookup");
        record
    }

    /// Display names of every cached record, oldest stored first.
    pub async fn list_known_subjects(&self) -> Vec<String> {
        self.load().await.0.records().map(|r| r.subject_name.clone()).collect()
    }

    /// Caches `record` under the normalized `subject_name`, replacing any previous entry.
    ///
    /// Persistence problems never fail the call; they are reported in
    /// [`StoreOutcome::warning`].
    pub async fn store(&self, subject_name: &str, record: AnalysisRecord) -> StoreOutcome {
        let key = normalize_subject(subject_name);
        let warning = match self.config.write_strategy {
            WriteStrategy::LastWriteWins => self.store_overwrite(&key, &record).await,
            WriteStrategy::CompareAndSwap => self.store_swap(&key, &record).await,
        };

        if let Some(warning) = &warning {
            warn!(subject = %key, %warning, "Analysis not persisted");
        } else {
            debug!(subject = %key, "Analysis cached");
        }

        StoreOutcome { record, warning }
    }

    async fn store_overwrite(&self, key: &str, record: &AnalysisRecord) -> Option<CacheWarning> {
        let (snapshot, _) = self.load().await;
        let bytes = match self.updated(snapshot, key, record) {
            Ok(bytes) => bytes,
            Err(warning) => return Some(warning),
        };

        self.store.set(&self.key, &bytes).await.err().map(unavailable)
    }

    async fn store_swap(&self, key: &str, record: &AnalysisRecord) -> Option<CacheWarning> {
        let attempts = self.config.cas_retries.saturating_add(1);

        for attempt in 1..=attempts {
            let (snapshot, current) = match self.read().await {
                Ok(read) => read,
                Err(err) => return self.replace_unreadable(key, record, &err).await,
            };
            let bytes = match self.updated(snapshot, key, record) {
                Ok(bytes) => bytes,
                Err(warning) => return Some(warning),
            };

            match self.store.compare_and_swap(&self.key, current.as_deref(), &bytes).await {
                Ok(true) => return None,
                Ok(false) => debug!(attempt, "Analysis cache changed underneath, retrying"),
                Err(err) => return Some(unavailable(err)),
            }
        }

        Some(CacheWarning::Contention { attempts })
    }

    /// The stored bytes cannot be decoded (for example after a compression change), so there
    /// is nothing to swap against. Starts cold and overwrites them.
    async fn replace_unreadable(
        &self,
        key: &str,
        record: &AnalysisRecord,
        err: &StorageError,
    ) -> Option<CacheWarning> {
        warn!(key = %self.key, error = %err, "Analysis cache unreadable, replacing it");
        let bytes = match self.updated(CacheSnapshot::default(), key, record) {
            Ok(bytes) => bytes,
            Err(warning) => return Some(warning),
        };
        self.store.set(&self.key, &bytes).await.err().map(unavailable)
    }

    fn updated(
        &self,
        mut snapshot: CacheSnapshot,
        key: &str,
        record: &AnalysisRecord,
    ) -> Result<Vec<u8>, CacheWarning> {
        snapshot.upsert(key.to_owned(), record.clone());
        if let Some(max) = self.config.max_entries {
            let evicted = snapshot.evict_to(max);
            if evicted > 0 {
                debug!(evicted, max = max.get(), "Evicted oldest analyses");
            }
        }

        snapshot
            .to_vec()
            .map_err(|e| CacheWarning::StorageUnavailable { reason: e.to_string() })
    }

    /// Current snapshot (empty on any failure) and the raw bytes it came from.
    async fn load(&self) -> (CacheSnapshot, Option<Vec<u8>>) {
        match self.read().await {
            Ok(read) => read,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Analysis cache unreadable, starting cold");
                (CacheSnapshot::default(), None)
            },
        }
    }

    async fn read(&self) -> Result<(CacheSnapshot, Option<Vec<u8>>), StorageError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok((CacheSnapshot::default(), None));
        };

        let snapshot = CacheSnapshot::from_slice(&raw).unwrap_or_else(|err| {
            warn!(key = %self.key, error = %err, "Analysis cache is malformed, starting cold");
            CacheSnapshot::default()
        });

        Ok((snapshot, Some(raw)))
    }
}

fn unavailable(err: StorageError) -> CacheWarning {
    CacheWarning::StorageUnavailable { reason: err.to_string() }
}

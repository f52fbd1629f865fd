use candor_domain::{AnalysisRecord, AuthenticityScores, DimensionScore, Score};
use candor_storage::{KeyValueStore, MemoryStore, StorageError, StorageKey};

/// A structurally valid record with every dimension scored `score`.
/// # Panics
/// * If `score` is outside `[0, 10]`.
#[must_use]
pub fn record(name: &str, score: f64) -> AnalysisRecord {
    let dim = || DimensionScore {
        score: Score::try_from(score).expect("score in range"),
        evidence: vec![format!("{name} evidence")],
    };
    AnalysisRecord {
        subject_name: name.to_owned(),
        dimension_scores: AuthenticityScores {
            alignment: dim(),
            boundary_consistency: dim(),
            shadow_integration: dim(),
            ethical_string_influence: dim(),
            self_expression: dim(),
        },
        narrative_summary: format!("Summary of {name}."),
    }
}

/// Raw AI service output for `name`.
#[must_use]
pub fn raw_response(name: &str) -> String {
    let dim = r#"{"score": 6, "evidence": ["quoted interview", "voting record"]}"#;
    format!(
        r#"{{"name": "{name}", "authenticity_analysis": {{"alignment": {dim}, "boundary_consistency": {dim}, "shadow_integration": {dim}, "ethical_string_influence": {dim}, "self_expression": {dim}}}, "narrative_summary": "Steady."}}"#
    )
}

/// Yields to the scheduler before every read so that concurrent read-modify-write
/// sequences interleave deterministically on a current-thread runtime.
#[derive(Debug, Clone, Default)]
pub struct InterleavingStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for InterleavingStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self.inner.get(key).await;
        tokio::task::yield_now().await;
        value
    }

    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn compare_and_swap(
        &self,
        key: &StorageKey,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, StorageError> {
        self.inner.compare_and_swap(key, expected, new).await
    }
}

/// Every swap loses the race.
#[derive(Debug, Clone, Default)]
pub struct AlwaysLosingStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for AlwaysLosingStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn compare_and_swap(
        &self,
        _key: &StorageKey,
        _expected: Option<&[u8]>,
        _new: &[u8],
    ) -> Result<bool, StorageError> {
        Ok(false)
    }
}

/// Storage that is never reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenStore;

fn broken() -> StorageError {
    StorageError::Io {
        source: std::io::Error::other("storage offline"),
        context: Some("BrokenStore".into()),
    }
}

impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        Err(broken())
    }

    async fn set(&self, _key: &StorageKey, _value: &[u8]) -> Result<(), StorageError> {
        Err(broken())
    }

    async fn remove(&self, _key: &StorageKey) -> Result<(), StorageError> {
        Err(broken())
    }

    async fn compare_and_swap(
        &self,
        _key: &StorageKey,
        _expected: Option<&[u8]>,
        _new: &[u8],
    ) -> Result<bool, StorageError> {
        Err(broken())
    }
}

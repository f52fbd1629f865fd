use crate::error::StorageError;
use crate::key::StorageKey;
use crate::provider::KeyValueStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<StorageKey, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryState {
    fn used_without(&self, key: &StorageKey) -> usize {
        self.values.iter().filter(|(k, _)| *k != key).map(|(k, v)| k.as_str().len() + v.len()).sum()
    }

    fn put(&mut self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.as_str().len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    message: format!("{needed} bytes needed, quota is {quota}").into(),
                    context: Some(key.to_string().into()),
                });
            }
        }
        self.values.insert(key.clone(), value.to_vec());
        Ok(())
    }
}

/// An in-process key-value store.
///
/// Clones share the same map. An optional byte quota mimics the hard limits of
/// browser-style local storage: a write that would push the total size (keys plus values)
/// over the quota fails with [`StorageError::QuotaExceeded`] and leaves the old value intact.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self { state: Arc::new(Mutex::new(MemoryState { quota: Some(bytes), ..Default::default() })) }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.state.lock().values.get(key).cloned())
    }

    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        self.state.lock().put(key, value)
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.state.lock().values.remove(key);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &StorageKey,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, StorageError> {
        let mut state = self.state.lock();
        if state.values.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        state.put(key, new)?;
        Ok(true)
    }
}

use crate::error::StorageError;
use crate::key::StorageKey;
use std::future::Future;

/// A key-value byte-string store.
///
/// This is the only persistence seam the core components depend on. Implementations must
/// make [`KeyValueStore::compare_and_swap`] atomic with respect to every other call made
/// through the same handle (and its clones); cross-process atomicity is not required.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` if the key has never been written or was removed.
    fn get(
        &self,
        key: &StorageKey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Replaces the value stored under `key`.
    fn set(
        &self,
        key: &StorageKey,
        value: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes the value stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &StorageKey) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Writes `new` only if the current value equals `expected`.
    ///
    /// `expected = None` means "the key must be absent". Returns `Ok(false)` without writing
    /// when the current value differs.
    fn compare_and_swap(
        &self,
        key: &StorageKey,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;
}

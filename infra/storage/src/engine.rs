//! Directory-backed [`KeyValueStore`].
//!
//! Each key is one file, `<root>/<key>.bin`. A write lands in a uniquely named sibling temp
//! file, is synced, then renamed over the target, so readers see either the old or the new
//! value. All mutations through a handle and its clones take one async mutex, which makes
//! [`KeyValueStore::compare_and_swap`] atomic for this process.

use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::key::StorageKey;
use crate::maintenance::{self, TMP_MARKER};
use crate::provider::KeyValueStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const VALUE_EXTENSION: &str = "bin";

/// On-disk encoding of values.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    /// LZ4 block with the uncompressed length prepended.
    Lz4,
}

impl Compression {
    fn encode(self, value: &[u8]) -> Vec<u8> {
        match self {
            Self::None => value.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(value),
        }
    }

    fn decode(self, stored: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(stored),
            Self::Lz4 => lz4_flex::decompress_size_prepended(&stored).context("stored value is not LZ4"),
        }
    }
}

#[derive(Debug)]
struct Shared {
    root: PathBuf,
    compression: Compression,
    next_tmp: AtomicU64,
    writer: Mutex<()>,
}

/// Handle to a directory of value files. Cheap to clone; clones share the write lock.
///
/// ```rust
/// use candor_storage::{Compression, FileStore, KeyValueStore, StorageError, StorageKey};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let store = FileStore::builder()
///         .root(tmp.path().join("data"))
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     let key = StorageKey::try_from("analysis_cache")?;
///     store.set(&key, b"{}").await?;
///     assert_eq!(store.get(&key).await?.as_deref(), Some(b"{}".as_slice()));
///
///     assert!(!store.compare_and_swap(&key, None, b"[]").await?);
///     assert!(store.compare_and_swap(&key, Some(b"{}"), b"[]").await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    shared: Arc<Shared>,
}

impl FileStore {
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    pub(crate) fn from_parts(root: PathBuf, compression: Compression) -> Self {
        let shared = Shared { root, compression, next_tmp: AtomicU64::new(1), writer: Mutex::new(()) };
        Self { shared: Arc::new(shared) }
    }

    /// Canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.shared.root
    }

    /// File backing `key`. Always inside [`root`](Self::root), since keys are `[a-z0-9_]`.
    #[must_use]
    pub fn path_of(&self, key: &StorageKey) -> PathBuf {
        self.shared.root.join(format!("{key}.{VALUE_EXTENSION}"))
    }

    /// Deletes temp files left over by interrupted writes, skipping anything younger than
    /// five minutes.
    pub async fn purge_tmp(&self) -> usize {
        self.purge_tmp_older_than(maintenance::DEFAULT_STALE_AFTER).await
    }

    pub(crate) async fn purge_tmp_older_than(&self, stale_after: Duration) -> usize {
        let root = self.shared.root.clone();
        let now = SystemTime::now();
        match tokio::task::spawn_blocking(move || maintenance::sweep(&root, now, stale_after)).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "Temp file sweep did not finish");
                0
            },
        }
    }

    async fn load(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_of(key);
        match fs::read(&path).await {
            Ok(stored) => self.shared.compression.decode(stored).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_failure(err, format!("reading {}", path.display()))),
        }
    }

    /// Caller holds `writer`.
    async fn persist(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        let target = self.path_of(key);
        let n = self.shared.next_tmp.fetch_add(1, Ordering::Relaxed);
        let tmp = target.with_file_name(format!("{key}.{VALUE_EXTENSION}{TMP_MARKER}{n}"));
        let encoded = self.shared.compression.encode(value);

        let written = swap_in(&tmp, &target, &encoded).await;
        if written.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        written.context(format!("replacing {}", target.display()))?;
        sync_dir(&self.shared.root).await;

        debug!(key = %key, bytes = value.len(), stored = encoded.len(), "Value written");
        Ok(())
    }
}

/// Writes `bytes` to `tmp`, syncs it, and renames it onto `target`.
async fn swap_in(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, target).await
}

fn io_failure(source: std::io::Error, context: String) -> StorageError {
    StorageError::Io { source, context: Some(context.into()) }
}

async fn sync_dir(dir: &Path) {
    let synced = match fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(err) => Err(err),
    };
    if let Err(err) = synced {
        warn!(path = %dir.display(), error = %err, "Directory sync failed");
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        self.load(key).await
    }

    async fn set(&self, key: &StorageKey, value: &[u8]) -> Result<(), StorageError> {
        let _writer = self.shared.writer.lock().await;
        self.persist(key, value).await
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), StorageError> {
        let _writer = self.shared.writer.lock().await;
        let path = self.path_of(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Value removed");
                Ok(())
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_failure(err, format!("removing {}", path.display()))),
        }
    }

    async fn compare_and_swap(
        &self,
        key: &StorageKey,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, StorageError> {
        let _writer = self.shared.writer.lock().await;
        if self.load(key).await?.as_deref() != expected {
            debug!(key = %key, "Compare-and-swap lost, value changed");
            return Ok(false);
        }
        self.persist(key, new).await?;
        Ok(true)
    }
}

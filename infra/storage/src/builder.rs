use crate::engine::{Compression, FileStore};
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::DEFAULT_STALE_AFTER;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// Builder state until [`FileStoreBuilder::root`] is called.
#[derive(Debug, Default)]
pub struct NoRoot;

/// Builder state holding the directory the store will live in.
#[derive(Debug)]
pub struct WithRoot(PathBuf);

/// Configures a [`FileStore`]. Only a builder with a root can [`connect`](FileStoreBuilder::connect).
#[must_use = "the store is not opened until .connect() is awaited"]
#[derive(Debug)]
pub struct FileStoreBuilder<R = NoRoot> {
    root: R,
    compression: Compression,
    create: bool,
    stale_after: Duration,
}

impl Default for FileStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStoreBuilder {
    pub const fn new() -> Self {
        Self { root: NoRoot, compression: Compression::None, create: true, stale_after: DEFAULT_STALE_AFTER }
    }

    pub fn root(self, path: impl Into<PathBuf>) -> FileStoreBuilder<WithRoot> {
        FileStoreBuilder {
            root: WithRoot(path.into()),
            compression: self.compression,
            create: self.create,
            stale_after: self.stale_after,
        }
    }
}

impl<R> FileStoreBuilder<R> {
    /// Compression applied to new writes. Existing files must have been written with the same setting.
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Whether a missing root directory is created on connect (default `true`).
    pub const fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Minimum age before a leftover temp file is deleted on connect (default five minutes).
    pub const fn stale_after(mut self, age: Duration) -> Self {
        self.stale_after = age;
        self
    }
}

impl FileStoreBuilder<WithRoot> {
    /// Opens the store, removing temp files orphaned by interrupted writes.
    ///
    /// # Errors
    /// [`StorageError::Io`] when the root is missing (and `create` is off), cannot be created,
    /// or cannot be resolved to a canonical path.
    pub async fn connect(self) -> Result<FileStore, StorageError> {
        let requested = self.root.0;

        if self.create {
            fs::create_dir_all(&requested)
                .await
                .context(format!("creating storage root {}", requested.display()))?;
        }
        let root = fs::canonicalize(&requested)
            .await
            .context(format!("resolving storage root {}", requested.display()))?;

        let store = FileStore::from_parts(root, self.compression);
        let removed = store.purge_tmp_older_than(self.stale_after).await;
        if removed > 0 {
            debug!(removed, "Removed orphaned temp files");
        }

        info!(root = %store.root().display(), compression = ?self.compression, "File store ready");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_survive_setting_the_root() {
        let builder = FileStoreBuilder::new()
            .compression(Compression::Lz4)
            .create(false)
            .stale_after(Duration::from_secs(1))
            .root("/srv/candor");

        assert_eq!(builder.compression, Compression::Lz4);
        assert!(!builder.create);
        assert_eq!(builder.stale_after, Duration::from_secs(1));
        assert_eq!(builder.root.0, PathBuf::from("/srv/candor"));
    }
}

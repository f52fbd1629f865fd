use serde::Deserialize;
use std::num::NonZeroUsize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the core components.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfigInner {
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub vault: VaultConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct CoreConfig {
    #[serde(flatten, default)]
    inner: Arc<CoreConfigInner>,
}

impl Deref for CoreConfig {
    type Target = CoreConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for CoreConfig {
    fn deref_mut(&mut self) -> &mut CoreConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionKind {
    #[default]
    None,
    Lz4,
}

/// Where persisted values live on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub compression: CompressionKind,
    /// Create `data_dir` when it does not exist.
    pub create: bool,
}

/// How the cache persists its mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStrategy {
    /// Read, modify, then swap only if nobody wrote in between.
    #[default]
    CompareAndSwap,
    /// Plain overwrite; a concurrent store can be lost.
    LastWriteWins,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on cached subjects; unbounded when unset.
    pub max_entries: Option<NonZeroUsize>,
    pub write_strategy: WriteStrategy,
    pub cas_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// PBKDF2 work factor.
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), compression: CompressionKind::None, create: true }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: None, write_strategy: WriteStrategy::CompareAndSwap, cas_retries: 3 }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self { iterations: 100_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}

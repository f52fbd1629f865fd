//! Facade crate for the Candor core.
//! Re-exports domain/kernel primitives and composes the components from a [`CoreConfig`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load a [`CoreConfig`] with [`kernel::config::load_core_config`].
//! - Call [`Candor::open`] to get a cache and a profile store sharing one file store.

use candor_cache::AnalysisCache;
use candor_domain::config::{CompressionKind, CoreConfig};
use candor_profile::ProfileStore;
use candor_storage::{Compression, FileStore, StorageError};
use candor_vault::{Vault, VaultError};
use std::borrow::Cow;
use tracing::info;

pub use candor_cache as cache;
pub use candor_domain as domain;
pub use candor_kernel as kernel;
pub use candor_profile as profile;
pub use candor_storage as storage;
pub use candor_vault as vault;

/// Failure to bring the components up.
#[candor_derive::candor_error]
pub enum BootstrapError {
    #[error("Storage bootstrap failed{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Vault bootstrap failed{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },
}

/// The composed core: one analysis cache and one profile store over the same file store.
#[derive(Debug, Clone)]
pub struct Candor {
    pub cache: AnalysisCache<FileStore>,
    pub profiles: ProfileStore<FileStore>,
    config: CoreConfig,
}

impl Candor {
    /// Opens the file store at `storage.data_dir` and wires the components to it.
    ///
    /// # Errors
    /// * [`BootstrapError::Storage`] If the data directory cannot be opened.
    /// * [`BootstrapError::Vault`] If `vault.iterations` is zero.
    pub async fn open(config: &CoreConfig) -> Result<Self, BootstrapError> {
        let vault = Vault::builder()
            .iterations(config.vault.iterations)
            .build()
            .context("vault.iterations")?;

        let store = FileStore::builder()
            .root(&config.storage.data_dir)
            .compression(compression(config.storage.compression))
            .create(config.storage.create)
            .connect()
            .await
            .context("storage.data_dir")?;

        info!(
            root = %store.root().display(),
            iterations = vault.iterations(),
            "Candor core ready"
        );

        Ok(Self {
            cache: AnalysisCache::with_config(store.clone(), config.cache.clone()),
            profiles: ProfileStore::with_vault(store, vault),
            config: config.clone(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }
}

const fn compression(kind: CompressionKind) -> Compression {
    match kind {
        CompressionKind::None => Compression::None,
        CompressionKind::Lz4 => Compression::Lz4,
    }
}

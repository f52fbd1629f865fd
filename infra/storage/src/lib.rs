//! Key-value storage providers for locally persisted state.
//!
//! The core components never touch the filesystem directly. They depend on the
//! [`KeyValueStore`] trait (`get` / `set` / `remove` / `compare_and_swap` over byte strings),
//! and the application picks an implementation:
//!
//! - **[`FileStore`]**: one file per key under a root directory, written with the
//!   "atomic swap" pattern (unique temp write + `fsync` + `rename`), optional LZ4
//!   compression, and self-healing cleanup of orphaned temp files on connect.
//! - **[`MemoryStore`]**: an in-process map with an optional byte quota, used by tests and
//!   for ephemeral sessions.
//!
//! Keys are [`StorageKey`]s: lower-case ASCII alphanumerics and underscores only.
//!
//! # Examples
//!
//! ```rust
//! use candor_storage::{KeyValueStore, MemoryStore, StorageError, StorageKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     let store = MemoryStore::new();
//!     let key = StorageKey::try_from("user_profile_encrypted")?;
//!
//!     assert_eq!(store.get(&key).await?, None);
//!     store.set(&key, b"sealed").await?;
//!     store.remove(&key).await?;
//!     store.remove(&key).await?; // removing twice is fine
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod key;
mod maintenance;
mod memory;
mod provider;

pub use builder::{FileStoreBuilder, NoRoot, WithRoot};
pub use engine::{Compression, FileStore};
pub use error::{StorageError, StorageErrorExt};
pub use key::StorageKey;
pub use memory::MemoryStore;
pub use provider::KeyValueStore;

//! # Analysis Cache
//!
//! Makes repeated authenticity analyses idempotent and cheap. Subjects are keyed by their
//! normalized name (trimmed, lower-cased), so `"Jane Doe"` and `"  jane doe "` share one
//! entry. The whole mapping is one JSON object stored under `analysis_cache` in an injected
//! [`KeyValueStore`](candor_storage::KeyValueStore).
//!
//! ## Failure Model
//!
//! * **Reads degrade**: unreadable storage or a malformed mapping behaves as an empty cache
//!   and is logged at `warn`. One invalid entry invalidates the whole mapping.
//! * **Writes warn**: [`AnalysisCache::store`] always hands the record back inside a
//!   [`StoreOutcome`]; storage failures and lost write races become a [`CacheWarning`].
//!
//! ## Concurrency
//!
//! Every store is a read-modify-write of the full mapping. With the default
//! [`WriteStrategy::CompareAndSwap`](candor_domain::config::WriteStrategy) the write only lands
//! if the mapping is unchanged since it was read, retried up to `cas_retries` times, so
//! concurrent stores through one store handle never lose each other's entries.

mod engine;
mod error;
mod parse;
pub mod snapshot;

pub use crate::engine::{AnalysisCache, StoreOutcome};
pub use crate::error::{CacheError, CacheErrorExt, CacheWarning};
pub use crate::parse::parse_analysis;
pub use candor_domain::config::{CacheConfig, WriteStrategy};

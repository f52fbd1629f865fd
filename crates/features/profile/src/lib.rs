//! # Profile Store
//!
//! Keeps the user's self-assessment profile encrypted at rest. The profile is sealed by
//! [`candor_vault`] and persisted as one JSON envelope under `user_profile_encrypted`:
//!
//! ```text
//! { "ciphertext": "...", "iv": "...", "salt": "..." }
//! ```
//!
//! The plaintext is only ever returned to the caller of [`ProfileStore::unlock`]; it is
//! neither cached nor logged.

mod error;
mod store;

pub use crate::error::{ProfileError, ProfileErrorExt};
pub use crate::store::{ProfileStatus, ProfileStore};

use crate::error::{ProfileError, ProfileErrorExt};
use candor_domain::constants::PROFILE_KEY;
use candor_storage::{KeyValueStore, StorageKey};
use candor_vault::{EncryptedBlob, Vault};
use tracing::{debug, info};

const ENVELOPE_KEY: StorageKey = StorageKey::from_static(PROFILE_KEY);

/// Whether an encrypted profile is currently persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    NoSavedProfile,
    Saved,
}

/// The encrypted self-assessment profile.
///
/// Lifecycle: `NoSavedProfile` → [`save`](Self::save) → `Saved`. While saved,
/// [`unlock`](Self::unlock) either returns the plaintext or fails without changing
/// anything; [`clear`](Self::clear) returns to `NoSavedProfile`. Re-saving replaces the
/// envelope wholesale under a fresh salt and nonce.
///
/// # Example
///
/// ```rust
/// use candor_profile::{ProfileStatus, ProfileStore};
/// use candor_storage::MemoryStore;
/// use candor_vault::Vault;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), candor_profile::ProfileError> {
/// let vault = Vault::builder().iterations(1_000).build()?;
/// let profiles = ProfileStore::with_vault(MemoryStore::new(), vault);
///
/// profiles.save("I value honesty over harmony.", "hunter2").await?;
/// assert_eq!(profiles.status().await?, ProfileStatus::Saved);
/// assert_eq!(profiles.unlock("hunter2").await?, "I value honesty over harmony.");
///
/// profiles.clear().await?;
/// assert_eq!(profiles.status().await?, ProfileStatus::NoSavedProfile);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore<S> {
    store: S,
    vault: Vault,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Creates a profile store sealing with the default work factor.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_vault(store, Vault::default())
    }

    #[must_use]
    pub const fn with_vault(store: S, vault: Vault) -> Self {
        Self { store, vault }
    }

    #[must_use]
    pub const fn vault(&self) -> &Vault {
        &self.vault
    }

    /// # Errors
    /// Returns [`ProfileError::StorageUnavailable`] if the store cannot be read.
    pub async fn status(&self) -> Result<ProfileStatus, ProfileError> {
        let stored = self.store.get(&ENVELOPE_KEY).await.context("Read profile envelope")?;
        Ok(if stored.is_some() { ProfileStatus::Saved } else { ProfileStatus::NoSavedProfile })
    }

    /// Encrypts `profile` under `passphrase` and persists it, replacing any saved profile.
    ///
    /// # Errors
    /// * [`ProfileError::InvalidInput`] If the profile or the passphrase is empty.
    /// * [`ProfileError::Seal`] If encryption fails.
    /// * [`ProfileError::StorageUnavailable`] If the envelope cannot be written.
    pub async fn save(&self, profile: &str, passphrase: &str) -> Result<(), ProfileError> {
        if profile.is_empty() {
            return Err(ProfileError::InvalidInput {
                message: "Profile cannot be empty".into(),
                context: None,
            });
        }
        require_passphrase(passphrase)?;

        let envelope = self.vault.encrypt(profile, passphrase)?.to_json()?;
        self.store
            .set(&ENVELOPE_KEY, envelope.as_bytes())
            .await
            .context("Write profile envelope")?;

        info!(bytes = profile.len(), "Profile saved");
        Ok(())
    }

    /// Decrypts the saved profile.
    ///
    /// A failed unlock leaves the saved profile untouched.
    ///
    /// # Errors
    /// * [`ProfileError::InvalidInput`] If the passphrase is empty.
    /// * [`ProfileError::NotFound`] If no profile is saved.
    /// * [`ProfileError::Authentication`] If the passphrase is wrong or the envelope is damaged.
    /// * [`ProfileError::StorageUnavailable`] If the store cannot be read.
    pub async fn unlock(&self, passphrase: &str) -> Result<String, ProfileError> {
        require_passphrase(passphrase)?;

        let Some(raw) = self.store.get(&ENVELOPE_KEY).await.context("Read profile envelope")?
        else {
            return Err(ProfileError::NotFound {
                message: "Save a profile before unlocking it".into(),
                context: None,
            });
        };

        let profile = EncryptedBlob::from_slice(&raw)
            .and_then(|blob| self.vault.decrypt(&blob, passphrase))
            .map_err(|_| {
                debug!("Profile unlock rejected");
                ProfileError::authentication()
            })?;

        info!("Profile unlocked");
        Ok(profile)
    }

    /// Deletes the saved profile. Clearing when nothing is saved succeeds.
    ///
    /// # Errors
    /// Returns [`ProfileError::StorageUnavailable`] if the envelope cannot be removed.
    pub async fn clear(&self) -> Result<(), ProfileError> {
        self.store.remove(&ENVELOPE_KEY).await.context("Remove profile envelope")?;
        info!("Profile cleared");
        Ok(())
    }
}

fn require_passphrase(passphrase: &str) -> Result<(), ProfileError> {
    if passphrase.is_empty() {
        return Err(ProfileError::InvalidInput {
            message: "Passphrase cannot be empty".into(),
            context: None,
        });
    }
    Ok(())
}

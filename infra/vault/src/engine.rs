use aead::inout::InOutBuf;
use aead::{AeadInOut, KeyInit, Nonce};
use aes_gcm::Aes256Gcm;
use getrandom::fill;
use std::num::NonZeroU32;
use zeroize::Zeroize;

use crate::builder::VaultBuilder;
use crate::envelope::{EncryptedBlob, NONCE_LEN, TAG_LEN};
use crate::error::VaultError;
use crate::kdf::{self, DerivedKey, PBKDF2_ITERATIONS, SALT_LEN};

/// Seals one UTF-8 secret under a passphrase.
///
/// Every [`Vault::encrypt`] call draws a fresh salt and nonce from the OS CSPRNG and
/// derives a fresh key, so two encryptions of the same plaintext never share a
/// ciphertext. Nothing is cached between calls; the vault only carries its work factor.
///
/// ### Example
/// ```rust
/// use candor_vault::{Vault, VaultError};
///
/// # fn main() -> Result<(), VaultError> {
/// let vault = Vault::builder().iterations(1_000).build()?;
///
/// let blob = vault.encrypt("You likely value consistency over comfort.", "correct horse")?;
/// let restored = vault.decrypt(&blob, "correct horse")?;
/// assert_eq!(restored, "You likely value consistency over comfort.");
///
/// assert!(vault.decrypt(&blob, "wrong").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vault {
    pub(crate) iterations: NonZeroU32,
}

const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(iterations) => iterations,
    None => panic!("PBKDF2_ITERATIONS must be non-zero"),
};

impl Default for Vault {
    fn default() -> Self {
        Self { iterations: DEFAULT_ITERATIONS }
    }
}

impl Vault {
    /// Returns a new [`VaultBuilder`] to configure the vault.
    #[must_use]
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    /// PBKDF2 work factor used by this vault.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Derives the key for `salt` using this vault's work factor.
    #[must_use]
    pub fn derive_key(&self, passphrase: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
        kdf::derive_key_with(passphrase, salt, self.iterations.get())
    }

    /// Encrypts `plaintext` under `passphrase`.
    ///
    /// An empty plaintext is valid and produces a tag-only ciphertext.
    ///
    /// # Errors
    /// * [`VaultError::Entropy`] If the OS random source is unavailable.
    /// * [`VaultError::Encryption`] If the AEAD encryption fails.
    pub fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<EncryptedBlob, VaultError> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        fill(&mut salt).map_err(entropy_error)?;
        fill(&mut nonce).map_err(entropy_error)?;

        let key = self.derive_key(passphrase, &salt);
        let cipher = cipher_for(&key)?;
        let ciphertext = encrypt_internal(&cipher, &nonce, plaintext.as_bytes())?;

        tracing::debug!(bytes = plaintext.len(), iterations = self.iterations(), "Secret sealed");
        Ok(EncryptedBlob { ciphertext, nonce, salt })
    }

    /// Decrypts `blob` with `passphrase`.
    ///
    /// Any failure (wrong passphrase, tampered bytes, truncated ciphertext or a
    /// plaintext that is not UTF-8) surfaces as the same [`VaultError::Authentication`].
    ///
    /// # Errors
    /// Returns [`VaultError::Authentication`] if the blob cannot be opened.
    pub fn decrypt(&self, blob: &EncryptedBlob, passphrase: &str) -> Result<String, VaultError> {
        let key = self.derive_key(passphrase, &blob.salt);
        let cipher = cipher_for(&key)?;
        let plaintext = decrypt_internal(&cipher, &blob.nonce, &blob.ciphertext)?;

        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            VaultError::authentication()
        })
    }
}

fn entropy_error(err: getrandom::Error) -> VaultError {
    VaultError::Entropy { message: err.to_string().into(), context: Some("OS CSPRNG".into()) }
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm, VaultError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::InvalidConfiguration {
        message: "Derived key has the wrong length".into(),
        context: None,
    })
}

fn encrypt_internal(
    cipher: &Aes256Gcm,
    nonce: &[u8; NONCE_LEN],
    data: &[u8],
) -> Result<Vec<u8>, VaultError> {
    let nonce = Nonce::<Aes256Gcm>::from(*nonce);

    let mut buf = Vec::with_capacity(data.len() + TAG_LEN);
    buf.extend_from_slice(data);

    let tag = cipher
        .encrypt_inout_detached(&nonce, b"", InOutBuf::from(buf.as_mut_slice()))
        .map_err(|_| VaultError::Encryption {
            message: "Encryption failed".into(),
            context: Some("AEAD encryption failed".into()),
        })?;

    buf.extend_from_slice(tag.as_slice());
    Ok(buf)
}

fn decrypt_internal(
    cipher: &Aes256Gcm,
    nonce: &[u8; NONCE_LEN],
    blob: &[u8],
) -> Result<Vec<u8>, VaultError> {
    let Some(split) = blob.len().checked_sub(TAG_LEN) else {
        tracing::debug!(bytes = blob.len(), "Ciphertext shorter than the tag");
        return Err(VaultError::authentication());
    };

    let (ciphertext, tag_slice) = blob.split_at(split);
    let nonce = Nonce::<Aes256Gcm>::from(*nonce);
    let tag = tag_slice.try_into().map_err(|_| VaultError::authentication())?;

    let mut buf = ciphertext.to_vec();
    let in_out = InOutBuf::from(&mut buf[..]);

    if cipher.decrypt_inout_detached(&nonce, b"", in_out, &tag).is_err() {
        // The keystream has already been applied; never leave it behind.
        buf.zeroize();
        tracing::debug!("AEAD tag mismatch");
        return Err(VaultError::authentication());
    }

    Ok(buf)
}

//! A passphrase vault for a single secret.
//!
//! The vault stretches a passphrase into an AES-256 key with PBKDF2-HMAC-SHA256 and
//! seals a UTF-8 string with AES-256-GCM. The result is an [`EncryptedBlob`] carrying
//! the ciphertext, the nonce (`iv`) and the salt, all base64 encoded when serialized.
//!
//! ## Wire layout
//!
//! ```text
//! { "ciphertext": b64(CIPHERTEXT(N) || TAG(16)), "iv": b64(NONCE(12)), "salt": b64(SALT(16)) }
//! ```
//!
//! This is byte-compatible with WebCrypto's `AES-GCM` output, and PBKDF2 uses the
//! UTF-8 bytes of the passphrase with no normalization.
//!
//! ## Nonces
//!
//! Each envelope uses its own random salt, hence its own key, plus a random 96-bit
//! nonce. Nonce reuse under one key would need two envelopes with the same salt.
//!
//! ## Failures
//!
//! A wrong passphrase, a tampered envelope, a truncated ciphertext and a malformed
//! JSON document all produce the same [`VaultError::Authentication`]. Callers cannot
//! and should not try to distinguish them.
//!
//! ```rust
//! use candor_vault::{EncryptedBlob, Vault, VaultError};
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = Vault::builder().iterations(1_000).build()?;
//! let blob = vault.encrypt("my secret", "passphrase")?;
//!
//! let json = blob.to_json()?;
//! let parsed = EncryptedBlob::from_json(&json)?;
//! assert_eq!(vault.decrypt(&parsed, "passphrase")?, "my secret");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod envelope;
mod error;
mod kdf;

pub use builder::VaultBuilder;
pub use engine::Vault;
pub use envelope::{EncryptedBlob, NONCE_LEN, TAG_LEN};
pub use error::{AUTHENTICATION_MESSAGE, VaultError, VaultErrorExt};
pub use kdf::{DerivedKey, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN, derive_key, derive_key_with};

/// Encrypts `plaintext` with the default work factor.
///
/// # Errors
/// See [`Vault::encrypt`].
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<EncryptedBlob, VaultError> {
    Vault::default().encrypt(plaintext, passphrase)
}

/// Decrypts `blob` with the default work factor.
///
/// # Errors
/// See [`Vault::decrypt`].
pub fn decrypt(blob: &EncryptedBlob, passphrase: &str) -> Result<String, VaultError> {
    Vault::default().decrypt(blob, passphrase)
}

pub mod prelude {
    pub use crate::engine::Vault;
    pub use crate::envelope::EncryptedBlob;
    pub use crate::error::{VaultError, VaultErrorExt};
}

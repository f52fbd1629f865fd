//! Passphrase stretching with PBKDF2-HMAC-SHA256.

use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes (128-bit).
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 work factor.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A 256-bit AES key derived from a passphrase.
///
/// The key bytes are wiped when the value is dropped and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Stretches `passphrase` into an AES-256 key using the default work factor.
///
/// Deterministic: the same passphrase and salt always yield the same key.
/// The passphrase is taken as its UTF-8 bytes, unnormalized.
#[must_use]
pub fn derive_key(passphrase: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    derive_key_with(passphrase, salt, PBKDF2_ITERATIONS)
}

/// Like [`derive_key`], with an explicit iteration count.
#[must_use]
pub fn derive_key_with(passphrase: &str, salt: &[u8; SALT_LEN], iterations: u32) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key);
    let derived = DerivedKey(key);
    key.zeroize();
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_known_answer_zero_salt() {
        let key = derive_key("correct horse", &[0u8; SALT_LEN]);
        assert_eq!(
            key.as_bytes(),
            &hex!("61e83ce234494b7c3119c1178560dbe8c7a05e8b96645df70729c6605444db1e")
        );
    }

    #[test]
    fn test_deterministic() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(derive_key_with("pw", &salt, 10), derive_key_with("pw", &salt, 10));
    }

    #[test]
    fn test_salt_and_iterations_change_key() {
        let a = derive_key_with("pw", &[1u8; SALT_LEN], 10);
        let b = derive_key_with("pw", &[2u8; SALT_LEN], 10);
        let c = derive_key_with("pw", &[1u8; SALT_LEN], 11);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_passphrase_is_accepted() {
        let key = derive_key_with("", &[0u8; SALT_LEN], 1);
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = derive_key_with("pw", &[0u8; SALT_LEN], 1);
        assert_eq!(format!("{key:?}"), "DerivedKey(<redacted>)");
    }
}

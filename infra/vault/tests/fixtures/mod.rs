use candor_vault::prelude::*;

/// Envelope produced by a browser's WebCrypto for the passphrase [`INTEROP_PASSPHRASE`].
///
/// salt = bytes 0..16, iv = bytes 100..112, 100 000 PBKDF2 iterations.
pub const INTEROP_JSON: &str = r#"{"ciphertext":"DTHmIVppjVKbnqBZQNoou0Nd/UOW5VAhU/oLQmmVT4unFQVgzuQOaxsT9bZysdFfOgDlSZN5uJODEg==","iv":"ZGVmZ2hpamtsbW5v","salt":"AAECAwQFBgcICQoLDA0ODw=="}"#;
pub const INTEROP_PASSPHRASE: &str = "correct horse";
pub const INTEROP_PLAINTEXT: &str = "You likely value consistency over comfort.";

/// A vault with a low work factor so that tests can afford many key derivations.
/// # Panics
/// * If the builder rejects the iteration count.
#[must_use]
pub fn fast_vault() -> Vault {
    Vault::builder().iterations(2).build().expect("Vault setup failed")
}

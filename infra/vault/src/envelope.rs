use crate::error::VaultError;
use crate::kdf::SALT_LEN;
use serde::{Deserialize, Serialize};

/// AES-GCM nonce length (96-bit).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length (128-bit).
pub const TAG_LEN: usize = 16;

/// A sealed secret together with everything needed to open it except the passphrase.
///
/// Serialized as JSON with base64 (standard alphabet, padded) text fields:
///
/// ```text
/// { "ciphertext": "...", "iv": "...", "salt": "..." }
/// ```
///
/// `ciphertext` is the AES-GCM output with the 16-byte tag appended, the same
/// framing WebCrypto produces, so envelopes written by either side open on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    #[serde(with = "b64::bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(rename = "iv", with = "b64::array")]
    pub nonce: [u8; NONCE_LEN],
    #[serde(with = "b64::array")]
    pub salt: [u8; SALT_LEN],
}

impl EncryptedBlob {
    /// Renders the envelope as compact JSON.
    ///
    /// # Errors
    /// Returns [`VaultError::Internal`] if serialization fails.
    pub fn to_json(&self) -> Result<String, VaultError> {
        serde_json::to_string(self).map_err(|e| VaultError::from(e.to_string()))
    }

    /// Parses an envelope from JSON text.
    ///
    /// A missing field, undecodable base64 or a wrong salt/iv length is reported
    /// as [`VaultError::Authentication`], indistinguishable from a wrong passphrase.
    ///
    /// # Errors
    /// Returns [`VaultError::Authentication`] for any malformed input.
    pub fn from_json(text: &str) -> Result<Self, VaultError> {
        serde_json::from_str(text).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed envelope");
            VaultError::authentication()
        })
    }

    /// Parses an envelope from raw JSON bytes.
    ///
    /// # Errors
    /// Returns [`VaultError::Authentication`] for any malformed input.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VaultError> {
        serde_json::from_slice(bytes).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed envelope");
            VaultError::authentication()
        })
    }
}

mod b64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    fn decode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)
    }

    pub(super) mod bytes {
        use super::{Deserializer, Engine, STANDARD, Serializer};

        pub(crate) fn serialize<S: Serializer>(value: &[u8], s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&STANDARD.encode(value))
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
            super::decode(d)
        }
    }

    pub(super) mod array {
        use super::{Deserializer, Engine, STANDARD, Serializer};
        use serde::de::Error as _;

        pub(crate) fn serialize<S: Serializer, const N: usize>(
            value: &[u8; N],
            s: S,
        ) -> Result<S::Ok, S::Error> {
            s.serialize_str(&STANDARD.encode(value))
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
            d: D,
        ) -> Result<[u8; N], D::Error> {
            let raw = super::decode(d)?;
            let len = raw.len();
            raw.try_into().map_err(|_| D::Error::invalid_length(len, &"a fixed-size byte field"))
        }
    }
}

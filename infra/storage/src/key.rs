use crate::error::StorageError;
use std::borrow::Cow;
use std::fmt;

/// A validated storage key.
///
/// Keys double as file names in [`FileStore`](crate::FileStore), so they are restricted to
/// lower-case ASCII alphanumerics and underscores (for example `analysis_cache`).
/// Upper-case input is lower-cased; anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(Cow<'static, str>);

impl StorageKey {
    /// Maximum key length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Builds a key from a literal that is already in canonical form.
    ///
    /// Meant for `const` items, where an invalid literal fails the build.
    ///
    /// # Panics
    /// If `key` is empty, too long, or contains anything but `[a-z0-9_]`.
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        assert!(is_canonical(key.as_bytes()), "invalid static storage key");
        Self(Cow::Borrowed(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn is_canonical(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.len() > StorageKey::MAX_LEN {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !(b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_') {
            return false;
        }
        i += 1;
    }
    true
}

impl TryFrom<String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for StorageKey {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_ascii_lowercase();

        if name.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Key cannot be empty".into()),
            });
        }

        if name.len() > Self::MAX_LEN {
            return Err(StorageError::InvalidKey {
                message: format!("{} bytes", name.len()).into(),
                context: Some("Key is too long".into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::InvalidKey {
                message: name.into(),
                context: Some("Key contains illegal characters".into()),
            });
        }

        Ok(Self(Cow::Owned(name)))
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

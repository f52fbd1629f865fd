use candor_storage::StorageError;
use candor_vault::VaultError;
use std::borrow::Cow;

/// Error types specific to the profile store.
#[candor_derive::candor_error]
pub enum ProfileError {
    /// Wrong passphrase or a damaged envelope. The two are never told apart.
    #[error("Unable to unlock profile{}: {message}", format_context(.context))]
    Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("No saved profile{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid profile input{}: {message}", format_context(.context))]
    InvalidInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Profile storage unavailable{}: {source}", format_context(.context))]
    StorageUnavailable { source: StorageError, context: Option<Cow<'static, str>> },

    /// Sealing failed (for example, the OS random source is unavailable).
    #[error("Profile could not be sealed{}: {source}", format_context(.context))]
    Seal { source: VaultError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal profile error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ProfileError {
    pub(crate) const fn authentication() -> Self {
        Self::Authentication {
            message: Cow::Borrowed(candor_vault::AUTHENTICATION_MESSAGE),
            context: None,
        }
    }
}

use std::borrow::Cow;

/// The only message ever shown for a failed unlock.
///
/// A wrong passphrase and a corrupted blob are indistinguishable under AEAD, and the
/// vault never tries to tell them apart.
pub const AUTHENTICATION_MESSAGE: &str = "wrong passphrase or corrupted data";

#[candor_derive::candor_error]
pub enum VaultError {
    /// The authentication tag did not verify, or the sealed envelope is malformed.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operating system could not supply secure random bytes for a salt or nonce.
    #[error("Secure randomness unavailable{}: {message}", format_context(.context))]
    Entropy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The cipher refused to seal the plaintext.
    #[error("Sealing failed{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Rejected builder settings, such as a zero iteration count.
    #[error("Invalid vault settings{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VaultError {
    /// The generic unlock failure. Carries no hint about the cause.
    #[must_use]
    pub const fn authentication() -> Self {
        Self::Authentication { message: Cow::Borrowed(AUTHENTICATION_MESSAGE), context: None }
    }
}

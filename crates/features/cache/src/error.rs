use std::borrow::Cow;

/// Error types specific to the analysis cache.
#[candor_derive::candor_error]
pub enum CacheError {
    /// The AI service returned text that is not a valid analysis.
    #[error("Malformed analysis response{}: {message}", format_context(.context))]
    MalformedResponse {
        message: Cow<'static, str>,
        /// The raw response, kept for debugging.
        raw: String,
        context: Option<Cow<'static, str>>,
    },
}

/// A non-fatal problem met while persisting a store.
///
/// The in-flight record is still returned to the caller; only durability is affected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheWarning {
    #[error("Analysis cache could not be saved: {reason}")]
    StorageUnavailable { reason: String },

    #[error("Analysis cache kept changing, gave up after {attempts} attempts")]
    Contention { attempts: u32 },
}

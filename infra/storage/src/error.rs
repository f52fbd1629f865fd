use std::borrow::Cow;

#[candor_derive::candor_error]
pub enum StorageError {
    /// The key is empty, too long, or has characters outside `[a-z0-9_]`.
    #[error("Invalid storage key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The write would exceed the store's size limit. The previous value is kept.
    #[error("Storage quota exceeded{}: {message}", format_context(.context))]
    QuotaExceeded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage I/O failed{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A compressed value file is truncated or was not written by LZ4.
    #[error("Stored value is damaged{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },
}

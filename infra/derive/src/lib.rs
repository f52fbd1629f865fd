#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! Procedural macros shared by the candor crates.
//!
//! The only macro so far is [`macro@candor_error`], used by every crate to declare its
//! error enum. Crates using it also depend on `thiserror`.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns an enum with named-field variants into the crate's error type.
///
/// Adds `#[derive(Debug, thiserror::Error)]` (unless already derived) and generates:
///
/// * `<Name>Ext`, whose `.context(..)` fills the `context` field. It is implemented for
///   `Result<T, Name>` and for `Result<T, Source>` of every wrapped source type.
/// * `From<Source>` for each variant holding a `source` field (or one marked
///   `#[source]` / `#[from]`), so `?` converts upstream errors.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * `Name::kind()`, the variant name in `snake_case`, for log fields.
/// * A module-level `format_context` helper rendering `" (context)"` or nothing.
///
/// Every variant wrapping a source needs `context: Option<Cow<'static, str>>`, and no two
/// variants may wrap the same source type. Tuple and unit variants are rejected.
///
/// ```rust,ignore
/// use candor_derive::candor_error;
/// use std::borrow::Cow;
///
/// #[candor_error]
/// pub enum VaultError {
///     #[error("Key file unreadable{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal vault error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read_key(path: &Path) -> Result<Vec<u8>, VaultError> {
///     std::fs::read(path).context("loading key file")
/// }
/// ```
#[proc_macro_attribute]
pub fn candor_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

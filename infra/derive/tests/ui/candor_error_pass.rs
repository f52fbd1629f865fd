use candor_derive::candor_error;
use std::borrow::Cow;

#[candor_error]
#[derive(Debug)]
pub enum ProfileError {
    #[error("Profile file unreadable{}: {err}", format_context(context))]
    Io {
        #[source]
        err: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Profile JSON invalid{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Nothing saved")]
    NotFound {},

    #[error("Internal profile error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<serde_json::Value, ProfileError> {
    serde_json::from_str(raw).context("parsing profile")
}

fn main() {
    let err = parse("{").unwrap_err();
    assert_eq!(err.kind(), "json");
    assert_eq!(ProfileError::NotFound {}.kind(), "not_found");
    assert_eq!(ProfileError::from("boom").kind(), "internal");
    let _: ProfileError = std::io::Error::other("disk").into();
}

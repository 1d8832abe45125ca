use aegis_derive::aegis_error;
use std::borrow::Cow;

#[aegis_error]
pub enum PlatformError {
    #[cfg(unix)]
    #[error("Unix error{}: {message}", format_context(.context))]
    Unix { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported{}: {message}", format_context(.context))]
    Unsupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = PlatformError::Unsupported { message: "clipboard".into(), context: None };
    assert!(err.context_message().is_none());
}

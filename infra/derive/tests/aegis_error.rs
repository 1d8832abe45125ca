use aegis_derive::aegis_error;
use std::borrow::Cow;

#[aegis_error]
pub enum ShellError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid flag{}: {message}", format_context(.context))]
    InvalidFlag { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal shell error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<String, ShellError> {
    std::fs::read_to_string("/definitely/not/here/aegis.conf").context("Reading settings")
}

#[test]
fn source_errors_convert_with_context() {
    let err = read_missing().expect_err("missing file should fail");

    assert_eq!(err.kind(), "Io");
    assert_eq!(err.context_message(), Some("Reading settings"));
    assert!(err.to_string().starts_with("IO error (Reading settings):"));
}

#[test]
fn question_mark_converts_source_without_context() {
    fn open() -> Result<(), ShellError> {
        std::fs::File::open("/definitely/not/here")?;
        Ok(())
    }

    let err = open().expect_err("open should fail");
    assert_eq!(err.kind(), "Io");
    assert!(err.context_message().is_none());
}

#[test]
fn context_overrides_existing_variant_context() {
    let result: Result<(), ShellError> =
        Err(ShellError::InvalidFlag { message: "--bogus".into(), context: None });

    let err = result.context("Parsing command line").expect_err("still an error");
    assert_eq!(err.to_string(), "Invalid flag (Parsing command line): --bogus");
}

#[test]
fn internal_variant_accepts_plain_strings() {
    let borrowed = ShellError::from("static failure");
    let owned = ShellError::from(format!("failure #{}", 2));

    assert_eq!(borrowed.kind(), "Internal");
    assert_eq!(owned.to_string(), "Internal shell error: failure #2");
}

#[test]
fn aegis_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/aegis_error_pass.rs");
    t.pass("tests/ui/aegis_error_cfg_variant.rs");
}

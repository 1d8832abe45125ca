use aegis_logger::{LevelFilter, Logger, LoggerError};

#[test]
fn second_subscriber_is_refused_and_first_keeps_its_sink() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let logger = Logger::builder()
        .name("aegis-primary")
        .console(false)
        .level(LevelFilter::INFO)
        .init()
        .expect("first logger installs");

    let err = Logger::builder()
        .name("aegis-cleanup")
        .console(false)
        .init()
        .expect_err("only one subscriber per process");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "got {err:?}");

    logger.attach_file(tmp.path()).expect("first logger still owns disk output");
    assert!(logger.is_file_attached());
}

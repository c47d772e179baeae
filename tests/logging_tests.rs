use stromtarif::config::LoggingConfig;
use stromtarif::logging::{LogContext, get_logger_with_context, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn level_names_are_case_insensitive() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("WARNING").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("Error").unwrap(), Level::ERROR);
    assert!(parse_log_level("verbose").is_err());
}

#[test]
fn file_logging_initializes_once() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        file: tmp_dir
            .path()
            .join("stromtarif.log")
            .to_string_lossy()
            .to_string(),
        console_output: false,
        ..LoggingConfig::default()
    };

    init_logging(&config).unwrap();
    // a second call reports the first outcome instead of reinstalling
    init_logging(&LoggingConfig::default()).unwrap();

    let logger = get_logger_with_context(
        LogContext::new("logging_test").with_field("case", "file".to_string()),
    );
    logger.info("written to the rolling file");
}

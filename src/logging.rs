//! Logger setup for the binary: a console stream and a log file with independent thresholds.

use crate::config::LoggingSettings;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use log4rs::Handle;
use std::path::PathBuf;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} - {l} - {m}{n}";

// HTTP plumbing that logs every connection at debug level
const QUIET_TARGETS: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file '{0}'")]
    LogFile(PathBuf, #[source] std::io::Error),

    #[error("Invalid logger configuration")]
    Config(#[from] ConfigErrors),

    #[error("A logger is already installed")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Installs the global logger: `console_level` and above to stderr, `file_level` and above
/// to `log_file`, which is truncated on start.
pub fn setup_logger(settings: &LoggingSettings) -> Result<Handle, LoggingError> {
    let config = build_config(settings)?;
    Ok(log4rs::init_config(config)?)
}

fn build_config(settings: &LoggingSettings) -> Result<Config, LoggingError> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let file = FileAppender::builder()
        .append(false)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&settings.log_file)
        .map_err(|e| LoggingError::LogFile(settings.log_file.clone(), e))?;

    let root_level = settings.console_level.max(settings.file_level);

    let mut builder = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.console_level)))
                .build("console", Box::new(console)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.file_level)))
                .build("file", Box::new(file)),
        );
    for target in QUIET_TARGETS {
        builder = builder.logger(Logger::builder().build(target, LevelFilter::Info.min(root_level)));
    }

    Ok(builder.build(
        Root::builder()
            .appender("console")
            .appender("file")
            .build(root_level),
    )?)
}

use sponge_domain::config::LoggingConfig;
use sponge_logger::{LevelFilter, Logger, LoggerError};
use std::str::FromStr;

/// Installs the global logger described by `config`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for an unknown level, plus everything
/// [`sponge_logger::LoggerBuilder::init`] reports.
pub fn init_logger(config: &LoggingConfig) -> Result<Logger, LoggerError> {
    let level = LevelFilter::from_str(&config.level).map_err(|e| {
        LoggerError::InvalidConfiguration {
            message: format!("Unknown log level '{}': {e}", config.level).into(),
            context: None,
        }
    })?;

    let builder =
        Logger::builder().name(&config.name).console(config.console).thread_names(true).level(level);
    let builder = match &config.env_filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    };

    match &config.directory {
        Some(directory) => builder.path(directory).json(config.json).init(),
        None => builder.init(),
    }
}

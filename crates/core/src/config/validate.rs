use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Index depth, worker count and batch size are non-zero
/// - Oracle URL is http(s)
/// - Release time is a valid time of day
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.index.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "index.max_depth cannot be 0".to_string(),
        ));
    }
    if config.index.workers == 0 {
        return Err(ConfigError::ValidationError(
            "index.workers cannot be 0".to_string(),
        ));
    }
    if config.index.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "index.batch_size cannot be 0".to_string(),
        ));
    }

    let url = config.oracle.url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "oracle.url must be an http(s) URL, got '{}'",
            url
        )));
    }

    if config.schedule.release_hour >= 24 || config.schedule.release_minute >= 60 {
        return Err(ConfigError::ValidationError(format!(
            "schedule release time {}:{:02} is not a valid time of day",
            config.schedule.release_hour, config.schedule.release_minute
        )));
    }

    Ok(())
}

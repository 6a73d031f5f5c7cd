use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment overrides; nested keys use `__`, e.g.
/// `PEDANTIX_ORACLE__GUESS_DELAY_MS=800`.
const ENV_PREFIX: &str = "PEDANTIX_";

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Read `path` as TOML, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    extract(Figment::new().merge(Toml::file(path)).merge(env_overrides()))
}

/// Built-in defaults with environment overrides, for when no config file
/// exists.
pub fn load_default_config() -> Result<Config, ConfigError> {
    extract(Figment::from(Serialized::defaults(Config::default())).merge(env_overrides()))
}

/// Parse a TOML string without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

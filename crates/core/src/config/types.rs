use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Index construction and snapshot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Maximum number of text word lengths used as a tree path.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Where the serialized tree is written by `build` and read by `solve`.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Number of corpus shards built concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Records per progress log line inside a shard.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            snapshot_path: default_snapshot_path(),
            workers: default_workers(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_max_depth() -> usize {
    20
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("processed_data.json")
}

fn default_workers() -> usize {
    16
}

fn default_batch_size() -> usize {
    10_000
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Depth at which the traversal switches from following only the
    /// closest length to exploring every branch.
    #[serde(default = "default_min_search_depth")]
    pub min_search_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_search_depth: default_min_search_depth(),
        }
    }
}

fn default_min_search_depth() -> usize {
    10
}

/// Puzzle oracle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Puzzle site base URL
    #[serde(default = "default_oracle_url")]
    pub url: String,
    /// Minimum spacing between two guesses, in milliseconds.
    #[serde(default = "default_guess_delay")]
    pub guess_delay_ms: u64,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: default_oracle_url(),
            guess_delay_ms: default_guess_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_oracle_url() -> String {
    "https://pedantix.certitudes.org/".to_string()
}

fn default_guess_delay() -> u64 {
    500
}

fn default_timeout() -> u32 {
    30
}

/// Wait-for-release configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// When disabled, `solve` starts immediately.
    #[serde(default = "default_schedule_enabled")]
    pub enabled: bool,
    /// Local hour at which a new puzzle is published.
    #[serde(default = "default_release_hour")]
    pub release_hour: u32,
    #[serde(default)]
    pub release_minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_schedule_enabled(),
            release_hour: default_release_hour(),
            release_minute: 0,
        }
    }
}

fn default_schedule_enabled() -> bool {
    true
}

fn default_release_hour() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.index.max_depth, 20);
        assert_eq!(
            config.index.snapshot_path.to_str().unwrap(),
            "processed_data.json"
        );
        assert_eq!(config.index.workers, 16);
        assert_eq!(config.search.min_search_depth, 10);
        assert_eq!(config.oracle.url, "https://pedantix.certitudes.org/");
        assert_eq!(config.oracle.guess_delay_ms, 500);
        assert_eq!(config.oracle.timeout_secs, 30);
        assert!(config.schedule.enabled);
        assert_eq!(config.schedule.release_hour, 12);
        assert_eq!(config.schedule.release_minute, 0);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml = r#"
[index]
max_depth = 8
snapshot_path = "/data/tree.json"

[search]
min_search_depth = 3

[schedule]
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.index.max_depth, 8);
        assert_eq!(config.index.snapshot_path.to_str().unwrap(), "/data/tree.json");
        assert_eq!(config.index.workers, 16); // default
        assert_eq!(config.search.min_search_depth, 3);
        assert!(!config.schedule.enabled);
        assert_eq!(config.schedule.release_hour, 12);
    }

    #[test]
    fn test_deserialize_oracle_section() {
        let toml = r#"
[oracle]
url = "http://localhost:8000"
guess_delay_ms = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.oracle.url, "http://localhost:8000");
        assert_eq!(config.oracle.guess_delay_ms, 0);
        assert_eq!(config.oracle.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_wrong_type_fails() {
        let toml = r#"
[index]
max_depth = "deep"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}

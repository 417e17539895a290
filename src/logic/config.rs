//! Configuration module
//!
//! Read once at startup; there is no hot reload.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{self, env_opt, env_or};

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: String, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telemetry channel id
    pub channel_id: String,

    /// Read API key for the channel
    pub read_api_key: String,

    /// Telemetry API base URL
    pub base_url: String,

    /// Cache TTL, also the background refresh interval
    pub cache_ttl: Duration,

    /// Outbound request timeout
    pub fetch_timeout: Duration,

    /// Classifier artifact path
    pub model_path: PathBuf,

    /// Expected SHA-256 of the artifact (hex), if pinned
    pub model_sha256: Option<String>,

    /// Event journal directory
    pub journal_dir: PathBuf,

    /// Offline sample feed used when no live reading exists
    pub sample_feed_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_id: constants::DEFAULT_CHANNEL_ID.to_string(),
            read_api_key: String::new(),
            base_url: constants::DEFAULT_THINGSPEAK_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(constants::DEFAULT_CACHE_DURATION_SECS),
            fetch_timeout: Duration::from_secs(constants::DEFAULT_FETCH_TIMEOUT_SECS),
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            model_sha256: None,
            journal_dir: PathBuf::from(constants::DEFAULT_JOURNAL_DIR),
            sample_feed_path: PathBuf::from(constants::DEFAULT_SAMPLE_FEED_PATH),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            channel_id: env_or(constants::ENV_CHANNEL_ID, constants::DEFAULT_CHANNEL_ID),
            read_api_key: env_or(constants::ENV_READ_API_KEY, ""),
            base_url: env_or(constants::ENV_BASE_URL, constants::DEFAULT_THINGSPEAK_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            cache_ttl: Duration::from_secs(parse_secs(
                constants::ENV_CACHE_DURATION,
                env_opt(constants::ENV_CACHE_DURATION),
                constants::DEFAULT_CACHE_DURATION_SECS,
            )?),
            fetch_timeout: Duration::from_secs(parse_secs(
                constants::ENV_FETCH_TIMEOUT,
                env_opt(constants::ENV_FETCH_TIMEOUT),
                constants::DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            model_path: PathBuf::from(env_or(constants::ENV_MODEL_PATH, constants::DEFAULT_MODEL_PATH)),
            model_sha256: env_opt(constants::ENV_MODEL_SHA256).map(|s| s.to_lowercase()),
            journal_dir: PathBuf::from(env_or(constants::ENV_JOURNAL_DIR, constants::DEFAULT_JOURNAL_DIR)),
            sample_feed_path: PathBuf::from(env_or(
                constants::ENV_SAMPLE_FEED_PATH,
                constants::DEFAULT_SAMPLE_FEED_PATH,
            )),
        })
    }
}

/// Parse a positive seconds value
fn parse_secs(name: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidNumber {
                name: name.to_string(),
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_secs_uses_default_when_unset() {
        assert_eq!(parse_secs("X", None, 10), Ok(10));
    }

    #[test]
    fn parse_secs_accepts_positive() {
        assert_eq!(parse_secs("X", Some("30".to_string()), 10), Ok(30));
    }

    #[test]
    fn parse_secs_rejects_zero_and_garbage() {
        assert!(parse_secs("X", Some("0".to_string()), 10).is_err());
        assert_eq!(
            parse_secs("CACHE_DURATION_SECS", Some("ten".to_string()), 10),
            Err(ConfigError::InvalidNumber {
                name: "CACHE_DURATION_SECS".to_string(),
                value: "ten".to_string(),
            })
        );
    }

    #[test]
    fn default_config_matches_constants() {
        let config = Config::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.base_url, "https://api.thingspeak.com");
        assert!(config.model_sha256.is_none());
    }
}

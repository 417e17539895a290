//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! `Config::from_env` falls back to these when a variable is not set.

/// Default telemetry API base URL
pub const DEFAULT_THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";

/// Placeholder channel id (replace through `THINGSPEAK_CHANNEL_ID`)
pub const DEFAULT_CHANNEL_ID: &str = "0000000";

/// Cache TTL and background refresh interval (seconds)
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 10;

/// Outbound fetch timeout (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Default classifier artifact location
pub const DEFAULT_MODEL_PATH: &str = "model/sound_classifier.onnx";

/// Default event journal directory
pub const DEFAULT_JOURNAL_DIR: &str = "logs";

/// Default offline sample feed
pub const DEFAULT_SAMPLE_FEED_PATH: &str = "samples/thingspeak_data.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SoundGuard";

// ============================================
// Environment variable names
// ============================================

pub const ENV_CHANNEL_ID: &str = "THINGSPEAK_CHANNEL_ID";
pub const ENV_READ_API_KEY: &str = "THINGSPEAK_READ_API_KEY";
pub const ENV_BASE_URL: &str = "THINGSPEAK_BASE_URL";
pub const ENV_CACHE_DURATION: &str = "CACHE_DURATION_SECS";
pub const ENV_FETCH_TIMEOUT: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
pub const ENV_MODEL_SHA256: &str = "MODEL_SHA256";
pub const ENV_JOURNAL_DIR: &str = "JOURNAL_DIR";
pub const ENV_SAMPLE_FEED_PATH: &str = "SAMPLE_FEED_PATH";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Read a string variable, falling back to `default`
pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read an optional variable; empty values count as unset
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

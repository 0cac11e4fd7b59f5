//! Application configuration.
//!
//! Defaults live in constants; [`Config::from_env`] overlays the process
//! environment (and a `.env` file, if present).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Content API base URL used when `SETHMO_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://sethmoserver.onrender.com/api";

/// Where the login session is kept between CLI invocations.
pub const DEFAULT_SESSION_FILE: &str = ".sethmo-admin/session.json";

/// How long a status message stays visible before it is cleared.
pub const STATUS_DISPLAY_MS: u64 = 3000;

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Non-JSON error bodies (HTML error pages) are cut to this many characters.
pub const MAX_ERROR_BODY_CHARS: usize = 150;

/// Buffered status messages per subscriber.
pub const STATUS_CHANNEL_CAPACITY: usize = 100;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Content API base URL, without trailing slash.
    pub api_url: String,
    /// Session file location.
    pub session_file: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Status display window.
    pub status_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            status_window: Duration::from_millis(STATUS_DISPLAY_MS),
        }
    }
}

impl Config {
    /// Load configuration from `SETHMO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("SETHMO_API_URL") {
            config = config.with_api_url(&url)?;
        }
        if let Some(path) = lookup("SETHMO_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }
        if let Some(secs) = lookup("SETHMO_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("SETHMO_TIMEOUT_SECS", &secs)?);
        }
        if let Some(ms) = lookup("SETHMO_STATUS_WINDOW_MS") {
            config.status_window = Duration::from_millis(parse_number("SETHMO_STATUS_WINDOW_MS", &ms)?);
        }

        Ok(config)
    }

    /// Replace the API base URL.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        self.api_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Replace the session file location.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.status_window, Duration::from_millis(3000));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            ("SETHMO_API_URL", "http://localhost:5000/api/"),
            ("SETHMO_TIMEOUT_SECS", "5"),
            ("SETHMO_STATUS_WINDOW_MS", "1500"),
            ("SETHMO_SESSION_FILE", "/tmp/s.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.status_window, Duration::from_millis(1500));
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("SETHMO_API_URL", "ftp://nope")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));

        let err = Config::from_lookup(lookup(&[("SETHMO_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "SETHMO_TIMEOUT_SECS".into(),
                value: "soon".into()
            }
        );
    }
}

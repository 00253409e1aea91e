//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (no trailing slash)
    pub api_base_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Where the session (token + user) is persisted
    pub session_file: PathBuf,

    /// Credentials used by the binary when no session is stored
    pub email: Option<String>,
    pub password: Option<String>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_base_url: normalize_base_url(&constants::get_api_url()),

            timeout_ms: constants::get_timeout_ms(),

            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_file()),

            email: env::var("DASHBOARD_EMAIL").ok().filter(|s| !s.is_empty()),

            password: env::var("DASHBOARD_PASSWORD").ok().filter(|s| !s.is_empty()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Client settings derived from this configuration
    pub fn client(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            timeout: Duration::from_millis(constants::DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(constants::DEFAULT_API_URL)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_session_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_DATA_DIR)
        .join(constants::SESSION_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let config = ClientConfig::new("http://localhost:3000/ ");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.base_url, constants::DEFAULT_API_URL);
    }

    #[test]
    fn test_default_session_file_location() {
        let path = default_session_file();
        assert!(path.ends_with("leterago-normativas/session.json"));
    }
}

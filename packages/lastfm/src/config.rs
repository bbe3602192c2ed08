//! Client configuration

use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Last.fm API base URL
pub const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Last.fm client configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Public API key identifying the application
    pub api_key: String,

    /// Shared secret used to sign requests; never sent over the wire
    pub api_secret: String,

    /// Endpoint receiving all API calls
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with the given credentials and default settings
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_url: LASTFM_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: concat!("tapedeck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads `LASTFM_API_KEY` and `LASTFM_API_SECRET` (required), plus
    /// `LASTFM_API_URL`, `LASTFM_TIMEOUT` and `LASTFM_CONNECT_TIMEOUT`.
    ///
    /// # Errors
    /// - `ConfigError::MissingEnvVar` if a required variable is not set
    /// - `ConfigError::InvalidValue` if a variable is empty or fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_required_env("LASTFM_API_KEY")?;
        let api_secret = get_required_env("LASTFM_API_SECRET")?;

        let config = Self {
            api_url: env::var("LASTFM_API_URL").unwrap_or_else(|_| LASTFM_API_URL.to_string()),
            timeout_secs: parse_env("LASTFM_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
            connect_timeout_secs: parse_env(
                "LASTFM_CONNECT_TIMEOUT",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            ..Self::new(api_key, api_secret)
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the API endpoint (useful for testing against a mock server)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Check that credentials are present and the endpoint is an HTTP(S) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "api_key".to_string(),
                "API key cannot be empty".to_string(),
            ));
        }
        if self.api_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "api_secret".to_string(),
                "API secret cannot be empty".to_string(),
            ));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "api_url".to_string(),
                format!("expected an http(s) URL, got {:?}", self.api_url),
            ));
        }
        Ok(())
    }
}

/// Get a required environment variable
fn get_required_env(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Parse an environment variable into a specific type
fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = ClientConfig::new("key", "secret");
        assert_eq!(config.api_url, LASTFM_API_URL);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.connect_timeout_secs, 5);
        assert!(config.user_agent.starts_with("tapedeck/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ClientConfig::new("public_key_value", "secret_value");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("public_key_value"));
        assert!(!debug_str.contains("secret_value"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        assert!(matches!(
            ClientConfig::new("", "secret").validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "api_key"
        ));
        assert!(matches!(
            ClientConfig::new("key", "").validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "api_secret"
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig::new("key", "secret").with_api_url("ftp://example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "api_url"
        ));
    }

    #[test]
    fn test_from_env_reads_all_settings() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("env_key")),
                ("LASTFM_API_SECRET", Some("env_secret")),
                ("LASTFM_API_URL", Some("http://localhost:9999/2.0/")),
                ("LASTFM_TIMEOUT", Some("30")),
                ("LASTFM_CONNECT_TIMEOUT", None),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.api_key, "env_key");
                assert_eq!(config.api_secret, "env_secret");
                assert_eq!(config.api_url, "http://localhost:9999/2.0/");
                assert_eq!(config.timeout_secs, 30);
                assert_eq!(config.connect_timeout_secs, 5);
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("env_key")),
                ("LASTFM_API_SECRET", None),
            ],
            || {
                assert_eq!(
                    ClientConfig::from_env(),
                    Err(ConfigError::MissingEnvVar("LASTFM_API_SECRET".to_string()))
                );
            },
        );
    }

    #[test]
    fn test_from_env_invalid_timeout() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("env_key")),
                ("LASTFM_API_SECRET", Some("env_secret")),
                ("LASTFM_API_URL", None),
                ("LASTFM_TIMEOUT", Some("soon")),
            ],
            || {
                assert!(matches!(
                    ClientConfig::from_env(),
                    Err(ConfigError::InvalidValue(name, _)) if name == "LASTFM_TIMEOUT"
                ));
            },
        );
    }

    #[test]
    fn test_from_env_empty_key() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("  ")),
                ("LASTFM_API_SECRET", Some("env_secret")),
                ("LASTFM_API_URL", None),
                ("LASTFM_TIMEOUT", None),
                ("LASTFM_CONNECT_TIMEOUT", None),
            ],
            || {
                assert!(matches!(
                    ClientConfig::from_env(),
                    Err(ConfigError::InvalidValue(field, _)) if field == "api_key"
                ));
            },
        );
    }
}

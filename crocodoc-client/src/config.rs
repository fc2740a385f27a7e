//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crocodoc_core::{CoreError, DEFAULT_REFRESH_THRESHOLD_SECS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::ApiError;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://crocodoc.com/api/v2";

/// Default host for viewing URLs.
pub const DEFAULT_VIEW_BASE_URL: &str = "https://crocodoc.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "CROCODOC_API_TOKEN";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "CROCODOC_BASE_URL";

/// Environment variable enabling request logging.
pub const ENV_DEBUG: &str = "CROCODOC_DEBUG";

// ============================================================================
// Client Config
// ============================================================================

/// Settings for a [`crate::CrocodocClient`].
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API token. Required before any request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// API endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Host used to build viewing URLs.
    #[serde(default = "default_view_base_url")]
    pub view_base_url: String,
    /// PEM file with extra CA certificates; bundled roots when unset.
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
    /// How long a fetched document status is trusted.
    #[serde(default = "default_refresh_threshold", with = "duration_secs")]
    pub status_refresh_threshold: Duration,
    /// Transport timeout per request.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// Log every request and response at info level.
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_view_base_url() -> String {
    DEFAULT_VIEW_BASE_URL.to_string()
}

fn default_refresh_threshold() -> Duration {
    Duration::from_secs(DEFAULT_REFRESH_THRESHOLD_SECS)
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            view_base_url: default_view_base_url(),
            ca_bundle: None,
            status_refresh_threshold: default_refresh_threshold(),
            timeout: default_timeout(),
            debug: false,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("view_base_url", &self.view_base_url)
            .field("ca_bundle", &self.ca_bundle)
            .field("status_refresh_threshold", &self.status_refresh_threshold)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a default configuration with the given token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            ..Default::default()
        }
    }

    /// Creates a default configuration overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays values found through `lookup` (an environment accessor).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            self.debug = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Loads configuration from a JSON file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ApiError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a JSON file.
    pub fn save_to(&self, path: &Path) -> Result<(), ApiError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Sets the CA bundle, checking that the file exists.
    pub fn set_ca_bundle(&mut self, path: impl Into<PathBuf>) -> Result<(), CoreError> {
        let path = path.into();
        if !path.is_file() {
            return Err(CoreError::InvalidConfig(format!(
                "No SSL CA cert file at {}",
                path.display()
            )));
        }
        self.ca_bundle = Some(path);
        Ok(())
    }

    /// Returns the API token, or an error if none is set.
    pub fn api_token(&self) -> Result<&str, CoreError> {
        self.api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                CoreError::InvalidConfig(format!(
                    "No API token specified. Set it in the config or via {ENV_API_TOKEN}."
                ))
            })
    }

    /// Returns the status refresh threshold as a chrono duration.
    pub fn refresh_threshold(&self) -> Result<chrono::Duration, CoreError> {
        chrono::Duration::from_std(self.status_refresh_threshold).map_err(|_| {
            CoreError::InvalidConfig("status refresh threshold is out of range".to_string())
        })
    }

    /// Checks everything a client needs before its first request.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.api_token()?;
        parse_http_url("base_url", &self.base_url)?;
        parse_http_url("view_base_url", &self.view_base_url)?;
        if let Some(path) = &self.ca_bundle {
            if !path.is_file() {
                return Err(CoreError::InvalidConfig(format!(
                    "No SSL CA cert file at {}",
                    path.display()
                )));
            }
        }
        self.refresh_threshold()?;
        Ok(())
    }
}

fn parse_http_url(field: &str, value: &str) -> Result<Url, CoreError> {
    let url = Url::parse(value)
        .map_err(|e| CoreError::InvalidConfig(format!("{field} '{value}' is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::InvalidConfig(format!(
            "{field} '{value}' must use http or https"
        )));
    }
    Ok(url)
}

/// Serializes durations as fractional seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://crocodoc.com/api/v2");
        assert_eq!(config.status_refresh_threshold, Duration::from_secs(4));
        assert!(!config.debug);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let config = ClientConfig::default();
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
        assert!(ClientConfig::new("   ").validate().is_err());
        assert!(ClientConfig::new("123456").validate().is_ok());
    }

    #[test]
    fn test_bad_base_url_fails_validation() {
        let mut config = ClientConfig::new("123456");
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://crocodoc.com/api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ca_bundle_must_exist() {
        let mut config = ClientConfig::new("123456");
        assert!(config.set_ca_bundle("/definitely/not/here.crt").is_err());
        assert!(config.ca_bundle.is_none());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ca.crt");
        std::fs::write(&path, "pem").unwrap();
        config.set_ca_bundle(&path).unwrap();
        assert_eq!(config.ca_bundle.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_TOKEN, "from-env"),
            (ENV_BASE_URL, "http://localhost:8080/api/v2"),
            (ENV_DEBUG, "true"),
        ]);
        let config = ClientConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.api_token.as_deref(), Some("from-env"));
        assert_eq!(config.base_url, "http://localhost:8080/api/v2");
        assert!(config.debug);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ClientConfig::new("123456");
        config.status_refresh_threshold = Duration::from_millis(500);
        config.save_to(&path).unwrap();

        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api_token.as_deref(), Some("123456"));
        assert_eq!(loaded.status_refresh_threshold, Duration::from_millis(500));
        assert_eq!(loaded.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = ClientConfig::load_from(Path::new("/nonexistent/crocodoc.json")).unwrap();
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_token": "abc", "status_refresh_threshold": 0.25}"#)
                .unwrap();
        assert_eq!(config.status_refresh_threshold, Duration::from_millis(250));
        assert_eq!(config.view_base_url, DEFAULT_VIEW_BASE_URL);
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

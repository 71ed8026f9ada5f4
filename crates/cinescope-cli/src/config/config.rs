//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinescope_api::tmdb::{Credential, TimeWindow};
use serde::{Deserialize, Serialize};

/// Default minimum interval between TMDB requests in milliseconds.
const DEFAULT_MIN_INTERVAL_MS: u64 = 25;

/// Default number of cast members on the details screen.
const DEFAULT_CAST_LIMIT: usize = 6;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Browser preferences.
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// TMDB access configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// v4 read access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Response language (e.g. "en-US").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Minimum interval between requests.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

/// Browser preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Window of the home screen's trending section ("day" or "week").
    #[serde(default = "default_trending_window")]
    pub trending_window: String,
    /// Cast members shown on the details screen.
    #[serde(default = "default_cast_limit")]
    pub cast_limit: usize,
}

const fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL_MS
}

fn default_trending_window() -> String {
    TimeWindow::default().to_string()
}

const fn default_cast_limit() -> usize {
    DEFAULT_CAST_LIMIT
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            language: None,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            trending_window: default_trending_window(),
            cast_limit: DEFAULT_CAST_LIMIT,
        }
    }
}

impl TmdbConfig {
    /// Replaces the file credential with the one from the environment.
    ///
    /// Blank values are ignored. When either value is present, both file
    /// credentials are discarded so the environment always wins.
    pub fn apply_env_overrides(&mut self, api_key: Option<String>, access_token: Option<String>) {
        let api_key = api_key.filter(|v| !v.trim().is_empty());
        let access_token = access_token.filter(|v| !v.trim().is_empty());
        if api_key.is_none() && access_token.is_none() {
            return;
        }
        self.api_key = api_key;
        self.access_token = access_token;
    }

    /// Effective credential. An access token takes precedence over an API key.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        non_blank(&self.access_token)
            .map(Credential::AccessToken)
            .or_else(|| non_blank(&self.api_key).map(Credential::ApiKey))
    }

    /// Minimum request interval as a `Duration`.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl BrowserConfig {
    /// Parsed trending window.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not "day" or "week".
    pub fn trending_window(&self) -> Result<TimeWindow> {
        self.trending_window
            .parse()
            .context("invalid [browser] trending_window")
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Copy with secrets masked, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.tmdb.api_key = self.tmdb.api_key.as_deref().map(mask_secret);
        masked.tmdb.access_token = self.tmdb.access_token.as_deref().map(mask_secret);
        masked
    }
}

/// Masks a secret, keeping its first four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    const VISIBLE: usize = 4;
    if secret.chars().count() <= VISIBLE {
        return String::from("****");
    }
    let head: String = secret.chars().take(VISIBLE).collect();
    format!("{head}****")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.credential().is_none());
        assert_eq!(config.tmdb.min_interval(), Duration::from_millis(25));
        assert_eq!(config.browser.trending_window().unwrap(), TimeWindow::Week);
        assert_eq!(config.browser.cast_limit, 6);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.tmdb.api_key = Some(String::from("abcdef123456"));
        config.tmdb.language = Some(String::from("ja-JP"));
        config.browser.trending_window = String::from("day");

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\napi_key = \"k\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.api_key.as_deref(), Some("k"));
        assert_eq!(config.tmdb.min_interval_ms, 25);
        assert_eq!(config.browser, BrowserConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_access_token_preferred() {
        // Arrange
        let config = TmdbConfig {
            api_key: Some(String::from("key")),
            access_token: Some(String::from("token")),
            ..TmdbConfig::default()
        };

        // Act & Assert
        assert_eq!(
            config.credential(),
            Some(Credential::AccessToken(String::from("token")))
        );
    }

    #[test]
    fn test_blank_credentials_are_ignored() {
        // Arrange
        let config = TmdbConfig {
            api_key: Some(String::from("key")),
            access_token: Some(String::from("  ")),
            ..TmdbConfig::default()
        };

        // Act & Assert
        assert_eq!(config.credential(), Some(Credential::ApiKey(String::from("key"))));
    }

    #[test]
    fn test_env_overrides_file_credential() {
        // Arrange
        let mut config = TmdbConfig {
            api_key: None,
            access_token: Some(String::from("file-token")),
            ..TmdbConfig::default()
        };

        // Act
        config.apply_env_overrides(Some(String::from("env-key")), None);

        // Assert
        assert_eq!(
            config.credential(),
            Some(Credential::ApiKey(String::from("env-key")))
        );
    }

    #[test]
    fn test_blank_env_keeps_file_credential() {
        // Arrange
        let mut config = TmdbConfig {
            api_key: Some(String::from("file-key")),
            ..TmdbConfig::default()
        };

        // Act
        config.apply_env_overrides(Some(String::new()), None);

        // Assert
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_masked_hides_secrets() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.api_key = Some(String::from("abcdef123456"));
        config.tmdb.access_token = Some(String::from("xy"));

        // Act
        let masked = config.masked();

        // Assert
        assert_eq!(masked.tmdb.api_key.as_deref(), Some("abcd****"));
        assert_eq!(masked.tmdb.access_token.as_deref(), Some("****"));
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abcdef123456"));
    }

    #[test]
    fn test_invalid_trending_window() {
        // Arrange
        let browser = BrowserConfig {
            trending_window: String::from("month"),
            ..BrowserConfig::default()
        };

        // Act & Assert
        assert!(browser.trending_window().is_err());
    }
}

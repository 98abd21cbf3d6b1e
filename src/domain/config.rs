//! Application configuration model.
//!
//! Every section and field has a default so a partial `config.toml` is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the speech service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

const fn default_timeout() -> u64 {
    30
}

/// Practice stopwatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Length of one stopwatch tick in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Delivery pace used for duration estimates.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

const fn default_tick_interval() -> u64 {
    1000
}

const fn default_words_per_minute() -> u32 {
    130
}

/// Terminal rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Column at which speech text is wrapped.
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            wrap_width: default_wrap_width(),
        }
    }
}

const fn default_wrap_width() -> usize {
    80
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub practice: PracticeConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".podium")
    }

    /// Get the persisted session (token) path.
    #[must_use]
    pub fn session_file_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Replace the API base URL, e.g. from a command-line override.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.practice.tick_interval_ms, 1000);
        assert_eq!(config.display.wrap_width, 80);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://speeches.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://speeches.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.practice.words_per_minute, 130);
    }

    #[test]
    fn test_session_path_follows_data_dir() {
        let mut config = AppConfig::default();
        config.paths.data_dir = Some(PathBuf::from("/tmp/podium"));
        assert_eq!(
            config.session_file_path(),
            PathBuf::from("/tmp/podium/session.json")
        );
    }

    #[test]
    fn test_base_url_override() {
        let config = AppConfig::default().with_base_url(Some("http://api:8080".into()));
        assert_eq!(config.api.base_url, "http://api:8080");
        let config = config.with_base_url(None);
        assert_eq!(config.api.base_url, "http://api:8080");
    }
}

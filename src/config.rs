//! Configuration file parser for ~/.config/fclite/config.toml.
//!
//! The file is optional; a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted and logged as a warning, since they are most
//! likely typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::widget::{WidgetOptions, DEFAULT_PAGE_SIZE};

/// Image shown when an article has no usable avatar.
pub const DEFAULT_FALLBACK_IMAGE_URL: &str =
    "https://fastly.jsdelivr.net/gh/willow-god/Friend-Circle-Lite/static/favicon.ico";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const KNOWN_KEYS: [&str; 6] = [
    "base_url",
    "page_size",
    "fallback_image_url",
    "request_timeout_secs",
    "theme",
    "keybindings",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration.
///
/// Every field has a default, so any subset of keys may be given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the friend circle deployment. `all.json` is appended
    /// verbatim, so it normally ends with a slash.
    pub base_url: String,

    /// Articles per page. 0 means the default.
    pub page_size: usize,

    /// Image substituted for missing or broken avatars.
    pub fallback_image_url: String,

    /// Feed request timeout in seconds. 0 means the default.
    pub request_timeout_secs: u64,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme: "dark".to_string(),
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            base_url = %config.base_url,
            page_size = config.page_size,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Effective page size.
    pub fn page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Effective feed request timeout.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Options a new widget instance is acquired with.
    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions {
            page_size: self.page_size(),
            fallback_image_url: self.fallback_image_url.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("fclite_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.fallback_image_url, DEFAULT_FALLBACK_IMAGE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.theme, "dark");
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/fclite_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_temp("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::parse("base_url = \"https://fc.example.com/\"\n").unwrap();
        assert_eq!(config.base_url, "https://fc.example.com/");
        assert_eq!(config.page_size(), 24);
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_full_config() {
        let path = write_temp(
            "full",
            r#"
base_url = "https://fc.example.com/"
page_size = 12
fallback_image_url = "https://cdn.example.com/blank.png"
request_timeout_secs = 5
theme = "light"

[keybindings]
quit = "Ctrl+q"
load_more = "m"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://fc.example.com/");
        assert_eq!(config.page_size(), 12);
        assert_eq!(config.fallback_image_url, "https://cdn.example.com/blank.png");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.theme, "light");
        assert_eq!(
            config.keybindings.get("load_more").map(String::as_str),
            Some("m")
        );
        cleanup(&path);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = Config::parse("page_size = 0\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(config.page_size(), 24);
        assert_eq!(config.widget_options().page_size, 24);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::parse("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("theme = \"dark\"\ntotally_fake_key = 1\n").unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::parse("page_size = \"lots\"\n").is_err());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_temp("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }
}

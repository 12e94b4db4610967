//! Configuration management for formatted text
//!
//! Handles loading the optional configuration file and environment
//! overrides that pick the process default locale.

use crate::error::{ConfigError, ConfigResult};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user configuration directory
pub const APP_ID: &str = "formatted-text";

/// Configuration file name inside [`APP_ID`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable naming the default locale, ahead of the POSIX chain
pub const LOCALE_ENV: &str = "FORMATTED_TEXT_LOCALE";

/// Maximum pattern file size to read (in bytes) - 10MB
pub const MAX_TEXT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Library configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default locale for renders that do not name one
    pub locale: Option<Locale>,

    /// Largest file a file-backed text will read
    pub max_text_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: None,
            max_text_file_size: MAX_TEXT_FILE_SIZE,
        }
    }
}

impl Config {
    /// Load the configuration file when present, then apply environment
    /// overrides
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            Self::from_file(&path)?
        } else {
            log::trace!("No configuration at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env()
    }

    /// Read a configuration file, without environment overrides
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_text_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_text_file_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Apply the process environment
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// [`LOCALE_ENV`] replaces the configured locale. When neither names a
    /// locale, the POSIX variables are consulted.
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(tag) = lookup(LOCALE_ENV).filter(|tag| !tag.trim().is_empty()) {
            let locale = Locale::parse(tag.trim()).map_err(|e| ConfigError::InvalidValue {
                key: LOCALE_ENV.to_string(),
                reason: e.to_string(),
            })?;
            self.locale = Some(locale);
        }

        if self.locale.is_none() {
            self.locale = Locale::from_env_with(&lookup);
        }
        Ok(self)
    }

    /// The configured locale, or the root locale
    pub fn resolve_locale(&self) -> Locale {
        self.locale.clone().unwrap_or(Locale::ROOT)
    }

    /// Install the resolved locale as the process default
    pub fn apply(&self) {
        Locale::set_process_default(self.resolve_locale());
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }
}

/// Locale the process default starts from
pub(crate) fn initial_locale() -> Locale {
    match Config::load() {
        Ok(config) => config.resolve_locale(),
        Err(e) => {
            log::warn!("Could not load configuration, using root locale: {}", e);
            Locale::ROOT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.locale, None);
        assert_eq!(config.max_text_file_size, MAX_TEXT_FILE_SIZE);
        assert_eq!(config.resolve_locale(), Locale::ROOT);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            locale: Some(Locale::GERMANY),
            max_text_file_size: 4096,
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"de-DE\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json(r#"{ "locale": "fr_FR.UTF-8" }"#).unwrap();
        assert_eq!(config.locale, Some(Locale::FRANCE));
        assert_eq!(config.max_text_file_size, MAX_TEXT_FILE_SIZE);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_json(r#"{ "max_text_file_size": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = Config::from_json(r#"{ "locale": "not a locale!" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "locale": "it-IT" }}"#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.locale, Some(Locale::ITALY));

        let missing = file.path().with_extension("missing");
        let err = Config::from_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    fn test_env_override_wins() {
        let config = Config {
            locale: Some(Locale::FRANCE),
            ..Config::default()
        };
        let config = config
            .apply_env_with(env(&[(LOCALE_ENV, "de_DE"), ("LANG", "it_IT.UTF-8")]))
            .unwrap();
        assert_eq!(config.locale, Some(Locale::GERMANY));
    }

    #[test]
    fn test_posix_chain_fills_missing_locale() {
        let config = Config::default()
            .apply_env_with(env(&[("LC_NUMERIC", "de_CH.UTF-8"), ("LANG", "en_US.UTF-8")]))
            .unwrap();
        assert_eq!(config.resolve_locale().to_tag(), "de-CH");

        let config = Config {
            locale: Some(Locale::UK),
            ..Config::default()
        };
        let config = config.apply_env_with(env(&[("LANG", "fr_FR")])).unwrap();
        assert_eq!(config.locale, Some(Locale::UK));
    }

    #[test]
    fn test_invalid_env_locale() {
        let err = Config::default()
            .apply_env_with(env(&[(LOCALE_ENV, "??")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == LOCALE_ENV));
    }

    #[test]
    fn test_config_path() {
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("formatted-text/config.json"));
        }
    }
}

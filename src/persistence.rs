//! Persistence layer for admin settings
//!
//! The settings edited through the admin page are seeded from the
//! configuration file and saved as JSON so they survive restarts. Every
//! render reads a fresh snapshot.

use crate::config::{Config, FALLBACK_ROWS, validate_api_url};
use crate::error::Result;
use crate::logging::get_logger;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Admin-editable settings read on every render request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bearer token for the upstream API; empty disables auth
    pub api_key: String,

    /// Upstream API base URL
    pub api_url: String,

    /// Default row count for `display_strom_tariffs`
    pub table_rows: u32,

    /// Default provider filter for the card layout; empty shows all
    pub card_provider: String,
}

impl Settings {
    /// Seed settings from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api.api_key.clone(),
            api_url: config.api.base_url.clone(),
            table_rows: config.display.default_rows,
            card_provider: config.display.default_provider.clone(),
        }
    }

    /// Row count used when a shortcode has no `rows` attribute
    pub fn effective_rows(&self) -> u32 {
        if self.table_rows == 0 {
            FALLBACK_ROWS
        } else {
            self.table_rows
        }
    }

    /// Bearer token to send, if any
    pub fn bearer(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// API base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }

    /// Trim text fields, strip control characters and check the URL
    pub fn sanitized(self) -> Result<Self> {
        let api_url = sanitize_text(&self.api_url);
        validate_api_url("api_url", &api_url)?;
        Ok(Self {
            api_key: sanitize_text(&self.api_key),
            api_url,
            table_rows: self.table_rows,
            card_provider: sanitize_text(&self.card_provider),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn sanitize_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Settings held in memory and mirrored to a JSON file
#[derive(Debug)]
pub struct SettingsStore {
    file_path: Option<PathBuf>,
    settings: RwLock<Settings>,
    logger: crate::logging::StructuredLogger,
}

impl SettingsStore {
    /// Open the store at `file_path`, falling back to `seed` if no file exists yet
    pub fn open<P: AsRef<Path>>(file_path: P, seed: Settings) -> Result<Self> {
        let logger = get_logger("persistence");
        let path = file_path.as_ref();

        let settings = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let loaded: Settings = serde_json::from_str(&contents)?;
            logger.info(&format!("Loaded settings from {}", path.display()));
            loaded
        } else {
            logger.info("No settings file found, using configuration defaults");
            seed
        };

        Ok(Self {
            file_path: Some(path.to_path_buf()),
            settings: RwLock::new(settings),
            logger,
        })
    }

    /// Store that never touches the filesystem
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            file_path: None,
            settings: RwLock::new(settings),
            logger: get_logger("persistence"),
        }
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> Settings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Sanitize, store and persist new settings
    pub fn update(&self, new_settings: Settings) -> Result<Settings> {
        let sanitized = new_settings.sanitized()?;
        if let Some(path) = &self.file_path {
            let contents = serde_json::to_string_pretty(&sanitized)?;
            std::fs::write(path, contents)?;
            self.logger
                .info(&format!("Saved settings to {}", path.display()));
        }
        match self.settings.write() {
            Ok(mut guard) => *guard = sanitized.clone(),
            Err(poisoned) => *poisoned.into_inner() = sanitized.clone(),
        }
        Ok(sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_config_defaults() {
        let s = Settings::default();
        assert_eq!(s.api_url, "https://amd1.mooo.com/api");
        assert_eq!(s.table_rows, 10);
        assert!(s.card_provider.is_empty());
        assert_eq!(s.bearer(), None);
    }

    #[test]
    fn effective_rows_falls_back_to_ten() {
        let s = Settings {
            table_rows: 0,
            ..Settings::default()
        };
        assert_eq!(s.effective_rows(), 10);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let s = Settings {
            api_url: "https://amd1.mooo.com/api/".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.base_url(), "https://amd1.mooo.com/api");
    }

    #[test]
    fn sanitize_trims_and_rejects_bad_urls() {
        let s = Settings {
            api_key: "  key\n".to_string(),
            card_provider: "\tWien Energie ".to_string(),
            ..Settings::default()
        }
        .sanitized()
        .unwrap();
        assert_eq!(s.api_key, "key");
        assert_eq!(s.card_provider, "Wien Energie");

        let bad = Settings {
            api_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(bad.sanitized().is_err());
    }
}

//! Configuration management for Stromtarif
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable overrides.

use crate::error::{Result, StromError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod defaults;

/// Upstream API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://amd1.mooo.com/api";

/// Row count used when neither the shortcode nor the settings name one
pub const FALLBACK_ROWS: u32 = 10;

/// Upper bound for cache lifetimes; tariff data is meant to stay fresh
pub const MAX_CACHE_TTL_SECONDS: u64 = 3600;

/// Environment variable overriding `api.api_key`
pub const ENV_API_KEY: &str = "STROMTARIF_API_KEY";

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "STROMTARIF_API_URL";

/// Environment variable overriding `web.admin_token`
pub const ENV_ADMIN_TOKEN: &str = "STROMTARIF_ADMIN_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream tariff API
    pub api: ApiConfig,

    /// Rendering defaults
    pub display: DisplayConfig,

    /// Transient cache configuration
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,

    /// Path of the JSON file the admin settings are persisted to
    pub settings_file: String,
}

/// Upstream API connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://amd1.mooo.com/api`
    pub base_url: String,

    /// Bearer token; empty disables the Authorization header
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Rendering defaults applied when a shortcode omits an attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default number of rows requested from the API
    pub default_rows: u32,

    /// Default provider filter for the card layout
    pub default_provider: String,
}

/// Cache lifetimes and key prefixes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of successful fetch results
    pub ttl_seconds: u64,

    /// Lifetime of failed fetch results; falls back to `ttl_seconds`
    pub error_ttl_seconds: Option<u64>,

    /// Key prefix for tariff list entries
    pub tariff_prefix: String,

    /// Key prefix for chart entries
    pub graph_prefix: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or directory; empty disables file logging
    pub file: String,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,

    /// Number of rotated files to keep
    pub backup_count: u32,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Shared secret for `/admin`; `None` leaves the admin UI open
    pub admin_token: Option<String>,
}

impl CacheConfig {
    /// TTL for successful results
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// TTL for error results
    pub fn error_ttl(&self) -> Duration {
        Duration::from_secs(self.error_ttl_seconds.unwrap_or(self.ttl_seconds))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from an explicit path or the default locations,
    /// then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_paths = ["stromtarif.yaml", "/etc/stromtarif/config.yaml"];
                match default_paths.iter().find(|p| Path::new(p).exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Config::default(),
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api.api_key = key;
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_ADMIN_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.web.admin_token = Some(token);
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_api_url("api.base_url", &self.api.base_url)?;

        if self.api.timeout_seconds == 0 {
            return Err(StromError::validation(
                "api.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        if self.cache.ttl_seconds == 0 || self.cache.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(StromError::validation(
                "cache.ttl_seconds",
                format!("Must be between 1 and {MAX_CACHE_TTL_SECONDS}"),
            ));
        }

        if let Some(err_ttl) = self.cache.error_ttl_seconds
            && (err_ttl == 0 || err_ttl > self.cache.ttl_seconds)
        {
            return Err(StromError::validation(
                "cache.error_ttl_seconds",
                "Must be between 1 and cache.ttl_seconds",
            ));
        }

        if self.display.default_rows == 0 {
            return Err(StromError::validation(
                "display.default_rows",
                "Must be positive",
            ));
        }

        if self.web.port == 0 {
            return Err(StromError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        if self
            .web
            .admin_token
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            return Err(StromError::validation(
                "web.admin_token",
                "Must not be blank; omit it to disable admin authentication",
            ));
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

/// Check that `value` is an absolute http(s) URL
pub fn validate_api_url(field: &str, value: &str) -> Result<()> {
    match reqwest::Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(_) => Err(StromError::validation(
            field,
            "URL must use http or https",
        )),
        Err(e) => Err(StromError::validation(field, format!("Invalid URL: {e}"))),
    }
}

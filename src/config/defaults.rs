use super::*;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_rows: FALLBACK_ROWS,
            default_provider: String::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: MAX_CACHE_TTL_SECONDS,
            error_ttl_seconds: None,
            tariff_prefix: "stromtarife".to_string(),
            graph_prefix: "stromgraph".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            console_output: true,
            json_format: false,
            backup_count: 5,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8089,
            admin_token: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
            settings_file: "stromtarif_settings.json".to_string(),
        }
    }
}

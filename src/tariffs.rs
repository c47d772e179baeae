//! Tariff list fetching
//!
//! Cache-then-fetch against the `tarifliste` endpoint. Outcomes are cached
//! whether they succeeded or not, so an upstream failure stays visible for
//! the error TTL instead of being retried on every page view.

use crate::api::{ApiClient, TariffResponse, TariffTable};
use crate::cache::{TransientStore, cache_key};
use crate::config::CacheConfig;
use crate::error::{Result, StromError};
use crate::logging::{StructuredLogger, get_logger};
use crate::persistence::Settings;
use std::sync::Arc;

/// Cached result of one tariff list request
pub type TariffOutcome = Result<Arc<TariffTable>>;

/// Message shown for a non-positive row count
pub const INVALID_ROWS_MESSAGE: &str = "Invalid number of rows";

pub struct TariffFetcher {
    client: ApiClient,
    cache: Arc<dyn TransientStore<TariffOutcome>>,
    cache_config: CacheConfig,
    logger: StructuredLogger,
}

impl TariffFetcher {
    pub fn new(
        client: ApiClient,
        cache: Arc<dyn TransientStore<TariffOutcome>>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            client,
            cache,
            cache_config,
            logger: get_logger("tariffs"),
        }
    }

    /// URL of the tariff list endpoint for `rows` entries
    pub fn tariff_url(settings: &Settings, rows: i64) -> String {
        format!(
            "{}/electricity/tarifliste?rows={}&contentformat=json",
            settings.base_url(),
            rows
        )
    }

    /// Return up to `rows` tariffs, from cache when possible
    pub async fn fetch(&self, rows: i64, settings: &Settings) -> TariffOutcome {
        if rows <= 0 {
            return Err(StromError::invalid_input(INVALID_ROWS_MESSAGE));
        }

        let key = cache_key(&self.cache_config.tariff_prefix, rows);
        let logger = self.logger.with_field("key", key.as_str());
        if let Some(cached) = self.cache.get(&key) {
            logger.debug("Cache hit");
            return cached;
        }

        let url = Self::tariff_url(settings, rows);
        let outcome = self
            .client
            .get_json::<TariffResponse>(&url, settings.bearer())
            .await
            .map(|response| Arc::new(TariffTable::from(response)));

        let ttl = match &outcome {
            Ok(table) => {
                logger.info(&format!("Fetched {} tariffs", table.tariffs.len()));
                self.cache_config.ttl()
            }
            Err(e) => {
                logger.warn(&format!("Caching {}: {}", e.kind(), e));
                self.cache_config.error_ttl()
            }
        };
        self.cache.set(&key, outcome.clone(), ttl);
        outcome
    }
}

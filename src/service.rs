//! Request-facing service object
//!
//! `StromService` is built once at startup and shared by reference with every
//! handler. It owns the settings store and both fetchers and turns shortcode
//! attributes into finished HTML fragments. Errors never escape: they are
//! rendered as the error box in place of data.

use crate::api::ApiClient;
use crate::cache::{MemoryCache, TransientStore};
use crate::config::Config;
use crate::error::Result;
use crate::graph::{GraphFetcher, GraphOutcome};
use crate::logging::{StructuredLogger, get_logger};
use crate::persistence::{Settings, SettingsStore};
use crate::render;
use crate::shortcode::{
    GRAPH_TAG, GraphShortcode, ShortcodeAttrs, TARIFF_TAG, TariffShortcode, find_shortcodes,
};
use crate::tariffs::{TariffFetcher, TariffOutcome};
use std::sync::Arc;
use std::time::Duration;

pub struct StromService {
    settings: SettingsStore,
    tariffs: TariffFetcher,
    graphs: GraphFetcher,
    config: Config,
    logger: StructuredLogger,
}

impl StromService {
    /// Wire the service from configuration, loading persisted settings
    pub fn from_config(config: Config) -> Result<Self> {
        let seed = Settings::from_config(&config);
        let settings = SettingsStore::open(&config.settings_file, seed)?;
        Self::with_settings(config, settings)
    }

    /// Wire the service around an existing settings store with in-memory caches
    pub fn with_settings(config: Config, settings: SettingsStore) -> Result<Self> {
        let tariff_cache: Arc<dyn TransientStore<TariffOutcome>> = Arc::new(MemoryCache::new());
        let graph_cache: Arc<dyn TransientStore<GraphOutcome>> = Arc::new(MemoryCache::new());
        Self::with_caches(config, settings, tariff_cache, graph_cache)
    }

    /// Full wiring with caller-supplied cache stores
    pub fn with_caches(
        config: Config,
        settings: SettingsStore,
        tariff_cache: Arc<dyn TransientStore<TariffOutcome>>,
        graph_cache: Arc<dyn TransientStore<GraphOutcome>>,
    ) -> Result<Self> {
        let client = ApiClient::new(Duration::from_secs(config.api.timeout_seconds))?;
        Ok(Self {
            settings,
            tariffs: TariffFetcher::new(client.clone(), tariff_cache, config.cache.clone()),
            graphs: GraphFetcher::new(client, graph_cache, config.cache.clone()),
            config,
            logger: get_logger("service"),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// `[display_strom_tariffs]`: table or card grid of the current tariffs
    pub async fn display_strom_tariffs(&self, attrs: &ShortcodeAttrs) -> String {
        let settings = self.settings.snapshot();
        let shortcode = TariffShortcode::from_attrs(attrs, &settings);

        match self.tariffs.fetch(shortcode.rows, &settings).await {
            Ok(table) => render::render_tariffs(
                &table,
                shortcode.layout,
                shortcode.provider_filter(&settings),
            ),
            Err(e) => render::render_error(&e),
        }
    }

    /// `[stromgraph]`: responsive spot price chart
    pub async fn stromgraph(&self, attrs: &ShortcodeAttrs) -> String {
        let settings = self.settings.snapshot();
        let shortcode = GraphShortcode::from_attrs(attrs);

        match self.graphs.fetch(shortcode.range, &settings).await {
            Ok(svg) => render::render_graph(&svg),
            Err(e) => render::render_error(&e),
        }
    }

    /// Replace every known shortcode in `content` with its rendered fragment
    pub async fn expand_shortcodes(&self, content: &str) -> String {
        let found = find_shortcodes(content);
        if found.is_empty() {
            return content.to_string();
        }
        self.logger
            .debug(&format!("Expanding {} shortcodes", found.len()));

        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;
        for shortcode in found {
            out.push_str(&content[cursor..shortcode.span.start]);
            cursor = shortcode.span.end;

            if shortcode.escaped {
                out.push_str(shortcode.literal(content));
                continue;
            }

            let rendered = match shortcode.tag.as_str() {
                TARIFF_TAG => self.display_strom_tariffs(&shortcode.attrs).await,
                GRAPH_TAG => self.stromgraph(&shortcode.attrs).await,
                _ => content[shortcode.span.clone()].to_string(),
            };
            out.push_str(shortcode.prefix);
            out.push_str(&rendered);
            out.push_str(shortcode.suffix);
        }
        out.push_str(&content[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> StromService {
        let settings = SettingsStore::in_memory(Settings {
            api_url: "http://127.0.0.1:9".to_string(),
            ..Settings::default()
        });
        StromService::with_settings(Config::default(), settings).unwrap()
    }

    #[tokio::test]
    async fn content_without_shortcodes_is_unchanged() {
        let service = offline_service();
        let content = "<p>[gallery ids=\"1\"] and [stromgraphs]</p>";
        assert_eq!(service.expand_shortcodes(content).await, content);
    }

    #[tokio::test]
    async fn escaped_shortcodes_stay_literal() {
        let service = offline_service();
        let out = service
            .expand_shortcodes("a [[display_strom_tariffs rows=3]] b")
            .await;
        assert_eq!(out, "a [display_strom_tariffs rows=3] b");
    }

    #[tokio::test]
    async fn invalid_rows_expand_to_error_box() {
        let service = offline_service();
        let out = service
            .expand_shortcodes("<p>[display_strom_tariffs rows=\"-1\"]</p>")
            .await;
        assert!(out.starts_with("<p><div class=\"error-message\">"));
        assert!(out.ends_with("</div></p>"));
    }
}

//! Spot price chart fetching
//!
//! The chart endpoint returns a complete SVG document with fixed pixel
//! dimensions. Before it is cached the document is turned into an inline
//! fragment that scales with its container.

use crate::api::ApiClient;
use crate::cache::{TransientStore, cache_key};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::persistence::Settings;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Cached result of one chart request
pub type GraphOutcome = Result<Arc<str>>;

static XML_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<\?xml[^>]*\?>\s*").expect("valid xml declaration regex"));
static SVG_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<svg\b[^>]*>").expect("valid svg tag regex"));
static WIDTH_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+width\s*=\s*["']([0-9]+(?:\.[0-9]+)?)(?:px)?["']"#).expect("valid width regex")
});
static HEIGHT_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+height\s*=\s*["']([0-9]+(?:\.[0-9]+)?)(?:px)?["']"#)
        .expect("valid height regex")
});

/// Time span of the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphRange {
    #[default]
    SingleDay,
    Range,
}

impl GraphRange {
    /// Parse a shortcode token; unknown tokens fall back to `singleday`
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "range" => Self::Range,
            _ => Self::SingleDay,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleDay => "singleday",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for GraphRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip the XML prolog and swap the root tag's fixed size for a `viewBox`
pub fn make_responsive(svg: &str) -> String {
    let svg = XML_DECLARATION.replace(svg, "");

    let Some(tag) = SVG_OPEN_TAG.find(&svg) else {
        return svg.into_owned();
    };
    let open_tag = tag.as_str();

    let width = WIDTH_ATTR.captures(open_tag).map(|c| c[1].to_string());
    let height = HEIGHT_ATTR.captures(open_tag).map(|c| c[1].to_string());
    let (Some(width), Some(height)) = (width, height) else {
        return svg.into_owned();
    };

    let stripped = WIDTH_ATTR.replace(open_tag, "");
    let stripped = HEIGHT_ATTR.replace(&stripped, "");
    let new_tag = if stripped.contains("viewBox") {
        stripped.into_owned()
    } else {
        format!(
            r#"<svg viewBox="0 0 {} {}"{}"#,
            width,
            height,
            &stripped["<svg".len()..]
        )
    };

    let mut out = String::with_capacity(svg.len());
    out.push_str(&svg[..tag.start()]);
    out.push_str(&new_tag);
    out.push_str(&svg[tag.end()..]);
    out
}

pub struct GraphFetcher {
    client: ApiClient,
    cache: Arc<dyn TransientStore<GraphOutcome>>,
    cache_config: CacheConfig,
    logger: StructuredLogger,
}

impl GraphFetcher {
    pub fn new(
        client: ApiClient,
        cache: Arc<dyn TransientStore<GraphOutcome>>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            client,
            cache,
            cache_config,
            logger: get_logger("graph"),
        }
    }

    /// URL of the latest chart for `range`
    pub fn chart_url(settings: &Settings, range: GraphRange) -> String {
        format!(
            "{}/electricity/spotprices/chart/latest?range={}",
            settings.base_url(),
            range
        )
    }

    /// Return the responsive SVG fragment for `range`, from cache when possible
    pub async fn fetch(&self, range: GraphRange, settings: &Settings) -> GraphOutcome {
        let key = cache_key(&self.cache_config.graph_prefix, range);
        let logger = self.logger.with_field("key", key.as_str());
        if let Some(cached) = self.cache.get(&key) {
            logger.debug("Cache hit");
            return cached;
        }

        let url = Self::chart_url(settings, range);
        let outcome: GraphOutcome = self
            .client
            .get_text(&url, settings.bearer())
            .await
            .map(|svg| Arc::from(make_responsive(&svg)));

        let ttl = match &outcome {
            Ok(_) => self.cache_config.ttl(),
            Err(e) => {
                logger.warn(&format!("Caching {}: {}", e.kind(), e));
                self.cache_config.error_ttl()
            }
        };
        self.cache.set(&key, outcome.clone(), ttl);
        outcome
    }
}

//! Shortcode parsing
//!
//! Attribute syntax follows WordPress: `key=value`, `key="value"` and
//! `key='value'`, names are case-insensitive and positional values are
//! ignored. `[[tag]]` is an escaped shortcode and renders as the literal
//! `[tag]`.

use crate::graph::GraphRange;
use crate::persistence::Settings;
use crate::render::Layout;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

/// Tag of the tariff table/cards shortcode
pub const TARIFF_TAG: &str = "display_strom_tariffs";

/// Tag of the spot price chart shortcode
pub const GRAPH_TAG: &str = "stromgraph";

static ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"[^"]*"(?:\s|$)|'[^']*'(?:\s|$)|\S+(?:\s|$)"#,
    )
    .expect("valid shortcode attribute regex")
});

static SHORTCODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\[(\[?)({}|{})((?:\s[^\]]*)?)\](\]?)",
        TARIFF_TAG, GRAPH_TAG
    ))
    .expect("valid shortcode regex")
});

/// Attributes of one shortcode occurrence, keyed by lowercase name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeAttrs(BTreeMap<String, String>);

impl ShortcodeAttrs {
    /// Parse the attribute text between the tag name and the closing bracket
    pub fn parse(text: &str) -> Self {
        let text = text.trim().trim_end_matches('/');
        let mut attrs = BTreeMap::new();
        for caps in ATTR_PATTERN.captures_iter(text) {
            let pair = [(1, 2), (3, 4), (5, 6)]
                .into_iter()
                .find_map(|(k, v)| Some((caps.get(k)?, caps.get(v)?)));
            if let Some((name, value)) = pair {
                attrs.insert(name.as_str().to_lowercase(), value.as_str().to_string());
            }
        }
        Self(attrs)
    }

    /// Build attributes from already split pairs (e.g. a query string)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Resolved `[display_strom_tariffs]` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffShortcode {
    pub layout: Layout,
    pub rows: i64,
    /// Explicit `stromanbieter` attribute, if given
    pub provider: Option<String>,
}

impl TariffShortcode {
    /// Apply shortcode attributes over the persisted defaults
    pub fn from_attrs(attrs: &ShortcodeAttrs, settings: &Settings) -> Self {
        let layout = attrs.get("layout").map(Layout::from_token).unwrap_or_default();
        let rows = match attrs.get("rows") {
            // non-numeric counts are rejected downstream like zero
            Some(raw) => raw.trim().parse::<i64>().unwrap_or(0),
            None => i64::from(settings.effective_rows()),
        };
        Self {
            layout,
            rows,
            provider: attrs.get("stromanbieter").map(str::to_string),
        }
    }

    /// Provider filter in effect: the explicit attribute, then for cards the
    /// persisted default provider, then no filter
    pub fn provider_filter<'a>(&'a self, settings: &'a Settings) -> &'a str {
        match (&self.provider, self.layout) {
            (Some(provider), _) => provider.as_str(),
            (None, Layout::Cards) => settings.card_provider.as_str(),
            (None, Layout::Table) => "",
        }
    }
}

/// Resolved `[stromgraph]` arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphShortcode {
    pub range: GraphRange,
}

impl GraphShortcode {
    pub fn from_attrs(attrs: &ShortcodeAttrs) -> Self {
        Self {
            range: attrs
                .get("range")
                .map(GraphRange::from_token)
                .unwrap_or_default(),
        }
    }
}

/// Known shortcode found in a content body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch {
    /// Byte range of the whole match in the content
    pub span: Range<usize>,
    pub tag: String,
    pub attrs: ShortcodeAttrs,
    /// `[[tag]]`: emit the inner text literally
    pub escaped: bool,
    /// Unbalanced outer brackets that stay around the rendered output
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl ShortcodeMatch {
    /// Literal text for an escaped shortcode (`[[tag]]` -> `[tag]`)
    pub fn literal<'a>(&self, content: &'a str) -> &'a str {
        &content[self.span.start + 1..self.span.end - 1]
    }
}

/// Locate all known shortcodes in `content`, in order
pub fn find_shortcodes(content: &str) -> Vec<ShortcodeMatch> {
    SHORTCODE_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = !caps.get(1)?.as_str().is_empty();
            let close = !caps.get(4)?.as_str().is_empty();
            Some(ShortcodeMatch {
                span: whole.range(),
                tag: caps.get(2)?.as_str().to_string(),
                attrs: ShortcodeAttrs::parse(caps.get(3).map_or("", |m| m.as_str())),
                escaped: open && close,
                prefix: if open && !close { "[" } else { "" },
                suffix: if close && !open { "]" } else { "" },
            })
        })
        .collect()
}

//! # Stromtarif - electricity tariffs as embeddable HTML
//!
//! Fetches electricity tariff lists and spot price charts from a remote API,
//! caches them briefly and renders them as HTML fragments that a host page
//! embeds through shortcodes.
//!
//! ## Features
//!
//! - **Shortcodes**: `[display_strom_tariffs]` (table or cards) and `[stromgraph]`
//! - **Caching**: every upstream outcome, success or failure, is cached per request shape
//! - **Responsive charts**: fixed-size SVG charts are rewritten to scale with their container
//! - **Admin UI**: settings page backed by a JSON settings file
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `cache`: TTL key/value store behind the `TransientStore` trait
//! - `api`: Upstream HTTP client and wire types
//! - `tariffs`: Cache-then-fetch for tariff lists
//! - `graph`: Cache-then-fetch and SVG post-processing for charts
//! - `render`: HTML builder and fragment renderers
//! - `shortcode`: Shortcode attribute parsing and content scanning
//! - `persistence`: Admin-editable settings
//! - `service`: Request-facing service object
//! - `web`: HTTP server and admin UI

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod persistence;
pub mod render;
pub mod service;
pub mod shortcode;
pub mod tariffs;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StromError};
pub use service::StromService;

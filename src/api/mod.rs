//! Upstream electricity API integration
//!
//! The HTTP client lives in `client`, the wire types of the tariff list in
//! `types`.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ReportMetadata, Tariff, TariffResponse, TariffTable};

use crate::error::{Result, StromError};
use crate::logging::{StructuredLogger, get_logger};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

const CLIENT_USER_AGENT: &str = concat!("stromtarif/", env!("CARGO_PKG_VERSION"));

/// Number of body bytes quoted in parse error logs
const BODY_PREVIEW_LEN: usize = 200;

/// Thin HTTP GET client for the upstream electricity API
///
/// One attempt per call, no retries. Failures are logged and returned as
/// `Transport` (network, timeout, non-2xx) or `Parse` (undecodable body).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    logger: StructuredLogger,
}

impl ApiClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StromError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            logger: get_logger("api"),
        })
    }

    /// GET `url` and decode the JSON body into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, bearer: Option<&str>) -> Result<T> {
        let body = self.fetch_body(url, bearer, "application/json").await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            self.logger.error(&format!(
                "Invalid JSON from {}: {} (body starts with {:?})",
                url,
                e,
                preview(&body)
            ));
            StromError::parse(format!("Invalid JSON from upstream API: {}", e))
        })
    }

    /// GET `url` and return the raw text body
    pub async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String> {
        self.fetch_body(url, bearer, "image/svg+xml, text/plain;q=0.9, */*;q=0.5")
            .await
    }

    async fn fetch_body(&self, url: &str, bearer: Option<&str>, accept: &str) -> Result<String> {
        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if let Some(token) = bearer.map(str::trim).filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        self.logger.debug(&format!("GET {}", url));
        let response = request.send().await.map_err(|e| {
            self.logger
                .error(&format!("Request to {} failed: {}", url, e));
            StromError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            self.logger
                .error(&format!("Upstream API error for {}: {}", url, status));
            return Err(StromError::transport(format!(
                "Upstream API answered with status {}",
                status
            )));
        }

        response.text().await.map_err(|e| {
            self.logger
                .error(&format!("Reading body from {} failed: {}", url, e));
            StromError::transport(e.to_string())
        })
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

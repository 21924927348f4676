//! HTTP source: references are resolved against a base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use tracing::instrument;

use quizdeck_core::error::SourceError;
use quizdeck_core::traits::TextSource;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches text over HTTP(S) with caching disabled, so edited question files
/// are picked up on the next load.
pub struct HttpSource {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        let reference = reference.trim_start_matches("./").trim_start_matches('/');
        format!("{}/{}", self.base_url, reference)
    }
}

#[async_trait]
impl TextSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_text(&self, reference: &str) -> Result<String, SourceError> {
        let url = self.url_for(reference);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                SourceError::Network(format!("{} not reachable: {e}", self.base_url))
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(reference.to_string()));
        }
        if status >= 400 {
            return Err(SourceError::Http {
                status,
                reference: reference.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read body of {url}: {e}")))
    }
}

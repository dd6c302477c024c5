//! HTTP page renderer
//!
//! Fetches the schedule page with `reqwest` and extracts fragments from the
//! server-rendered HTML. No retry and no rate limiting; a failed fetch fails
//! the run and the next scheduled run tries again.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE},
    Client,
};
use std::path::PathBuf;
use std::time::Duration;

use super::extract::FragmentExtractor;
use super::PageRenderer;
use crate::config::Config;
use crate::models::Fragment;
use crate::utils::decode_body;
use crate::utils::error::FetchError;

/// Page renderer backed by a plain HTTP GET
pub struct HttpRenderer {
    /// HTTP client with configured timeout, compression and user agent
    client: Client,

    /// Text node walker for the fetched document
    extractor: FragmentExtractor,

    /// Where to dump the raw HTML of each fetch, if anywhere
    dump_html: Option<PathBuf>,
}

impl HttpRenderer {
    /// Create a renderer
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created and
    /// `FetchError::InvalidSelector` if the seat region name is unusable
    pub fn new(seat_region: &str, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .default_headers(default_headers())
            .build()?;

        Ok(Self {
            client,
            extractor: FragmentExtractor::new(seat_region)?,
            dump_html: None,
        })
    }

    /// Create a renderer from the `[page]` and `[debug]` sections
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let renderer = Self::new(
            &config.page.seat_region,
            config.request_timeout(),
            &config.page.user_agent,
        )?;

        Ok(match &config.debug.dump_html {
            Some(path) => renderer.with_dump_path(path.clone()),
            None => renderer,
        })
    }

    /// Save every fetched document to `path`
    #[must_use]
    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_html = Some(path.into());
        self
    }

    /// Fetch the page and decode it to a UTF-8 string
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` for an unparsable URL
    /// - `FetchError::Timeout` when the request times out
    /// - `FetchError::ServerError` for non-success statuses
    /// - `FetchError::Decode` when the body is neither UTF-8 nor EUC-KR
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::info!(url = %url, "Loading page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await?;
        tracing::debug!(bytes = bytes.len(), content_type = %content_type, "Page fetched");

        decode_body(&bytes, &content_type)
    }

    async fn dump(&self, html: &str) {
        let Some(path) = &self.dump_html else {
            return;
        };
        match tokio::fs::write(path, html).await {
            Ok(()) => tracing::info!(path = %path.display(), "HTML snapshot saved"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save HTML snapshot")
            }
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    fn name(&self) -> &str {
        "http"
    }

    async fn render(&self, url: &str) -> Result<Vec<Fragment>, FetchError> {
        let html = self.fetch_html(url).await?;
        self.dump(&html).await;
        self.extractor.extract(&html)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers
}

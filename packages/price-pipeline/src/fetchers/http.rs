//! HTTP-based document fetcher.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::DocumentFetcher;

/// Client-side timeout. The pipeline itself never times out a fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches listing pages with a single GET.
///
/// No JavaScript rendering: works for server-rendered listings only.
///
/// # Example
///
/// ```rust,ignore
/// use price_pipeline::{DocumentFetcher, HttpFetcher};
///
/// let fetcher = HttpFetcher::new()?;
/// let html = fetcher.fetch("https://books.toscrape.com/", "Mozilla/5.0").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with default settings.
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> FetchResult<String> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                FetchError::Http(Box::new(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "HTTP error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyDocument {
                url: url.to_string(),
            });
        }

        info!(url = %url, bytes = body.len(), "Document fetched");
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

//! Document fetcher trait.
//!
//! The pipeline never talks HTTP directly; it asks a [`DocumentFetcher`] for
//! the listing page body. `HttpFetcher` is the production implementation,
//! `testing::MockFetcher` serves canned markup.

use async_trait::async_trait;

use crate::error::FetchResult;

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the body at `url`, identifying as `user_agent`.
    ///
    /// Fails on transport errors and non-success statuses. No retries.
    async fn fetch(&self, url: &str, user_agent: &str) -> FetchResult<String>;

    /// Fetcher name for logging.
    fn name(&self) -> &str;
}

//! Exchange-rate provider trait.

use async_trait::async_trait;

use crate::error::RateResult;
use crate::security::ApiCredential;
use crate::types::{CurrencyCode, ExchangeRate};

/// Resolves `1 base = r quote` with one external lookup.
///
/// The returned rate must carry the requested `base` and `quote` so the
/// pipeline can tell which way to apply it. Implementations never retry.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn lookup(
        &self,
        base: &CurrencyCode,
        quote: &CurrencyCode,
        credential: &ApiCredential,
    ) -> RateResult<ExchangeRate>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

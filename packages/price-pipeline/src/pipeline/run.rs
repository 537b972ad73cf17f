//! The pipeline orchestrator: fetch → extract → normalize → rate → convert.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{PipelineError, RateFailureReason, RateLookupError, Result};
use crate::pipeline::convert::price_item;
use crate::pipeline::extract::{extract_listings, parse_document, ListingSelectors};
use crate::pipeline::normalize::{normalize_batch, NormalizedBatch, PriceNormalizer};
use crate::pipeline::stage::StageTracker;
use crate::security::ApiCredential;
use crate::traits::{fetcher::DocumentFetcher, rate::RateProvider};
use crate::types::{CurrencyPair, PipelineResult, SiteExtractionConfig, ValidatedRun};

/// One fetcher and one rate provider, driven through a single sequential run.
///
/// # Example
///
/// ```rust,ignore
/// use price_pipeline::{ExchangeRateApiProvider, HttpFetcher, Pipeline, RunConfig, SiteExtractionConfig};
///
/// let run = RunConfig::new(SiteExtractionConfig::books())
///     .with_target_currency("KES")
///     .with_api_key(key)
///     .validate()?;
///
/// let pipeline = Pipeline::new(HttpFetcher::new()?, ExchangeRateApiProvider::new());
/// let result = pipeline.run_validated(&run).await?;
/// ```
pub struct Pipeline<F, R> {
    fetcher: F,
    rates: R,
}

impl<F, R> Pipeline<F, R>
where
    F: DocumentFetcher,
    R: RateProvider,
{
    pub fn new(fetcher: F, rates: R) -> Self {
        Self { fetcher, rates }
    }

    /// Run with inputs that already passed [`RunConfig::validate`](crate::RunConfig::validate).
    pub async fn run_validated(&self, run: &ValidatedRun) -> Result<PipelineResult> {
        self.run(&run.site, &run.pair, &run.credential).await
    }

    /// Execute one run. Either every record is produced or nothing is.
    ///
    /// Prices are read as `pair.source`; the rate is requested in the
    /// orientation the site's conversion direction needs.
    pub async fn run(
        &self,
        site: &SiteExtractionConfig,
        pair: &CurrencyPair,
        credential: &ApiCredential,
    ) -> Result<PipelineResult> {
        let mut stages = StageTracker::new();
        let outcome = self.execute(site, pair, credential, &mut stages).await;

        if let Err(e) = &outcome {
            warn!(site = %site.name, stage = %stages.current(), error = %e, "Pipeline run failed");
            stages.fail();
        }
        outcome
    }

    async fn execute(
        &self,
        site: &SiteExtractionConfig,
        pair: &CurrencyPair,
        credential: &ApiCredential,
        stages: &mut StageTracker,
    ) -> Result<PipelineResult> {
        let selectors = ListingSelectors::compile(site)?;
        let normalizer = PriceNormalizer::new(site.price_format.clone());

        stages.advance();
        info!(
            site = %site.name,
            url = %site.url,
            fetcher = self.fetcher.name(),
            "Fetching listing page"
        );
        let body = self.fetcher.fetch(&site.url, &site.user_agent).await?;

        let batch: NormalizedBatch = {
            let document = parse_document(&site.url, &body)?;
            stages.advance();
            let listings = extract_listings(&document, &selectors);
            stages.advance();
            normalize_batch(listings, &normalizer, &pair.source)
        };

        if batch.items.is_empty() {
            return Err(PipelineError::EmptyResult {
                extracted: batch.extracted,
                dropped: batch.dropped,
            });
        }
        if batch.dropped > 0 {
            warn!(
                dropped = batch.dropped,
                extracted = batch.extracted,
                "Some listings could not be normalized"
            );
        }
        info!(
            items = batch.items.len(),
            extracted = batch.extracted,
            "Listings normalized"
        );

        stages.advance();
        let (base, quote) = site.direction.rate_request(pair);
        let rate = self.rates.lookup(base, quote, credential).await?;
        if rate.base() != base || rate.quote() != quote {
            return Err(RateLookupError::new(
                RateFailureReason::MalformedResponse,
                format!(
                    "{} returned {}/{} for a {}/{} request",
                    self.rates.name(),
                    rate.base(),
                    rate.quote(),
                    base,
                    quote
                ),
            )
            .into());
        }

        stages.advance();
        let captured_at = Utc::now();
        let mut dropped = batch.dropped;
        let mut records = Vec::with_capacity(batch.items.len());
        for item in batch.items {
            let name = item.name.clone();
            match price_item(item, &rate, site.direction, &pair.target, captured_at) {
                Some(record) => records.push(record),
                None => {
                    warn!(name = %name, "Conversion overflowed, item skipped");
                    dropped += 1;
                }
            }
        }

        stages.advance();
        info!(
            site = %site.name,
            records = records.len(),
            dropped,
            rate = %rate,
            "Pipeline run complete"
        );

        Ok(PipelineResult {
            records,
            rate,
            source_currency: pair.source.clone(),
            target_currency: pair.target.clone(),
            extracted: batch.extracted,
            dropped,
            captured_at,
        })
    }
}

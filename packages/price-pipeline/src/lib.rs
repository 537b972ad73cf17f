//! Listing Price Conversion Pipeline
//!
//! Fetches one listing page, extracts (name, price) pairs with CSS selectors,
//! normalizes free-text prices into decimals, converts them with a single live
//! exchange rate, and hands back an auditable record set.
//!
//! # Design Philosophy
//!
//! - A run either produces every record or nothing
//! - Per-item problems are counted, never fatal
//! - Money is `Decimal` from parse to output
//! - One rate per run, stamped with one batch timestamp
//!
//! # Usage
//!
//! ```rust,ignore
//! use price_pipeline::{ExchangeRateApiProvider, HttpFetcher, Pipeline, RunConfig, SiteExtractionConfig};
//! use price_pipeline::report::{ReportAssembler, DEFAULT_DISPLAY_LIMIT};
//!
//! let run = RunConfig::new(SiteExtractionConfig::books())
//!     .with_target_currency("KES")
//!     .with_api_key(std::env::var("EXCHANGERATE_API_KEY")?)
//!     .validate()?;
//!
//! let pipeline = Pipeline::new(HttpFetcher::new()?, ExchangeRateApiProvider::new());
//! let result = pipeline.run_validated(&run).await?;
//! let report = ReportAssembler::new().assemble(&result, DEFAULT_DISPLAY_LIMIT);
//! println!("{}", report.table);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams for document fetching and rate lookup
//! - [`types`] - Currency codes, records and run configuration
//! - [`pipeline`] - Extraction, normalization, conversion and the orchestrator
//! - [`fetchers`] - HTTP document fetcher
//! - [`providers`] - ExchangeRate-API rate provider
//! - [`report`] - Display table and chart dataset
//! - [`output`] - CSV and JSON output files
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod report;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    FetchError, InputValidationError, OutputError, PipelineError, RateFailureReason,
    RateLookupError, Result,
};
pub use traits::{fetcher::DocumentFetcher, rate::RateProvider};
pub use types::{
    config::{ConversionDirection, PriceFormat, RunConfig, SiteExtractionConfig, ValidatedRun},
    record::{
        CurrencyCode, CurrencyPair, ExchangeRate, NormalizedItem, PipelineResult, PricedRecord,
        RawListing,
    },
};

pub use pipeline::{NormalizationSkip, Pipeline, PipelineStage, PriceNormalizer};

pub use fetchers::HttpFetcher;
pub use providers::ExchangeRateApiProvider;
pub use security::ApiCredential;

pub use output::{OutputPaths, PricedRow};
pub use report::{Report, ReportAssembler, ReportTable};

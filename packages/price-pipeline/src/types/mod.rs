//! Domain types.

pub mod config;
pub mod record;

pub use config::{ConversionDirection, PriceFormat, RunConfig, SiteExtractionConfig, ValidatedRun};
pub use record::{
    CurrencyCode, CurrencyPair, ExchangeRate, NormalizedItem, PipelineResult, PricedRecord,
    RawListing,
};

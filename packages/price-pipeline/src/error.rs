//! Typed errors for the price pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! bad command line from a dead network from an empty listing page.
//!
//! Per-item problems (an unparseable price, a blank name) are not errors at
//! all; see [`NormalizationSkip`](crate::pipeline::normalize::NormalizationSkip).

use std::fmt;
use thiserror::Error;

use crate::pipeline::stage::PipelineStage;

/// Terminal failures of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input was missing or malformed (pre-flight)
    #[error("invalid input: {0}")]
    InputValidation(#[from] InputValidationError),

    /// The listing document could not be obtained
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The exchange rate could not be obtained
    #[error("rate lookup failed: {0}")]
    RateLookup(#[from] RateLookupError),

    /// Nothing survived extraction and normalization
    #[error("no usable records ({extracted} extracted, {dropped} dropped)")]
    EmptyResult { extracted: usize, dropped: usize },
}

impl PipelineError {
    /// The stage the run was in when it failed.
    pub fn failed_stage(&self) -> PipelineStage {
        match self {
            Self::InputValidation(_) => PipelineStage::Idle,
            Self::Fetch(_) => PipelineStage::Fetching,
            Self::EmptyResult { .. } => PipelineStage::Normalizing,
            Self::RateLookup(_) => PipelineStage::RateLookup,
        }
    }
}

/// Missing or malformed run inputs, detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("target currency cannot be empty")]
    MissingTargetCurrency,

    #[error("API key is required")]
    MissingCredential,

    #[error("invalid currency code {value:?}: expected three letters")]
    InvalidCurrency { value: String },

    #[error("invalid {field} selector {selector:?}: {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("invalid site URL: {url}")]
    InvalidUrl { url: String },

    #[error("unknown site preset: {name}")]
    UnknownSite { name: String },

    #[error("invalid site config: {0}")]
    InvalidSiteConfig(String),
}

/// Errors obtaining the listing document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection, body read)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Server answered with nothing parseable
    #[error("empty document from {url}")]
    EmptyDocument { url: String },
}

/// Why a rate lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFailureReason {
    InvalidCredential,
    UnsupportedPair,
    TransportFailure,
    MalformedResponse,
}

impl fmt::Display for RateFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidCredential => "invalid credential",
            Self::UnsupportedPair => "unsupported currency pair",
            Self::TransportFailure => "transport failure",
            Self::MalformedResponse => "malformed response",
        };
        f.write_str(s)
    }
}

/// A failed exchange-rate lookup. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}: {detail}")]
pub struct RateLookupError {
    pub reason: RateFailureReason,
    pub detail: String,
}

impl RateLookupError {
    pub fn new(reason: RateFailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// Errors writing or reading the delimited output files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for document fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for rate lookups.
pub type RateResult<T> = std::result::Result<T, RateLookupError>;

/// Result type alias for output files.
pub type OutputResult<T> = std::result::Result<T, OutputError>;

use thiserror::Error;

use crate::types::ErrorType;

/// Errors returned by [`ExchangeRateClient`](crate::ExchangeRateClient).
#[derive(Debug, Error)]
pub enum ExchangeRateError {
    /// The request never produced a readable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `"result": "error"`
    #[error("API error (HTTP {status}): {error_type}")]
    Api { status: u16, error_type: ErrorType },

    /// The configured base URL cannot carry path segments
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The body was not the JSON shape the pair endpoint documents
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ExchangeRateError>;

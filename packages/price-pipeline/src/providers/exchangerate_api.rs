//! [`RateProvider`] backed by ExchangeRate-API's pair endpoint.

use async_trait::async_trait;
use chrono::Utc;
use exchangerate_client::{ErrorType, ExchangeRateClient, ExchangeRateError, PairRate};
use tracing::{info, warn};

use crate::error::{RateFailureReason, RateLookupError, RateResult};
use crate::security::ApiCredential;
use crate::traits::rate::RateProvider;
use crate::types::{CurrencyCode, ExchangeRate};

pub struct ExchangeRateApiProvider {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
        }
    }

    /// Override the API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn client_for(&self, credential: &ApiCredential) -> ExchangeRateClient {
        let client = ExchangeRateClient::new(credential.expose().to_string())
            .with_client(self.client.clone());
        match &self.base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    async fn lookup(
        &self,
        base: &CurrencyCode,
        quote: &CurrencyCode,
        credential: &ApiCredential,
    ) -> RateResult<ExchangeRate> {
        let pair = self
            .client_for(credential)
            .pair(base.as_str(), quote.as_str())
            .await
            .map_err(|e| {
                let mapped = map_client_error(e);
                warn!(base = %base, quote = %quote, error = %mapped, "Rate lookup failed");
                mapped
            })?;

        let published = pair.last_updated;
        let rate = to_exchange_rate(base, quote, pair)?;
        info!(rate = %rate, published = ?published, "Exchange rate resolved");
        Ok(rate)
    }

    fn name(&self) -> &str {
        "exchangerate-api"
    }
}

/// Classify a client error into the pipeline's rate failure reasons.
pub fn map_client_error(error: ExchangeRateError) -> RateLookupError {
    match error {
        ExchangeRateError::Http(e) => {
            RateLookupError::new(RateFailureReason::TransportFailure, e.to_string())
        }
        ExchangeRateError::Api { error_type, .. } => {
            let reason = match error_type {
                ErrorType::InvalidKey | ErrorType::InactiveAccount | ErrorType::QuotaReached => {
                    RateFailureReason::InvalidCredential
                }
                ErrorType::UnsupportedCode | ErrorType::MalformedRequest => {
                    RateFailureReason::UnsupportedPair
                }
                ErrorType::Other(_) => RateFailureReason::MalformedResponse,
            };
            RateLookupError::new(reason, error_type.to_string())
        }
        ExchangeRateError::InvalidBaseUrl(detail) => {
            RateLookupError::new(RateFailureReason::TransportFailure, detail)
        }
        ExchangeRateError::InvalidResponse(detail) => {
            RateLookupError::new(RateFailureReason::MalformedResponse, detail)
        }
    }
}

/// Check the echoed pair and wrap it as an [`ExchangeRate`].
fn to_exchange_rate(
    base: &CurrencyCode,
    quote: &CurrencyCode,
    pair: PairRate,
) -> RateResult<ExchangeRate> {
    let echoed = |code: &str, expected: &CurrencyCode| {
        code.is_empty() || code.eq_ignore_ascii_case(expected.as_str())
    };
    if !echoed(&pair.base_code, base) || !echoed(&pair.target_code, quote) {
        return Err(RateLookupError::new(
            RateFailureReason::MalformedResponse,
            format!(
                "asked for {base}/{quote}, got {}/{}",
                pair.base_code, pair.target_code
            ),
        ));
    }

    ExchangeRate::new(base.clone(), quote.clone(), pair.conversion_rate, Utc::now())
}

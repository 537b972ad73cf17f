//! Pure ExchangeRate-API REST client.
//!
//! A minimal client for the v6 pair-conversion endpoint. One call, one rate,
//! no retries and no caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use exchangerate_client::ExchangeRateClient;
//!
//! let client = ExchangeRateClient::new("your-api-key".into());
//!
//! let rate = client.pair("GBP", "KES").await?;
//! println!("1 {} = {} {}", rate.base_code, rate.conversion_rate, rate.target_code);
//! ```

pub mod error;
pub mod types;

pub use error::{ExchangeRateError, Result};
pub use types::{ErrorType, PairRate, PairResponse};

use chrono::DateTime;
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

const BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

pub struct ExchangeRateClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (staging, local stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Look up how many `target` units one `base` unit buys.
    pub async fn pair(&self, base: &str, target: &str) -> Result<PairRate> {
        let url = self.pair_url(base, target)?;
        tracing::debug!(base, target, "Requesting pair rate");

        // reqwest errors embed the URL, and the URL embeds the key
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExchangeRateError::Http(e.without_url()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ExchangeRateError::Http(e.without_url()))?;

        let rate = parse_pair_response(status, &body)?;
        tracing::info!(
            base = %rate.base_code,
            target = %rate.target_code,
            rate = %rate.conversion_rate,
            "Pair rate resolved"
        );
        Ok(rate)
    }
}

impl ExchangeRateClient {
    /// `{base_url}/{key}/pair/{base}/{target}`, each piece one encoded segment.
    fn pair_url(&self, base: &str, target: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ExchangeRateError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ExchangeRateError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([self.api_key.as_str(), "pair", base, target]);
        Ok(url)
    }
}

/// Interpret a pair-endpoint response body.
///
/// Error bodies arrive with 4xx statuses but are still JSON, so the body is
/// parsed before the status is considered.
pub fn parse_pair_response(status: u16, body: &str) -> Result<PairRate> {
    let parsed: PairResponse = serde_json::from_str(body).map_err(|e| {
        ExchangeRateError::InvalidResponse(format!("HTTP {status}: unreadable body: {e}"))
    })?;

    if parsed.result != "success" {
        let error_type = parsed
            .error_type
            .as_deref()
            .map(ErrorType::from)
            .unwrap_or_else(|| ErrorType::Other("unknown-error".to_string()));
        return Err(ExchangeRateError::Api { status, error_type });
    }

    if !(200..300).contains(&status) {
        return Err(ExchangeRateError::InvalidResponse(format!(
            "HTTP {status} with a success body"
        )));
    }

    let raw = parsed.conversion_rate.ok_or_else(|| {
        ExchangeRateError::InvalidResponse("missing conversion_rate".to_string())
    })?;
    let conversion_rate = decimal_from_number(&raw)?;
    if conversion_rate <= Decimal::ZERO {
        return Err(ExchangeRateError::InvalidResponse(format!(
            "non-positive conversion_rate {conversion_rate}"
        )));
    }

    Ok(PairRate {
        base_code: parsed.base_code.unwrap_or_default(),
        target_code: parsed.target_code.unwrap_or_default(),
        conversion_rate,
        last_updated: parsed
            .time_last_update_unix
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

/// JSON numbers go through their shortest textual form so `129.15` stays exactly `129.15`.
fn decimal_from_number(number: &serde_json::Number) -> Result<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ExchangeRateError::InvalidResponse(format!("conversion_rate {text}: {e}")))
}

//! Records flowing through a single pipeline run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InputValidationError, RateFailureReason, RateLookupError};

/// A three-letter currency identifier, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Trim and upper-case `raw`, then require exactly three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, InputValidationError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(InputValidationError::InvalidCurrency {
                value: raw.to_string(),
            })
        }
    }

    /// For codes known valid at compile time.
    pub(crate) fn known(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InputValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// The currencies of one run: listing prices are in `source`, output adds `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub source: CurrencyCode,
    pub target: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(source: CurrencyCode, target: CurrencyCode) -> Self {
        Self { source, target }
    }
}

/// One (name, price text) pair as found in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub name: String,
    pub price_text: String,
}

/// A listing whose price parsed into a non-negative amount.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub name: String,
    pub source_amount: Decimal,
    pub source_currency: CurrencyCode,
}

/// `1 base = rate quote`, captured once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    base: CurrencyCode,
    quote: CurrencyCode,
    rate: Decimal,
    retrieved_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Build a rate, rejecting zero and negative multipliers.
    pub fn new(
        base: CurrencyCode,
        quote: CurrencyCode,
        rate: Decimal,
        retrieved_at: DateTime<Utc>,
    ) -> Result<Self, RateLookupError> {
        if rate <= Decimal::ZERO {
            return Err(RateLookupError::new(
                RateFailureReason::MalformedResponse,
                format!("non-positive rate {rate} for {base}/{quote}"),
            ));
        }
        Ok(Self {
            base,
            quote,
            rate,
            retrieved_at,
        })
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn quote(&self) -> &CurrencyCode {
        &self.quote
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 {} = {} {}", self.base, self.rate, self.quote)
    }
}

/// The unit of persistence and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRecord {
    pub name: String,
    pub source_amount: Decimal,
    pub source_currency: CurrencyCode,
    pub target_amount: Decimal,
    pub target_currency: CurrencyCode,
    pub timestamp: DateTime<Utc>,
}

/// Output of one successful run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Records in extraction order.
    pub records: Vec<PricedRecord>,

    /// The single rate every record was converted with.
    pub rate: ExchangeRate,

    pub source_currency: CurrencyCode,
    pub target_currency: CurrencyCode,

    /// Containers that yielded a (name, price text) pair.
    pub extracted: usize,

    /// Items dropped during normalization or conversion.
    pub dropped: usize,

    /// Batch timestamp stamped on every record.
    pub captured_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_code_normalizes_case_and_space() {
        let code = CurrencyCode::parse("  kes ").unwrap();
        assert_eq!(code.as_str(), "KES");
    }

    #[test]
    fn test_currency_code_rejects_bad_shapes() {
        for bad in ["", "  ", "KE", "KESS", "K3S", "£££"] {
            assert!(CurrencyCode::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_currency_code_deserializes_through_validation() {
        let code: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(code.as_str(), "GBP");
        assert!(serde_json::from_str::<CurrencyCode>("\"pounds\"").is_err());
    }

    #[test]
    fn test_exchange_rate_must_be_positive() {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let kes = CurrencyCode::parse("KES").unwrap();

        let err = ExchangeRate::new(gbp.clone(), kes.clone(), Decimal::ZERO, Utc::now())
            .unwrap_err();
        assert_eq!(err.reason, RateFailureReason::MalformedResponse);

        let rate = ExchangeRate::new(gbp, kes, Decimal::from_str("174.35").unwrap(), Utc::now())
            .unwrap();
        assert_eq!(rate.to_string(), "1 GBP = 174.35 KES");
    }
}

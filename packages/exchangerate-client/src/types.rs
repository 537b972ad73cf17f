use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;

/// Raw body of `GET /v6/{key}/pair/{base}/{target}`.
///
/// Success and error bodies share this shape; only `result` is always present.
#[derive(Debug, Clone, Deserialize)]
pub struct PairResponse {
    pub result: String,
    #[serde(rename = "error-type")]
    pub error_type: Option<String>,
    pub base_code: Option<String>,
    pub target_code: Option<String>,
    pub conversion_rate: Option<serde_json::Number>,
    pub time_last_update_unix: Option<i64>,
}

/// A successfully resolved pair rate: `1 base_code = conversion_rate target_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRate {
    pub base_code: String,
    pub target_code: String,
    pub conversion_rate: Decimal,
    /// When the provider last refreshed this rate, if reported.
    pub last_updated: Option<DateTime<Utc>>,
}

/// The documented `error-type` values of the v6 API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    UnsupportedCode,
    MalformedRequest,
    InvalidKey,
    InactiveAccount,
    QuotaReached,
    Other(String),
}

impl From<&str> for ErrorType {
    fn from(value: &str) -> Self {
        match value {
            "unsupported-code" => Self::UnsupportedCode,
            "malformed-request" => Self::MalformedRequest,
            "invalid-key" => Self::InvalidKey,
            "inactive-account" => Self::InactiveAccount,
            "quota-reached" => Self::QuotaReached,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnsupportedCode => "unsupported-code",
            Self::MalformedRequest => "malformed-request",
            Self::InvalidKey => "invalid-key",
            Self::InactiveAccount => "inactive-account",
            Self::QuotaReached => "quota-reached",
            Self::Other(other) => other.as_str(),
        };
        f.write_str(s)
    }
}

//! Configuration types for sites and runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputValidationError;
use crate::pipeline::extract::ListingSelectors;
use crate::report::DEFAULT_DISPLAY_LIMIT;
use crate::security::ApiCredential;
use crate::types::record::{CurrencyCode, CurrencyPair};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// How a listing amount combines with the looked-up rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionDirection {
    /// Rate is `listing -> target`; `target = amount * rate`.
    Multiply,
    /// Rate is `target -> listing`; `target = amount / rate`.
    Divide,
}

impl ConversionDirection {
    /// The (base, quote) to request for a pair under this direction.
    pub fn rate_request<'a>(&self, pair: &'a CurrencyPair) -> (&'a CurrencyCode, &'a CurrencyCode) {
        match self {
            Self::Multiply => (&pair.source, &pair.target),
            Self::Divide => (&pair.target, &pair.source),
        }
    }
}

/// How price text is written on a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    /// Literal tokens removed before parsing, applied in order.
    ///
    /// List longer tokens first when one contains another (`"Â£"` before `"£"`).
    #[serde(default)]
    pub symbols: Vec<String>,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_thousands_separator() -> char {
    ','
}

fn default_decimal_separator() -> char {
    '.'
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl PriceFormat {
    /// Add a symbol to strip.
    pub fn strip(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Use continental separators (`1.234,50`).
    pub fn with_separators(mut self, thousands: char, decimal: char) -> Self {
        self.thousands_separator = thousands;
        self.decimal_separator = decimal;
        self
    }
}

/// Everything site-specific about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteExtractionConfig {
    /// Short identifier, also used to name output files.
    pub name: String,

    pub url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Currency the listing prices are quoted in.
    pub listing_currency: CurrencyCode,

    /// Selector matching one listing container.
    pub container: String,

    /// Selector for the name element inside a container.
    pub name_selector: String,

    /// Read the name from this attribute instead of the element text.
    #[serde(default)]
    pub name_attribute: Option<String>,

    /// Selector for the price element inside a container.
    pub price_selector: String,

    #[serde(default)]
    pub price_format: PriceFormat,

    pub direction: ConversionDirection,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl SiteExtractionConfig {
    /// First catalogue page of books.toscrape.com, priced in GBP.
    pub fn books() -> Self {
        Self {
            name: "books".to_string(),
            url: "https://books.toscrape.com/catalogue/page-1.html".to_string(),
            user_agent: default_user_agent(),
            listing_currency: CurrencyCode::known("GBP"),
            container: "article.product_pod".to_string(),
            name_selector: "h3 a".to_string(),
            name_attribute: Some("title".to_string()),
            price_selector: "p.price_color".to_string(),
            price_format: PriceFormat::default().strip("Â£").strip("£"),
            direction: ConversionDirection::Multiply,
        }
    }

    /// Jumia Kenya smartphone listing, priced in KES.
    pub fn jumia() -> Self {
        Self {
            name: "jumia".to_string(),
            url: "https://www.jumia.co.ke/phones-tablets/smartphones/".to_string(),
            user_agent: default_user_agent(),
            listing_currency: CurrencyCode::known("KES"),
            container: "article.prd".to_string(),
            name_selector: "h3.name".to_string(),
            name_attribute: None,
            price_selector: "div.prc".to_string(),
            price_format: PriceFormat::default().strip("KSh"),
            direction: ConversionDirection::Divide,
        }
    }

    /// Look up a built-in site by name.
    pub fn preset(name: &str) -> Result<Self, InputValidationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "books" => Ok(Self::books()),
            "jumia" => Ok(Self::jumia()),
            other => Err(InputValidationError::UnknownSite {
                name: other.to_string(),
            }),
        }
    }

    /// Load a custom site from JSON.
    pub fn from_json(json: &str) -> Result<Self, InputValidationError> {
        serde_json::from_str(json)
            .map_err(|e| InputValidationError::InvalidSiteConfig(e.to_string()))
    }

    /// Check the URL and compile every selector.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        if self.name.trim().is_empty() {
            return Err(InputValidationError::InvalidSiteConfig(
                "site name cannot be empty".to_string(),
            ));
        }

        if self.price_format.thousands_separator == self.price_format.decimal_separator {
            return Err(InputValidationError::InvalidSiteConfig(format!(
                "thousands and decimal separators are both {:?}",
                self.price_format.decimal_separator
            )));
        }

        let parsed = url::Url::parse(&self.url).map_err(|_| InputValidationError::InvalidUrl {
            url: self.url.clone(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(InputValidationError::InvalidUrl {
                url: self.url.clone(),
            });
        }

        ListingSelectors::compile(self)?;
        Ok(())
    }
}

/// Unvalidated run inputs, as gathered from flags, env or prompts.
#[derive(Clone)]
pub struct RunConfig {
    pub site: SiteExtractionConfig,

    /// Overrides the site's listing currency when set.
    pub source_currency: Option<String>,

    pub target_currency: Option<String>,

    pub api_key: Option<String>,

    /// Rows shown in the report table and chart.
    pub display_limit: usize,
}

impl RunConfig {
    pub fn new(site: SiteExtractionConfig) -> Self {
        Self {
            site,
            source_currency: None,
            target_currency: None,
            api_key: None,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }

    pub fn with_source_currency(mut self, code: impl Into<String>) -> Self {
        self.source_currency = Some(code.into());
        self
    }

    pub fn with_target_currency(mut self, code: impl Into<String>) -> Self {
        self.target_currency = Some(code.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    /// Resolve defaults and check every input. Makes no network calls.
    pub fn validate(self) -> Result<ValidatedRun, InputValidationError> {
        let target = match self.target_currency.as_deref().map(str::trim) {
            None | Some("") => return Err(InputValidationError::MissingTargetCurrency),
            Some(raw) => CurrencyCode::parse(raw)?,
        };

        let credential = match self.api_key {
            Some(key) => ApiCredential::new(key)?,
            None => return Err(InputValidationError::MissingCredential),
        };

        let mut site = self.site;
        let source = match self.source_currency.as_deref().map(str::trim) {
            None | Some("") => site.listing_currency.clone(),
            Some(raw) => CurrencyCode::parse(raw)?,
        };
        site.listing_currency = source.clone();
        site.validate()?;

        Ok(ValidatedRun {
            site,
            pair: CurrencyPair::new(source, target),
            credential,
            display_limit: self.display_limit,
        })
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("site", &self.site.name)
            .field("source_currency", &self.source_currency)
            .field("target_currency", &self.target_currency)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("display_limit", &self.display_limit)
            .finish()
    }
}

/// Inputs that passed [`RunConfig::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedRun {
    pub site: SiteExtractionConfig,
    pub pair: CurrencyPair,
    pub credential: ApiCredential,
    pub display_limit: usize,
}

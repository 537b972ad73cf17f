//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without network access.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, RateFailureReason, RateLookupError, RateResult};
use crate::security::ApiCredential;
use crate::traits::{fetcher::DocumentFetcher, rate::RateProvider};
use crate::types::{CurrencyCode, ExchangeRate};

/// Serves canned documents by URL. Unknown URLs answer 404.
///
/// Clones share state, so a test can keep a handle for call assertions.
#[derive(Default, Clone)]
pub struct MockFetcher {
    documents: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document that will be returned for `url`.
    pub fn add_document(&self, url: &str, body: impl Into<String>) {
        self.documents
            .write()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    /// Builder form of [`add_document`](Self::add_document).
    pub fn with_document(self, url: &str, body: impl Into<String>) -> Self {
        self.add_document(url, body);
        self
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str, _user_agent: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        self.documents
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Returns a fixed rate, or a fixed failure, for every lookup.
#[derive(Clone)]
pub struct MockRateProvider {
    outcome: Result<Decimal, RateFailureReason>,
    answer_as: Option<(String, String)>,
    calls: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockRateProvider {
    pub fn with_rate(rate: Decimal) -> Self {
        Self {
            outcome: Ok(rate),
            answer_as: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(reason: RateFailureReason) -> Self {
        Self {
            outcome: Err(reason),
            answer_as: None,
            calls: Arc::default(),
        }
    }

    /// Label the returned rate with a different pair than was requested.
    pub fn answering_as(mut self, base: &str, quote: &str) -> Self {
        self.answer_as = Some((base.to_string(), quote.to_string()));
        self
    }

    /// (base, quote) of every lookup so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    async fn lookup(
        &self,
        base: &CurrencyCode,
        quote: &CurrencyCode,
        _credential: &ApiCredential,
    ) -> RateResult<ExchangeRate> {
        self.calls
            .write()
            .unwrap()
            .push((base.to_string(), quote.to_string()));

        let rate = self
            .outcome
            .map_err(|reason| RateLookupError::new(reason, "mock failure"))?;

        let (base, quote) = match &self.answer_as {
            Some((b, q)) => (
                CurrencyCode::parse(b).map_err(|e| {
                    RateLookupError::new(RateFailureReason::MalformedResponse, e.to_string())
                })?,
                CurrencyCode::parse(q).map_err(|e| {
                    RateLookupError::new(RateFailureReason::MalformedResponse, e.to_string())
                })?,
            ),
            None => (base.clone(), quote.clone()),
        };
        ExchangeRate::new(base, quote, rate, Utc::now())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Markup shaped like the two supported listing sites.
pub mod fixtures {
    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// A books.toscrape.com catalogue page with one `product_pod` per entry.
    pub fn books_page(books: &[(&str, &str)]) -> String {
        let pods: String = books
            .iter()
            .map(|(title, price)| {
                let title = escape(title);
                format!(
                    r#"<li class="col-xs-6 col-sm-4 col-md-3 col-lg-3">
  <article class="product_pod">
    <div class="image_container"><a href="x/index.html"><img src="x.jpg" alt="{title}"></a></div>
    <p class="star-rating Three"></p>
    <h3><a href="x/index.html" title="{title}">{title}</a></h3>
    <div class="product_price">
      <p class="price_color">{price}</p>
      <p class="instock availability">In stock</p>
    </div>
  </article>
</li>
"#,
                    price = escape(price)
                )
            })
            .collect();

        format!(
            "<!DOCTYPE html><html lang=\"en-us\"><head><meta charset=\"utf-8\"><title>All products | Books to Scrape</title></head>\
             <body><section><ol class=\"row\">\n{pods}</ol></section></body></html>"
        )
    }

    /// A Jumia category page with one `article.prd` per entry.
    pub fn jumia_page(products: &[(&str, &str)]) -> String {
        let articles: String = products
            .iter()
            .map(|(name, price)| {
                format!(
                    r#"<article class="prd _fb col c-prd">
  <a class="core" href="/p.html">
    <div class="img-c"><img class="img" alt=""></div>
    <div class="info">
      <h3 class="name">{name}</h3>
      <div class="prc">{price}</div>
      <div class="s-prc-w"><div class="old">KSh 25,000</div></div>
    </div>
  </a>
</article>
"#,
                    name = escape(name),
                    price = escape(price)
                )
            })
            .collect();

        format!(
            "<!DOCTYPE html><html><head><title>Smartphones | Jumia Kenya</title></head>\
             <body><div class=\"-paxs row _no-g _4cl-3cm-shs\">\n{articles}</div></body></html>"
        )
    }
}

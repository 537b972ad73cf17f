//! Free-text price normalization.
//!
//! `"£1,234.50"` and `"KSh 2,000"` become `1234.50` and `2000`. Anything that
//! does not reduce to a plain non-negative decimal is rejected, never guessed.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::types::{CurrencyCode, NormalizedItem, PriceFormat, RawListing};

/// Converts price text into an amount according to a site's [`PriceFormat`].
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    format: PriceFormat,
}

impl PriceNormalizer {
    pub fn new(format: PriceFormat) -> Self {
        Self { format }
    }

    /// Parse one price string. `None` means the item should be dropped.
    pub fn normalize(&self, price_text: &str) -> Option<Decimal> {
        let mut text = price_text.to_string();
        for symbol in &self.format.symbols {
            if !symbol.is_empty() {
                text = text.replace(symbol.as_str(), "");
            }
        }

        // char::is_whitespace covers U+00A0, U+202F and the other locale spaces
        let mut cleaned = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_whitespace() || c == self.format.thousands_separator {
                continue;
            }
            if c == self.format.decimal_separator {
                cleaned.push('.');
            } else {
                cleaned.push(c);
            }
        }

        if !is_plain_decimal(&cleaned) {
            return None;
        }
        Decimal::from_str(&cleaned).ok()
    }
}

/// Digits with at most one interior-or-trailing point and at least one digit.
///
/// Rejects signs, exponents, letters and repeated points.
fn is_plain_decimal(s: &str) -> bool {
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1 && !s.starts_with('.')
}

/// Why a raw listing did not become a [`NormalizedItem`].
///
/// Expected and tallied, never surfaced as a run failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationSkip {
    EmptyName,
    UnparseablePrice { price_text: String },
}

/// Turn one raw listing into an item, or report why it was skipped.
pub fn normalize_listing(
    listing: RawListing,
    normalizer: &PriceNormalizer,
    currency: &CurrencyCode,
) -> Result<NormalizedItem, NormalizationSkip> {
    let name = listing.name.trim();
    if name.is_empty() {
        return Err(NormalizationSkip::EmptyName);
    }

    let amount = normalizer
        .normalize(&listing.price_text)
        .ok_or_else(|| NormalizationSkip::UnparseablePrice {
            price_text: listing.price_text.clone(),
        })?;

    Ok(NormalizedItem {
        name: name.to_string(),
        source_amount: amount,
        source_currency: currency.clone(),
    })
}

/// Items that survived normalization, plus the tallies of what did not.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub items: Vec<NormalizedItem>,
    pub extracted: usize,
    pub dropped: usize,
}

/// Drain `listings` through the normalizer, keeping extraction order.
pub fn normalize_batch(
    listings: impl Iterator<Item = RawListing>,
    normalizer: &PriceNormalizer,
    currency: &CurrencyCode,
) -> NormalizedBatch {
    listings.fold(NormalizedBatch::default(), |mut batch, listing| {
        batch.extracted += 1;
        match normalize_listing(listing, normalizer, currency) {
            Ok(item) => batch.items.push(item),
            Err(skip) => {
                debug!(?skip, "Dropping listing");
                batch.dropped += 1;
            }
        }
        batch
    })
}

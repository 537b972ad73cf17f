//! Amount conversion and rounding.
//!
//! Money stays in `Decimal` end to end. Results are rounded to two places,
//! midpoint away from zero: `10.005 -> 10.01`, `10.004 -> 10.00`.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{ConversionDirection, CurrencyCode, ExchangeRate, NormalizedItem, PricedRecord};

/// Decimal places kept on converted amounts.
pub const MONEY_SCALE: u32 = 2;

/// Round to [`MONEY_SCALE`] places, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Combine an amount with a rate. `None` only on decimal overflow.
pub fn convert_amount(
    amount: Decimal,
    rate: Decimal,
    direction: ConversionDirection,
) -> Option<Decimal> {
    let raw = match direction {
        ConversionDirection::Multiply => amount.checked_mul(rate)?,
        ConversionDirection::Divide => amount.checked_div(rate)?,
    };
    Some(round_money(raw))
}

/// Build the priced record for one item, stamped with the batch timestamp.
pub fn price_item(
    item: NormalizedItem,
    rate: &ExchangeRate,
    direction: ConversionDirection,
    target_currency: &CurrencyCode,
    timestamp: DateTime<Utc>,
) -> Option<PricedRecord> {
    let target_amount = convert_amount(item.source_amount, rate.rate(), direction)?;
    Some(PricedRecord {
        name: item.name,
        source_amount: item.source_amount,
        source_currency: item.source_currency,
        target_amount,
        target_currency: target_currency.clone(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("10.015")), dec("10.02"));
        assert_eq!(round_money(dec("10.025")), dec("10.03"));
        assert_eq!(round_money(dec("10.004999")), dec("10.00"));
        assert_eq!(round_money(dec("0.005")), dec("0.01"));
    }

    #[test]
    fn test_identity_rate_applies_rounding() {
        let converted = convert_amount(dec("10.005"), Decimal::ONE, ConversionDirection::Multiply);
        assert_eq!(converted, Some(dec("10.01")));
    }

    #[test]
    fn test_multiply_direction() {
        let converted =
            convert_amount(dec("51.77"), dec("174.3519"), ConversionDirection::Multiply).unwrap();
        // 51.77 * 174.3519 = 9026.197863
        assert_eq!(converted, dec("9026.20"));
    }

    #[test]
    fn test_divide_direction() {
        let converted =
            convert_amount(dec("18999"), dec("129.15"), ConversionDirection::Divide).unwrap();
        // 18999 / 129.15 = 147.1080...
        assert_eq!(converted, dec("147.11"));
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(
            convert_amount(Decimal::MAX, dec("2"), ConversionDirection::Multiply),
            None
        );
    }

    #[test]
    fn test_price_item_stamps_timestamp() {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let kes = CurrencyCode::parse("KES").unwrap();
        let ts = Utc::now();
        let rate = ExchangeRate::new(gbp.clone(), kes.clone(), dec("2"), ts).unwrap();

        let record = price_item(
            NormalizedItem {
                name: "Olio".into(),
                source_amount: dec("23.88"),
                source_currency: gbp.clone(),
            },
            &rate,
            ConversionDirection::Multiply,
            &kes,
            ts,
        )
        .unwrap();

        assert_eq!(record.target_amount, dec("47.76"));
        assert_eq!(record.source_currency, gbp);
        assert_eq!(record.target_currency, kes);
        assert_eq!(record.timestamp, ts);
    }
}

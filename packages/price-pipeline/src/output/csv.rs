//! Delimited listing snapshot and converted-price files.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::{OutputError, OutputResult};
use crate::types::{CurrencyCode, PipelineResult};

/// Timestamp column format, always UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn price_header(currency: &CurrencyCode) -> String {
    format!("Price ({currency})")
}

/// `Name,Price (<SRC>)`, one row per record.
pub fn render_listings<W: Write>(writer: W, result: &PipelineResult) -> OutputResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(["Name".to_string(), price_header(&result.source_currency)])?;
    for record in &result.records {
        csv.write_record([record.name.clone(), record.source_amount.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// `Name,Price (<SRC>),Price (<TGT>),Timestamp`, one row per record.
pub fn render_priced_records<W: Write>(writer: W, result: &PipelineResult) -> OutputResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record([
        "Name".to_string(),
        price_header(&result.source_currency),
        price_header(&result.target_currency),
        "Timestamp".to_string(),
    ])?;
    for record in &result.records {
        csv.write_record([
            record.name.clone(),
            record.source_amount.to_string(),
            format!("{:.2}", record.target_amount),
            record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// A row of the converted-price file, read back.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRow {
    pub name: String,
    pub source_amount: Decimal,
    pub target_amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Parse a converted-price file. The header row is skipped, not checked.
pub fn read_priced_rows<R: Read>(reader: R) -> OutputResult<Vec<PricedRow>> {
    let mut csv = ::csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv.records().enumerate() {
        let record = record?;
        let field = |i: usize| {
            record
                .get(i)
                .ok_or_else(|| OutputError::Parse(format!("row {}: missing column {i}", index + 1)))
        };
        let amount = |i: usize| -> OutputResult<Decimal> {
            let text = field(i)?;
            Decimal::from_str(text)
                .map_err(|e| OutputError::Parse(format!("row {}: {text:?}: {e}", index + 1)))
        };

        let stamp = field(3)?;
        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| OutputError::Parse(format!("row {}: {stamp:?}: {e}", index + 1)))?
            .and_utc();

        rows.push(PricedRow {
            name: field(0)?.to_string(),
            source_amount: amount(1)?,
            target_amount: amount(2)?,
            timestamp,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExchangeRate, PricedRecord};
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> PipelineResult {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let kes = CurrencyCode::parse("KES").unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let record = |name: &str, src: &str, tgt: &str| PricedRecord {
            name: name.into(),
            source_amount: dec(src),
            source_currency: gbp.clone(),
            target_amount: dec(tgt),
            target_currency: kes.clone(),
            timestamp: ts,
        };
        PipelineResult {
            records: vec![
                record("A Light in the Attic", "51.77", "9026.20"),
                record("Tipping the Velvet, Vol. 1", "53.74", "9369.78"),
                record("Free", "0", "0"),
            ],
            rate: ExchangeRate::new(gbp.clone(), kes.clone(), dec("174.3519"), ts).unwrap(),
            source_currency: gbp,
            target_currency: kes,
            extracted: 3,
            dropped: 0,
            captured_at: ts,
        }
    }

    #[test]
    fn test_priced_file_layout() {
        let mut out = Vec::new();
        render_priced_records(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name,Price (GBP),Price (KES),Timestamp");
        assert_eq!(lines[1], "A Light in the Attic,51.77,9026.20,2024-03-01 09:30:05");
        assert_eq!(
            lines[2],
            "\"Tipping the Velvet, Vol. 1\",53.74,9369.78,2024-03-01 09:30:05"
        );
        assert_eq!(lines[3], "Free,0,0.00,2024-03-01 09:30:05");
    }

    #[test]
    fn test_listing_file_layout() {
        let mut out = Vec::new();
        render_listings(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().next(), Some("Name,Price (GBP)"));
        assert_eq!(text.lines().nth(1), Some("A Light in the Attic,51.77"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_read_back_matches_records() {
        let result = sample();
        let mut out = Vec::new();
        render_priced_records(&mut out, &result).unwrap();

        let rows = read_priced_rows(out.as_slice()).unwrap();

        assert_eq!(rows.len(), result.len());
        for (row, record) in rows.iter().zip(&result.records) {
            assert_eq!(row.name, record.name);
            assert_eq!(row.source_amount, record.source_amount);
            assert_eq!(row.target_amount, record.target_amount);
            assert_eq!(row.timestamp, record.timestamp);
        }
    }

    #[test]
    fn test_read_rejects_bad_amount() {
        let text = "Name,Price (GBP),Price (KES),Timestamp\nOlio,abc,1.00,2024-03-01 09:30:05\n";
        let err = read_priced_rows(text.as_bytes()).unwrap_err();
        assert!(matches!(err, OutputError::Parse(_)));
    }
}

//! Display projections of a finished run.
//!
//! Nothing here mutates records or touches the filesystem. The table renders
//! through `Display`; the chart dataset serializes to JSON for an external
//! renderer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::types::{CurrencyCode, PipelineResult};

/// Rows shown when the caller does not ask for a different count.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// Names at or beyond this many characters are shortened.
pub const LABEL_WIDTH: usize = 20;

const ELLIPSIS: &str = "...";

/// Shorten `name` to fit `width` characters, marking the cut with `...`.
pub fn truncate_label(name: &str, width: usize) -> String {
    if name.chars().count() < width {
        return name.to_string();
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut label: String = name.chars().take(keep).collect();
    label.push_str(ELLIPSIS);
    label
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub source_amount: Decimal,
    pub target_amount: Decimal,
}

/// The first N records with both currency columns.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub source_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub captured_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn source_header(&self) -> String {
        format!("Price ({})", self.source_currency)
    }

    pub fn target_header(&self) -> String {
        format!("Price ({})", self.target_currency)
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source_header = self.source_header();
        let target_header = self.target_header();

        let amounts: Vec<(String, String)> = self
            .rows
            .iter()
            .map(|r| {
                (
                    format!("{:.2}", r.source_amount),
                    format!("{:.2}", r.target_amount),
                )
            })
            .collect();

        let name_w = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain(std::iter::once("Name".len()))
            .max()
            .unwrap_or(0);
        let source_w = amounts
            .iter()
            .map(|(s, _)| s.len())
            .chain(std::iter::once(source_header.len()))
            .max()
            .unwrap_or(0);
        let target_w = amounts
            .iter()
            .map(|(_, t)| t.len())
            .chain(std::iter::once(target_header.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:<name_w$}  {:>source_w$}  {:>target_w$}",
            "Name", source_header, target_header
        )?;
        writeln!(
            f,
            "{}  {}  {}",
            "-".repeat(name_w),
            "-".repeat(source_w),
            "-".repeat(target_w)
        )?;
        for (row, (source, target)) in self.rows.iter().zip(&amounts) {
            writeln!(
                f,
                "{:<name_w$}  {:>source_w$}  {:>target_w$}",
                row.name, source, target
            )?;
        }
        Ok(())
    }
}

/// One paired bar: the same item priced in both currencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub source_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
}

/// Paired-bar comparison data for an external chart renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub title: String,
    pub source_label: String,
    pub target_label: String,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub table: ReportTable,
    pub chart: ChartDataset,
}

/// Projects a [`PipelineResult`] into a table and a chart dataset.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    label_width: usize,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self {
            label_width: LABEL_WIDTH,
        }
    }

    pub fn with_label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    /// Take the first `limit` records in extraction order.
    pub fn assemble(&self, result: &PipelineResult, limit: usize) -> Report {
        let shown = &result.records[..limit.min(result.records.len())];

        let rows: Vec<ReportRow> = shown
            .iter()
            .map(|r| ReportRow {
                name: truncate_label(&r.name, self.label_width),
                source_amount: r.source_amount,
                target_amount: r.target_amount,
            })
            .collect();

        let bars = rows
            .iter()
            .map(|r| ChartBar {
                label: r.name.clone(),
                source_amount: r.source_amount,
                target_amount: r.target_amount,
            })
            .collect();

        let source = &result.source_currency;
        let target = &result.target_currency;
        Report {
            table: ReportTable {
                source_currency: source.clone(),
                target_currency: target.clone(),
                captured_at: result.captured_at,
                rows,
            },
            chart: ChartDataset {
                title: format!("Price Comparison: {source} vs {target}"),
                source_label: format!("Price ({source})"),
                target_label: format!("Price ({target})"),
                bars,
            },
        }
    }
}

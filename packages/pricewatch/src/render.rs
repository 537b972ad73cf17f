//! Console rendering of a finished run.

use colored::Colorize;
use price_pipeline::output::TIMESTAMP_FORMAT;
use price_pipeline::{ExchangeRate, Report};

pub fn rate_line(rate: &ExchangeRate) -> String {
    format!("Exchange Rate: {rate}")
}

pub fn table_header(report: &Report) -> String {
    format!(
        "Latest Prices (as of {})",
        report.table.captured_at.format(TIMESTAMP_FORMAT)
    )
}

/// Print the rate, a ruled header and the table to stdout.
pub fn print_report(rate: &ExchangeRate, report: &Report) {
    let header = table_header(report);
    let rule = "=".repeat(header.len());

    println!("{}", rate_line(rate).bright_cyan());
    println!();
    println!("{}", rule.dimmed());
    println!("{}", header.bold());
    println!("{}", rule.dimmed());
    print!("{}", report.table);
}

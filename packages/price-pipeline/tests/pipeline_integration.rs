//! Integration tests for a full pipeline run.
//!
//! These tests drive the public API end to end against fixture markup:
//! 1. Validate run inputs
//! 2. Run the pipeline with mock collaborators
//! 3. Assemble the report
//! 4. Write and read back the output files

use price_pipeline::{
    output::{read_priced_rows, render_priced_records, write_outputs, OutputPaths},
    report::{ReportAssembler, DEFAULT_DISPLAY_LIMIT},
    testing::{fixtures, MockFetcher, MockRateProvider},
    InputValidationError, Pipeline, PipelineError, PipelineResult, RunConfig,
    SiteExtractionConfig, ValidatedRun,
};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Helper to validate a books run targeting KES.
fn books_run() -> ValidatedRun {
    RunConfig::new(SiteExtractionConfig::books())
        .with_target_currency("kes")
        .with_api_key("test-key")
        .validate()
        .unwrap()
}

/// Helper to run the pipeline over a single page.
async fn run_page(
    run: &ValidatedRun,
    html: String,
    rate: &str,
) -> Result<PipelineResult, PipelineError> {
    let fetcher = MockFetcher::new().with_document(&run.site.url, html);
    let rates = MockRateProvider::with_rate(dec(rate));
    Pipeline::new(fetcher, rates).run_validated(run).await
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pricewatch-it-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn twelve_books() -> String {
    let titles: Vec<String> = (1..=12).map(|i| format!("Book number {i}")).collect();
    let prices: Vec<String> = (1..=12).map(|i| format!("£{i}.50")).collect();
    let pairs: Vec<(&str, &str)> = titles
        .iter()
        .zip(&prices)
        .map(|(t, p)| (t.as_str(), p.as_str()))
        .collect();
    fixtures::books_page(&pairs)
}

#[tokio::test]
async fn test_end_to_end_books_run() {
    let run = books_run();
    let html = fixtures::books_page(&[
        ("A Light in the Attic", "Â£51.77"),
        ("Tipping the Velvet", "£53.74"),
        ("Soumission", "£50.10"),
    ]);

    let result = run_page(&run, html, "174.3519").await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.source_currency.as_str(), "GBP");
    assert_eq!(result.target_currency.as_str(), "KES");
    assert_eq!(result.records[0].source_amount, dec("51.77"));
    assert_eq!(result.records[0].target_amount, dec("9026.20"));
    assert!(result.records.iter().all(|r| r.target_amount.scale() <= 2));
}

#[tokio::test]
async fn test_empty_page_aborts_without_output() {
    let run = books_run();
    let dir = scratch_dir();
    let paths = OutputPaths::for_site(&dir, "books");

    let outcome = run_page(&run, fixtures::books_page(&[]), "174.35").await;
    if let Ok(result) = &outcome {
        let report = ReportAssembler::new().assemble(result, DEFAULT_DISPLAY_LIMIT);
        write_outputs(&paths, result, &report.chart).unwrap();
    }

    assert!(matches!(
        outcome,
        Err(PipelineError::EmptyResult {
            extracted: 0,
            dropped: 0
        })
    ));
    assert!(!paths.listings.exists());
    assert!(!paths.prices.exists());
    assert!(!paths.chart.exists());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_missing_target_currency_fails_before_any_call() {
    let err = RunConfig::new(SiteExtractionConfig::books())
        .with_api_key("test-key")
        .validate()
        .unwrap_err();

    assert_eq!(err, InputValidationError::MissingTargetCurrency);
}

#[tokio::test]
async fn test_report_shows_first_ten_of_twelve() {
    let run = books_run();
    let result = run_page(&run, twelve_books(), "2").await.unwrap();
    assert_eq!(result.len(), 12);

    let report = ReportAssembler::new().assemble(&result, DEFAULT_DISPLAY_LIMIT);

    assert_eq!(report.table.rows.len(), 10);
    let names: Vec<&str> = report.table.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names[0], "Book number 1");
    assert_eq!(names[9], "Book number 10");
    assert_eq!(report.chart.bars[9].target_amount, dec("21.00"));
}

#[tokio::test]
async fn test_csv_round_trip() {
    let run = books_run();
    let dir = scratch_dir();
    let paths = OutputPaths::for_site(&dir, "books");

    let result = run_page(&run, twelve_books(), "174.3519").await.unwrap();
    let report = ReportAssembler::new().assemble(&result, DEFAULT_DISPLAY_LIMIT);
    write_outputs(&paths, &result, &report.chart).unwrap();

    let rows = read_priced_rows(fs::File::open(&paths.prices).unwrap()).unwrap();
    assert_eq!(rows.len(), result.len());
    for (row, record) in rows.iter().zip(&result.records) {
        assert_eq!(row.name, record.name);
        assert_eq!(row.source_amount, record.source_amount);
        assert_eq!(row.target_amount, record.target_amount);
        assert_eq!(
            row.timestamp.timestamp(),
            record.timestamp.timestamp(),
            "timestamps are written to the second"
        );
    }

    let listings = fs::read_to_string(&paths.listings).unwrap();
    assert_eq!(listings.lines().next(), Some("Name,Price (GBP)"));
    assert_eq!(listings.lines().count(), 13);

    fs::remove_dir_all(dir).unwrap();
}

/// The rendered prices file with the trailing timestamp column cut off.
fn rows_without_timestamp(result: &PipelineResult) -> Vec<String> {
    let mut out = Vec::new();
    render_priced_records(&mut out, result).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| match line.rsplit_once(',') {
            Some((rest, _timestamp)) => rest.to_string(),
            None => line.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_repeat_runs_differ_only_in_timestamp() {
    let run = books_run();
    let html = fixtures::books_page(&[
        ("Olio", "£23.88"),
        ("Tipping the Velvet, Vol. 1", "£53.74"),
        ("Sharp Objects", "£47.82"),
    ]);

    let first = run_page(&run, html.clone(), "174.3519").await.unwrap();
    let second = run_page(&run, html, "174.3519").await.unwrap();

    let first_rows = rows_without_timestamp(&first);
    assert_eq!(first_rows.len(), 4);
    assert_eq!(first_rows[0], "Name,Price (GBP),Price (KES)");
    assert_eq!(first_rows, rows_without_timestamp(&second));
}

#[tokio::test]
async fn test_source_override_relabels_listing_currency() {
    let run = RunConfig::new(SiteExtractionConfig::books())
        .with_source_currency("EUR")
        .with_target_currency("USD")
        .with_api_key("test-key")
        .validate()
        .unwrap();

    let fetcher = MockFetcher::new()
        .with_document(&run.site.url, fixtures::books_page(&[("Olio", "£10.00")]));
    let rates = MockRateProvider::with_rate(dec("1.1"));
    let result = Pipeline::new(fetcher, rates.clone())
        .run_validated(&run)
        .await
        .unwrap();

    assert_eq!(result.records[0].source_currency.as_str(), "EUR");
    assert_eq!(result.records[0].target_amount, dec("11.00"));
    assert_eq!(rates.calls(), vec![("EUR".to_string(), "USD".to_string())]);
}

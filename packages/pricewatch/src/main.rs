//! pricewatch
//!
//! Fetches one listing page, converts every price with a live exchange rate,
//! writes the CSV snapshots and chart dataset, then prints a comparison table.
//! Logs go to stderr; stdout carries only the report.

mod cli;
mod prompt;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use price_pipeline::output::{write_outputs, OutputPaths};
use price_pipeline::report::ReportAssembler;
use price_pipeline::{ExchangeRateApiProvider, HttpFetcher, Pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG and clap's env fallbacks see it
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,price_pipeline=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();
    let mut config = cli.to_run_config()?;
    if cli.interactive {
        config = prompt::fill_interactively(config)?;
    }
    tracing::debug!(config = ?config, "Run configuration");

    let run = config.validate().context("Invalid run configuration")?;
    tracing::info!(
        site = %run.site.name,
        source = %run.pair.source,
        target = %run.pair.target,
        "Starting price run"
    );

    let pipeline = Pipeline::new(HttpFetcher::new()?, ExchangeRateApiProvider::new());
    let result = pipeline
        .run_validated(&run)
        .await
        .with_context(|| format!("Price run for {} failed", run.site.name))?;

    let report = ReportAssembler::new().assemble(&result, run.display_limit);

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;
    let paths = OutputPaths::for_site(&cli.out_dir, &run.site.name);
    write_outputs(&paths, &result, &report.chart).context("Failed to write output files")?;

    render::print_report(&result.rate, &report);

    tracing::info!(
        records = result.len(),
        dropped = result.dropped,
        prices = %paths.prices.display(),
        chart = %paths.chart.display(),
        "Run complete"
    );

    Ok(())
}

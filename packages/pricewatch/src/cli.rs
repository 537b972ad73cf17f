//! Command-line arguments and their mapping onto a [`RunConfig`].

use anyhow::{Context, Result};
use clap::Parser;
use price_pipeline::report::DEFAULT_DISPLAY_LIMIT;
use price_pipeline::{RunConfig, SiteExtractionConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricewatch")]
#[command(about = "Scrape a listing page and compare its prices in another currency")]
pub struct Cli {
    /// Built-in site preset (books, jumia)
    #[arg(long, default_value = "books")]
    pub site: String,

    /// JSON site definition; replaces the preset
    #[arg(long, value_name = "FILE")]
    pub site_config: Option<PathBuf>,

    /// Currency the listing prices are in (defaults to the site's)
    #[arg(long, value_name = "CODE")]
    pub source: Option<String>,

    /// Currency to convert into
    #[arg(long, value_name = "CODE", env = "PRICEWATCH_TARGET_CURRENCY")]
    pub target: Option<String>,

    /// ExchangeRate-API key
    #[arg(long, value_name = "KEY", env = "EXCHANGERATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for the CSV and chart files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Rows shown in the table and chart
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DISPLAY_LIMIT)]
    pub limit: usize,

    /// Prompt for currencies and the API key
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Load the site definition, from file when given, else the preset.
    pub fn load_site(&self) -> Result<SiteExtractionConfig> {
        match &self.site_config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read site config {}", path.display()))?;
                SiteExtractionConfig::from_json(&json)
                    .with_context(|| format!("Invalid site config {}", path.display()))
            }
            None => Ok(SiteExtractionConfig::preset(&self.site)?),
        }
    }

    /// Collect flags into an unvalidated run.
    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mut config = RunConfig::new(self.load_site()?).with_display_limit(self.limit);
        config.source_currency = self.source.clone();
        config.target_currency = self.target.clone();
        config.api_key = self.api_key.clone();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_pipeline::{ConversionDirection, InputValidationError};

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pricewatch"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--target", "KES", "--api-key", "k"]);
        assert_eq!(cli.site, "books");
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert_eq!(cli.limit, 10);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_jumia_preset_maps_to_divide() {
        let cli = parse(&["--site", "jumia", "--target", "usd", "--api-key", "k"]);
        let run = cli.to_run_config().unwrap().validate().unwrap();

        assert_eq!(run.site.direction, ConversionDirection::Divide);
        assert_eq!(run.pair.source.as_str(), "KES");
        assert_eq!(run.pair.target.as_str(), "USD");
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let cli = parse(&["--site", "ebay"]);
        let err = cli.to_run_config().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputValidationError>(),
            Some(InputValidationError::UnknownSite { .. })
        ));
    }

    #[test]
    fn test_missing_site_config_file_is_an_error() {
        let cli = parse(&["--site-config", "/nonexistent/site.json"]);
        assert!(cli.load_site().is_err());
    }

    #[test]
    fn test_limit_flows_into_run() {
        let cli = parse(&["--limit", "3", "--target", "KES", "--api-key", "k"]);
        let run = cli.to_run_config().unwrap().validate().unwrap();
        assert_eq!(run.display_limit, 3);
    }
}

//! Interactive prompts for run inputs.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use price_pipeline::RunConfig;

/// Ask for the currencies, and for the API key when none was supplied.
///
/// Values already given on the command line become the prompt defaults.
pub fn fill_interactively(mut config: RunConfig) -> Result<RunConfig> {
    let theme = ColorfulTheme::default();

    let source_default = config
        .source_currency
        .clone()
        .unwrap_or_else(|| config.site.listing_currency.to_string());
    let source: String = Input::with_theme(&theme)
        .with_prompt(format!("Source currency (e.g. {source_default})"))
        .default(source_default)
        .interact_text()?;
    config.source_currency = Some(source);

    let mut target = Input::<String>::with_theme(&theme).with_prompt("Target currency (e.g. KES)");
    if let Some(existing) = config.target_currency.clone() {
        target = target.default(existing);
    }
    config.target_currency = Some(target.interact_text()?);

    if config.api_key.is_none() {
        let key = Password::with_theme(&theme)
            .with_prompt("ExchangeRate-API key")
            .interact()?;
        config.api_key = Some(key);
    }

    Ok(config)
}

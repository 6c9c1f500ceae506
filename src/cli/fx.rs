use anyhow::Result;

use crate::cli::{stock::render_price_series, ui};
use crate::core::config::AppConfig;
use crate::core::market::FxRateProvider;
use crate::providers::alpha_vantage::AlphaVantageProvider;

/// Fetches the full daily exchange-rate history for a currency pair.
/// Blank codes are rejected by the provider before any network call.
pub async fn run(config: &AppConfig, from_currency: &str, to_currency: &str) -> Result<()> {
    let provider = AlphaVantageProvider::new(
        config.alpha_vantage_base_url(),
        config.alpha_vantage_api_key(),
    );

    match provider.fetch_fx_daily(from_currency, to_currency).await {
        Ok(series) => render_price_series(&series),
        Err(e) => println!(
            "{}",
            ui::style_text(
                &format!("Error fetching currency data: {e}"),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}

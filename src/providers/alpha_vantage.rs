use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::core::market::{DailyPriceProvider, FxRateProvider};
use crate::core::series::{PriceRow, PriceSeries};

/// The provider's own name for the closing-price column. Kept as-is so
/// callers see the same label the API uses.
pub const CLOSE_LABEL: &str = "4. close";

/// Key-based provider for daily stock series and FX rate histories.
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        AlphaVantageProvider {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// The key is required for every call; a missing key fails locally
    /// before any network I/O.
    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Alpha Vantage API key is not configured"))
    }
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, DailyBar>>,
}

#[derive(Debug, Deserialize)]
struct FxDailyResponse {
    #[serde(rename = "Time Series FX (Daily)")]
    series: Option<BTreeMap<String, DailyBar>>,
}

/// Bars arrive keyed by ISO date with string-encoded numbers. Dates are
/// already chronological under BTreeMap ordering; bars that fail to
/// parse are skipped with a warning.
fn bars_to_rows(series: BTreeMap<String, DailyBar>, what: &str) -> Vec<PriceRow> {
    series
        .into_iter()
        .filter_map(|(date_str, bar)| {
            let parsed = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(anyhow::Error::from)
                .and_then(|date| {
                    Ok(PriceRow {
                        date,
                        open: bar.open.parse()?,
                        high: bar.high.parse()?,
                        low: bar.low.parse()?,
                        close: bar.close.parse()?,
                    })
                });
            match parsed {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("Skipping malformed {} bar for {}: {}", what, date_str, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl DailyPriceProvider for AlphaVantageProvider {
    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/query?function=TIME_SERIES_DAILY&symbol={}&outputsize=compact&apikey={}",
            self.base_url, symbol, api_key
        );
        debug!("Requesting daily series for {}", symbol);

        let client = reqwest::Client::builder()
            .user_agent("ecodash/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for symbol: {symbol}"))?;
        let data: DailyResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse response for {}: {}", symbol, e))?;

        // Rate-limit notes and error replies come back as 200s without
        // the series key.
        let series = data.series.ok_or_else(|| {
            anyhow!(
                "No daily time series found for symbol: {}. Response: '{}'",
                symbol,
                text.trim()
            )
        })?;
        if series.is_empty() {
            return Err(anyhow!("No daily time series found for symbol: {}", symbol));
        }

        Ok(PriceSeries {
            label: symbol.to_string(),
            close_label: CLOSE_LABEL.to_string(),
            rows: bars_to_rows(series, "price"),
        })
    }
}

#[async_trait]
impl FxRateProvider for AlphaVantageProvider {
    async fn fetch_fx_daily(&self, from: &str, to: &str) -> Result<PriceSeries> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(anyhow!(
                "Both from and to currency codes are required to fetch exchange rates"
            ));
        }
        let api_key = self.api_key()?;

        let pair = format!("{from}/{to}");
        let url = format!(
            "{}/query?function=FX_DAILY&from_symbol={}&to_symbol={}&outputsize=full&apikey={}",
            self.base_url, from, to, api_key
        );
        debug!("Requesting FX history for {}", pair);

        let client = reqwest::Client::builder()
            .user_agent("ecodash/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for currency pair: {pair}"))?;
        let data: FxDailyResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse response for {}: {}", pair, e))?;

        let series = data.series.ok_or_else(|| {
            anyhow!(
                "No exchange rate series found for currency pair: {}. Response: '{}'",
                pair,
                text.trim()
            )
        })?;
        if series.is_empty() {
            return Err(anyhow!(
                "No exchange rate series found for currency pair: {}",
                pair
            ));
        }

        Ok(PriceSeries {
            label: pair,
            close_label: CLOSE_LABEL.to_string(),
            rows: bars_to_rows(series, "rate"),
        })
    }
}

//! Market data abstractions

use anyhow::Result;
use async_trait::async_trait;

use crate::core::series::PriceSeries;

#[async_trait]
pub trait DailyPriceProvider: Send + Sync {
    /// Fetch a daily price history for a ticker over the provider's
    /// lookback window.
    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries>;
}

#[async_trait]
pub trait FxRateProvider: Send + Sync {
    /// Fetch the full daily exchange-rate history for a currency pair.
    /// Blank codes are rejected before any network call is made.
    async fn fetch_fx_daily(&self, from: &str, to: &str) -> Result<PriceSeries>;
}

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::market::DailyPriceProvider;
use crate::core::series::{PriceRow, PriceSeries};

/// Yahoo labels its closing-price column "Close", unlike Alpha Vantage's
/// "4. close". Callers consult the series' close_label rather than
/// assuming one name.
pub const CLOSE_LABEL: &str = "Close";

/// Keyless provider for daily price histories over a one-year window.
pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

fn at(values: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
    values.as_ref().and_then(|v| v.get(index)).and_then(|p| *p)
}

/// Zips the timestamp axis with the OHLC arrays. Entries without a
/// close are null padding for non-trading days and are skipped; missing
/// open/high/low fall back to the close.
fn extract_daily_rows(item: &ChartItem) -> Vec<PriceRow> {
    let (Some(timestamps), Some(quote)) = (
        item.timestamp.as_ref(),
        item.indicators.as_ref().and_then(|inds| inds.quote.first()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            let close = at(&quote.close, i)?;
            Some(PriceRow {
                date,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
            })
        })
        .collect()
}

#[async_trait]
impl DailyPriceProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooDailyFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1y",
            self.base_url, symbol
        );
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("ecodash/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .as_ref()
            .and_then(|items| items.first())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let rows = extract_daily_rows(item);
        if rows.is_empty() {
            return Err(anyhow!("No daily bars found for symbol: {}", symbol));
        }

        debug!("Fetched {} daily bars for {}", rows.len(), symbol);

        Ok(PriceSeries {
            label: symbol.to_string(),
            close_label: CLOSE_LABEL.to_string(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(symbol: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .and(query_param("interval", "1d"))
            .and(query_param("range", "1y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_daily_fetch() {
        // 2024-01-02 and 2024-01-03, midnight UTC.
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "USD"},
                    "timestamp": [1704153600, 1704240000],
                    "indicators": {
                        "quote": [{
                            "open": [186.0, 184.1],
                            "high": [188.0, 186.2],
                            "low": [184.0, 183.5],
                            "close": [185.64, 184.25]
                        }]
                    }
                }]
            }
        }"#;

        let mock_server = create_mock_server("AAPL", mock_response).await;
        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let series = provider.fetch_daily("AAPL").await.unwrap();

        assert_eq!(series.label, "AAPL");
        assert_eq!(series.close_label, "Close");
        assert_eq!(series.rows.len(), 2);
        assert_eq!(
            series.rows[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(series.rows[0].close, 185.64);
        assert_eq!(series.rows[1].high, 186.2);
    }

    #[tokio::test]
    async fn test_null_padded_bars_are_skipped() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{
                            "open": [186.0, null, 185.0],
                            "high": [188.0, null, 187.0],
                            "low": [184.0, null, 184.2],
                            "close": [185.64, null, 186.1]
                        }]
                    }
                }]
            }
        }"#;

        let mock_server = create_mock_server("AAPL", mock_response).await;
        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let series = provider.fetch_daily("AAPL").await.unwrap();

        assert_eq!(series.rows.len(), 2);
        assert_eq!(series.rows[1].close, 186.1);
    }

    #[tokio::test]
    async fn test_no_chart_result() {
        let mock_response = r#"{"chart": {"result": []}}"#;
        let mock_server = create_mock_server("INVALID", mock_response).await;

        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("INVALID").await;

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for symbol: INVALID"
        );
    }

    #[tokio::test]
    async fn test_result_without_bars() {
        let mock_response = r#"{"chart": {"result": [{"meta": {"currency": "USD"}}]}}"#;
        let mock_server = create_mock_server("AAPL", mock_response).await;

        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("AAPL").await;

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No daily bars found for symbol: AAPL"
        );
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Bind a throwaway listener to grab a free port, then drop it so
        // nothing listens there (a dropped wiremock server stays pooled).
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = YahooFinanceProvider::new(&base_url);
        let result = provider.fetch_daily("AAPL").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("Request error:")
        );
    }

    #[tokio::test]
    async fn test_yahoo_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("AAPL").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("HTTP error: 500")
        );
    }

    #[tokio::test]
    async fn test_yahoo_api_malformed_response() {
        let mock_server = create_mock_server("AAPL", r#"{"charts": []}"#).await;

        let provider = YahooFinanceProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("AAPL").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for AAPL")
        );
    }
}

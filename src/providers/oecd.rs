use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::series::{OecdRow, OecdSeriesTable};

/// OECD SDMX-JSON statistics endpoint.
pub struct OecdProvider {
    base_url: String,
}

impl OecdProvider {
    pub fn new(base_url: &str) -> Self {
        OecdProvider {
            base_url: base_url.to_string(),
        }
    }

    /// Fetches one dataset for an entity code and flattens the
    /// `dataSets[0].series` mapping into observation rows.
    pub async fn fetch_dataset(&self, dataset: &str, country_code: &str) -> Result<OecdSeriesTable> {
        let url = format!("{}/data/{}/{}.json", self.base_url, dataset, country_code);
        debug!("Requesting OECD data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("ecodash/1.0")
            .build()?;
        let response = client.get(&url).send().await.map_err(|e| {
            anyhow!(
                "Request error: {} for dataset {} URL: {}",
                e,
                dataset,
                url
            )
        })?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} fetching {} for {}",
                response.status(),
                dataset,
                country_code
            ));
        }

        let text = response.text().await?;
        let data: OecdResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse OECD response for {}/{}: {}",
                dataset,
                country_code,
                e
            )
        })?;

        let rows = data
            .data_sets
            .first()
            .map(|ds| flatten_series(&ds.series))
            .unwrap_or_default();

        if rows.is_empty() {
            return Err(anyhow!(
                "No {} data available for country code {} from OECD",
                dataset,
                country_code
            ));
        }

        debug!("Fetched {} OECD observations for {}", rows.len(), country_code);

        Ok(OecdSeriesTable {
            dataset: dataset.to_string(),
            rows,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OecdResponse {
    #[serde(rename = "dataSets", default)]
    data_sets: Vec<OecdDataSet>,
}

#[derive(Debug, Deserialize)]
struct OecdDataSet {
    #[serde(default)]
    series: BTreeMap<String, OecdSeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct OecdSeriesEntry {
    #[serde(default)]
    observations: BTreeMap<String, Vec<serde_json::Value>>,
}

/// Observation arrays hold the value in slot 0; trailing slots carry
/// flags and are ignored.
fn flatten_series(series: &BTreeMap<String, OecdSeriesEntry>) -> Vec<OecdRow> {
    let mut rows: Vec<OecdRow> = series
        .iter()
        .flat_map(|(key, entry)| {
            entry.observations.iter().filter_map(|(position, obs)| {
                obs.first().and_then(|v| v.as_f64()).map(|value| OecdRow {
                    series_key: key.clone(),
                    position: position.clone(),
                    value,
                })
            })
        })
        .collect();

    // BTreeMap ordering is lexicographic; sort positions numerically so
    // "10" follows "9".
    rows.sort_by(|a, b| {
        a.series_key.cmp(&b.series_key).then_with(|| {
            let pa = a.position.parse::<u64>();
            let pb = b.position.parse::<u64>();
            match (pa, pb) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.position.cmp(&b.position),
            }
        })
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(dataset: &str, country: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/data/{dataset}/{country}.json");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_dataset_fetch() {
        let body = r#"{
            "dataSets": [{
                "series": {
                    "0:0:0": {"observations": {"0": [100.5], "1": [101.25, 0], "10": [110.0]}},
                    "0:1:0": {"observations": {"0": [55.0]}}
                }
            }]
        }"#;
        let mock_server = create_mock_server("NAAGDP", "USA", body).await;

        let provider = OecdProvider::new(&mock_server.uri());
        let table = provider.fetch_dataset("NAAGDP", "USA").await.unwrap();

        assert_eq!(table.dataset, "NAAGDP");
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].series_key, "0:0:0");
        assert_eq!(table.rows[0].value, 100.5);
        // Positions are ordered numerically, not lexicographically.
        let positions: Vec<_> = table.rows[..3].iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["0", "1", "10"]);
        assert_eq!(table.rows[3].series_key, "0:1:0");
    }

    #[tokio::test]
    async fn test_empty_datasets() {
        let body = r#"{"dataSets": []}"#;
        let mock_server = create_mock_server("NAAGDP", "ZZZ", body).await;

        let provider = OecdProvider::new(&mock_server.uri());
        let result = provider.fetch_dataset("NAAGDP", "ZZZ").await;

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No NAAGDP data available for country code ZZZ from OECD"
        );
    }

    #[tokio::test]
    async fn test_empty_series_map() {
        let body = r#"{"dataSets": [{"series": {}}]}"#;
        let mock_server = create_mock_server("NAAGDP", "ZZZ", body).await;

        let provider = OecdProvider::new(&mock_server.uri());
        let result = provider.fetch_dataset("NAAGDP", "ZZZ").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Bind a throwaway listener to grab a free port, then drop it so
        // nothing listens there (a dropped wiremock server stays pooled).
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = OecdProvider::new(&base_url);
        let result = provider.fetch_dataset("NAAGDP", "USA").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("Request error:")
        );
    }

    #[tokio::test]
    async fn test_oecd_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = OecdProvider::new(&mock_server.uri());
        let result = provider.fetch_dataset("NAAGDP", "USA").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("HTTP error: 404")
        );
    }

    #[tokio::test]
    async fn test_oecd_malformed_response() {
        let mock_server = create_mock_server("NAAGDP", "USA", "<html>busy</html>").await;

        let provider = OecdProvider::new(&mock_server.uri());
        let result = provider.fetch_dataset("NAAGDP", "USA").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse OECD response for NAAGDP/USA")
        );
    }
}

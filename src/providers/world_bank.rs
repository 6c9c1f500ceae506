use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::indicator::{IndicatorProvider, IndicatorSpec};
use crate::core::series::{IndicatorRow, IndicatorSeries};

/// National-accounts statistics provider. One parametrized fetcher
/// serves every indicator in the descriptor table.
pub struct WorldBankProvider {
    base_url: String,
}

impl WorldBankProvider {
    pub fn new(base_url: &str) -> Self {
        WorldBankProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountryRef {
    value: String,
}

#[derive(Debug, Deserialize)]
struct Observation {
    country: CountryRef,
    date: String,
    value: Option<f64>,
}

#[async_trait]
impl IndicatorProvider for WorldBankProvider {
    #[instrument(
        name = "WorldBankFetch",
        skip(self, spec),
        fields(country = %country_code, indicator = %spec.id)
    )]
    async fn fetch_indicator(
        &self,
        country_code: &str,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorSeries> {
        let url = format!(
            "{}/country/{}/indicator/{}?format=json",
            self.base_url, country_code, spec.id
        );
        debug!("Requesting indicator data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("ecodash/1.0")
            .build()?;
        let response = client.get(&url).send().await.map_err(|e| {
            anyhow!(
                "Request error: {} for indicator {} URL: {}",
                e,
                spec.id,
                url
            )
        })?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} fetching {} for {}",
                response.status(),
                spec.label,
                country_code
            ));
        }

        let text = response.text().await?;
        let payload: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse {} response for {}: {}",
                spec.label,
                country_code,
                e
            )
        })?;

        // Element 0 is paging metadata. A single-element reply is the
        // provider's error document, e.g. for an unrecognized entity code.
        let observations = match payload.get(1) {
            Some(body) if !body.is_null() => serde_json::from_value::<Vec<Observation>>(
                body.clone(),
            )
            .map_err(|e| {
                anyhow!(
                    "Unexpected {} observation shape for {}: {}",
                    spec.label,
                    country_code,
                    e
                )
            })?,
            _ => {
                return Err(anyhow!(
                    "No {} data found for {}",
                    spec.label,
                    country_code
                ));
            }
        };

        if observations.is_empty() {
            return Err(anyhow!(
                "No {} data found for {}",
                spec.label,
                country_code
            ));
        }

        debug!(
            "Fetched {} observations of {} for {}",
            observations.len(),
            spec.label,
            country_code
        );

        let rows = observations
            .into_iter()
            .map(|obs| IndicatorRow {
                country: obs.country.value,
                period: obs.date,
                value: obs.value,
            })
            .collect();

        Ok(IndicatorSeries {
            label: spec.label.to_string(),
            rows,
        })
    }
}

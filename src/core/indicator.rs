//! Macroeconomic indicator descriptors and the provider seam.

use anyhow::Result;
use async_trait::async_trait;

use crate::core::series::IndicatorSeries;

/// Identifies one indicator on the statistics provider, paired with the
/// metric name its column carries after reshaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSpec {
    pub id: &'static str,
    pub label: &'static str,
}

/// The fixed set of indicators the aggregator combines, in fetch order.
pub const INDICATORS: [IndicatorSpec; 6] = [
    IndicatorSpec {
        id: "NY.GDP.MKTP.CD",
        label: "Nominal GDP",
    },
    IndicatorSpec {
        id: "NY.GDP.MKTP.KD.ZG",
        label: "Real GDP Growth (%)",
    },
    IndicatorSpec {
        id: "NY.GDP.PCAP.CD",
        label: "GDP per Capita",
    },
    IndicatorSpec {
        id: "NE.CON.GOVT.ZS",
        label: "Government Expenditure (% of GDP)",
    },
    IndicatorSpec {
        id: "NY.GDP.MKTP.KD",
        label: "Real GDP",
    },
    IndicatorSpec {
        id: "FP.CPI.TOTL.ZG",
        label: "Inflation (%)",
    },
];

#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    /// Fetch one indicator for an entity code. The code is passed through
    /// unvalidated; unrecognized codes surface as an empty reply from the
    /// provider and yield an error.
    async fn fetch_indicator(
        &self,
        country_code: &str,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorSeries>;
}

//! Time series shapes returned by the data providers.

use chrono::NaiveDate;

/// One observation of a macroeconomic indicator: entity display name,
/// raw reporting period and a nullable value. Providers report gaps as
/// `None`, never as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub country: String,
    pub period: String,
    pub value: Option<f64>,
}

/// A single indicator series for one entity, labeled with the
/// indicator's human-readable metric name.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub label: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    /// Display name of the entity, taken from the first observation.
    pub fn country(&self) -> Option<&str> {
        self.rows.first().map(|r| r.country.as_str())
    }
}

/// One daily bar of a price or exchange-rate history.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A daily price history for one ticker or currency pair.
///
/// `close_label` is the provider's own name for the closing-price column
/// ("4. close" for Alpha Vantage, "Close" for Yahoo Finance). The naming
/// difference is deliberately not unified; callers display whichever
/// label their provider uses.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub label: String,
    pub close_label: String,
    pub rows: Vec<PriceRow>,
}

/// One flattened SDMX-JSON observation.
#[derive(Debug, Clone, PartialEq)]
pub struct OecdRow {
    pub series_key: String,
    pub position: String,
    pub value: f64,
}

/// An OECD dataset reply, flattened from the `dataSets[0].series`
/// mapping into one row per observation.
#[derive(Debug, Clone, PartialEq)]
pub struct OecdSeriesTable {
    pub dataset: String,
    pub rows: Vec<OecdRow>,
}

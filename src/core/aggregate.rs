//! Fetch-then-merge pipeline for the fixed indicator set.

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::debug;

use crate::core::indicator::{INDICATORS, IndicatorProvider};
use crate::core::table::CombinedTable;

/// Fetches all six indicators for an entity and folds them into one
/// [`CombinedTable`] with successive outer joins on the period key.
///
/// Fetches run strictly one after another in descriptor order, and the
/// first failure aborts the whole aggregation: later indicators are not
/// requested and no partial table is returned.
pub async fn combine_indicators(
    provider: &dyn IndicatorProvider,
    country_code: &str,
    progress: Option<&ProgressBar>,
) -> Result<CombinedTable> {
    let mut fetched = Vec::with_capacity(INDICATORS.len());
    for spec in &INDICATORS {
        debug!("Fetching {} ({}) for {}", spec.label, spec.id, country_code);
        let series = provider.fetch_indicator(country_code, spec).await?;
        if let Some(pb) = progress {
            pb.inc(1);
        }
        fetched.push(series);
    }

    let mut iter = fetched.iter();
    // INDICATORS is non-empty, so the first series always exists.
    let mut table = CombinedTable::from_series(iter.next().unwrap());
    for series in iter {
        table.outer_join(series);
    }
    Ok(table)
}

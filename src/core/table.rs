//! The wide, period-keyed table built from several indicator series.

use chrono::NaiveDate;

use crate::core::series::IndicatorSeries;

/// One row of a [`CombinedTable`]. `period` is the calendar date parsed
/// from the raw reporting period; `None` marks a period the provider
/// reported in a shape we could not parse. `values` is parallel to the
/// table's metric columns, with `None` as the missing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub period_raw: String,
    pub period: Option<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// A wide table keyed by reporting period with one column per metric.
///
/// Row order is outer-join union order: the first series' periods in
/// their original order, then each joined series' unmatched periods
/// appended in theirs. No period is ever dropped and no gap is ever
/// filled with a fabricated value.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub country: String,
    pub metrics: Vec<String>,
    pub rows: Vec<CombinedRow>,
}

/// Parses a provider period string into a calendar date.
///
/// Annual periods ("2023") map to January 1st, monthly periods
/// ("2023M05" or "2023-05") to the first of the month. Anything else is
/// unparseable and becomes the invalid marker rather than an error.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    for sep in ['M', '-'] {
        if let Some((y, m)) = raw.split_once(sep)
            && let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>())
        {
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

impl CombinedTable {
    /// Seeds the table from the first indicator series, which acts as
    /// the accumulating left side of the join chain.
    pub fn from_series(series: &IndicatorSeries) -> Self {
        let country = series.country().unwrap_or_default().to_string();
        let rows = series
            .rows
            .iter()
            .map(|r| CombinedRow {
                period_raw: r.period.clone(),
                period: parse_period(&r.period),
                values: vec![r.value],
            })
            .collect();
        CombinedTable {
            country,
            metrics: vec![series.label.clone()],
            rows,
        }
    }

    /// Outer-joins another indicator series on the raw period key.
    ///
    /// Matched periods fill the new column in place; unmatched periods
    /// from the incoming series are appended as new rows with missing
    /// markers in every previously joined column.
    pub fn outer_join(&mut self, series: &IndicatorSeries) {
        let prior_width = self.metrics.len();
        self.metrics.push(series.label.clone());

        for row in &mut self.rows {
            row.values.push(None);
        }

        for incoming in &series.rows {
            match self
                .rows
                .iter_mut()
                .find(|r| r.period_raw == incoming.period)
            {
                Some(row) => row.values[prior_width] = incoming.value,
                None => {
                    let mut values = vec![None; prior_width];
                    values.push(incoming.value);
                    self.rows.push(CombinedRow {
                        period_raw: incoming.period.clone(),
                        period: parse_period(&incoming.period),
                        values,
                    });
                }
            }
        }
    }

    /// The plottable points of one metric column: (date, value) pairs in
    /// row order, skipping missing cells and unparseable periods.
    pub fn metric_points(&self, metric_index: usize) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter_map(|row| {
                let date = row.period?;
                let value = *row.values.get(metric_index)?;
                value.map(|v| (date, v))
            })
            .collect()
    }
}

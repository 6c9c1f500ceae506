//! Core business logic abstractions

pub mod aggregate;
pub mod config;
pub mod indicator;
pub mod log;
pub mod market;
pub mod series;
pub mod table;

// Re-export main types for cleaner imports
pub use indicator::{INDICATORS, IndicatorProvider, IndicatorSpec};
pub use market::{DailyPriceProvider, FxRateProvider};
pub use series::{IndicatorRow, IndicatorSeries, OecdSeriesTable, PriceRow, PriceSeries};
pub use table::{CombinedRow, CombinedTable};

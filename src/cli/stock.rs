use anyhow::Result;
use comfy_table::Cell;

use crate::StockSource;
use crate::cli::ui;
use crate::core::config::AppConfig;
use crate::core::market::DailyPriceProvider;
use crate::core::series::PriceSeries;
use crate::providers::{alpha_vantage::AlphaVantageProvider, yahoo_finance::YahooFinanceProvider};

/// Fetches a daily price history from the selected provider and renders
/// the grid plus a closing-price chart.
pub async fn run(config: &AppConfig, symbol: &str, source: StockSource) -> Result<()> {
    let result = match source {
        StockSource::Yahoo => {
            YahooFinanceProvider::new(config.yahoo_base_url())
                .fetch_daily(symbol)
                .await
        }
        StockSource::AlphaVantage => {
            AlphaVantageProvider::new(
                config.alpha_vantage_base_url(),
                config.alpha_vantage_api_key(),
            )
            .fetch_daily(symbol)
            .await
        }
    };

    match result {
        Ok(series) => render_price_series(&series),
        Err(e) => println!(
            "{}",
            ui::style_text(
                &format!("Error fetching stock data: {e}"),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}

/// Shared by the stock and FX commands; the grid header carries the
/// provider's own close-column label.
pub fn render_price_series(series: &PriceSeries) {
    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Open"),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell(&series.close_label),
    ]);

    for row in &series.rows {
        grid.add_row(vec![
            Cell::new(row.date.to_string()),
            Cell::new(format!("{:.4}", row.open)),
            Cell::new(format!("{:.4}", row.high)),
            Cell::new(format!("{:.4}", row.low)),
            Cell::new(format!("{:.4}", row.close)),
        ]);
    }

    println!(
        "{}\n\n{}",
        ui::style_text(&series.label, ui::StyleType::Title),
        grid
    );

    let points: Vec<_> = series.rows.iter().map(|r| (r.date, r.close)).collect();
    println!(
        "\n{}",
        ui::render_line_chart(&format!("{} ({})", series.label, series.close_label), &points)
    );
}

use anyhow::Result;
use comfy_table::Cell;

use crate::cli::ui;
use crate::core::aggregate::combine_indicators;
use crate::core::config::AppConfig;
use crate::core::indicator::INDICATORS;
use crate::core::table::CombinedTable;
use crate::providers::world_bank::WorldBankProvider;

/// Fetches the full indicator set for an entity code and renders the
/// combined table plus one chart per metric. Provider failures are
/// surfaced as a message; they never abort the process.
pub async fn run(config: &AppConfig, country_code: &str) -> Result<()> {
    let provider = WorldBankProvider::new(config.world_bank_base_url());

    let pb = ui::new_progress_bar(INDICATORS.len() as u64, true);
    pb.set_message(format!("Fetching indicators for {country_code}..."));
    let result = combine_indicators(&provider, country_code, Some(&pb)).await;
    pb.finish_and_clear();

    match result {
        Ok(table) => {
            println!("{}", render_combined_table(&table));
            for (index, metric) in table.metrics.iter().enumerate() {
                let points = table.metric_points(index);
                println!("\n{}", ui::render_line_chart(metric, &points));
            }
        }
        Err(e) => println!(
            "{}",
            ui::style_text(
                &format!("Error fetching World Bank data: {e}"),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}

fn render_combined_table(table: &CombinedTable) -> String {
    let mut grid = ui::new_styled_table();

    let mut header = vec![ui::header_cell("Period")];
    header.extend(table.metrics.iter().map(|m| ui::header_cell(m)));
    grid.set_header(header);

    for row in &table.rows {
        let mut cells = vec![Cell::new(&row.period_raw)];
        cells.extend(
            row.values
                .iter()
                .map(|value| ui::format_optional_cell(*value, |v| format!("{v:.2}"))),
        );
        grid.add_row(cells);
    }

    format!(
        "Country: {}\n\n{}",
        ui::style_text(&table.country, ui::StyleType::Title),
        grid
    )
}

use anyhow::Result;
use comfy_table::Cell;

use crate::cli::ui;
use crate::core::config::AppConfig;
use crate::core::series::OecdSeriesTable;
use crate::providers::oecd::OecdProvider;

/// National-accounts GDP dataset, as on the OECD endpoint.
const DATASET: &str = "NAAGDP";

pub async fn run(config: &AppConfig, country_code: &str) -> Result<()> {
    let provider = OecdProvider::new(config.oecd_base_url());

    match provider.fetch_dataset(DATASET, country_code).await {
        Ok(table) => println!("{}", render_oecd_table(&table)),
        Err(e) => println!(
            "{}",
            ui::style_text(
                &format!("Error fetching data from OECD: {e}"),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}

fn render_oecd_table(table: &OecdSeriesTable) -> String {
    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Series"),
        ui::header_cell("Position"),
        ui::header_cell("Value"),
    ]);

    for row in &table.rows {
        grid.add_row(vec![
            Cell::new(&row.series_key),
            Cell::new(&row.position),
            Cell::new(format!("{:.2}", row.value)),
        ]);
    }

    format!(
        "Dataset: {}\n\n{}",
        ui::style_text(&table.dataset, ui::StyleType::Title),
        grid
    )
}

use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    };

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

const CHART_WIDTH: usize = 72;
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders a single-series line chart as a block-character strip with
/// the date range and value bounds underneath. Points are expected in
/// axis order; series wider than the terminal strip are downsampled.
pub fn render_line_chart(title: &str, points: &[(NaiveDate, f64)]) -> String {
    let title = style_text(title, StyleType::Title);
    if points.is_empty() {
        return format!(
            "{title}\n{}",
            style_text("(no plottable points)", StyleType::Subtle)
        );
    }

    let step = points.len().div_ceil(CHART_WIDTH);
    let sampled: Vec<f64> = points.iter().step_by(step).map(|(_, v)| *v).collect();

    // Bounds come from the full series; downsampling may drop extremes
    // from the strip but must never misreport them on the axis.
    let min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let strip: String = sampled
        .iter()
        .map(|v| {
            let level = if span == 0.0 {
                BLOCKS.len() / 2
            } else {
                (((v - min) / span) * (BLOCKS.len() - 1) as f64).round() as usize
            };
            BLOCKS[level.min(BLOCKS.len() - 1)]
        })
        .collect();

    let axis = format!(
        "{} .. {}  min {:.2}  max {:.2}  last {:.2}",
        points[0].0,
        points[points.len() - 1].0,
        min,
        max,
        points[points.len() - 1].1
    );

    format!("{title}\n{strip}\n{}", style_text(&axis, StyleType::Subtle))
}

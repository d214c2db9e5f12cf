use super::ui;
use crate::core::amount::format_amount;
use crate::core::series::TimeSeries;
use crate::core::statistics::StatisticsStore;
use crate::core::timeframe::Timeframe;
use chrono::DateTime;
use comfy_table::Cell;

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map_or_else(|| secs.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// Renders a projected series, the last row being the live valuation.
pub fn render_series(series: &TimeSeries, currency: &str, precision: u32) -> String {
    if series.is_empty() {
        return ui::style_text("No net value history available.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date (UTC)"),
        ui::header_cell(&format!("Net worth ({currency})")),
    ]);

    let last = series.len().saturating_sub(1);
    for (i, (time, value)) in series.points().enumerate() {
        let date = if i == last {
            format!("{} (now)", format_timestamp(time))
        } else {
            format_timestamp(time)
        };
        table.add_row(vec![
            Cell::new(date),
            ui::amount_cell(&format_amount(value, precision)),
        ]);
    }
    table.to_string()
}

pub fn render(
    statistics: &StatisticsStore,
    timeframe: Timeframe,
    currency: &str,
    precision: u32,
) -> String {
    let series = statistics.get_net_value(statistics.starting_date(timeframe));
    format!(
        "{}\n\n{}",
        ui::style_text(
            &format!("Net worth history ({timeframe})"),
            ui::StyleType::Title
        ),
        render_series(&series, currency, precision)
    )
}

pub fn run(statistics: &StatisticsStore, timeframe: Timeframe, currency: &str, precision: u32) {
    println!("{}", render(statistics, timeframe, currency, precision));
}

use super::ui;
use crate::core::amount::{PERCENTAGE_PLACEHOLDER, format_amount};
use crate::core::analytics::PeriodSummary;
use crate::core::currency::BASE_CURRENCY;
use crate::core::statistics::StatisticsStore;
use comfy_table::Cell;

impl PeriodSummary {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Period"),
            ui::header_cell(&format!("Net worth ({})", self.currency)),
            ui::header_cell(&format!("Change ({})", self.currency)),
            ui::header_cell("Change (%)"),
        ]);

        let percentage = if self.percentage == PERCENTAGE_PLACEHOLDER {
            self.percentage.clone()
        } else {
            format!("{}%", self.percentage)
        };
        table.add_row(vec![
            Cell::new(self.period.to_string()),
            ui::amount_cell(&self.net_worth),
            ui::trend_cell(&self.delta, self.up),
            ui::trend_cell(&percentage, self.up),
        ]);

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Net worth summary", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output
    }
}

/// Renders the period summary followed by the USD reference total.
pub fn render(statistics: &StatisticsStore, precision: u32) -> String {
    let summary = statistics.overall();
    let mut output = summary.display_as_table();

    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text(
            &format!("Total incl. NFTs ({BASE_CURRENCY})"),
            ui::StyleType::TotalLabel
        ),
        ui::style_text(
            &format_amount(statistics.total_net_worth_usd(), precision),
            ui::StyleType::TotalValue
        )
    ));
    output
}

pub fn run(statistics: &StatisticsStore, precision: u32) {
    println!("{}", render(statistics, precision));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timeframe::Timeframe;

    #[test]
    fn test_display_as_table() {
        let summary = PeriodSummary {
            period: Timeframe::OneWeek,
            currency: "EUR".to_string(),
            net_worth: "1,234.56".to_string(),
            delta: "-10.00".to_string(),
            percentage: "-0.80".to_string(),
            up: Some(false),
        };

        let output = console::strip_ansi_codes(&summary.display_as_table()).to_string();
        assert!(output.contains("Net worth (EUR)"));
        assert!(output.contains("1W"));
        assert!(output.contains("1,234.56"));
        assert!(output.contains("▼ -10.00"));
        assert!(output.contains("▼ -0.80%"));
    }

    #[test]
    fn test_display_placeholder_percentage() {
        let summary = PeriodSummary {
            period: Timeframe::All,
            currency: "USD".to_string(),
            net_worth: "10.00".to_string(),
            delta: "10.00".to_string(),
            percentage: "-".to_string(),
            up: Some(true),
        };

        let output = console::strip_ansi_codes(&summary.display_as_table()).to_string();
        assert!(output.contains("▲ -"));
        assert!(!output.contains("-%"));
    }
}

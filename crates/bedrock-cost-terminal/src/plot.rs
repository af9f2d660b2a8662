//! ASCII bar plots of daily and per-model cost

use crate::model_formatter::{format_amount, format_model_name};
use crate::output::{OutputFormatter, RenderOptions};
use bedrock_cost_core::cost_data::CostData;
use colored::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Bar characters (ASCII)
const BAR_FULL: &str = "#";
const BAR_EMPTY: &str = " ";

/// Narrowest bar drawn regardless of terminal width
const MIN_BAR_WIDTH: usize = 10;

/// Width reserved for the amount column
const AMOUNT_WIDTH: usize = 12;

/// Renders horizontal bar charts
pub struct PlotFormatter {
    options: RenderOptions,
}

struct Bar {
    label: String,
    value: Decimal,
    amount: String,
}

impl PlotFormatter {
    /// Create a new PlotFormatter
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Number of filled cells for `value` on a bar scaled to `max`
    fn filled_cells(value: Decimal, max: Decimal, width: usize) -> usize {
        if max <= Decimal::ZERO || value <= Decimal::ZERO {
            return 0;
        }
        let ratio = (value / max).to_f64().unwrap_or_default().clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        // Any non-zero spend stays visible
        filled.clamp(1, width)
    }

    fn render_bar(&self, filled: usize, width: usize) -> String {
        let bar = format!(
            "{}{}",
            BAR_FULL.repeat(filled),
            BAR_EMPTY.repeat(width.saturating_sub(filled))
        );
        if self.options.colored {
            bar.green().to_string()
        } else {
            bar
        }
    }

    fn render_chart(&self, title: &str, bars: &[Bar]) -> String {
        let mut output = format!("{title}\n");
        if bars.is_empty() {
            output.push_str("  (no data)\n");
            return output;
        }

        let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        let bar_width = self
            .options
            .width
            .saturating_sub(label_width + AMOUNT_WIDTH + 6)
            .max(MIN_BAR_WIDTH);
        let max = bars.iter().map(|b| b.value).max().unwrap_or_default();

        for bar in bars {
            let filled = Self::filled_cells(bar.value, max, bar_width);
            output.push_str(&format!(
                "  {:<label_width$} |{}| {:>AMOUNT_WIDTH$}\n",
                bar.label,
                self.render_bar(filled, bar_width),
                bar.amount,
            ));
        }
        output
    }
}

impl OutputFormatter for PlotFormatter {
    fn format_costs(&self, data: &CostData) -> String {
        let daily: Vec<Bar> = data
            .daily_totals
            .iter()
            .map(|day| Bar {
                label: day.date.format("%Y-%m-%d").to_string(),
                value: day.total_cost,
                amount: format_amount(day.total_cost, &data.currency, day.estimated),
            })
            .collect();

        let models = match self.options.top {
            Some(n) => data.top_models(n),
            None => &data.models[..],
        };
        let per_model: Vec<Bar> = models
            .iter()
            .map(|model| Bar {
                label: format_model_name(&model.model_name, self.options.full_model_names),
                value: model.total_cost,
                amount: format_amount(model.total_cost, &data.currency, model.estimated),
            })
            .collect();

        let mut output = self.render_chart(&format!("Daily cost ({})", data.period), &daily);
        output.push('\n');
        output.push_str(&self.render_chart("Cost by model", &per_model));
        output
    }
}

//! Output formatting module for bedrock-cost
//!
//! This module provides formatters for displaying a cost summary:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! Plots and the one-line summary live in [`crate::plot`] and
//! [`crate::summary`]; all of them implement [`OutputFormatter`].
//!
//! # Examples
//!
//! ```
//! use bedrock_cost_core::{CostResponse, DetailLevel, analyze_cost_data};
//! use bedrock_cost_terminal::output::{OutputFormat, RenderOptions, get_formatter};
//!
//! let data = analyze_cost_data(
//!     &CostResponse::default(),
//!     "2024-03-01",
//!     "2024-03-08",
//!     DetailLevel::Standard,
//! )
//! .unwrap();
//!
//! let formatter = get_formatter(OutputFormat::Json, &RenderOptions::default());
//! let json = formatter.format_costs(&data);
//! assert!(json.contains("\"total_cost\": 0.00"));
//! ```

use crate::model_formatter::{format_amount, format_model_name, round_cents};
use crate::plot::PlotFormatter;
use crate::summary::SummaryFormatter;
use bedrock_cost_core::cost_data::{CostBreakdown, CostData};
use prettytable::{Cell, Row, Table, format, row};
use rust_decimal::Decimal;
use serde_json::{Number, Value, json};
use std::str::FromStr;

/// Trait for output formatters
///
/// Formatters only read the summary; they never mutate it.
pub trait OutputFormatter {
    /// Render the cost summary
    fn format_costs(&self, data: &CostData) -> String;
}

/// Available renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON document
    Json,
    /// Model cost table
    Table,
    /// ASCII bar charts of daily and per-model cost
    Plot,
    /// One line with the total and the top models
    Summary,
}

/// Presentation options shared by all renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Keep the `(Amazon Bedrock Edition)` suffix in model names
    pub full_model_names: bool,
    /// Limit the number of model rows
    pub top: Option<usize>,
    /// Colorize plot bars
    pub colored: bool,
    /// Available terminal width in columns
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            full_model_names: false,
            top: None,
            colored: false,
            width: 100,
        }
    }
}

/// Whether plot bars get ANSI colors
///
/// Color is only written to a terminal, and never when `NO_COLOR` is set.
pub fn should_colorize(no_color_set: bool, stdout_is_terminal: bool) -> bool {
    stdout_is_terminal && !no_color_set
}

impl RenderOptions {
    /// Options for the current terminal, honoring `NO_COLOR` and redirection
    pub fn for_terminal(full_model_names: bool, top: Option<usize>) -> Self {
        let width = terminal_size::terminal_size()
            .map(|(width, _)| width.0 as usize)
            .unwrap_or(100);
        Self {
            full_model_names,
            top,
            colored: should_colorize(
                std::env::var_os("NO_COLOR").is_some(),
                is_terminal::is_terminal(std::io::stdout()),
            ),
            width,
        }
    }
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Estimated amounts
/// are prefixed with `~`.
pub struct TableFormatter {
    options: RenderOptions,
}

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn format_share(share: Decimal) -> String {
        format!("{:.1}%", share.round_dp(1))
    }

    fn add_breakdown_rows(
        &self,
        table: &mut Table,
        data: &CostData,
        label: &str,
        breakdown: &[CostBreakdown],
    ) {
        for item in breakdown {
            table.add_row(row![
                "",
                format!("  └─ {label}: {}", item.name),
                r -> format_amount(item.total_cost, &data.currency, item.estimated),
                r -> Self::format_share(data.share_of_total(item.total_cost))
            ]);
        }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_costs(&self, data: &CostData) -> String {
        let mut output = format!(
            "Bedrock costs for {} ({} days)\n",
            data.period,
            data.period.num_days()
        );

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "#", b -> "Model", b -> "Cost", b -> "Share"]);

        let models = match self.options.top {
            Some(n) => data.top_models(n),
            None => &data.models[..],
        };

        for (rank, model) in models.iter().enumerate() {
            table.add_row(row![
                r -> rank + 1,
                format_model_name(&model.model_name, self.options.full_model_names),
                r -> format_amount(model.total_cost, &data.currency, model.estimated),
                r -> Self::format_share(data.share_of_total(model.total_cost))
            ]);
            if let Some(usage_types) = &model.usage_types {
                self.add_breakdown_rows(&mut table, data, "usage", usage_types);
            }
            if let Some(regions) = &model.regions {
                self.add_breakdown_rows(&mut table, data, "region", regions);
            }
        }

        if models.len() < data.models.len() {
            let rest: Decimal = data.models[models.len()..]
                .iter()
                .map(|m| m.total_cost)
                .sum();
            let rest_estimated = data.models[models.len()..].iter().any(|m| m.estimated);
            table.add_row(row![
                "",
                format!("({} more models)", data.models.len() - models.len()),
                r -> format_amount(rest, &data.currency, rest_estimated),
                r -> Self::format_share(data.share_of_total(rest))
            ]);
        }

        // Add separator
        table.add_row(Row::new(vec![Cell::new(""); 4]));

        table.add_row(row![
            "",
            b -> "TOTAL",
            b -> format_amount(data.total_cost, &data.currency, data.has_estimated),
            ""
        ]);

        output.push_str(&table.to_string());
        if data.has_estimated {
            output.push_str("~ includes estimated costs for days not yet finalized\n");
        }
        output
    }
}

/// JSON formatter for machine-readable output
///
/// Amounts are rounded to cents and emitted as numbers with exactly two
/// decimal places, copied digit for digit from the `Decimal`.
pub struct JsonFormatter;

impl JsonFormatter {
    fn amount(amount: Decimal) -> Value {
        let mut cents = round_cents(amount);
        cents.rescale(2);
        let digits = cents.to_string();
        Number::from_str(&digits)
            .map(Value::Number)
            .unwrap_or(Value::String(digits))
    }

    fn breakdown(items: &[CostBreakdown]) -> Value {
        json!(
            items
                .iter()
                .map(|item| json!({
                    "name": item.name,
                    "total_cost": Self::amount(item.total_cost),
                    "estimated": item.estimated,
                }))
                .collect::<Vec<_>>()
        )
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_costs(&self, data: &CostData) -> String {
        let models: Vec<Value> = data
            .models
            .iter()
            .map(|model| {
                let mut model_json = json!({
                    "model_name": model.model_name,
                    "total_cost": Self::amount(model.total_cost),
                    "estimated": model.estimated,
                });
                if let Some(usage_types) = &model.usage_types {
                    model_json["usage_types"] = Self::breakdown(usage_types);
                }
                if let Some(regions) = &model.regions {
                    model_json["regions"] = Self::breakdown(regions);
                }
                model_json
            })
            .collect();

        let output = json!({
            "period": {
                "start": data.period.start_str(),
                "end": data.period.end_str(),
            },
            "currency": data.currency,
            "total_cost": Self::amount(data.total_cost),
            "has_estimated": data.has_estimated,
            "models": models,
            "daily_totals": data.daily_totals.iter().map(|day| json!({
                "date": day.date.format("%Y-%m-%d").to_string(),
                "total_cost": Self::amount(day.total_cost),
                "estimated": day.estimated,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    }
}

/// Get the formatter for an output format
pub fn get_formatter(format: OutputFormat, options: &RenderOptions) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter::new(options.clone())),
        OutputFormat::Plot => Box::new(PlotFormatter::new(options.clone())),
        OutputFormat::Summary => Box::new(SummaryFormatter::new(options.clone())),
    }
}

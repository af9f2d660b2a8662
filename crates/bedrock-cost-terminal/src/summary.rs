//! One-line cost summary
//!
//! Format: `Total: $X.XX | Top: Model1 ($Y), Model2 ($Z), Model3 ($W)`

use crate::model_formatter::{format_amount, format_model_name};
use crate::output::{OutputFormatter, RenderOptions};
use bedrock_cost_core::cost_data::CostData;

/// Models listed when no explicit limit is given
pub const DEFAULT_SUMMARY_MODELS: usize = 3;

/// Format the summary line for `data`, listing up to `top` models
///
/// # Examples
///
/// ```
/// use bedrock_cost_core::{CostResponse, DetailLevel, analyze_cost_data};
/// use bedrock_cost_terminal::summary::format_summary;
///
/// let data = analyze_cost_data(
///     &CostResponse::default(),
///     "2024-03-01",
///     "2024-03-02",
///     DetailLevel::Basic,
/// )
/// .unwrap();
/// assert_eq!(format_summary(&data, 3, false), "Total: $0.00 | No Bedrock usage found");
/// ```
pub fn format_summary(data: &CostData, top: usize, full_model_names: bool) -> String {
    let total = format_amount(data.total_cost, &data.currency, data.has_estimated);
    if data.models.is_empty() {
        return format!("Total: {total} | No Bedrock usage found");
    }

    let top_models = data.top_models(top);
    if top_models.is_empty() {
        return format!("Total: {total}");
    }

    let models = top_models
        .iter()
        .map(|model| {
            format!(
                "{} ({})",
                format_model_name(&model.model_name, full_model_names),
                format_amount(model.total_cost, &data.currency, model.estimated)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("Total: {total} | Top: {models}")
}

/// Summary renderer
pub struct SummaryFormatter {
    options: RenderOptions,
}

impl SummaryFormatter {
    /// Create a new SummaryFormatter
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for SummaryFormatter {
    fn format_costs(&self, data: &CostData) -> String {
        format_summary(
            data,
            self.options.top.unwrap_or(DEFAULT_SUMMARY_MODELS),
            self.options.full_model_names,
        )
    }
}

//! Report orchestration
//!
//! Fetches raw records through a [`CostProvider`], aggregates them, and
//! renders the requested outputs. Kept free of process concerns so it can
//! run against an in-memory provider.

use bedrock_cost_core::{
    Aggregator, CostData, CostProvider, DateWindow, DetailLevel, Result,
};
use bedrock_cost_terminal::{OutputFormat, RenderOptions, get_formatter};
use tracing::{debug, info};

/// Fetch and aggregate Bedrock costs for `window`
pub async fn generate_report<P>(
    provider: &P,
    window: &DateWindow,
    detail: DetailLevel,
) -> Result<CostData>
where
    P: CostProvider + ?Sized,
{
    debug!("Fetching costs from {}", provider.name());
    let response = provider.fetch_costs(window, detail).await?;
    info!(
        "Fetched {} records in {} record set(s)",
        response.record_count(),
        response.record_sets.len()
    );

    Aggregator::new(*window, detail).aggregate(&response)
}

/// Render `data` once per requested format, in the given order
pub fn render_outputs(
    data: &CostData,
    formats: &[OutputFormat],
    options: &RenderOptions,
) -> Vec<String> {
    formats
        .iter()
        .map(|format| get_formatter(*format, options).format_costs(data))
        .collect()
}

/// Message printed instead of empty renderings
pub fn no_costs_message(window: &DateWindow) -> String {
    format!(
        "No Bedrock costs found for the period {} to {}",
        window.start_str(),
        window.end_str()
    )
}

/// Whether the run should skip rendering for an empty result
///
/// A summary-only run always prints its one-liner.
pub fn should_short_circuit(data: &CostData, formats: &[OutputFormat]) -> bool {
    data.is_empty() && formats != [OutputFormat::Summary]
}

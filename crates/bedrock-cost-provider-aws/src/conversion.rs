//! Conversion from Cost Explorer results to raw cost records
//!
//! Bedrock charges show up in Cost Explorer as one `SERVICE` per model,
//! e.g. `Claude 3.5 Sonnet (Amazon Bedrock Edition)`, plus a generic
//! `Amazon Bedrock` service. Every other service is dropped here.

use aws_sdk_costexplorer::types::ResultByTime;
use bedrock_cost_core::error::{CostError, Result};
use bedrock_cost_core::types::{DetailLevel, Dimension, RawCostRecord, RecordSet, parse_date};
use chrono::NaiveDate;
use tracing::trace;

/// Cost metric requested from Cost Explorer
pub const COST_METRIC: &str = "UnblendedCost";

/// Unit assumed when Cost Explorer omits one
const DEFAULT_UNIT: &str = "USD";

/// Cost Explorer group-by key for a dimension
pub fn group_key(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Model => "SERVICE",
        Dimension::UsageType => "USAGE_TYPE",
        Dimension::Region => "REGION",
    }
}

/// Queries to issue for a detail level
///
/// Cost Explorer accepts at most two group-by dimensions, so `full` needs a
/// second query grouped by region. The first query always covers the full
/// cost and is the authoritative set for totals.
pub fn query_plan(detail: DetailLevel) -> Vec<Vec<Dimension>> {
    match detail {
        DetailLevel::Basic => vec![vec![Dimension::Model]],
        DetailLevel::Standard => vec![vec![Dimension::Model, Dimension::UsageType]],
        DetailLevel::Full => vec![
            vec![Dimension::Model, Dimension::UsageType],
            vec![Dimension::Model, Dimension::Region],
        ],
    }
}

/// Whether a Cost Explorer service name is a Bedrock charge
pub fn is_bedrock_service(service: &str) -> bool {
    service.to_ascii_lowercase().contains("bedrock")
}

/// Append the Bedrock groups of one daily result to `set`
///
/// Returns the number of records added. A day is estimated when Cost
/// Explorer says so or when it is on or after `today`.
pub fn convert_result(
    result: &ResultByTime,
    today: NaiveDate,
    set: &mut RecordSet,
) -> Result<usize> {
    let period = result
        .time_period()
        .ok_or_else(|| CostError::Provider("result is missing its time period".to_string()))?;
    let date = parse_date(period.start())?;
    let estimated = result.estimated() || date >= today;

    let model_idx = set
        .dimensions
        .iter()
        .position(|d| *d == Dimension::Model)
        .ok_or_else(|| {
            CostError::InvalidArgument("record set is not grouped by model".to_string())
        })?;

    let mut added = 0;
    for group in result.groups() {
        let keys = group.keys();
        let Some(service) = keys.get(model_idx) else {
            continue;
        };
        if !is_bedrock_service(service) {
            trace!("Skipping non-Bedrock service {}", service);
            continue;
        }

        let metric = group
            .metrics()
            .and_then(|metrics| metrics.get(COST_METRIC))
            .ok_or_else(|| {
                CostError::Provider(format!("{service} on {date} has no {COST_METRIC} metric"))
            })?;
        let amount = metric.amount().ok_or_else(|| CostError::InvalidAmount {
            amount: String::new(),
            reason: format!("{service} on {date} has no amount"),
        })?;

        set.push(
            RawCostRecord::new(date, keys.iter().cloned(), amount)
                .with_unit(metric.unit().unwrap_or(DEFAULT_UNIT))
                .with_estimated(estimated),
        );
        added += 1;
    }

    Ok(added)
}

//! Aggregated cost summary types
//!
//! Pure data structures produced by the aggregator and read by the
//! renderers. Amounts are full-precision decimals; rounding happens only
//! when rendering.

use crate::types::DateWindow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost of one usage type or region within a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Usage type or region name
    pub name: String,
    /// Total cost in the window
    pub total_cost: Decimal,
    /// Whether any contributing record was estimated
    pub estimated: bool,
}

/// Cost of one Bedrock model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCost {
    /// Model name as reported by Cost Explorer
    pub model_name: String,
    /// Total cost in the window
    pub total_cost: Decimal,
    /// Whether any contributing record was estimated
    pub estimated: bool,
    /// Usage-type breakdown (standard and full detail)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_types: Option<Vec<CostBreakdown>>,
    /// Region breakdown (full detail)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<CostBreakdown>>,
}

/// Cost of one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Billing day
    pub date: NaiveDate,
    /// Total cost of the day, zero when nothing was billed
    pub total_cost: Decimal,
    /// Whether any contributing record was estimated
    pub estimated: bool,
}

/// Normalized Bedrock cost summary for one window
///
/// `models` is sorted by descending cost with ties broken by name, and
/// `daily_totals` holds exactly one entry per day of `period`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostData {
    /// Sum of every record amount
    pub total_cost: Decimal,
    /// Whether any contributing record was estimated
    pub has_estimated: bool,
    /// Currency of every amount
    pub currency: String,
    /// The queried window
    pub period: DateWindow,
    /// Per-model costs
    pub models: Vec<ModelCost>,
    /// Per-day costs in ascending date order
    pub daily_totals: Vec<DailyCost>,
}

impl CostData {
    /// Whether no usage was billed in the period
    pub fn is_empty(&self) -> bool {
        self.total_cost.is_zero()
    }

    /// The `n` most expensive models
    pub fn top_models(&self, n: usize) -> &[ModelCost] {
        &self.models[..n.min(self.models.len())]
    }

    /// Share of the grand total spent on `cost`, in percent
    pub fn share_of_total(&self, cost: Decimal) -> Decimal {
        if self.total_cost.is_zero() {
            Decimal::ZERO
        } else {
            cost * Decimal::ONE_HUNDRED / self.total_cost
        }
    }
}

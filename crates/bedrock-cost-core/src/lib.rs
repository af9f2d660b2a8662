//! Core types, period resolution, and cost aggregation for bedrock-cost
//!
//! This crate turns raw, grouped Cost Explorer billing records into a
//! normalized [`CostData`] summary. It owns the data model, the error
//! taxonomy, the period resolver, and the provider trait implemented by
//! gateway crates.

pub mod aggregation;
pub mod cost_data;
pub mod error;
pub mod period;
pub mod provider;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use aggregation::{Aggregator, analyze_cost_data};
pub use cost_data::{CostBreakdown, CostData, DailyCost, ModelCost};
pub use error::{CostError, Result};
pub use period::{
    calculate_date_range, format_date_for_aws, parse_period, resolve_period, validate_period,
};
pub use provider::CostProvider;
pub use types::{CostResponse, DateWindow, DetailLevel, Dimension, RawCostRecord, RecordSet};

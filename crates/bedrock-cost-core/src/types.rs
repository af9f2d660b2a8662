//! Core domain types for bedrock-cost
//!
//! These types describe what flows between the cost gateway and the
//! aggregator: the resolved date window, the requested detail level, and
//! raw grouped billing records as the provider returned them.

use crate::error::{CostError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket name used when a record lacks a dimension the detail level needs
pub const NOT_AVAILABLE: &str = "(not available)";

/// Aggregation granularity
///
/// Controls which nested breakdowns are computed for each model.
///
/// # Examples
/// ```
/// use bedrock_cost_core::types::DetailLevel;
/// use std::str::FromStr;
///
/// let level = DetailLevel::from_str("full").unwrap();
/// assert!(level.includes_regions());
/// assert_eq!(DetailLevel::default(), DetailLevel::Standard);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Per-model totals only
    Basic,
    /// Per-model totals with usage-type breakdown
    #[default]
    Standard,
    /// Per-model totals with usage-type and region breakdowns
    Full,
}

impl DetailLevel {
    /// Whether `models[].usage_types` is populated at this level
    pub fn includes_usage_types(self) -> bool {
        self >= Self::Standard
    }

    /// Whether `models[].regions` is populated at this level
    pub fn includes_regions(self) -> bool {
        self == Self::Full
    }

    /// Breakdown dimensions required at this level, in output order
    pub fn breakdown_dimensions(self) -> &'static [Dimension] {
        match self {
            Self::Basic => &[],
            Self::Standard => &[Dimension::UsageType],
            Self::Full => &[Dimension::UsageType, Dimension::Region],
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Standard => write!(f, "standard"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "full" => Ok(Self::Full),
            _ => Err(format!("Invalid detail level: {s}")),
        }
    }
}

/// A grouping dimension of a provider query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The Bedrock model (Cost Explorer `SERVICE`)
    Model,
    /// Cost Explorer `USAGE_TYPE`
    UsageType,
    /// Cost Explorer `REGION`
    Region,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::UsageType => write!(f, "usage_type"),
            Self::Region => write!(f, "region"),
        }
    }
}

/// Half-open calendar date range `[start, end)`
///
/// `end` is exclusive, matching Cost Explorer's `TimePeriod` convention.
///
/// # Examples
/// ```
/// use bedrock_cost_core::types::DateWindow;
///
/// let window = DateWindow::parse("2024-03-01", "2024-03-04").unwrap();
/// assert_eq!(window.num_days(), 3);
/// assert_eq!(window.days().count(), 3);
/// assert_eq!(window.start_str(), "2024-03-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day in the window (inclusive)
    pub start: NaiveDate,
    /// Day after the last day in the window (exclusive)
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CostError::InvalidArgument(format!(
                "window start {start} is after window end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Number of calendar days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether `date` falls inside `[start, end)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Iterate every calendar day in the window in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days().max(0) as u64).filter_map(|offset| {
            self.start.checked_add_days(Days::new(offset))
        })
    }

    /// Start date in `YYYY-MM-DD` form
    pub fn start_str(&self) -> String {
        crate::period::format_date_for_aws(&self.start)
    }

    /// End date in `YYYY-MM-DD` form
    pub fn end_str(&self) -> String {
        crate::period::format_date_for_aws(&self.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_str(), self.end_str())
    }
}

/// Parse a `YYYY-MM-DD` date as used by Cost Explorer
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| CostError::InvalidDate(format!("'{s}': {e}")))
}

/// One grouped billing amount for one day
///
/// `keys` holds the group-by values in the same order as the owning
/// [`RecordSet::dimensions`]. The amount stays a string until the
/// aggregator parses it as a decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCostRecord {
    /// Billing day
    pub date: NaiveDate,
    /// Group-by values, aligned with the record set's dimensions
    pub keys: Vec<String>,
    /// Decimal amount as returned by the provider
    pub amount: String,
    /// Currency code, e.g. `USD`
    pub unit: String,
    /// Whether the provider has not finalized this day yet
    pub estimated: bool,
}

impl RawCostRecord {
    /// Create a finalized USD record
    pub fn new(
        date: NaiveDate,
        keys: impl IntoIterator<Item = impl Into<String>>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date,
            keys: keys.into_iter().map(Into::into).collect(),
            amount: amount.into(),
            unit: "USD".to_string(),
            estimated: false,
        }
    }

    /// Set the estimated flag
    pub fn with_estimated(mut self, estimated: bool) -> Self {
        self.estimated = estimated;
        self
    }

    /// Set the currency unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Records returned by one provider query, grouped by `dimensions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Group-by dimensions in key order
    pub dimensions: Vec<Dimension>,
    /// Records of this query
    pub records: Vec<RawCostRecord>,
}

impl RecordSet {
    /// Create an empty record set grouped by `dimensions`
    pub fn new(dimensions: impl Into<Vec<Dimension>>) -> Self {
        Self {
            dimensions: dimensions.into(),
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: RawCostRecord) {
        self.records.push(record);
    }

    /// Builder-style variant of [`RecordSet::push`]
    pub fn with_record(mut self, record: RawCostRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Whether this set is grouped by `dimension`
    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.dimensions.contains(&dimension)
    }

    /// The key of `record` for `dimension`, or [`NOT_AVAILABLE`] when the
    /// set is not grouped by it or the key is missing/blank
    pub fn key<'a>(&self, record: &'a RawCostRecord, dimension: Dimension) -> &'a str {
        self.dimensions
            .iter()
            .position(|d| *d == dimension)
            .and_then(|idx| record.keys.get(idx))
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// Everything the gateway fetched for one window
///
/// The first record set is authoritative for totals; later sets only
/// contribute breakdown dimensions the first one lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostResponse {
    /// Query results in the order they were issued
    pub record_sets: Vec<RecordSet>,
}

impl CostResponse {
    /// Create a response from record sets
    pub fn new(record_sets: Vec<RecordSet>) -> Self {
        Self { record_sets }
    }

    /// Total number of records across all sets
    pub fn record_count(&self) -> usize {
        self.record_sets.iter().map(|set| set.records.len()).sum()
    }
}

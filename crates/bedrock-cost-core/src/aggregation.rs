//! Cost aggregation
//!
//! Folds raw grouped billing records into a [`CostData`] summary.
//!
//! # Merge rule
//!
//! Cost Explorer groups by at most two dimensions per query, so a `full`
//! report needs `SERVICE+USAGE_TYPE` and `SERVICE+REGION` results merged.
//! The first record set of a [`CostResponse`] is authoritative: it alone
//! feeds the grand, per-model, and per-day totals. A breakdown dimension it
//! does not carry is read from the first later set that does, joined on
//! `(date, model)`. Whatever part of a pair's primary amount the secondary
//! rows do not explain is booked under [`NOT_AVAILABLE`], so every level of
//! the breakdown always sums to its parent.
//!
//! # Examples
//!
//! ```
//! use bedrock_cost_core::aggregation::analyze_cost_data;
//! use bedrock_cost_core::types::{CostResponse, DetailLevel, Dimension, RawCostRecord, RecordSet};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let set = RecordSet::new(vec![Dimension::Model, Dimension::UsageType])
//!     .with_record(RawCostRecord::new(day, ["Claude 3 Haiku", "USE1-InputTokens"], "1.25"))
//!     .with_record(RawCostRecord::new(day, ["Claude 3 Haiku", "USE1-OutputTokens"], "0.75"));
//!
//! let data = analyze_cost_data(
//!     &CostResponse::new(vec![set]),
//!     "2024-03-01",
//!     "2024-03-03",
//!     DetailLevel::Standard,
//! )
//! .unwrap();
//!
//! assert_eq!(data.total_cost.to_string(), "2.00");
//! assert_eq!(data.models[0].usage_types.as_ref().unwrap().len(), 2);
//! assert_eq!(data.daily_totals.len(), 2);
//! ```

use crate::cost_data::{CostBreakdown, CostData, DailyCost, ModelCost};
use crate::error::{CostError, Result};
use crate::types::{
    CostResponse, DateWindow, DetailLevel, Dimension, NOT_AVAILABLE, RawCostRecord, RecordSet,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Currency assumed when no record carries a unit
const DEFAULT_CURRENCY: &str = "USD";

/// Aggregate a provider response over the `[start, end)` window
///
/// `start` and `end` are the same `YYYY-MM-DD` strings the gateway queried
/// with; they drive the zero-filled `daily_totals` series.
pub fn analyze_cost_data(
    response: &CostResponse,
    start: &str,
    end: &str,
    detail: DetailLevel,
) -> Result<CostData> {
    let window = DateWindow::parse(start, end)?;
    Aggregator::new(window, detail).aggregate(response)
}

/// Aggregates raw records for a fixed window and detail level
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    window: DateWindow,
    detail: DetailLevel,
}

impl Aggregator {
    /// Create an aggregator for `window` at `detail`
    pub fn new(window: DateWindow, detail: DetailLevel) -> Self {
        Self { window, detail }
    }

    /// Produce the cost summary for `response`
    pub fn aggregate(&self, response: &CostResponse) -> Result<CostData> {
        let mut acc = CostAccumulator::new(self.detail);

        if let Some((primary, secondaries)) = response.record_sets.split_first() {
            let sources: Vec<(Dimension, BreakdownSource<'_>)> = self
                .detail
                .breakdown_dimensions()
                .iter()
                .map(|&dim| (dim, BreakdownSource::locate(dim, primary, secondaries)))
                .collect();

            for record in &primary.records {
                self.add_primary_record(&mut acc, primary, record, &sources)?;
            }

            for (dim, source) in &sources {
                if let BreakdownSource::Secondary(set) = source {
                    acc.merge_secondary(*dim, set)?;
                }
            }
        }

        debug!(
            "Aggregated {} records into {} models over {}",
            response.record_count(),
            acc.models.len(),
            self.window
        );

        Ok(acc.finish(self.window))
    }

    fn add_primary_record(
        &self,
        acc: &mut CostAccumulator,
        set: &RecordSet,
        record: &RawCostRecord,
        sources: &[(Dimension, BreakdownSource<'_>)],
    ) -> Result<()> {
        let amount = parse_amount(&record.amount)?;
        acc.observe_unit(&record.unit)?;

        if !self.window.contains(record.date) {
            warn!(
                "Record dated {} lies outside {}; counted in totals only",
                record.date, self.window
            );
        }

        let model = set.key(record, Dimension::Model);
        acc.add_total(record.date, model, amount, record.estimated);

        for (dim, source) in sources {
            match source {
                BreakdownSource::Primary => {
                    acc.add_breakdown(model, *dim, set.key(record, *dim), amount, record.estimated);
                }
                BreakdownSource::Missing => {
                    acc.add_breakdown(model, *dim, NOT_AVAILABLE, amount, record.estimated);
                }
                BreakdownSource::Secondary(_) => {}
            }
        }

        Ok(())
    }
}

/// Where a breakdown dimension's keys come from
#[derive(Debug, Clone, Copy)]
enum BreakdownSource<'a> {
    /// The primary set carries the dimension
    Primary,
    /// A later set carries it and is joined on `(date, model)`
    Secondary(&'a RecordSet),
    /// No set carries it; everything lands in `(not available)`
    Missing,
}

impl<'a> BreakdownSource<'a> {
    fn locate(dim: Dimension, primary: &RecordSet, secondaries: &'a [RecordSet]) -> Self {
        if primary.has_dimension(dim) {
            return Self::Primary;
        }
        match secondaries.iter().find(|set| set.has_dimension(dim)) {
            Some(set) => Self::Secondary(set),
            None => {
                debug!("No record set carries {dim}; booking under {NOT_AVAILABLE}");
                Self::Missing
            }
        }
    }
}

/// Parse a provider amount string as an exact decimal
pub fn parse_amount(amount: &str) -> Result<Decimal> {
    let trimmed = amount.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| CostError::InvalidAmount {
            amount: amount.to_string(),
            reason: e.to_string(),
        })
}

/// Running total with a sticky estimated flag
#[derive(Debug, Clone, Copy, Default)]
struct CostBucket {
    total: Decimal,
    estimated: bool,
}

impl CostBucket {
    fn add(&mut self, amount: Decimal, estimated: bool) {
        self.total += amount;
        self.estimated |= estimated;
    }
}

/// Per-model accumulator
#[derive(Debug, Default)]
struct ModelAccumulator {
    bucket: CostBucket,
    usage_types: BTreeMap<String, CostBucket>,
    regions: BTreeMap<String, CostBucket>,
}

impl ModelAccumulator {
    fn breakdown_mut(&mut self, dim: Dimension) -> Option<&mut BTreeMap<String, CostBucket>> {
        match dim {
            Dimension::UsageType => Some(&mut self.usage_types),
            Dimension::Region => Some(&mut self.regions),
            Dimension::Model => None,
        }
    }

    fn into_model_cost(self, model_name: String, detail: DetailLevel) -> ModelCost {
        let usage_types = detail
            .includes_usage_types()
            .then(|| sorted_breakdown(self.usage_types));
        let regions = detail
            .includes_regions()
            .then(|| sorted_breakdown(self.regions));

        // A model is estimated if any of its children are
        let child_estimated = usage_types
            .iter()
            .chain(regions.iter())
            .flatten()
            .any(|child| child.estimated);

        ModelCost {
            model_name,
            total_cost: self.bucket.total,
            estimated: self.bucket.estimated || child_estimated,
            usage_types,
            regions,
        }
    }
}

/// Owns every bucket while a response is folded
#[derive(Debug)]
struct CostAccumulator {
    detail: DetailLevel,
    total: CostBucket,
    currency: Option<String>,
    models: BTreeMap<String, ModelAccumulator>,
    daily: BTreeMap<NaiveDate, CostBucket>,
    /// Primary amount per `(date, model)`, the join key for secondary sets
    pairs: BTreeMap<(NaiveDate, String), CostBucket>,
}

impl CostAccumulator {
    fn new(detail: DetailLevel) -> Self {
        Self {
            detail,
            total: CostBucket::default(),
            currency: None,
            models: BTreeMap::new(),
            daily: BTreeMap::new(),
            pairs: BTreeMap::new(),
        }
    }

    fn observe_unit(&mut self, unit: &str) -> Result<()> {
        let unit = unit.trim();
        if unit.is_empty() {
            return Ok(());
        }
        match &self.currency {
            None => {
                self.currency = Some(unit.to_string());
                Ok(())
            }
            Some(existing) if existing == unit => Ok(()),
            Some(existing) => Err(CostError::InvalidArgument(format!(
                "records mix currencies {existing} and {unit}"
            ))),
        }
    }

    fn add_total(&mut self, date: NaiveDate, model: &str, amount: Decimal, estimated: bool) {
        self.total.add(amount, estimated);
        self.daily.entry(date).or_default().add(amount, estimated);
        self.models
            .entry(model.to_string())
            .or_default()
            .bucket
            .add(amount, estimated);
        self.pairs
            .entry((date, model.to_string()))
            .or_default()
            .add(amount, estimated);
    }

    fn add_breakdown(
        &mut self,
        model: &str,
        dim: Dimension,
        key: &str,
        amount: Decimal,
        estimated: bool,
    ) {
        if let Some(breakdown) = self
            .models
            .entry(model.to_string())
            .or_default()
            .breakdown_mut(dim)
        {
            breakdown
                .entry(key.to_string())
                .or_default()
                .add(amount, estimated);
        }
    }

    /// Join `set` on `(date, model)` and book the unexplained remainder
    fn merge_secondary(&mut self, dim: Dimension, set: &RecordSet) -> Result<()> {
        let mut explained: BTreeMap<(NaiveDate, String), Decimal> = BTreeMap::new();

        for record in &set.records {
            let amount = parse_amount(&record.amount)?;
            self.observe_unit(&record.unit)?;

            let model = set.key(record, Dimension::Model);
            let pair = (record.date, model.to_string());
            if !self.pairs.contains_key(&pair) {
                warn!(
                    "Ignoring {dim} record for {model} on {} with no matching total",
                    record.date
                );
                continue;
            }

            *explained.entry(pair).or_default() += amount;
            self.add_breakdown(model, dim, set.key(record, dim), amount, record.estimated);
        }

        let residuals: Vec<(String, Decimal, bool)> = self
            .pairs
            .iter()
            .filter_map(|(pair, bucket)| {
                let covered = explained.get(pair).copied().unwrap_or_default();
                let residual = bucket.total - covered;
                (!residual.is_zero()).then(|| (pair.1.clone(), residual, bucket.estimated))
            })
            .collect();

        for (model, residual, estimated) in residuals {
            if residual.is_sign_negative() {
                warn!("{dim} breakdown for {model} exceeds its total by {}", -residual);
            }
            self.add_breakdown(&model, dim, NOT_AVAILABLE, residual, estimated);
        }

        Ok(())
    }

    fn finish(self, window: DateWindow) -> CostData {
        let detail = self.detail;
        let mut models: Vec<ModelCost> = self
            .models
            .into_iter()
            .map(|(name, model)| model.into_model_cost(name, detail))
            .collect();
        models.sort_by(|a, b| {
            b.total_cost
                .cmp(&a.total_cost)
                .then_with(|| a.model_name.cmp(&b.model_name))
        });

        let daily_totals: Vec<DailyCost> = window
            .days()
            .map(|date| {
                let bucket = self.daily.get(&date).copied().unwrap_or_default();
                DailyCost {
                    date,
                    total_cost: bucket.total,
                    estimated: bucket.estimated,
                }
            })
            .collect();

        let has_estimated = self.total.estimated || models.iter().any(|m| m.estimated);

        CostData {
            total_cost: self.total.total,
            has_estimated,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            period: window,
            models,
            daily_totals,
        }
    }
}

fn sorted_breakdown(buckets: BTreeMap<String, CostBucket>) -> Vec<CostBreakdown> {
    let mut breakdown: Vec<CostBreakdown> = buckets
        .into_iter()
        .map(|(name, bucket)| CostBreakdown {
            name,
            total_cost: bucket.total,
            estimated: bucket.estimated,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.total_cost
            .cmp(&a.total_cost)
            .then_with(|| a.name.cmp(&b.name))
    });
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, model_region_set, model_usage_set, usd};

    fn window() -> DateWindow {
        DateWindow::new(date(2024, 3, 1), date(2024, 3, 4)).unwrap()
    }

    fn aggregate(sets: Vec<RecordSet>, detail: DetailLevel) -> CostData {
        Aggregator::new(window(), detail)
            .aggregate(&CostResponse::new(sets))
            .unwrap()
    }

    #[test]
    fn test_cost_bucket_sticky_estimate() {
        let mut bucket = CostBucket::default();
        bucket.add(usd("1.50"), true);
        bucket.add(usd("0.50"), false);
        assert_eq!(bucket.total, usd("2.00"));
        assert!(bucket.estimated);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0.0000012").unwrap(), usd("0.0000012"));
        assert_eq!(parse_amount(" 12.5 ").unwrap(), usd("12.5"));
        assert_eq!(parse_amount("1.5E-7").unwrap(), usd("0.00000015"));
        assert!(matches!(
            parse_amount("abc"),
            Err(CostError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_empty_response_zero_fills() {
        let data = aggregate(vec![], DetailLevel::Full);
        assert!(data.is_empty());
        assert!(!data.has_estimated);
        assert!(data.models.is_empty());
        assert_eq!(data.daily_totals.len(), 3);
        assert!(data.daily_totals.iter().all(|d| d.total_cost.is_zero()));
        assert_eq!(data.currency, "USD");
    }

    #[test]
    fn test_basic_detail_has_no_breakdowns() {
        let set = model_usage_set(&[
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 2), "Claude 3 Opus", "USE1-InputTokens", "3.00"),
        ]);
        let data = aggregate(vec![set], DetailLevel::Basic);
        assert_eq!(data.total_cost, usd("4.00"));
        assert_eq!(data.models[0].model_name, "Claude 3 Opus");
        assert!(data.models.iter().all(|m| m.usage_types.is_none() && m.regions.is_none()));
    }

    #[test]
    fn test_standard_detail_groups_usage_types() {
        let set = model_usage_set(&[
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 2), "Claude 3 Haiku", "USE1-InputTokens", "0.25"),
            (date(2024, 3, 2), "Claude 3 Haiku", "USE1-OutputTokens", "2.00"),
        ]);
        let data = aggregate(vec![set], DetailLevel::Standard);
        let usage = data.models[0].usage_types.as_ref().unwrap();
        assert_eq!(usage[0].name, "USE1-OutputTokens");
        assert_eq!(usage[0].total_cost, usd("2.00"));
        assert_eq!(usage[1].total_cost, usd("1.25"));
        assert!(data.models[0].regions.is_none());
    }

    #[test]
    fn test_full_detail_merges_region_set() {
        let usage = model_usage_set(&[
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 1), "Claude 3 Haiku", "USW2-InputTokens", "2.00"),
        ]);
        let regions = model_region_set(&[
            (date(2024, 3, 1), "Claude 3 Haiku", "us-east-1", "1.00"),
            (date(2024, 3, 1), "Claude 3 Haiku", "us-west-2", "2.00"),
        ]);
        let data = aggregate(vec![usage, regions], DetailLevel::Full);

        // Region rows explain the pair completely; nothing is double-counted
        assert_eq!(data.total_cost, usd("3.00"));
        let model = &data.models[0];
        assert_eq!(model.total_cost, usd("3.00"));
        let regions = model.regions.as_ref().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "us-west-2");
        assert_eq!(regions[1].name, "us-east-1");
    }

    #[test]
    fn test_region_residual_goes_to_not_available() {
        let usage = model_usage_set(&[(
            date(2024, 3, 2),
            "Claude 3 Haiku",
            "USE1-InputTokens",
            "5.00",
        )]);
        let regions = model_region_set(&[
            (date(2024, 3, 2), "Claude 3 Haiku", "us-east-1", "4.00"),
            // No primary total for this pair: ignored
            (date(2024, 3, 3), "Claude 3 Haiku", "us-east-1", "9.00"),
        ]);
        let data = aggregate(vec![usage, regions], DetailLevel::Full);
        let regions = data.models[0].regions.as_ref().unwrap();
        assert_eq!(regions[0].name, "us-east-1");
        assert_eq!(regions[0].total_cost, usd("4.00"));
        assert_eq!(regions[1].name, NOT_AVAILABLE);
        assert_eq!(regions[1].total_cost, usd("1.00"));
        assert_eq!(data.total_cost, usd("5.00"));
    }

    #[test]
    fn test_full_detail_without_region_set() {
        let usage = model_usage_set(&[(
            date(2024, 3, 1),
            "Claude 3 Haiku",
            "USE1-InputTokens",
            "5.00",
        )]);
        let data = aggregate(vec![usage], DetailLevel::Full);
        let regions = data.models[0].regions.as_ref().unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, NOT_AVAILABLE);
        assert_eq!(regions[0].total_cost, usd("5.00"));
    }

    #[test]
    fn test_three_dimension_set_matches_split_sets() {
        let day = date(2024, 3, 1);
        let combined = RecordSet::new(vec![
            Dimension::Model,
            Dimension::UsageType,
            Dimension::Region,
        ])
        .with_record(RawCostRecord::new(
            day,
            ["Claude 3 Haiku", "USE1-InputTokens", "us-east-1"],
            "1.00",
        ))
        .with_record(RawCostRecord::new(
            day,
            ["Claude 3 Haiku", "USW2-InputTokens", "us-west-2"],
            "2.00",
        ));
        let split = vec![
            model_usage_set(&[
                (day, "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
                (day, "Claude 3 Haiku", "USW2-InputTokens", "2.00"),
            ]),
            model_region_set(&[
                (day, "Claude 3 Haiku", "us-east-1", "1.00"),
                (day, "Claude 3 Haiku", "us-west-2", "2.00"),
            ]),
        ];

        assert_eq!(
            aggregate(vec![combined], DetailLevel::Full),
            aggregate(split, DetailLevel::Full)
        );
    }

    #[test]
    fn test_missing_usage_type_key_is_not_dropped() {
        let day = date(2024, 3, 1);
        let set = RecordSet::new(vec![Dimension::Model, Dimension::UsageType])
            .with_record(RawCostRecord::new(day, ["Claude 3 Haiku"], "1.00"))
            .with_record(RawCostRecord::new(day, ["Claude 3 Haiku", ""], "2.00"));
        let data = aggregate(vec![set], DetailLevel::Standard);
        let usage = data.models[0].usage_types.as_ref().unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].name, NOT_AVAILABLE);
        assert_eq!(usage[0].total_cost, usd("3.00"));
    }

    #[test]
    fn test_estimated_propagates_upward() {
        let mut set = model_usage_set(&[
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 3), "Claude 3 Opus", "USE1-InputTokens", "1.00"),
        ]);
        set.records[1].estimated = true;

        let data = aggregate(vec![set], DetailLevel::Standard);
        assert!(data.has_estimated);
        let opus = data.models.iter().find(|m| m.model_name == "Claude 3 Opus").unwrap();
        let haiku = data.models.iter().find(|m| m.model_name == "Claude 3 Haiku").unwrap();
        assert!(opus.estimated);
        assert!(opus.usage_types.as_ref().unwrap()[0].estimated);
        assert!(!haiku.estimated);
        assert!(data.daily_totals[2].estimated);
        assert!(!data.daily_totals[0].estimated);
    }

    #[test]
    fn test_secondary_estimate_marks_model() {
        let usage = model_usage_set(&[(
            date(2024, 3, 3),
            "Claude 3 Haiku",
            "USE1-InputTokens",
            "1.00",
        )]);
        let mut regions =
            model_region_set(&[(date(2024, 3, 3), "Claude 3 Haiku", "us-east-1", "1.00")]);
        regions.records[0].estimated = true;

        let data = aggregate(vec![usage, regions], DetailLevel::Full);
        assert!(data.models[0].estimated);
        assert!(data.has_estimated);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let set = model_usage_set(&[
            (date(2024, 3, 1), "Mistral Large", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "1.0"),
            (date(2024, 3, 1), "Llama 3", "USE1-InputTokens", "1.000"),
        ]);
        let data = aggregate(vec![set], DetailLevel::Basic);
        let names: Vec<_> = data.models.iter().map(|m| m.model_name.as_str()).collect();
        assert_eq!(names, vec!["Claude 3 Haiku", "Llama 3", "Mistral Large"]);
    }

    #[test]
    fn test_out_of_window_record_counts_in_totals_only() {
        let set = model_usage_set(&[
            (date(2024, 2, 20), "Claude 3 Haiku", "USE1-InputTokens", "1.00"),
            (date(2024, 3, 1), "Claude 3 Haiku", "USE1-InputTokens", "2.00"),
        ]);
        let data = aggregate(vec![set], DetailLevel::Basic);
        assert_eq!(data.total_cost, usd("3.00"));
        assert_eq!(data.daily_totals.len(), 3);
        assert_eq!(data.daily_totals[0].total_cost, usd("2.00"));
    }

    #[test]
    fn test_invalid_amount_is_fatal() {
        let set = model_usage_set(&[(
            date(2024, 3, 1),
            "Claude 3 Haiku",
            "USE1-InputTokens",
            "twelve",
        )]);
        let result = Aggregator::new(window(), DetailLevel::Basic)
            .aggregate(&CostResponse::new(vec![set]));
        assert!(matches!(result, Err(CostError::InvalidAmount { .. })));
    }

    #[test]
    fn test_mixed_currencies_rejected() {
        let day = date(2024, 3, 1);
        let set = RecordSet::new(vec![Dimension::Model])
            .with_record(RawCostRecord::new(day, ["A"], "1.00"))
            .with_record(RawCostRecord::new(day, ["B"], "1.00").with_unit("EUR"));
        let result = Aggregator::new(window(), DetailLevel::Basic)
            .aggregate(&CostResponse::new(vec![set]));
        assert!(matches!(result, Err(CostError::InvalidArgument(_))));
    }

    #[test]
    fn test_analyze_cost_data_rejects_bad_window() {
        let response = CostResponse::default();
        assert!(matches!(
            analyze_cost_data(&response, "2024-03-05", "2024-03-01", DetailLevel::Basic),
            Err(CostError::InvalidArgument(_))
        ));
        assert!(matches!(
            analyze_cost_data(&response, "03/01/2024", "2024-03-05", DetailLevel::Basic),
            Err(CostError::InvalidDate(_))
        ));
    }
}

//! Shared test utilities for unit tests
//!
//! Integration tests under `tests/` keep their own builders in
//! `tests/common/mod.rs` because this module is only compiled for unit tests.

use crate::types::{Dimension, RawCostRecord, RecordSet};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Shorthand for a calendar date
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Shorthand for an exact decimal amount
pub fn usd(amount: &str) -> Decimal {
    Decimal::from_str(amount).unwrap()
}

fn two_dimension_set(second: Dimension, rows: &[(NaiveDate, &str, &str, &str)]) -> RecordSet {
    rows.iter().fold(
        RecordSet::new(vec![Dimension::Model, second]),
        |set, (day, model, key, amount)| {
            set.with_record(RawCostRecord::new(*day, [*model, *key], *amount))
        },
    )
}

/// A `SERVICE + USAGE_TYPE` style record set
pub fn model_usage_set(rows: &[(NaiveDate, &str, &str, &str)]) -> RecordSet {
    two_dimension_set(Dimension::UsageType, rows)
}

/// A `SERVICE + REGION` style record set
pub fn model_region_set(rows: &[(NaiveDate, &str, &str, &str)]) -> RecordSet {
    two_dimension_set(Dimension::Region, rows)
}

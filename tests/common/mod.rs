//! Common test utilities for bedrock-cost tests
//!
//! Builders for grouped Cost Explorer style record sets and an in-memory
//! `CostProvider` that records how it was called.

use async_trait::async_trait;
use bedrock_cost_core::{
    CostError, CostProvider, CostResponse, DateWindow, DetailLevel, Dimension, RawCostRecord,
    RecordSet, Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Mutex;

/// Model names as Cost Explorer reports them
#[allow(dead_code)]
pub const TEST_MODELS: &[&str] = &[
    "Claude 3 Opus (Amazon Bedrock Edition)",
    "Claude 3 Sonnet (Amazon Bedrock Edition)",
    "Claude 3 Haiku (Amazon Bedrock Edition)",
    "Llama 3 70B Instruct (Amazon Bedrock Edition)",
];

/// Usage types as Cost Explorer reports them
#[allow(dead_code)]
pub const TEST_USAGE_TYPES: &[&str] = &[
    "USE1-Claude3Opus-InputTokens",
    "USE1-Claude3Opus-OutputTokens",
    "USW2-Claude3Haiku-InputTokens",
];

/// Regions as Cost Explorer reports them
#[allow(dead_code)]
pub const TEST_REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-central-1"];

/// A calendar date in 2024
#[allow(dead_code)]
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// An exact decimal amount
#[allow(dead_code)]
pub fn amount(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// A window from `start` (inclusive) to `end` (exclusive)
#[allow(dead_code)]
pub fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
    DateWindow::new(start, end).unwrap()
}

/// Record set grouped by model only
#[allow(dead_code)]
pub fn model_set(rows: &[(NaiveDate, &str, &str)]) -> RecordSet {
    let mut set = RecordSet::new(vec![Dimension::Model]);
    for (day, model, cost) in rows {
        set.push(RawCostRecord::new(*day, [*model], *cost));
    }
    set
}

/// Record set grouped by model and usage type
#[allow(dead_code)]
pub fn usage_set(rows: &[(NaiveDate, &str, &str, &str)]) -> RecordSet {
    let mut set = RecordSet::new(vec![Dimension::Model, Dimension::UsageType]);
    for (day, model, usage, cost) in rows {
        set.push(RawCostRecord::new(*day, [*model, *usage], *cost));
    }
    set
}

/// Record set grouped by model and region
#[allow(dead_code)]
pub fn region_set(rows: &[(NaiveDate, &str, &str, &str)]) -> RecordSet {
    let mut set = RecordSet::new(vec![Dimension::Model, Dimension::Region]);
    for (day, model, region, cost) in rows {
        set.push(RawCostRecord::new(*day, [*model, *region], *cost));
    }
    set
}

/// In-memory provider returning a canned response
#[allow(dead_code)]
pub struct MockProvider {
    response: Option<CostResponse>,
    calls: Mutex<Vec<(DateWindow, DetailLevel)>>,
}

#[allow(dead_code)]
impl MockProvider {
    /// Provider answering every query with `response`
    pub fn new(response: CostResponse) -> Self {
        Self {
            response: Some(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider failing every query with a credentials error
    pub fn without_credentials() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(window, detail)` this provider was queried with
    pub fn calls(&self) -> Vec<(DateWindow, DetailLevel)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_costs(&self, window: &DateWindow, detail: DetailLevel) -> Result<CostResponse> {
        self.calls.lock().unwrap().push((*window, detail));
        self.response.clone().ok_or_else(|| {
            CostError::Credentials("Unable to locate AWS credentials".to_string())
        })
    }
}

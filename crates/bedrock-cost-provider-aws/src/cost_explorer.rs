//! Cost Explorer backed `CostProvider`
//!
//! # Examples
//!
//! ```no_run
//! use bedrock_cost_core::{CostProvider, DetailLevel, period};
//! use bedrock_cost_provider_aws::CostExplorerGateway;
//!
//! # async fn example() -> bedrock_cost_core::Result<()> {
//! let today = period::today_utc();
//! let window = period::calculate_date_range_from(today, 30)?;
//! let gateway = CostExplorerGateway::from_env(None, None, today).await;
//! let response = gateway.fetch_costs(&window, DetailLevel::Standard).await?;
//! println!("{} records", response.record_count());
//! # Ok(())
//! # }
//! ```

use crate::conversion::{COST_METRIC, convert_result, group_key, query_plan};
use crate::errors::classify_sdk_error;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_costexplorer::Client;
use aws_sdk_costexplorer::config::retry::RetryConfig;
use aws_sdk_costexplorer::config::{Builder, Region};
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{DateInterval, Granularity, GroupDefinition, GroupDefinitionType};
use bedrock_cost_core::error::{CostError, Result};
use bedrock_cost_core::provider::CostProvider;
use bedrock_cost_core::types::{CostResponse, DateWindow, DetailLevel, Dimension, RecordSet};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Region Cost Explorer is served from when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Gateway issuing `GetCostAndUsage` queries for Bedrock spend
#[derive(Debug, Clone)]
pub struct CostExplorerGateway {
    client: Client,
    today: NaiveDate,
    retry: RetryPolicy,
}

impl CostExplorerGateway {
    /// Build a gateway from the standard AWS credential and region chain
    ///
    /// `profile` selects a named profile; `region` overrides the region
    /// chain, which falls back to `us-east-1`. `today` is the run's fixed
    /// notion of the current UTC date, used to flag estimated days.
    pub async fn from_env(profile: Option<&str>, region: Option<&str>, today: NaiveDate) -> Self {
        let region_provider =
            RegionProviderChain::first_try(region.map(|r| Region::new(r.to_string())))
                .or_default_provider()
                .or_else(DEFAULT_REGION);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        debug!(
            "Loaded AWS configuration (profile: {}, region: {:?})",
            profile.unwrap_or("default"),
            config.region()
        );

        Self::from_conf(Builder::from(&config), today)
    }

    /// Build a gateway from an explicit client configuration
    ///
    /// The SDK retrier is switched off so `RetryPolicy` is the only retry layer.
    pub fn from_conf(config: Builder, today: NaiveDate) -> Self {
        let client = Client::from_conf(config.retry_config(RetryConfig::disabled()).build());
        Self {
            client,
            today,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch every page of one grouped query
    async fn query(&self, interval: &DateInterval, dimensions: &[Dimension]) -> Result<RecordSet> {
        let mut set = RecordSet::new(dimensions.to_vec());
        let mut next_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let output = self
                .retry
                .run("GetCostAndUsage", || {
                    self.fetch_page(interval, dimensions, next_token.clone())
                })
                .await?;
            pages += 1;

            for result in output.results_by_time() {
                convert_result(result, self.today, &mut set)?;
            }

            match output.next_page_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(
            "Query grouped by {:?} returned {} Bedrock records in {} page(s)",
            dimensions,
            set.records.len(),
            pages
        );
        Ok(set)
    }

    async fn fetch_page(
        &self,
        interval: &DateInterval,
        dimensions: &[Dimension],
        next_token: Option<String>,
    ) -> Result<GetCostAndUsageOutput> {
        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(interval.clone())
            .granularity(Granularity::Daily)
            .metrics(COST_METRIC)
            .set_next_page_token(next_token);

        for dimension in dimensions {
            request = request.group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(group_key(*dimension))
                    .build(),
            );
        }

        request.send().await.map_err(classify_sdk_error)
    }
}

#[async_trait]
impl CostProvider for CostExplorerGateway {
    fn name(&self) -> &str {
        "aws-cost-explorer"
    }

    async fn fetch_costs(&self, window: &DateWindow, detail: DetailLevel) -> Result<CostResponse> {
        let interval = DateInterval::builder()
            .start(window.start_str())
            .end(window.end_str())
            .build()
            .map_err(|e| CostError::InvalidArgument(e.to_string()))?;

        info!("Querying Cost Explorer for {} at {} detail", window, detail);

        let mut record_sets = Vec::new();
        for dimensions in query_plan(detail) {
            record_sets.push(self.query(&interval, &dimensions).await?);
        }

        Ok(CostResponse::new(record_sets))
    }
}

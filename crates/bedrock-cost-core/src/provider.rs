//! Provider trait for cost gateways
//!
//! This module defines the `CostProvider` trait that gateway crates
//! implement. The core never talks to the network itself: it receives a
//! fully fetched [`CostResponse`] and treats it as final.

use crate::error::Result;
use crate::types::{CostResponse, DateWindow, DetailLevel};
use async_trait::async_trait;

/// Trait for cost data gateways.
///
/// Implementations fetch every record set needed for `detail` over
/// `window`, handling pagination, retries, and credentials themselves.
/// The first returned record set must cover the full cost of the window.
#[async_trait]
pub trait CostProvider: Send + Sync {
    /// Short provider name used in log messages
    fn name(&self) -> &str;

    /// Fetch grouped daily cost records for `window`
    async fn fetch_costs(&self, window: &DateWindow, detail: DetailLevel) -> Result<CostResponse>;
}

//! AWS Cost Explorer gateway for bedrock-cost
//!
//! This crate implements the `CostProvider` trait on top of the Cost
//! Explorer `GetCostAndUsage` API, handling credentials, pagination,
//! throttling retries, and conversion into raw cost records.

pub mod conversion;
pub mod cost_explorer;
pub mod errors;
pub mod retry;

pub use cost_explorer::CostExplorerGateway;
pub use retry::RetryPolicy;

//! bedrock-cost - Report AWS Bedrock model costs from AWS Cost Explorer
//!
//! The library half of the binary. It wires the workspace crates together:
//!
//! - `bedrock-cost-core` resolves periods and aggregates raw cost records
//! - `bedrock-cost-provider-aws` queries Cost Explorer
//! - `bedrock-cost-terminal` renders JSON, tables, plots, and summaries
//!
//! # Examples
//!
//! ```no_run
//! use bedrock_cost::report::generate_report;
//! use bedrock_cost_core::{DetailLevel, period};
//! use bedrock_cost_provider_aws::CostExplorerGateway;
//!
//! #[tokio::main]
//! async fn main() -> bedrock_cost_core::Result<()> {
//!     let days = period::resolve_period("2w")?;
//!     let today = period::today_utc();
//!     let window = period::calculate_date_range_from(today, days)?;
//!
//!     let gateway = CostExplorerGateway::from_env(None, None, today).await;
//!     let data = generate_report(&gateway, &window, DetailLevel::Standard).await?;
//!     println!("Total: {}", data.total_cost.round_dp(2));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod report;

// Re-export commonly used types
pub use bedrock_cost_core::{CostData, CostError, DateWindow, DetailLevel, Result};
pub use bedrock_cost_terminal::{OutputFormat, RenderOptions};

//! Error types for bedrock-cost
//!
//! This module defines the error types used throughout the bedrock-cost
//! crates. All errors are derived from `thiserror`; the binary wraps them
//! with `anyhow` at the outermost boundary.
//!
//! # Example
//!
//! ```
//! use bedrock_cost_core::error::{CostError, Result};
//! use bedrock_cost_core::period::parse_period;
//!
//! fn example_function() -> Result<i64> {
//!     let days = parse_period("2w")?;
//!     Ok(days)
//! }
//!
//! assert_eq!(example_function().unwrap(), 14);
//! assert!(matches!(parse_period("10x"), Err(CostError::PeriodParse { .. })));
//! ```

use thiserror::Error;

/// Main error type for bedrock-cost operations
///
/// User-correctable input problems (`PeriodParse`, `PeriodValidation`) are
/// kept apart from gateway failures so the CLI can report them verbatim.
#[derive(Error, Debug)]
pub enum CostError {
    /// Malformed duration string such as `10x` or `-5d`
    #[error("Invalid period '{input}': {reason}")]
    PeriodParse {
        /// The offending input as typed by the user
        input: String,
        /// Why the input was rejected
        reason: String,
    },

    /// Syntactically valid duration outside the supported range
    #[error("Period of {0} days is out of range (must be between 1 and 365 days)")]
    PeriodValidation(i64),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A billing amount that is not a valid decimal
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount {
        /// The raw amount string from the provider
        amount: String,
        /// The decimal parser's error message
        reason: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// AWS credentials could not be resolved or were rejected
    #[error("AWS credentials error: {0}")]
    Credentials(String),

    /// The caller lacks permission to query Cost Explorer
    #[error("Permission denied: {0}")]
    Permission(String),

    /// The provider throttled the request
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Transport-level failure (timeouts, connection resets)
    #[error("Network error: {0}")]
    Network(String),

    /// Any other provider-side failure
    #[error("Cost provider error: {0}")]
    Provider(String),
}

impl CostError {
    /// Returns true if the gateway may retry the request that produced this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::Network(_))
    }
}

/// Convenience type alias for Results in bedrock-cost
pub type Result<T> = std::result::Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CostError::PeriodValidation(366);
        assert_eq!(
            error.to_string(),
            "Period of 366 days is out of range (must be between 1 and 365 days)"
        );

        let error = CostError::PeriodParse {
            input: "10x".to_string(),
            reason: "unknown unit 'x'".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid period '10x': unknown unit 'x'");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(CostError::Throttled("slow down".into()).is_retryable());
        assert!(CostError::Network("timeout".into()).is_retryable());
        assert!(!CostError::Credentials("missing".into()).is_retryable());
        assert!(!CostError::Permission("denied".into()).is_retryable());
        assert!(!CostError::PeriodValidation(0).is_retryable());
    }
}

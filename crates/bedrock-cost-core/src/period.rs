//! Period resolution
//!
//! Turns a compact duration such as `30d`, `2w`, or `1m` into a day count
//! and derives the half-open `[start, end)` window Cost Explorer is
//! queried with. "Today" is the UTC calendar date and is read exactly once
//! per run by the caller via [`today_utc`].

use crate::error::{CostError, Result};
use crate::types::DateWindow;
use chrono::{Days, NaiveDate, Utc};
use tracing::debug;

/// Duration used when the user does not pass `--period`
pub const DEFAULT_PERIOD: &str = "30d";

/// Shortest supported lookback in days
pub const MIN_PERIOD_DAYS: i64 = 1;

/// Longest supported lookback in days
pub const MAX_PERIOD_DAYS: i64 = 365;

/// Parse a duration string into a number of days
///
/// The grammar is `<digits><unit>` with unit `d` (days), `w` (weeks, x7) or
/// `m` (months, x30), case-insensitive. Surrounding whitespace is trimmed.
///
/// # Examples
/// ```
/// use bedrock_cost_core::period::parse_period;
///
/// assert_eq!(parse_period("7d").unwrap(), 7);
/// assert_eq!(parse_period("2W").unwrap(), 14);
/// assert_eq!(parse_period("1m").unwrap(), 30);
/// assert!(parse_period("-5d").is_err());
/// ```
pub fn parse_period(input: &str) -> Result<i64> {
    let parse_error = |reason: &str| CostError::PeriodParse {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let Some(unit) = trimmed.chars().last() else {
        return Err(parse_error("period is empty"));
    };

    let multiplier = match unit.to_ascii_lowercase() {
        'd' => 1,
        'w' => 7,
        'm' => 30,
        c if c.is_ascii_digit() => {
            return Err(parse_error("missing unit (expected d, w, or m)"));
        }
        other => return Err(parse_error(&format!("unknown unit '{other}'"))),
    };

    let number = &trimmed[..trimmed.len() - unit.len_utf8()];
    if number.is_empty() {
        return Err(parse_error("missing number before unit"));
    }
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(parse_error("number must be a positive integer"));
    }

    let value: i64 = number
        .parse()
        .map_err(|_| parse_error("number is too large"))?;
    if value <= 0 {
        return Err(parse_error("number must be greater than zero"));
    }

    value
        .checked_mul(multiplier)
        .ok_or_else(|| parse_error("number is too large"))
}

/// Check a day count against the supported lookback range
pub fn validate_period(days: i64) -> Result<()> {
    if !(MIN_PERIOD_DAYS..=MAX_PERIOD_DAYS).contains(&days) {
        return Err(CostError::PeriodValidation(days));
    }
    Ok(())
}

/// Parse and validate in one step
pub fn resolve_period(input: &str) -> Result<i64> {
    let days = parse_period(input)?;
    validate_period(days)?;
    debug!("Resolved period '{}' to {} days", input.trim(), days);
    Ok(days)
}

/// The current UTC calendar date
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Build the window ending today (exclusive) and covering `days` days
pub fn calculate_date_range(days: i64) -> Result<DateWindow> {
    calculate_date_range_from(today_utc(), days)
}

/// Build the window ending at `today` (exclusive) and covering `days` days
///
/// # Examples
/// ```
/// use bedrock_cost_core::period::calculate_date_range_from;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
/// let window = calculate_date_range_from(today, 30).unwrap();
/// assert_eq!(window.start_str(), "2024-03-01");
/// assert_eq!(window.end_str(), "2024-03-31");
/// ```
pub fn calculate_date_range_from(today: NaiveDate, days: i64) -> Result<DateWindow> {
    let lookback = u64::try_from(days)
        .map_err(|_| CostError::InvalidArgument(format!("negative day count: {days}")))?;
    let start = today.checked_sub_days(Days::new(lookback)).ok_or_else(|| {
        CostError::InvalidArgument(format!("{days} days before {today} is out of range"))
    })?;
    DateWindow::new(start, today)
}

/// Render a date as `YYYY-MM-DD`
pub fn format_date_for_aws(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

//! Model name and amount formatting
//!
//! Cost Explorer reports Bedrock models as services such as
//! `Claude 3.5 Sonnet (Amazon Bedrock Edition)`; the suffix is noise in
//! terminal output and is dropped unless full names are requested.

use rust_decimal::{Decimal, RoundingStrategy};

/// Suffix Cost Explorer appends to marketplace Bedrock models
pub const BEDROCK_EDITION_SUFFIX: &str = " (Amazon Bedrock Edition)";

/// Format a model name for display
///
/// # Examples
///
/// ```
/// use bedrock_cost_terminal::model_formatter::format_model_name;
///
/// assert_eq!(
///     format_model_name("Claude 3 Haiku (Amazon Bedrock Edition)", false),
///     "Claude 3 Haiku"
/// );
/// assert_eq!(format_model_name("Amazon Bedrock", false), "Amazon Bedrock");
/// ```
pub fn format_model_name(model_name: &str, use_full_name: bool) -> String {
    if use_full_name {
        return model_name.to_string();
    }
    model_name.replace(BEDROCK_EDITION_SUFFIX, "")
}

/// Round an amount to cents, half away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with its currency, prefixed with `~` when estimated
///
/// # Examples
///
/// ```
/// use bedrock_cost_terminal::model_formatter::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(12345, 3), "USD", false), "$12.35");
/// assert_eq!(format_amount(Decimal::new(5, 0), "USD", true), "~$5.00");
/// assert_eq!(format_amount(Decimal::new(5, 0), "EUR", false), "EUR 5.00");
/// ```
pub fn format_amount(amount: Decimal, currency: &str, estimated: bool) -> String {
    let marker = if estimated { "~" } else { "" };
    let rounded = round_cents(amount);
    if currency == "USD" {
        format!("{marker}${rounded:.2}")
    } else {
        format!("{marker}{currency} {rounded:.2}")
    }
}

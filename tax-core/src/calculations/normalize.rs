//! Input normalizer for monetary amounts typed by people.
//!
//! Accepts text such as `₹8,00,000`, `Rs. 1,50,000/-`, `INR 25000` or
//! `12 00 000.50` and turns it into an exact [`Decimal`].

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::TaxError;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(-)?(?:inr|rs\.?)?(-)?(\d+(?:\.\d+)?)(?:/-)?$").unwrap()
});

/// Largest amount accepted in a request (₹10^15). Sums and products of
/// accepted amounts stay inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Removes currency symbols, grouping separators and whitespace.
fn strip_decorations(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '_' | '\'' | '₹' | '$' | '€' | '£'))
        .collect()
}

/// Parses a monetary amount into a non-negative [`Decimal`].
///
/// # Errors
///
/// [`TaxError::InvalidAmount`] when nothing numeric remains after stripping
/// decorations, when the remainder is not a plain decimal number, when it
/// is negative, or when it exceeds [`MAX_AMOUNT`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::parse_amount;
///
/// assert_eq!(parse_amount("₹8,00,000").unwrap(), dec!(800000));
/// assert_eq!(parse_amount("Rs. 1,50,000/-").unwrap(), dec!(150000));
/// assert!(parse_amount("-500").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, TaxError> {
    let cleaned = strip_decorations(s);
    if cleaned.is_empty() {
        return Err(TaxError::invalid_amount(s, "no amount given"));
    }

    let caps = AMOUNT_RE.captures(&cleaned).ok_or_else(|| {
        tracing::debug!(input = %s, "rejected non-numeric amount");
        TaxError::invalid_amount(s, "not a number")
    })?;

    let value = Decimal::from_str(&caps[3])
        .map_err(|e| TaxError::invalid_amount(s, e.to_string()))?;
    let negative = caps.get(1).is_some() || caps.get(2).is_some();
    if negative && !value.is_zero() {
        return Err(TaxError::invalid_amount(s, "amount must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(TaxError::invalid_amount(s, "amount is too large"));
    }

    Ok(value)
}

/// Parses an optional amount. `None`, empty and whitespace-only input give
/// `Ok(None)`; anything else must be a valid amount.
pub fn parse_optional_amount(s: Option<&str>) -> Result<Option<Decimal>, TaxError> {
    match s {
        Some(text) if !text.trim().is_empty() => parse_amount(text).map(Some),
        _ => Ok(None),
    }
}

//! Common utility functions for tax calculations.
//!
//! Every monetary stage of the pipeline is rounded with [`round_to_rupee`] so
//! the itemized parts of a result always add up to its total.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to the nearest whole rupee using half-up rounding.
///
/// Values at exactly 0.5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_to_rupee;
///
/// assert_eq!(round_to_rupee(dec!(617283.49)), dec!(617283));
/// assert_eq!(round_to_rupee(dec!(617283.5)), dec!(617284));
/// assert_eq!(round_to_rupee(dec!(-12.5)), dec!(-13)); // Away from zero
/// ```
pub fn round_to_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative amounts to zero. Taxable income, surcharge after relief
/// and the HRA exemption never go below zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-25000)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(595000)), dec!(595000));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

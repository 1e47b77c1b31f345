//! Presumptive income adjustment for freelancers and gig workers.
//!
//! Only a fixed share of gross receipts is treated as income; the rest is
//! presumed to be expenses.

use rust_decimal::Decimal;

use crate::calculations::common::round_to_rupee;
use crate::models::TaxpayerProfile;

/// `gross_receipts * retention_rate`, rounded half-up to the nearest rupee.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::presumptive::presumptive_income;
///
/// assert_eq!(presumptive_income(dec!(1200000), dec!(0.50)), dec!(600000));
/// ```
pub fn presumptive_income(
    gross_receipts: Decimal,
    retention_rate: Decimal,
) -> Decimal {
    round_to_rupee(gross_receipts * retention_rate)
}

/// Income the regime-specific deduction path starts from: presumptive income
/// for categories taxed presumptively, gross income otherwise.
pub fn assessable_income(
    profile: &TaxpayerProfile,
    retention_rate: Decimal,
) -> Decimal {
    if profile.category.uses_presumptive_income() {
        presumptive_income(profile.gross_income, retention_rate)
    } else {
        profile.gross_income
    }
}

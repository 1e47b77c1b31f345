//! Health and education cess.

use rust_decimal::Decimal;

use crate::calculations::common::round_to_rupee;

/// Cess on `base_tax + surcharge` at `rate`, rounded to the nearest rupee.
pub fn cess(
    base_tax: Decimal,
    surcharge: Decimal,
    rate: Decimal,
) -> Decimal {
    round_to_rupee((base_tax + surcharge) * rate)
}

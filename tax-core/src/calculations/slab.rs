//! Slab tax calculator.
//!
//! Applies a progressive marginal-rate table: every slab whose lower bound is
//! below the taxable income contributes
//! `(min(income, upper) - lower) * rate`.

use rust_decimal::Decimal;

use crate::calculations::common::round_to_rupee;
use crate::models::SlabTable;

/// Exact (unrounded) slab tax for `taxable_income`.
///
/// Non-decreasing in `taxable_income` and linear within each slab. Income at
/// or below zero yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::slab::slab_tax;
/// use tax_core::TaxRules;
///
/// let rules = TaxRules::fy2024_25();
///
/// // 4,00,000 at 5% plus 1,00,000 at 10%.
/// assert_eq!(slab_tax(dec!(800000), &rules.new_regime.slabs), dec!(30000));
/// ```
pub fn slab_tax(
    taxable_income: Decimal,
    table: &SlabTable,
) -> Decimal {
    table
        .slabs()
        .iter()
        .take_while(|slab| slab.lower < taxable_income)
        .map(|slab| {
            let top = slab
                .upper
                .map_or(taxable_income, |upper| upper.min(taxable_income));
            (top - slab.lower) * slab.rate
        })
        .sum()
}

/// Slab tax rounded to the nearest rupee, as reported in a result.
pub fn base_tax(
    taxable_income: Decimal,
    table: &SlabTable,
) -> Decimal {
    round_to_rupee(slab_tax(taxable_income, table))
}

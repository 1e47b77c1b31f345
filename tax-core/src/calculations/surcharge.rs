//! Surcharge with marginal relief.
//!
//! The raw surcharge is `base_tax * rate` for the highest bracket whose
//! threshold does not exceed taxable income. Marginal relief then caps
//! `base_tax + surcharge` at what a taxpayer with income exactly at the
//! threshold pays under the previous bracket, plus the full income above the
//! threshold:
//!
//! ```text
//! surcharge = min(raw, tax(T) + surcharge_prev(T) + (income - T) - base_tax)
//! ```
//!
//! `surcharge_prev(T)` is itself computed with relief against the bracket
//! below it, so the cap holds across every boundary.

use rust_decimal::Decimal;

use crate::calculations::common::{floor_at_zero, round_to_rupee};
use crate::calculations::slab::base_tax as slab_base_tax;
use crate::models::{SlabTable, SurchargeTable};

/// Surcharge on `base_tax` for `taxable_income`, rounded to the nearest rupee.
///
/// `slabs` is the table `base_tax` was computed from; relief needs the slab
/// tax at each threshold.
pub fn surcharge(
    base_tax: Decimal,
    taxable_income: Decimal,
    table: &SurchargeTable,
    slabs: &SlabTable,
) -> Decimal {
    match table.bracket_index(taxable_income) {
        Some(index) => surcharge_in_bracket(base_tax, taxable_income, index, table, slabs),
        None => Decimal::ZERO,
    }
}

fn surcharge_in_bracket(
    base_tax: Decimal,
    taxable_income: Decimal,
    index: usize,
    table: &SurchargeTable,
    slabs: &SlabTable,
) -> Decimal {
    let bracket = &table.brackets()[index];
    let raw = base_tax * bracket.rate;

    let threshold = bracket.threshold;
    let tax_at_threshold = slab_base_tax(threshold, slabs);
    let surcharge_at_threshold = match index.checked_sub(1) {
        Some(previous) => surcharge_in_bracket(tax_at_threshold, threshold, previous, table, slabs),
        None => Decimal::ZERO,
    };
    let ceiling = tax_at_threshold + surcharge_at_threshold + (taxable_income - threshold);
    let relieved = ceiling - base_tax;

    if relieved < raw {
        tracing::debug!(%taxable_income, %threshold, %raw, %relieved, "marginal relief applied");
    }

    round_to_rupee(floor_at_zero(raw.min(relieved)))
}

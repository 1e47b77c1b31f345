//! Full rebate for low taxable income.
//!
//! The rebate is a cliff, not a taper: at or below the threshold the whole
//! liability is forgiven, one rupee above it nothing is.

use rust_decimal::Decimal;

use crate::models::RebateRule;

/// Liability after the rebate gate, and whether the rebate fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebateOutcome {
    pub total_liability: Decimal,
    pub rebate_applied: bool,
}

/// Applies `rule` to `liability` (base tax + surcharge + cess).
pub fn apply_rebate(
    taxable_income: Decimal,
    liability: Decimal,
    rule: &RebateRule,
) -> RebateOutcome {
    if rule.applies_to(taxable_income) {
        RebateOutcome {
            total_liability: Decimal::ZERO,
            rebate_applied: true,
        }
    } else {
        RebateOutcome {
            total_liability: liability,
            rebate_applied: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn new_regime_rule() -> RebateRule {
        RebateRule::new(dec!(700000), dec!(25000))
    }

    #[test]
    fn at_threshold_liability_is_forgiven() {
        let result = apply_rebate(dec!(700000), dec!(20800), &new_regime_rule());

        assert_eq!(
            result,
            RebateOutcome {
                total_liability: dec!(0),
                rebate_applied: true,
            }
        );
    }

    #[test]
    fn one_rupee_above_threshold_pays_in_full() {
        let result = apply_rebate(dec!(700001), dec!(20800), &new_regime_rule());

        assert_eq!(
            result,
            RebateOutcome {
                total_liability: dec!(20800),
                rebate_applied: false,
            }
        );
    }

    #[test]
    fn rebate_flag_is_set_even_with_nothing_to_forgive() {
        let result = apply_rebate(dec!(250000), dec!(0), &new_regime_rule());

        assert!(result.rebate_applied);
        assert_eq!(result.total_liability, dec!(0));
    }
}

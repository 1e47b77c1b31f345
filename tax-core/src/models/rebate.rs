use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// Full rebate for taxable income at or below `income_threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateRule {
    pub income_threshold: Decimal,
    /// Largest slab tax the rebate may forgive. Rule validation checks the
    /// threshold never needs more than this.
    pub max_rebate: Decimal,
}

impl RebateRule {
    pub fn new(
        income_threshold: Decimal,
        max_rebate: Decimal,
    ) -> Self {
        Self {
            income_threshold,
            max_rebate,
        }
    }

    pub fn applies_to(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income <= self.income_threshold
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.income_threshold.is_sign_negative() {
            return Err(RulesError::NegativeAmount {
                what: "rebate threshold",
                amount: self.income_threshold,
            });
        }
        if self.max_rebate.is_sign_negative() {
            return Err(RulesError::NegativeAmount {
                what: "maximum rebate",
                amount: self.max_rebate,
            });
        }
        Ok(())
    }
}

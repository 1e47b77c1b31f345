use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// Surcharge rate that applies once taxable income reaches `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBracket {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl SurchargeBracket {
    pub fn new(
        threshold: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { threshold, rate }
    }
}

/// Regime-specific surcharge brackets, sorted by strictly increasing
/// threshold. An empty table means no surcharge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SurchargeBracket>", into = "Vec<SurchargeBracket>")]
pub struct SurchargeTable {
    brackets: Vec<SurchargeBracket>,
}

impl SurchargeTable {
    pub fn new(brackets: Vec<SurchargeBracket>) -> Result<Self, RulesError> {
        let table = Self { brackets };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_brackets(brackets: Vec<SurchargeBracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[SurchargeBracket] {
        &self.brackets
    }

    /// Index of the highest threshold not exceeding `taxable_income`.
    pub fn bracket_index(
        &self,
        taxable_income: Decimal,
    ) -> Option<usize> {
        self.brackets
            .iter()
            .rposition(|bracket| bracket.threshold <= taxable_income)
    }

    /// Highest rate anywhere in the table.
    pub fn max_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|bracket| bracket.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        let mut previous: Option<&SurchargeBracket> = None;
        for bracket in &self.brackets {
            if bracket.threshold.is_sign_negative() {
                return Err(RulesError::NegativeAmount {
                    what: "surcharge threshold",
                    amount: bracket.threshold,
                });
            }
            if bracket.rate.is_sign_negative() || bracket.rate > Decimal::ONE {
                return Err(RulesError::RateOutOfRange {
                    what: "surcharge rate",
                    rate: bracket.rate,
                });
            }
            if let Some(prev) = previous {
                if bracket.threshold <= prev.threshold {
                    return Err(RulesError::UnsortedSurchargeThresholds {
                        previous: prev.threshold,
                        threshold: bracket.threshold,
                    });
                }
            }
            previous = Some(bracket);
        }
        Ok(())
    }
}

impl TryFrom<Vec<SurchargeBracket>> for SurchargeTable {
    type Error = RulesError;

    fn try_from(brackets: Vec<SurchargeBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<SurchargeTable> for Vec<SurchargeBracket> {
    fn from(table: SurchargeTable) -> Self {
        table.brackets
    }
}

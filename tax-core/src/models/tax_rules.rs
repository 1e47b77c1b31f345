//! Financial-year rule tables.
//!
//! Everything that changes from one budget to the next lives here as data:
//! slab schedules, surcharge brackets, rebate thresholds, deduction caps, the
//! cess rate and the presumptive retention rate. The calculators never embed
//! any of these numbers.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::slab::slab_tax;
use crate::error::RulesError;
use crate::models::{
    AgeBand, DeductionPolicy, DeductionSection, FinancialYear, RebateRule, Regime, Slab,
    SlabTable, SurchargeBracket, SurchargeTable,
};

/// Rule tables for one regime in one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub slabs: SlabTable,

    /// Replaces `slabs` for taxpayers aged 60 to 79, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_slabs: Option<SlabTable>,

    /// Replaces `slabs` for taxpayers aged 80 or over, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_senior_slabs: Option<SlabTable>,

    #[serde(default)]
    pub surcharge: SurchargeTable,

    pub rebate: RebateRule,

    #[serde(default)]
    pub deductions: DeductionPolicy,
}

impl RegimeRules {
    /// Slab table for an age band, falling back to the standard table.
    pub fn slabs_for(
        &self,
        band: AgeBand,
    ) -> &SlabTable {
        let specific = match band {
            AgeBand::Below60 => None,
            AgeBand::Senior => self.senior_slabs.as_ref(),
            AgeBand::SuperSenior => self.super_senior_slabs.as_ref(),
        };
        specific.unwrap_or(&self.slabs)
    }

    fn slab_tables(&self) -> impl Iterator<Item = &SlabTable> {
        std::iter::once(&self.slabs)
            .chain(self.senior_slabs.as_ref())
            .chain(self.super_senior_slabs.as_ref())
    }

    pub fn validate(
        &self,
        regime: Regime,
    ) -> Result<(), RulesError> {
        for table in self.slab_tables() {
            table.validate()?;
        }
        self.surcharge.validate()?;
        self.rebate.validate()?;
        self.deductions.validate()?;

        for table in self.slab_tables() {
            let tax = slab_tax(self.rebate.income_threshold, table);
            if tax > self.rebate.max_rebate {
                return Err(RulesError::RebateExceedsMaximum {
                    regime,
                    tax,
                    max_rebate: self.rebate.max_rebate,
                });
            }
        }
        Ok(())
    }
}

/// All rule tables for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRules {
    pub financial_year: FinancialYear,

    /// Health and education cess on (base tax + surcharge).
    pub cess_rate: Decimal,

    /// Share of gross receipts treated as income under presumptive taxation.
    pub presumptive_rate: Decimal,

    pub new_regime: RegimeRules,
    pub old_regime: RegimeRules,
}

impl TaxRules {
    pub fn regime(
        &self,
        regime: Regime,
    ) -> &RegimeRules {
        match regime {
            Regime::New => &self.new_regime,
            Regime::Old => &self.old_regime,
        }
    }

    pub fn regime_mut(
        &mut self,
        regime: Regime,
    ) -> &mut RegimeRules {
        match regime {
            Regime::New => &mut self.new_regime,
            Regime::Old => &mut self.old_regime,
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        check_rate("cess rate", self.cess_rate)?;
        check_rate("presumptive rate", self.presumptive_rate)?;
        for regime in Regime::ALL {
            self.regime(regime).validate(regime)?;
        }
        Ok(())
    }

    /// Every rule set that ships with the crate.
    pub fn builtin() -> Vec<TaxRules> {
        vec![Self::fy2024_25(), Self::fy2025_26()]
    }

    /// FY 2024-25 (assessment year 2025-26).
    pub fn fy2024_25() -> Self {
        Self {
            financial_year: FinancialYear::new(2024),
            cess_rate: dec!(0.04),
            presumptive_rate: dec!(0.50),
            new_regime: RegimeRules {
                slabs: SlabTable::from_slabs(vec![
                    Slab::bounded(dec!(0), dec!(300000), dec!(0)),
                    Slab::bounded(dec!(300000), dec!(700000), dec!(0.05)),
                    Slab::bounded(dec!(700000), dec!(1000000), dec!(0.10)),
                    Slab::bounded(dec!(1000000), dec!(1200000), dec!(0.15)),
                    Slab::bounded(dec!(1200000), dec!(1500000), dec!(0.20)),
                    Slab::unbounded(dec!(1500000), dec!(0.30)),
                ]),
                senior_slabs: None,
                super_senior_slabs: None,
                surcharge: new_regime_surcharge(),
                rebate: RebateRule::new(dec!(700000), dec!(25000)),
                deductions: new_regime_deductions(),
            },
            old_regime: old_regime_rules(),
        }
    }

    /// FY 2025-26 (assessment year 2026-27).
    pub fn fy2025_26() -> Self {
        Self {
            financial_year: FinancialYear::new(2025),
            cess_rate: dec!(0.04),
            presumptive_rate: dec!(0.50),
            new_regime: RegimeRules {
                slabs: SlabTable::from_slabs(vec![
                    Slab::bounded(dec!(0), dec!(400000), dec!(0)),
                    Slab::bounded(dec!(400000), dec!(800000), dec!(0.05)),
                    Slab::bounded(dec!(800000), dec!(1200000), dec!(0.10)),
                    Slab::bounded(dec!(1200000), dec!(1600000), dec!(0.15)),
                    Slab::bounded(dec!(1600000), dec!(2000000), dec!(0.20)),
                    Slab::bounded(dec!(2000000), dec!(2400000), dec!(0.25)),
                    Slab::unbounded(dec!(2400000), dec!(0.30)),
                ]),
                senior_slabs: None,
                super_senior_slabs: None,
                surcharge: new_regime_surcharge(),
                rebate: RebateRule::new(dec!(1200000), dec!(60000)),
                deductions: new_regime_deductions(),
            },
            old_regime: old_regime_rules(),
        }
    }
}

fn check_rate(
    what: &'static str,
    rate: Decimal,
) -> Result<(), RulesError> {
    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(RulesError::RateOutOfRange { what, rate });
    }
    Ok(())
}

// New regime tops out at 25%; the 37% band exists only under the old regime.
fn new_regime_surcharge() -> SurchargeTable {
    SurchargeTable::from_brackets(vec![
        SurchargeBracket::new(dec!(5000000), dec!(0.10)),
        SurchargeBracket::new(dec!(10000000), dec!(0.15)),
        SurchargeBracket::new(dec!(20000000), dec!(0.25)),
    ])
}

fn new_regime_deductions() -> DeductionPolicy {
    DeductionPolicy {
        caps: BTreeMap::from([(DeductionSection::StandardDeduction, dec!(75000))]),
        uncapped: BTreeSet::new(),
    }
}

fn old_regime_rules() -> RegimeRules {
    RegimeRules {
        slabs: SlabTable::from_slabs(vec![
            Slab::bounded(dec!(0), dec!(250000), dec!(0)),
            Slab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
            Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
            Slab::unbounded(dec!(1000000), dec!(0.30)),
        ]),
        senior_slabs: Some(SlabTable::from_slabs(vec![
            Slab::bounded(dec!(0), dec!(300000), dec!(0)),
            Slab::bounded(dec!(300000), dec!(500000), dec!(0.05)),
            Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
            Slab::unbounded(dec!(1000000), dec!(0.30)),
        ])),
        super_senior_slabs: Some(SlabTable::from_slabs(vec![
            Slab::bounded(dec!(0), dec!(500000), dec!(0)),
            Slab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
            Slab::unbounded(dec!(1000000), dec!(0.30)),
        ])),
        surcharge: SurchargeTable::from_brackets(vec![
            SurchargeBracket::new(dec!(5000000), dec!(0.10)),
            SurchargeBracket::new(dec!(10000000), dec!(0.15)),
            SurchargeBracket::new(dec!(20000000), dec!(0.25)),
            SurchargeBracket::new(dec!(50000000), dec!(0.37)),
        ]),
        rebate: RebateRule::new(dec!(500000), dec!(12500)),
        deductions: DeductionPolicy {
            caps: BTreeMap::from([
                (DeductionSection::StandardDeduction, dec!(50000)),
                (DeductionSection::Section80C, dec!(150000)),
                (DeductionSection::Section80D, dec!(25000)),
                (DeductionSection::Section80Ccd1B, dec!(50000)),
                (DeductionSection::Section80Tta, dec!(10000)),
                (DeductionSection::Section24B, dec!(200000)),
            ]),
            uncapped: BTreeSet::from([DeductionSection::Section80E, DeductionSection::Hra]),
        },
    }
}

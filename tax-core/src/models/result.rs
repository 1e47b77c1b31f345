use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DeductionSection, FinancialYear, Regime};

/// One row of the "enter here in your HR portal" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub section: DeductionSection,
    pub claimed: Decimal,
    /// Portion the regime accepted after capping.
    pub allowed: Decimal,
}

impl SectionEntry {
    pub fn was_clipped(&self) -> bool {
        self.allowed < self.claimed
    }
}

/// Itemized liability for one regime.
///
/// A read-only value: fields are public for reading and serialization, and
/// nothing in this crate writes to a result after
/// [`TaxEngine::calculate`](crate::TaxEngine::calculate) returns it. To change
/// an input, recompute instead of editing the result. `base_tax`, `surcharge`
/// and `cess` always hold the computed amounts; when the rebate applies only
/// `total_liability` is forced to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub financial_year: FinancialYear,

    /// Income before deductions: gross income, or presumptive income for
    /// freelancers.
    pub assessable_income: Decimal,

    /// Sum of allowed deductions.
    pub total_deductions: Decimal,

    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub rebate_applied: bool,
    pub total_liability: Decimal,

    /// Input field name to statutory section, with claimed and allowed amounts.
    pub section_map: BTreeMap<String, SectionEntry>,
}

/// Side-by-side result for both regimes plus the recommendation. Read-only
/// like [`TaxResult`]; build one with [`ComparisonResult::from_results`] so
/// `recommended` always matches the two totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub new: TaxResult,
    pub old: TaxResult,
    pub recommended: Regime,
}

impl ComparisonResult {
    /// Recommends the lower liability. A tie goes to the New regime, which has
    /// the simpler deduction bookkeeping.
    pub fn from_results(
        new: TaxResult,
        old: TaxResult,
    ) -> Self {
        let recommended = if old.total_liability < new.total_liability {
            Regime::Old
        } else {
            Regime::New
        };
        Self {
            new,
            old,
            recommended,
        }
    }

    pub fn result_for(
        &self,
        regime: Regime,
    ) -> &TaxResult {
        match regime {
            Regime::New => &self.new,
            Regime::Old => &self.old,
        }
    }

    pub fn recommended_result(&self) -> &TaxResult {
        self.result_for(self.recommended)
    }

    /// How much the recommended regime saves over the other one.
    pub fn savings(&self) -> Decimal {
        (self.new.total_liability - self.old.total_liability).abs()
    }
}

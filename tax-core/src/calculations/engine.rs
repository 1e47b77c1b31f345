//! The calculation pipeline and the regime comparator.
//!
//! One regime is computed in fixed stages:
//!
//! | Stage | Value | Rule |
//! |-------|-------|------|
//! | 1 | Assessable income | Gross income, or presumptive share for freelancers |
//! | 2 | Deductions | Claimed sections clipped to the regime's policy |
//! | 3 | Taxable income | Stage 1 - Stage 2, minimum 0 |
//! | 4 | Base tax | Slab table for the regime and age band |
//! | 5 | Surcharge | Surcharge brackets with marginal relief |
//! | 6 | Cess | Cess rate on (Stage 4 + Stage 5) |
//! | 7 | Total liability | Stage 4 + 5 + 6, or 0 when the rebate applies |
//!
//! Every amount is rounded to the nearest rupee at the stage that produces it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{FinancialYear, Regime, TaxEngine, TaxRules, TaxpayerCategory, TaxpayerProfile};
//!
//! let rules = TaxRules::fy2024_25();
//! let engine = TaxEngine::new(&rules);
//! let profile = TaxpayerProfile::new(
//!     dec!(800000),
//!     TaxpayerCategory::Salaried,
//!     FinancialYear::new(2024),
//! )
//! .unwrap();
//!
//! let comparison = engine.compare(&profile).unwrap();
//!
//! assert_eq!(comparison.new.total_liability, dec!(31200));
//! assert_eq!(comparison.recommended, Regime::New);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::cess::cess;
use crate::calculations::common::{floor_at_zero, round_to_rupee};
use crate::calculations::deductions::apply_deductions;
use crate::calculations::presumptive::assessable_income;
use crate::calculations::rebate::apply_rebate;
use crate::calculations::slab::base_tax;
use crate::calculations::surcharge::surcharge;
use crate::error::TaxError;
use crate::models::{ComparisonResult, Regime, RuleBook, TaxResult, TaxRules, TaxpayerProfile};

/// Calculator bound to the rule tables of one financial year.
///
/// Holds no mutable state; one engine can serve any number of profiles.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    rules: &'a TaxRules,
}

impl<'a> TaxEngine<'a> {
    pub fn new(rules: &'a TaxRules) -> Self {
        Self { rules }
    }

    /// Engine for `profile`'s financial year, looked up in `book`.
    ///
    /// # Errors
    /// [`TaxError::UnsupportedFinancialYear`] when `book` has no rules for that year.
    pub fn for_profile(
        book: &'a RuleBook,
        profile: &TaxpayerProfile,
    ) -> Result<Self, TaxError> {
        book.rules_for(profile.financial_year).map(Self::new)
    }

    pub fn rules(&self) -> &'a TaxRules {
        self.rules
    }

    /// Runs the full pipeline for one regime.
    ///
    /// # Errors
    ///
    /// - [`TaxError::UnsupportedFinancialYear`] if the profile names a different
    ///   financial year than the engine's rules.
    /// - [`TaxError::InvalidAmount`] if the profile holds a negative amount or
    ///   one above [`MAX_AMOUNT`](crate::calculations::normalize::MAX_AMOUNT).
    pub fn calculate(
        &self,
        profile: &TaxpayerProfile,
        regime: Regime,
    ) -> Result<TaxResult, TaxError> {
        if profile.financial_year != self.rules.financial_year {
            return Err(TaxError::UnsupportedFinancialYear(profile.financial_year));
        }
        profile.validate()?;

        let regime_rules = self.rules.regime(regime);

        let assessable_income = assessable_income(profile, self.rules.presumptive_rate);
        let deductions = apply_deductions(profile, &regime_rules.deductions, regime)?;
        let taxable_income = self.taxable_income(assessable_income, deductions.total);
        debug!(
            %regime,
            category = %profile.category,
            %assessable_income,
            total_deductions = %deductions.total,
            %taxable_income,
            "taxable income computed"
        );

        let slabs = regime_rules.slabs_for(profile.age_band());
        let base_tax = base_tax(taxable_income, slabs);
        let surcharge = surcharge(base_tax, taxable_income, &regime_rules.surcharge, slabs);
        let cess = cess(base_tax, surcharge, self.rules.cess_rate);

        let rebate = apply_rebate(taxable_income, base_tax + surcharge + cess, &regime_rules.rebate);
        debug!(
            %regime,
            %base_tax,
            %surcharge,
            %cess,
            rebate_applied = rebate.rebate_applied,
            total_liability = %rebate.total_liability,
            "liability computed"
        );

        Ok(TaxResult {
            regime,
            financial_year: self.rules.financial_year,
            assessable_income,
            total_deductions: deductions.total,
            taxable_income,
            base_tax,
            surcharge,
            cess,
            rebate_applied: rebate.rebate_applied,
            total_liability: rebate.total_liability,
            section_map: deductions.section_map,
        })
    }

    /// Computes both regimes for the same profile and recommends one.
    ///
    /// # Errors
    /// Any error from [`TaxEngine::calculate`].
    pub fn compare(
        &self,
        profile: &TaxpayerProfile,
    ) -> Result<ComparisonResult, TaxError> {
        let new = self.calculate(profile, Regime::New)?;
        let old = self.calculate(profile, Regime::Old)?;
        let comparison = ComparisonResult::from_results(new, old);

        debug!(
            recommended = %comparison.recommended,
            savings = %comparison.savings(),
            "regimes compared"
        );
        Ok(comparison)
    }

    fn taxable_income(
        &self,
        assessable_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        floor_at_zero(round_to_rupee(assessable_income - total_deductions))
    }
}

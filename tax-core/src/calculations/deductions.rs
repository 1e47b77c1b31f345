//! Deduction clipping and the section map.
//!
//! Claims above a section's statutory cap are silently reduced to the cap.
//! Sections the regime does not recognise contribute nothing. Neither case is
//! an error; both show up in the section map as `allowed < claimed`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::TaxError;
use crate::models::{
    DeductionLimit, DeductionPolicy, DeductionSection, Regime, SectionEntry, TaxpayerProfile,
};

/// Allowed deductions for one regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionOutcome {
    pub total: Decimal,
    pub section_map: BTreeMap<String, SectionEntry>,
}

/// Limit for `section` under `policy`, taking the taxpayer category into
/// account: only salaried taxpayers get the standard deduction.
fn effective_limit(
    profile: &TaxpayerProfile,
    policy: &DeductionPolicy,
    section: DeductionSection,
) -> DeductionLimit {
    if section == DeductionSection::StandardDeduction
        && !profile.category.claims_standard_deduction()
    {
        return DeductionLimit::NotAllowed;
    }
    policy.limit(section)
}

/// Clips every claimed section to what `policy` allows and totals the result.
///
/// # Errors
/// [`TaxError::InvalidAmount`] if the allowed total overflows.
pub fn apply_deductions(
    profile: &TaxpayerProfile,
    policy: &DeductionPolicy,
    regime: Regime,
) -> Result<DeductionOutcome, TaxError> {
    let mut total = Decimal::ZERO;
    let mut section_map = BTreeMap::new();

    for (&section, &claimed) in &profile.deductions {
        let limit = effective_limit(profile, policy, section);
        let allowed = limit.clip(claimed);

        match limit {
            DeductionLimit::NotAllowed if !claimed.is_zero() => {
                debug!(%regime, %section, %claimed, "deduction not allowed in regime");
            }
            DeductionLimit::Capped(cap) if allowed < claimed => {
                warn!(%regime, %section, %claimed, %cap, "deduction clipped to statutory cap");
            }
            _ => {}
        }

        total = total.checked_add(allowed).ok_or_else(|| {
            TaxError::invalid_amount(
                format!("{total} + {allowed}"),
                format!("total {regime} deductions overflow"),
            )
        })?;
        section_map.insert(
            section.input_field().to_string(),
            SectionEntry {
                section,
                claimed,
                allowed,
            },
        );
    }

    Ok(DeductionOutcome { total, section_map })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FinancialYear, TaxRules, TaxpayerCategory};

    fn salaried(gross: Decimal) -> TaxpayerProfile {
        TaxpayerProfile::new(gross, TaxpayerCategory::Salaried, FinancialYear::new(2024)).unwrap()
    }

    #[test]
    fn excess_80c_is_clipped_to_cap() {
        let rules = TaxRules::fy2024_25();
        let profile = salaried(dec!(1500000))
            .with_deduction(DeductionSection::Section80C, dec!(200000))
            .unwrap();

        let outcome = apply_deductions(&profile, &rules.old_regime.deductions, Regime::Old).unwrap();

        assert_eq!(outcome.total, dec!(150000));
        assert_eq!(
            outcome.section_map.get("life_insurance_premium"),
            Some(&SectionEntry {
                section: DeductionSection::Section80C,
                claimed: dec!(200000),
                allowed: dec!(150000),
            })
        );
    }

    #[test]
    fn uncapped_sections_pass_through() {
        let rules = TaxRules::fy2024_25();
        let profile = salaried(dec!(1500000))
            .with_deduction(DeductionSection::Section80E, dec!(320000))
            .unwrap()
            .with_deduction(DeductionSection::Hra, dec!(180000))
            .unwrap();

        let outcome = apply_deductions(&profile, &rules.old_regime.deductions, Regime::Old).unwrap();

        assert_eq!(outcome.total, dec!(500000));
    }

    #[test]
    fn new_regime_allows_only_standard_deduction() {
        let rules = TaxRules::fy2024_25();
        let profile = salaried(dec!(1500000))
            .with_deduction(DeductionSection::Section80C, dec!(150000))
            .unwrap()
            .with_deduction(DeductionSection::StandardDeduction, dec!(75000))
            .unwrap();

        let outcome = apply_deductions(&profile, &rules.new_regime.deductions, Regime::New).unwrap();

        assert_eq!(outcome.total, dec!(75000));
        assert_eq!(
            outcome.section_map["life_insurance_premium"].allowed,
            dec!(0)
        );
        assert_eq!(outcome.section_map["standard_deduction"].allowed, dec!(75000));
    }

    #[test]
    fn standard_deduction_requires_salaried_category() {
        let rules = TaxRules::fy2024_25();
        let profile = TaxpayerProfile::new(
            dec!(1500000),
            TaxpayerCategory::Freelancer,
            FinancialYear::new(2024),
        )
        .unwrap()
        .with_deduction(DeductionSection::StandardDeduction, dec!(50000))
        .unwrap();

        let outcome = apply_deductions(&profile, &rules.old_regime.deductions, Regime::Old).unwrap();

        assert_eq!(outcome.total, dec!(0));
        assert!(outcome.section_map["standard_deduction"].was_clipped());
    }

    #[test]
    fn no_claims_give_empty_map() {
        let rules = TaxRules::fy2024_25();

        let outcome =
            apply_deductions(&salaried(dec!(800000)), &rules.old_regime.deductions, Regime::Old).unwrap();

        assert_eq!(outcome.total, dec!(0));
        assert!(outcome.section_map.is_empty());
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let rules = TaxRules::fy2024_25();
        let mut profile = salaried(dec!(1500000));
        profile.deductions.insert(DeductionSection::Section80E, Decimal::MAX);
        profile.deductions.insert(DeductionSection::Hra, Decimal::MAX);

        let result = apply_deductions(&profile, &rules.old_regime.deductions, Regime::Old);

        assert!(matches!(result, Err(TaxError::InvalidAmount { .. })));
    }
}

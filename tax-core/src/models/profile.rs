use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::hra::{HraInput, default_basic_salary, exempt_hra};
use crate::calculations::normalize::{MAX_AMOUNT, parse_amount, parse_optional_amount};
use crate::error::TaxError;
use crate::models::{AgeBand, DeductionSection, FinancialYear, TaxpayerCategory};

/// Normalized inputs for one calculation request.
///
/// Deductions are the amounts claimed per section; clipping to statutory caps
/// happens during calculation, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub gross_income: Decimal,
    pub category: TaxpayerCategory,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub deductions: BTreeMap<DeductionSection, Decimal>,
    pub financial_year: FinancialYear,
}

impl TaxpayerProfile {
    /// # Errors
    /// [`TaxError::InvalidAmount`] if `gross_income` is negative or above
    /// [`MAX_AMOUNT`].
    pub fn new(
        gross_income: Decimal,
        category: TaxpayerCategory,
        financial_year: FinancialYear,
    ) -> Result<Self, TaxError> {
        ensure_valid_amount(gross_income)?;
        Ok(Self {
            gross_income,
            category,
            age: None,
            deductions: BTreeMap::new(),
            financial_year,
        })
    }

    pub fn with_age(
        mut self,
        age: u32,
    ) -> Self {
        self.age = Some(age);
        self
    }

    /// Adds a claim for `section`. Repeated claims for the same section are
    /// summed.
    ///
    /// # Errors
    /// [`TaxError::InvalidAmount`] if `amount` is negative, or if it or the
    /// running total for the section exceeds [`MAX_AMOUNT`].
    pub fn with_deduction(
        mut self,
        section: DeductionSection,
        amount: Decimal,
    ) -> Result<Self, TaxError> {
        ensure_valid_amount(amount)?;
        let claimed = self.claimed(section);
        let total = claimed
            .checked_add(amount)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| {
                TaxError::invalid_amount(
                    format!("{claimed} + {amount}"),
                    format!("total claimed under {section} is too large"),
                )
            })?;
        self.deductions.insert(section, total);
        Ok(self)
    }

    pub fn age_band(&self) -> AgeBand {
        self.age.map(AgeBand::from_age).unwrap_or_default()
    }

    /// Amount claimed under `section`, zero if none.
    pub fn claimed(
        &self,
        section: DeductionSection,
    ) -> Decimal {
        self.deductions
            .get(&section)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Re-checks the amount invariants (non-negative, at most
    /// [`MAX_AMOUNT`]), for profiles built by deserialization or field
    /// assignment rather than the constructors.
    pub fn validate(&self) -> Result<(), TaxError> {
        ensure_valid_amount(self.gross_income)?;
        for amount in self.deductions.values() {
            ensure_valid_amount(*amount)?;
        }
        Ok(())
    }
}

fn ensure_valid_amount(amount: Decimal) -> Result<(), TaxError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TaxError::invalid_amount(
            amount.to_string(),
            "amount must not be negative",
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(TaxError::invalid_amount(amount.to_string(), "amount is too large"));
    }
    Ok(())
}

/// A calculation request as it arrives from the conversational layer, with
/// every amount still in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub category: String,
    pub gross_income: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub financial_year: Option<String>,
    /// `(section code, amount)` pairs in the order they were collected.
    #[serde(default)]
    pub deductions: Vec<(String, String)>,
    /// Annual rent paid. Used to derive the HRA exemption when no explicit
    /// `HRA` deduction is supplied.
    #[serde(default)]
    pub rent_paid: Option<String>,
    #[serde(default)]
    pub basic_salary: Option<String>,
    #[serde(default)]
    pub hra_received: Option<String>,
    #[serde(default)]
    pub metro: bool,
}

impl ProfileRequest {
    /// Normalizes every field into a [`TaxpayerProfile`].
    ///
    /// # Errors
    ///
    /// * [`TaxError::InvalidCategory`] for an unknown category tag.
    /// * [`TaxError::InvalidAmount`] for any malformed or negative amount.
    /// * [`TaxError::InvalidDeductionSection`] for an unknown section code.
    /// * [`TaxError::InvalidFinancialYear`] for an unparseable year.
    pub fn into_profile(
        self,
        default_year: FinancialYear,
    ) -> Result<TaxpayerProfile, TaxError> {
        let category = TaxpayerCategory::parse(&self.category)?;
        let gross_income = parse_amount(&self.gross_income)?;
        let financial_year = match self.financial_year.as_deref().map(str::trim) {
            Some(year) if !year.is_empty() => FinancialYear::parse(year)?,
            _ => default_year,
        };

        let mut profile = TaxpayerProfile::new(gross_income, category, financial_year)?;
        if let Some(age) = self.age {
            profile = profile.with_age(age);
        }

        for (code, amount) in &self.deductions {
            let section = DeductionSection::parse(code)?;
            let amount = parse_amount(amount)?;
            profile = profile.with_deduction(section, amount)?;
        }

        if let Some(rent) = parse_optional_amount(self.rent_paid.as_deref())? {
            if !profile.deductions.contains_key(&DeductionSection::Hra)
                && category == TaxpayerCategory::Salaried
            {
                let basic_salary = match parse_optional_amount(self.basic_salary.as_deref())? {
                    Some(basic) => basic,
                    None => default_basic_salary(gross_income),
                };
                let hra = exempt_hra(&HraInput {
                    annual_rent: rent,
                    basic_salary,
                    hra_received: parse_optional_amount(self.hra_received.as_deref())?,
                    metro: self.metro,
                });
                debug!(%rent, %basic_salary, %hra, "derived HRA exemption from rent");
                if !hra.is_zero() {
                    profile = profile.with_deduction(DeductionSection::Hra, hra)?;
                }
            } else {
                debug!(%category, "ignoring rent paid; HRA not derived");
            }
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const FY: FinancialYear = FinancialYear::new(2024);

    fn request(
        category: &str,
        gross: &str,
    ) -> ProfileRequest {
        ProfileRequest {
            category: category.to_string(),
            gross_income: gross.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn new_rejects_negative_income() {
        let result = TaxpayerProfile::new(dec!(-1), TaxpayerCategory::Salaried, FY);

        assert!(matches!(result, Err(TaxError::InvalidAmount { .. })));
    }

    #[test]
    fn with_deduction_sums_repeated_sections() {
        let profile = TaxpayerProfile::new(dec!(900000), TaxpayerCategory::Salaried, FY)
            .unwrap()
            .with_deduction(DeductionSection::Section80C, dec!(100000))
            .unwrap()
            .with_deduction(DeductionSection::Section80C, dec!(70000))
            .unwrap();

        assert_eq!(profile.claimed(DeductionSection::Section80C), dec!(170000));
        assert_eq!(profile.claimed(DeductionSection::Section80D), dec!(0));
    }

    #[test]
    fn with_deduction_rejects_running_total_above_limit() {
        let profile = TaxpayerProfile::new(dec!(900000), TaxpayerCategory::Salaried, FY)
            .unwrap()
            .with_deduction(DeductionSection::Section80E, dec!(600000000000000))
            .unwrap();

        let result = profile.with_deduction(DeductionSection::Section80E, dec!(600000000000000));

        assert!(matches!(result, Err(TaxError::InvalidAmount { .. })));
    }

    #[test]
    fn with_deduction_rejects_amount_near_decimal_max() {
        let result = TaxpayerProfile::new(dec!(900000), TaxpayerCategory::Salaried, FY)
            .unwrap()
            .with_deduction(DeductionSection::Section80E, Decimal::MAX);

        assert!(matches!(result, Err(TaxError::InvalidAmount { .. })));
    }

    #[test]
    fn validate_rejects_oversized_field_values() {
        let mut profile = TaxpayerProfile::new(dec!(900000), TaxpayerCategory::Salaried, FY).unwrap();
        profile.deductions.insert(DeductionSection::Hra, Decimal::MAX);

        assert!(matches!(profile.validate(), Err(TaxError::InvalidAmount { .. })));
    }

    #[test]
    fn age_band_defaults_to_below_60() {
        let profile = TaxpayerProfile::new(dec!(0), TaxpayerCategory::Other, FY).unwrap();

        assert_eq!(profile.age_band(), AgeBand::Below60);
        assert_eq!(profile.with_age(82).age_band(), AgeBand::SuperSenior);
    }

    #[test]
    fn into_profile_normalizes_amounts_and_sections() {
        let mut req = request("Salaried", "₹8,00,000");
        req.deductions = vec![
            ("80c".to_string(), "1,00,000".to_string()),
            ("80C".to_string(), "Rs. 80,000".to_string()),
            ("80D".to_string(), "25000".to_string()),
        ];

        let profile = req.into_profile(FY).unwrap();

        assert_eq!(profile.gross_income, dec!(800000));
        assert_eq!(profile.category, TaxpayerCategory::Salaried);
        assert_eq!(profile.financial_year, FY);
        assert_eq!(profile.claimed(DeductionSection::Section80C), dec!(180000));
        assert_eq!(profile.claimed(DeductionSection::Section80D), dec!(25000));
    }

    #[test]
    fn into_profile_rejects_unknown_category() {
        let result = request("astronaut", "100").into_profile(FY);

        assert_eq!(
            result,
            Err(TaxError::InvalidCategory("astronaut".to_string()))
        );
    }

    #[test]
    fn into_profile_rejects_unknown_section() {
        let mut req = request("salaried", "100");
        req.deductions = vec![("80Q".to_string(), "10".to_string())];

        assert_eq!(
            req.into_profile(FY),
            Err(TaxError::InvalidDeductionSection("80Q".to_string()))
        );
    }

    #[test]
    fn into_profile_rejects_negative_deduction() {
        let mut req = request("salaried", "100");
        req.deductions = vec![("80C".to_string(), "-10".to_string())];

        assert!(matches!(
            req.into_profile(FY),
            Err(TaxError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn into_profile_rejects_repeated_huge_claims() {
        let mut req = request("salaried", "900000");
        req.deductions = vec![
            ("80E".to_string(), "50000000000000000000000000000".to_string()),
            ("80E".to_string(), "50000000000000000000000000000".to_string()),
        ];

        assert!(matches!(
            req.into_profile(FY),
            Err(TaxError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn into_profile_parses_financial_year() {
        let mut req = request("other", "100");
        req.financial_year = Some("FY 2025-26".to_string());

        let profile = req.into_profile(FY).unwrap();

        assert_eq!(profile.financial_year, FinancialYear::new(2025));
    }

    #[test]
    fn into_profile_derives_hra_from_rent() {
        let mut req = request("salaried", "1200000");
        req.rent_paid = Some("2,40,000".to_string());

        let profile = req.into_profile(FY).unwrap();

        // Basic defaults to 6,00,000; rent less 10% of basic is 1,80,000 and
        // 40% of basic is 2,40,000, so the exemption is 1,80,000.
        assert_eq!(profile.claimed(DeductionSection::Hra), dec!(180000));
    }

    #[test]
    fn explicit_hra_wins_over_rent() {
        let mut req = request("salaried", "1200000");
        req.deductions = vec![("HRA".to_string(), "50000".to_string())];
        req.rent_paid = Some("240000".to_string());

        let profile = req.into_profile(FY).unwrap();

        assert_eq!(profile.claimed(DeductionSection::Hra), dec!(50000));
    }

    #[test]
    fn rent_is_ignored_for_freelancers() {
        let mut req = request("freelancer", "1200000");
        req.rent_paid = Some("240000".to_string());

        let profile = req.into_profile(FY).unwrap();

        assert!(profile.deductions.is_empty());
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, TaxError};

/// Statutory deduction sections the engine understands.
///
/// Each section also has the input-field name the presentation layer uses
/// for its "enter here in your HR portal" table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeductionSection {
    /// Section 16(ia), standard deduction on salary.
    StandardDeduction,
    Section80C,
    Section80D,
    Section80Ccd1B,
    Section80E,
    Section80Tta,
    /// Section 24(b), interest on a self-occupied home loan.
    Section24B,
    /// House rent allowance exemption under section 10(13A).
    Hra,
}

impl DeductionSection {
    pub const ALL: [DeductionSection; 8] = [
        Self::StandardDeduction,
        Self::Section80C,
        Self::Section80D,
        Self::Section80Ccd1B,
        Self::Section80E,
        Self::Section80Tta,
        Self::Section24B,
        Self::Hra,
    ];

    /// Statutory section code, e.g. `80C`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardDeduction => "16(ia)",
            Self::Section80C => "80C",
            Self::Section80D => "80D",
            Self::Section80Ccd1B => "80CCD(1B)",
            Self::Section80E => "80E",
            Self::Section80Tta => "80TTA",
            Self::Section24B => "24(b)",
            Self::Hra => "HRA",
        }
    }

    /// Name of the input field this section is collected under.
    pub fn input_field(&self) -> &'static str {
        match self {
            Self::StandardDeduction => "standard_deduction",
            Self::Section80C => "life_insurance_premium",
            Self::Section80D => "health_insurance_premium",
            Self::Section80Ccd1B => "nps_contribution",
            Self::Section80E => "education_loan_interest",
            Self::Section80Tta => "savings_interest",
            Self::Section24B => "home_loan_interest",
            Self::Hra => "rent_paid",
        }
    }

    /// Parses a section code. Case and whitespace are ignored and an optional
    /// `section`/`sec` prefix is accepted.
    pub fn parse(s: &str) -> Result<Self, TaxError> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let code = normalized
            .strip_prefix("SECTION")
            .or_else(|| normalized.strip_prefix("SEC."))
            .or_else(|| normalized.strip_prefix("SEC"))
            .unwrap_or(&normalized);

        Self::ALL
            .into_iter()
            .find(|section| section.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| TaxError::InvalidDeductionSection(s.to_string()))
    }
}

impl fmt::Display for DeductionSection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DeductionSection {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeductionSection {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeductionSection> for String {
    fn from(value: DeductionSection) -> Self {
        value.code().to_string()
    }
}

/// How much of a claimed section a regime lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductionLimit {
    NotAllowed,
    Capped(Decimal),
    Unlimited,
}

impl DeductionLimit {
    /// The allowed portion of `claimed`. Excess over a cap is dropped.
    pub fn clip(
        &self,
        claimed: Decimal,
    ) -> Decimal {
        match self {
            Self::NotAllowed => Decimal::ZERO,
            Self::Capped(cap) => claimed.min(*cap),
            Self::Unlimited => claimed,
        }
    }
}

/// Per-regime deduction rules: capped sections plus sections allowed in full.
/// A section in neither set is not deductible under the regime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionPolicy {
    #[serde(default)]
    pub caps: BTreeMap<DeductionSection, Decimal>,
    #[serde(default)]
    pub uncapped: BTreeSet<DeductionSection>,
}

impl DeductionPolicy {
    pub fn limit(
        &self,
        section: DeductionSection,
    ) -> DeductionLimit {
        if let Some(cap) = self.caps.get(&section) {
            DeductionLimit::Capped(*cap)
        } else if self.uncapped.contains(&section) {
            DeductionLimit::Unlimited
        } else {
            DeductionLimit::NotAllowed
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        for cap in self.caps.values() {
            if cap.is_sign_negative() {
                return Err(RulesError::NegativeAmount {
                    what: "deduction cap",
                    amount: *cap,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_ignores_case_spacing_and_prefix() {
        assert_eq!(DeductionSection::parse("80c"), Ok(DeductionSection::Section80C));
        assert_eq!(DeductionSection::parse("Section 80D"), Ok(DeductionSection::Section80D));
        assert_eq!(
            DeductionSection::parse("80ccd (1b)"),
            Ok(DeductionSection::Section80Ccd1B)
        );
        assert_eq!(DeductionSection::parse("hra"), Ok(DeductionSection::Hra));
        assert_eq!(DeductionSection::parse("24(B)"), Ok(DeductionSection::Section24B));
        assert_eq!(
            DeductionSection::parse("16(ia)"),
            Ok(DeductionSection::StandardDeduction)
        );
    }

    #[test]
    fn parse_rejects_unknown_section() {
        assert_eq!(
            DeductionSection::parse("80Z"),
            Err(TaxError::InvalidDeductionSection("80Z".to_string()))
        );
    }

    #[test]
    fn every_section_parses_from_its_own_code() {
        for section in DeductionSection::ALL {
            assert_eq!(DeductionSection::parse(section.code()), Ok(section));
        }
    }

    #[test]
    fn limit_prefers_cap_then_uncapped_then_not_allowed() {
        let policy = DeductionPolicy {
            caps: BTreeMap::from([(DeductionSection::Section80C, dec!(150000))]),
            uncapped: BTreeSet::from([DeductionSection::Section80E]),
        };

        assert_eq!(
            policy.limit(DeductionSection::Section80C),
            DeductionLimit::Capped(dec!(150000))
        );
        assert_eq!(
            policy.limit(DeductionSection::Section80E),
            DeductionLimit::Unlimited
        );
        assert_eq!(
            policy.limit(DeductionSection::Hra),
            DeductionLimit::NotAllowed
        );
    }

    #[test]
    fn clip_reduces_excess_to_cap() {
        assert_eq!(DeductionLimit::Capped(dec!(150000)).clip(dec!(200000)), dec!(150000));
        assert_eq!(DeductionLimit::Capped(dec!(150000)).clip(dec!(90000)), dec!(90000));
        assert_eq!(DeductionLimit::Unlimited.clip(dec!(90000)), dec!(90000));
        assert_eq!(DeductionLimit::NotAllowed.clip(dec!(90000)), dec!(0));
    }

    #[test]
    fn validate_rejects_negative_cap() {
        let policy = DeductionPolicy {
            caps: BTreeMap::from([(DeductionSection::Section80D, dec!(-1))]),
            uncapped: BTreeSet::new(),
        };

        assert_eq!(
            policy.validate(),
            Err(RulesError::NegativeAmount {
                what: "deduction cap",
                amount: dec!(-1),
            })
        );
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

/// Persona tag supplied by the conversational layer.
///
/// The category selects the income path: freelancers go through the
/// presumptive adjustment, everyone else is taxed on gross income less the
/// deductions their regime allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxpayerCategory {
    Salaried,
    Freelancer,
    Other,
}

impl TaxpayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salaried => "salaried",
            Self::Freelancer => "freelancer",
            Self::Other => "other",
        }
    }

    /// Parses a category tag, accepting a few common aliases.
    pub fn parse(s: &str) -> Result<Self, TaxError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "salaried" | "salary" => Ok(Self::Salaried),
            "freelancer" | "freelance" | "gig" => Ok(Self::Freelancer),
            "other" => Ok(Self::Other),
            _ => Err(TaxError::InvalidCategory(s.to_string())),
        }
    }

    /// Whether taxable income is derived from gross receipts by the
    /// presumptive retention rate.
    pub fn uses_presumptive_income(&self) -> bool {
        matches!(self, Self::Freelancer)
    }

    /// Whether the salary standard deduction (section 16(ia)) can be claimed.
    pub fn claims_standard_deduction(&self) -> bool {
        matches!(self, Self::Salaried)
    }
}

impl FromStr for TaxpayerCategory {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TaxpayerCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age band used to pick the Old regime's basic exemption limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    #[default]
    Below60,
    Senior,
    SuperSenior,
}

impl AgeBand {
    pub fn from_age(age: u32) -> Self {
        match age {
            80.. => Self::SuperSenior,
            60.. => Self::Senior,
            _ => Self::Below60,
        }
    }
}

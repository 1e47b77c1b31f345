use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TaxError;

static FINANCIAL_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:FY\s*)?(\d{4})(?:\s*[-/]\s*(\d{2}|\d{4}))?$").unwrap()
});

/// Indian financial year, running 1 April to 31 March.
///
/// Identified by the calendar year it starts in, so `FinancialYear::new(2024)`
/// is FY 2024-25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear(i32);

impl FinancialYear {
    pub const fn new(start_year: i32) -> Self {
        Self(start_year)
    }

    pub fn start_year(&self) -> i32 {
        self.0
    }

    /// The financial year a calendar date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            Self(date.year())
        } else {
            Self(date.year() - 1)
        }
    }

    /// 1 April of the start year.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 1)
    }

    /// 31 March of the following year.
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 + 1, 3, 31)
    }

    /// Parses `2024-25`, `2024-2025`, `FY2024-25`, `FY 2024-25` or a bare `2024`.
    ///
    /// A trailing year, when present, must be the year after the start year.
    pub fn parse(s: &str) -> Result<Self, TaxError> {
        let invalid = || TaxError::InvalidFinancialYear(s.to_string());
        let caps = FINANCIAL_YEAR_RE.captures(s.trim()).ok_or_else(invalid)?;

        let start: i32 = caps[1].parse().map_err(|_| invalid())?;
        if let Some(end) = caps.get(2) {
            let end_str = end.as_str();
            let end: i32 = end_str.parse().map_err(|_| invalid())?;
            let expected = if end_str.len() == 2 {
                (start + 1) % 100
            } else {
                start + 1
            };
            if end != expected {
                return Err(invalid());
            }
        }

        Ok(Self(start))
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1) % 100)
    }
}

impl FromStr for FinancialYear {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FinancialYear> for String {
    fn from(value: FinancialYear) -> Self {
        value.to_string()
    }
}

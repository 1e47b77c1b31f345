use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two mutually exclusive statutory schemes a taxpayer may choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    New,
    Old,
}

impl Regime {
    /// Both regimes, New first. Comparisons resolve ties in this order.
    pub const ALL: [Regime; 2] = [Regime::New, Regime::Old];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New Regime",
            Self::Old => "Old Regime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "old" => Some(Self::Old),
            _ => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Regime::parse("NEW"), Some(Regime::New));
        assert_eq!(Regime::parse(" old "), Some(Regime::Old));
        assert_eq!(Regime::parse("middle"), None);
    }

    #[test]
    fn all_lists_new_first() {
        assert_eq!(Regime::ALL[0], Regime::New);
    }
}

use std::collections::BTreeMap;

use crate::error::{RulesError, TaxError};
use crate::models::{FinancialYear, TaxRules};

/// Registry of [`TaxRules`], keyed by financial year.
///
/// Typical lifetime:
/// 1. Start from `RuleBook::builtin()` (or `RuleBook::new()` for an empty book).
/// 2. Call `register` for any rule sets loaded from data files.
/// 3. Call `rules_for` per calculation request.
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: BTreeMap<FinancialYear, TaxRules>,
}

impl RuleBook {
    /// The financial year assumed when a request does not name one.
    pub const DEFAULT_YEAR: FinancialYear = FinancialYear::new(2024);

    /// Create an empty book.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// A book holding every built-in rule set.
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for rules in TaxRules::builtin() {
            book.rules.insert(rules.financial_year, rules);
        }
        book
    }

    /// Validate and register a rule set.
    ///
    /// A rule set for a year that is already present is replaced.
    pub fn register(
        &mut self,
        rules: TaxRules,
    ) -> Result<(), RulesError> {
        rules.validate()?;
        tracing::debug!(financial_year = %rules.financial_year, "registering tax rules");
        self.rules.insert(rules.financial_year, rules);
        Ok(())
    }

    /// Every registered financial year, oldest first.
    pub fn available_years(&self) -> Vec<FinancialYear> {
        self.rules.keys().copied().collect()
    }

    /// # Errors
    /// [`TaxError::UnsupportedFinancialYear`] when nothing is registered for `year`.
    pub fn rules_for(
        &self,
        year: FinancialYear,
    ) -> Result<&TaxRules, TaxError> {
        self.rules
            .get(&year)
            .ok_or(TaxError::UnsupportedFinancialYear(year))
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::builtin()
    }
}

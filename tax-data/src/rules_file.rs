//! TOML rule files.
//!
//! A rule file describes one financial year. Amounts and rates are written as
//! strings so they parse exactly:
//!
//! ```toml
//! financial_year = "2024-25"
//! cess_rate = "0.04"
//! presumptive_rate = "0.50"
//!
//! [[new_regime.slabs]]
//! lower = "0"
//! upper = "300000"
//! rate = "0"
//!
//! [[new_regime.slabs]]
//! lower = "300000"
//! rate = "0.05"
//!
//! [new_regime.rebate]
//! income_threshold = "700000"
//! max_rebate = "25000"
//!
//! [new_regime.deductions.caps]
//! "16(ia)" = "75000"
//! ```
//!
//! A slab without `upper` is the unbounded top slab. `senior_slabs`,
//! `super_senior_slabs`, `surcharge` and `deductions` may be omitted.

use std::path::{Path, PathBuf};

use tax_core::{RulesError, TaxRules};
use thiserror::Error;

/// Errors that can occur when loading a rule file.
#[derive(Debug, Error)]
pub enum RuleFileError {
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    Write(#[from] toml::ser::Error),

    #[error("invalid rules: {0}")]
    Invalid(#[from] RulesError),
}

/// Parse and validate a rule set from TOML text.
pub fn parse_rules(input: &str) -> Result<TaxRules, RuleFileError> {
    let rules: TaxRules = toml::from_str(input)?;
    rules.validate()?;
    tracing::debug!(financial_year = %rules.financial_year, "parsed rule file");
    Ok(rules)
}

/// Read a rule file from disk and delegate to [`parse_rules`].
pub fn load_rules(path: &Path) -> Result<TaxRules, RuleFileError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RuleFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules(&contents)
}

/// Render a rule set in the rule-file format.
pub fn rules_to_toml(rules: &TaxRules) -> Result<String, RuleFileError> {
    Ok(toml::to_string(rules)?)
}

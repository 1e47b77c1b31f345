use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{FinancialYear, Regime};

/// Errors returned to callers of the tax engine.
///
/// None of these are retryable: the engine performs no I/O, so every failure
/// is a property of the request itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// A monetary amount was empty, non-numeric, negative, or otherwise malformed.
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// The persona/category tag is not one the engine knows about.
    #[error("unrecognised taxpayer category '{0}'")]
    InvalidCategory(String),

    /// A deduction was keyed by a section code the engine does not know.
    #[error("unknown deduction section '{0}'")]
    InvalidDeductionSection(String),

    /// The financial year identifier could not be parsed.
    #[error("invalid financial year '{0}'")]
    InvalidFinancialYear(String),

    /// No rule tables are registered for the requested financial year.
    #[error("no tax rules registered for financial year {0}")]
    UnsupportedFinancialYear(FinancialYear),
}

impl TaxError {
    pub(crate) fn invalid_amount(
        input: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAmount {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while validating financial-year rule tables.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    /// A slab table has no brackets at all.
    #[error("slab table is empty")]
    EmptySlabTable,

    /// The first slab must start at zero income.
    #[error("first slab must start at 0, got {0}")]
    FirstSlabNotZero(Decimal),

    /// Two consecutive slabs leave a gap or overlap.
    #[error("slab starting at {lower} does not continue the previous slab ending at {previous_upper}")]
    NonContiguousSlabs {
        previous_upper: Decimal,
        lower: Decimal,
    },

    /// A bounded slab whose upper bound is not above its lower bound.
    #[error("slab upper bound {upper} must exceed its lower bound {lower}")]
    EmptySlab { lower: Decimal, upper: Decimal },

    /// Only the last slab may be unbounded.
    #[error("only the last slab may be unbounded (slab starting at {0})")]
    UnboundedSlabNotLast(Decimal),

    /// The last slab must be unbounded so every income is covered.
    #[error("last slab must be unbounded, ends at {0}")]
    LastSlabBounded(Decimal),

    /// Marginal rates must not decrease from one slab to the next.
    #[error("slab rate {rate} at {lower} is lower than the previous rate {previous_rate}")]
    DecreasingRate {
        lower: Decimal,
        rate: Decimal,
        previous_rate: Decimal,
    },

    /// Any rate (slab, surcharge, cess, presumptive) outside [0, 1].
    #[error("{what} must be between 0 and 1, got {rate}")]
    RateOutOfRange { what: &'static str, rate: Decimal },

    /// Surcharge thresholds must be strictly increasing.
    #[error("surcharge threshold {threshold} does not exceed the previous threshold {previous}")]
    UnsortedSurchargeThresholds {
        previous: Decimal,
        threshold: Decimal,
    },

    /// A negative threshold or rebate amount.
    #[error("{what} must be non-negative, got {amount}")]
    NegativeAmount { what: &'static str, amount: Decimal },

    /// Slab tax at the rebate threshold exceeds the maximum rebate, so a full
    /// rebate would forgive more than the statute allows.
    #[error("{regime} regime: slab tax {tax} at rebate threshold exceeds maximum rebate {max_rebate}")]
    RebateExceedsMaximum {
        regime: Regime,
        tax: Decimal,
        max_rebate: Decimal,
    },
}

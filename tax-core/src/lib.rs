//! Income-tax engine for the New and Old Indian regimes.
//!
//! The engine is a set of pure functions over a [`TaxpayerProfile`] and the
//! financial-year [`TaxRules`]: no I/O, no shared state, so concurrent
//! requests need no coordination.

pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{TaxEngine, parse_amount};
pub use error::{RulesError, TaxError};
pub use models::*;

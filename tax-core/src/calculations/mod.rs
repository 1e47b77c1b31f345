//! Tax calculation pipeline.
//!
//! Control flow for one regime: presumptive adjustment (freelancers only) or
//! deductions, then slab tax, surcharge with marginal relief, cess, and the
//! rebate gate. [`TaxEngine`] runs the pipeline for both regimes and compares
//! the results.

pub mod cess;
pub mod common;
pub mod deductions;
pub mod engine;
pub mod hra;
pub mod normalize;
pub mod presumptive;
pub mod rebate;
pub mod slab;
pub mod surcharge;

pub use engine::TaxEngine;
pub use normalize::{MAX_AMOUNT, parse_amount, parse_optional_amount};

//! Command-line front end for the regime comparator.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;

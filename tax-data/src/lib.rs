//! Loaders that keep financial-year rule tables and batch requests as data.
//!
//! - [`rules_file`] reads a whole [`tax_core::TaxRules`] set from TOML.
//! - [`slab_loader`] overlays slab schedules from CSV onto registered rules.
//! - [`profile_loader`] reads batch comparison requests from CSV.

pub mod profile_loader;
pub mod rules_file;
pub mod slab_loader;

pub use profile_loader::{LoadedProfile, ProfileLoadError, ProfileLoader};
pub use rules_file::{RuleFileError, load_rules, parse_rules, rules_to_toml};
pub use slab_loader::{SlabLoader, SlabLoaderError, SlabRecord};

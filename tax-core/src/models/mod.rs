mod category;
mod deduction;
mod financial_year;
mod profile;
mod rebate;
mod regime;
mod result;
mod rule_book;
mod slab;
mod surcharge;
mod tax_rules;

pub use category::{AgeBand, TaxpayerCategory};
pub use deduction::{DeductionLimit, DeductionPolicy, DeductionSection};
pub use financial_year::FinancialYear;
pub use profile::{ProfileRequest, TaxpayerProfile};
pub use rebate::RebateRule;
pub use regime::Regime;
pub use result::{ComparisonResult, SectionEntry, TaxResult};
pub use rule_book::RuleBook;
pub use slab::{Slab, SlabTable};
pub use surcharge::{SurchargeBracket, SurchargeTable};
pub use tax_rules::{RegimeRules, TaxRules};

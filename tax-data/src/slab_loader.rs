//! CSV slab schedules.
//!
//! Each row is one slab of one table:
//!
//! | Column | Required | Notes |
//! |------------------|----------|----------------------------------------------|
//! | `financial_year` | yes | e.g. `2024-25` |
//! | `regime` | yes | `new` or `old` |
//! | `age_band` | no | `below60` (default), `senior`, `super_senior` |
//! | `lower` | yes | |
//! | `upper` | no | Leave empty for the unbounded top slab |
//! | `rate` | yes | Marginal rate as a decimal, e.g. `0.05` |
//!
//! Rows sharing `(financial_year, regime, age_band)` form one table, in file
//! order. Loading a table replaces the matching table of an already
//! registered rule set; the rest of that rule set is untouched.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    AgeBand, FinancialYear, Regime, RuleBook, RulesError, Slab, SlabTable, TaxError, TaxRules,
};
use thiserror::Error;

/// Errors that can occur when loading slab schedules.
#[derive(Debug, Error)]
pub enum SlabLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid {regime} slab table for {financial_year} ({age_band:?}): {source}")]
    InvalidTable {
        financial_year: FinancialYear,
        regime: Regime,
        age_band: AgeBand,
        #[source]
        source: RulesError,
    },

    #[error("{0}")]
    UnknownYear(#[from] TaxError),

    #[error("rules rejected after loading slabs: {0}")]
    Rules(#[from] RulesError),
}

impl From<csv::Error> for SlabLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a slab CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub financial_year: FinancialYear,
    pub regime: Regime,
    #[serde(default)]
    pub age_band: Option<AgeBand>,
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl SlabRecord {
    fn key(&self) -> (FinancialYear, Regime, AgeBand) {
        (
            self.financial_year,
            self.regime,
            self.age_band.unwrap_or_default(),
        )
    }

    fn slab(&self) -> Slab {
        Slab {
            lower: self.lower,
            upper: self.upper,
            rate: self.rate,
        }
    }
}

/// Loader for slab schedules from CSV files.
pub struct SlabLoader;

impl SlabLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into validated slab tables.
    pub fn tables(
        records: &[SlabRecord]
    ) -> Result<BTreeMap<(FinancialYear, Regime, AgeBand), SlabTable>, SlabLoaderError> {
        let mut grouped: BTreeMap<(FinancialYear, Regime, AgeBand), Vec<Slab>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.key()).or_default().push(record.slab());
        }

        grouped
            .into_iter()
            .map(|((financial_year, regime, age_band), slabs)| {
                let table =
                    SlabTable::new(slabs).map_err(|source| SlabLoaderError::InvalidTable {
                        financial_year,
                        regime,
                        age_band,
                        source,
                    })?;
                Ok(((financial_year, regime, age_band), table))
            })
            .collect()
    }

    /// Replace slab tables of the rule sets in `book` with those in `records`.
    ///
    /// Every affected year must already be registered. Each modified rule set
    /// is validated again before it replaces the original, so a table that
    /// breaks the rebate invariant is rejected. Returns the number of tables
    /// replaced.
    pub fn apply(
        book: &mut RuleBook,
        records: &[SlabRecord],
    ) -> Result<usize, SlabLoaderError> {
        let tables = Self::tables(records)?;

        let mut updated: BTreeMap<FinancialYear, TaxRules> = BTreeMap::new();
        for ((financial_year, regime, age_band), table) in tables.iter() {
            let rules = match updated.entry(*financial_year) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(book.rules_for(*financial_year)?.clone()),
            };
            let regime_rules = rules.regime_mut(*regime);
            match age_band {
                AgeBand::Below60 => regime_rules.slabs = table.clone(),
                AgeBand::Senior => regime_rules.senior_slabs = Some(table.clone()),
                AgeBand::SuperSenior => regime_rules.super_senior_slabs = Some(table.clone()),
            }
            tracing::debug!(
                %financial_year,
                %regime,
                ?age_band,
                slabs = table.slabs().len(),
                "replaced slab table"
            );
        }

        for rules in updated.into_values() {
            book.register(rules)?;
        }

        Ok(tables.len())
    }
}

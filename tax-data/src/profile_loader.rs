//! CSV loader for batch comparison requests.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. A header
//! outside the table below is rejected, so a claim under a section the engine
//! does not know (e.g. `donation_80g`) is never dropped silently. Amount cells
//! go through the engine's input normalizer: `"₹1,50,000"`, `Rs. 50000/-` and
//! `150000` are all accepted. Quote cells that contain commas.
//!
//! | Column | Required | Notes |
//! |----------------------------|----------|---------------------------------------|
//! | `name` | no | Label used in reports |
//! | `category` | yes | `salaried`, `freelancer` or `other` |
//! | `gross_income` | yes | |
//! | `age` | no | |
//! | `financial_year` | no | e.g. `2024-25`; default year if empty |
//! | `standard_deduction` | no | Section 16(ia) |
//! | `life_insurance_premium` | no | Section 80C |
//! | `health_insurance_premium` | no | Section 80D |
//! | `nps_contribution` | no | Section 80CCD(1B) |
//! | `education_loan_interest` | no | Section 80E |
//! | `savings_interest` | no | Section 80TTA |
//! | `home_loan_interest` | no | Section 24(b) |
//! | `rent_paid` | no | Annual rent; HRA exemption is derived |
//! | `basic_salary` | no | For the HRA computation |
//! | `hra_received` | no | For the HRA computation |
//! | `metro` | no | `true` for metro-city HRA rates |
//!
//! ### Example
//!
//! ```csv
//! name,category,gross_income,life_insurance_premium,rent_paid
//! asha,salaried,"12,00,000","1,50,000","2,40,000"
//! ravi,freelancer,2000000,,
//! ```

use std::path::Path;

use serde::Deserialize;
use tax_core::{DeductionSection, FinancialYear, ProfileRequest, TaxError, TaxpayerProfile};
use thiserror::Error;

/// Columns that are not deduction claims. Claim columns are the input fields
/// of [`DeductionSection::ALL`].
const PROFILE_COLUMNS: [&str; 8] = [
    "name",
    "category",
    "gross_income",
    "age",
    "financial_year",
    "basic_salary",
    "hra_received",
    "metro",
];

fn is_known_column(header: &str) -> bool {
    PROFILE_COLUMNS.contains(&header)
        || DeductionSection::ALL
            .iter()
            .any(|section| section.input_field() == header)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    category: String,
    gross_income: String,
    age: Option<u32>,
    financial_year: Option<String>,
    standard_deduction: Option<String>,
    life_insurance_premium: Option<String>,
    health_insurance_premium: Option<String>,
    nps_contribution: Option<String>,
    education_loan_interest: Option<String>,
    savings_interest: Option<String>,
    home_loan_interest: Option<String>,
    rent_paid: Option<String>,
    basic_salary: Option<String>,
    hra_received: Option<String>,
    metro: Option<bool>,
}

impl CsvRow {
    fn into_request(self) -> (Option<String>, ProfileRequest) {
        let claims = [
            (DeductionSection::StandardDeduction, self.standard_deduction),
            (DeductionSection::Section80C, self.life_insurance_premium),
            (DeductionSection::Section80D, self.health_insurance_premium),
            (DeductionSection::Section80Ccd1B, self.nps_contribution),
            (DeductionSection::Section80E, self.education_loan_interest),
            (DeductionSection::Section80Tta, self.savings_interest),
            (DeductionSection::Section24B, self.home_loan_interest),
        ];
        let deductions = claims
            .into_iter()
            .filter_map(|(section, amount)| amount.map(|amount| (section.code().to_string(), amount)))
            .collect();

        let request = ProfileRequest {
            category: self.category,
            gross_income: self.gross_income,
            age: self.age,
            financial_year: self.financial_year,
            deductions,
            rent_paid: self.rent_paid,
            basic_salary: self.basic_salary,
            hra_received: self.hra_received,
            metro: self.metro.unwrap_or(false),
        };
        (self.name, request)
    }
}

/// Errors that can occur while loading or converting profile CSV data.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A header that is neither a profile field nor a known deduction input.
    #[error("unknown column '{column}': {source}")]
    UnknownColumn {
        column: String,
        #[source]
        source: TaxError,
    },

    /// A row was well-formed CSV but not a valid request. `row` is 1-based
    /// (header = row 0).
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: TaxError,
    },

    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
}

/// One normalized request from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProfile {
    /// 1-based row number.
    pub row: usize,
    pub name: String,
    pub profile: TaxpayerProfile,
}

/// Loader for batch profile CSV files.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Parse CSV text and normalize every row. Rows without a financial year
    /// use `default_year`. Rows are returned in file order.
    ///
    /// # Errors
    ///
    /// * [`ProfileLoadError::Parse`] if the CSV is structurally invalid.
    /// * [`ProfileLoadError::UnknownColumn`] for the first unrecognised header.
    /// * [`ProfileLoadError::InvalidRow`] for the first row the normalizer
    ///   rejects.
    pub fn load_from_str(
        input: &str,
        default_year: FinancialYear,
    ) -> Result<Vec<LoadedProfile>, ProfileLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input.as_bytes());

        if let Some(column) = reader.headers()?.iter().find(|h| !is_known_column(h)) {
            return Err(ProfileLoadError::UnknownColumn {
                column: column.to_string(),
                source: TaxError::InvalidDeductionSection(column.to_string()),
            });
        }

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = idx + 1;
                let (name, request) = result?.into_request();
                let profile = request
                    .into_profile(default_year)
                    .map_err(|source| ProfileLoadError::InvalidRow { row, source })?;
                Ok(LoadedProfile {
                    row,
                    name: name
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| format!("row {row}")),
                    profile,
                })
            })
            .collect()
    }

    /// Read a file from disk and delegate to [`ProfileLoader::load_from_str`].
    pub fn load_from_file(
        path: &Path,
        default_year: FinancialYear,
    ) -> Result<Vec<LoadedProfile>, ProfileLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::load_from_str(&contents, default_year)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

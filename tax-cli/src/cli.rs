//! Command-line definition for `taxguide`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tax_core::ProfileRequest;

/// Compare the New and Old income-tax regimes.
///
/// Amounts may be written the way people type them: `₹8,00,000`,
/// `Rs. 50000/-` and `800000` are the same value.
#[derive(Debug, Parser)]
#[command(name = "taxguide", version, about, long_about = None)]
pub struct Cli {
    /// Log more detail (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute both regimes for one taxpayer and recommend one.
    Compare(CompareArgs),

    /// Compare regimes for every row of a profile CSV file.
    Batch(BatchArgs),

    /// Print the slab, surcharge and rebate tables for a financial year.
    Rules(RulesArgs),
}

/// Where rule tables come from. Built-in tables are always loaded first.
#[derive(Debug, Clone, Default, Args)]
pub struct RuleSourceArgs {
    /// TOML rule file registered on top of the built-in years.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// CSV slab tables overlaid on the registered years.
    #[arg(long)]
    pub slabs: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    /// Taxpayer category: salaried, freelancer or other.
    #[arg(short, long)]
    pub category: String,

    /// Gross annual income (gross receipts for freelancers).
    #[arg(short, long)]
    pub gross: String,

    #[arg(long)]
    pub age: Option<u32>,

    /// Financial year, e.g. 2024-25.
    #[arg(short, long)]
    pub year: Option<String>,

    /// Deduction claim as SECTION=AMOUNT, e.g. 80C=1,50,000. Repeatable.
    #[arg(short, long = "deduction", value_name = "SECTION=AMOUNT", value_parser = parse_claim)]
    pub deductions: Vec<(String, String)>,

    /// Annual rent paid; the HRA exemption is derived from it.
    #[arg(long)]
    pub rent_paid: Option<String>,

    /// Annual basic salary for the HRA computation (default: half of gross).
    #[arg(long)]
    pub basic_salary: Option<String>,

    /// Annual HRA received from the employer.
    #[arg(long)]
    pub hra_received: Option<String>,

    /// Rent is paid in a metro city.
    #[arg(long)]
    pub metro: bool,

    #[command(flatten)]
    pub source: RuleSourceArgs,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

impl CompareArgs {
    pub fn to_request(&self) -> ProfileRequest {
        ProfileRequest {
            category: self.category.clone(),
            gross_income: self.gross.clone(),
            age: self.age,
            financial_year: self.year.clone(),
            deductions: self.deductions.clone(),
            rent_paid: self.rent_paid.clone(),
            basic_salary: self.basic_salary.clone(),
            hra_received: self.hra_received.clone(),
            metro: self.metro,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Profile CSV file.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Financial year for rows that do not name one.
    #[arg(short, long)]
    pub year: Option<String>,

    #[command(flatten)]
    pub source: RuleSourceArgs,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RulesArgs {
    /// Financial year, e.g. 2024-25.
    #[arg(short, long)]
    pub year: Option<String>,

    #[command(flatten)]
    pub source: RuleSourceArgs,

    /// Print the tables in rule-file (TOML) format.
    #[arg(long)]
    pub toml: bool,
}

fn parse_claim(s: &str) -> Result<(String, String), String> {
    let (section, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SECTION=AMOUNT, got '{s}'"))?;
    if section.trim().is_empty() {
        return Err(format!("missing section in '{s}'"));
    }
    Ok((section.trim().to_string(), amount.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_claim_splits_on_first_equals() {
        assert_eq!(
            parse_claim("80C=1,50,000"),
            Ok(("80C".to_string(), "1,50,000".to_string()))
        );
        assert_eq!(
            parse_claim(" 80D = 25000 "),
            Ok(("80D".to_string(), "25000".to_string()))
        );
    }

    #[test]
    fn parse_claim_requires_section_and_equals() {
        assert!(parse_claim("150000").is_err());
        assert!(parse_claim("=150000").is_err());
    }

    #[test]
    fn compare_command_collects_repeated_deductions() {
        let cli = Cli::try_parse_from([
            "taxguide",
            "compare",
            "--category",
            "salaried",
            "--gross",
            "₹15,00,000",
            "-d",
            "80C=1,50,000",
            "-d",
            "80D=25000",
            "--metro",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare, got {:?}", cli.command);
        };
        let request = args.to_request();
        assert_eq!(request.gross_income, "₹15,00,000");
        assert_eq!(request.deductions.len(), 2);
        assert!(request.metro);
    }

    #[test]
    fn batch_requires_file() {
        assert!(Cli::try_parse_from(["taxguide", "batch"]).is_err());
    }

    #[test]
    fn rules_accepts_rule_sources() {
        let cli = Cli::try_parse_from([
            "taxguide",
            "rules",
            "--year",
            "2025-26",
            "--rules",
            "fy.toml",
            "--toml",
        ])
        .unwrap();

        let Command::Rules(args) = cli.command else {
            panic!("expected rules, got {:?}", cli.command);
        };
        assert_eq!(args.year.as_deref(), Some("2025-26"));
        assert_eq!(args.source.rules, Some(PathBuf::from("fy.toml")));
        assert!(args.toml);
    }
}

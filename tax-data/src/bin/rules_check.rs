use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::RuleBook;
use tax_data::{SlabLoader, load_rules, rules_to_toml};

/// Validate tax rule data files before handing them to the calculator.
///
/// The rule file is TOML describing one financial year. The optional slab
/// file is CSV with the columns:
/// - financial_year: e.g. 2024-25
/// - regime: new or old
/// - age_band: below60, senior or super_senior (empty for below60)
/// - lower: lower bound of the slab
/// - upper: upper bound (empty for the top slab)
/// - rate: marginal rate as a decimal (e.g., 0.05)
#[derive(Parser, Debug)]
#[command(name = "tax-rules-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML rule file
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Path to a CSV file of slab tables to overlay
    #[arg(short, long)]
    slabs: Option<PathBuf>,

    /// Print the resulting rules in rule-file format
    #[arg(short, long, default_value_t = false)]
    print: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut book = RuleBook::builtin();

    if let Some(path) = &args.rules {
        println!("Loading rules from: {}", path.display());
        let rules = load_rules(path)?;
        let year = rules.financial_year;
        book.register(rules)
            .with_context(|| format!("Rules for {year} failed validation"))?;
        println!("Rules for {year} are valid.");
    }

    if let Some(path) = &args.slabs {
        println!("Loading slabs from: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = SlabLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} slab records from CSV", records.len());

        let replaced = SlabLoader::apply(&mut book, &records)
            .context("Failed to apply slab tables")?;
        println!("Successfully replaced {replaced} slab tables.");
    }

    if args.print {
        for year in book.available_years() {
            let rules = book.rules_for(year)?;
            println!("# {year}");
            println!("{}", rules_to_toml(rules)?);
        }
    }

    Ok(())
}

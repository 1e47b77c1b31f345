use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tax_core::{FinancialYear, RuleBook, TaxEngine};
use tax_data::{ProfileLoader, SlabLoader, load_rules, rules_to_toml};
use tracing::{debug, info};

use crate::cli::{BatchArgs, Command, CompareArgs, RuleSourceArgs, RulesArgs};
use crate::report::{self, BatchEntry};

/// Runs a subcommand and returns what should be printed to stdout.
pub fn run(command: &Command) -> Result<String> {
    match command {
        Command::Compare(args) => compare(args),
        Command::Batch(args) => batch(args),
        Command::Rules(args) => rules(args),
    }
}

/// Built-in rule sets, then the rule file, then slab overlays.
pub fn load_rule_book(source: &RuleSourceArgs) -> Result<RuleBook> {
    let mut book = RuleBook::builtin();

    if let Some(path) = &source.rules {
        let rules = load_rules(path)?;
        let year = rules.financial_year;
        book.register(rules)
            .with_context(|| format!("rules for {year} failed validation"))?;
        info!(%year, path = %path.display(), "registered rule file");
    }

    if let Some(path) = &source.slabs {
        let file =
            File::open(path).with_context(|| format!("failed to open: {}", path.display()))?;
        let records = SlabLoader::parse(file)
            .with_context(|| format!("failed to parse slab CSV: {}", path.display()))?;
        let replaced =
            SlabLoader::apply(&mut book, &records).context("failed to apply slab tables")?;
        info!(replaced, path = %path.display(), "applied slab tables");
    }

    debug!(years = ?book.available_years(), "rule book ready");
    Ok(book)
}

fn year_or_default(year: Option<&str>) -> Result<FinancialYear> {
    match year {
        Some(year) => Ok(FinancialYear::parse(year)?),
        None => Ok(RuleBook::DEFAULT_YEAR),
    }
}

fn compare(args: &CompareArgs) -> Result<String> {
    let book = load_rule_book(&args.source)?;
    let profile = args
        .to_request()
        .into_profile(RuleBook::DEFAULT_YEAR)
        .context("invalid taxpayer profile")?;

    let comparison = TaxEngine::for_profile(&book, &profile)?.compare(&profile)?;
    info!(
        financial_year = %profile.financial_year,
        category = %profile.category,
        recommended = %comparison.recommended,
        savings = %comparison.savings(),
        "compared regimes"
    );

    if args.json {
        Ok(report::to_json(&comparison)?)
    } else {
        Ok(report::comparison_report(&profile, &comparison))
    }
}

/// Loads a profile CSV and compares both regimes for every row, in file order.
///
/// Stops at the first row whose financial year has no rule set.
pub fn batch_comparisons(
    path: &Path,
    book: &RuleBook,
    default_year: FinancialYear,
) -> Result<Vec<BatchEntry>> {
    let profiles = ProfileLoader::load_from_file(path, default_year)
        .with_context(|| format!("failed to load profiles: {}", path.display()))?;
    info!(count = profiles.len(), path = %path.display(), "loaded profiles");

    profiles
        .into_iter()
        .map(|loaded| {
            let comparison = TaxEngine::for_profile(book, &loaded.profile)
                .and_then(|engine| engine.compare(&loaded.profile))
                .with_context(|| format!("row {} ({})", loaded.row, loaded.name))?;
            Ok(BatchEntry {
                name: loaded.name,
                profile: loaded.profile,
                comparison,
            })
        })
        .collect()
}

fn batch(args: &BatchArgs) -> Result<String> {
    let book = load_rule_book(&args.source)?;
    let default_year = year_or_default(args.year.as_deref())?;
    let entries = batch_comparisons(&args.file, &book, default_year)?;

    if args.json {
        Ok(report::to_json(&entries)?)
    } else {
        Ok(report::batch_report(&entries))
    }
}

fn rules(args: &RulesArgs) -> Result<String> {
    let book = load_rule_book(&args.source)?;
    let year = year_or_default(args.year.as_deref())?;
    let rules = book.rules_for(year)?;

    if args.toml {
        Ok(rules_to_toml(rules)?)
    } else {
        Ok(report::rules_report(rules))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn compare_args(
        category: &str,
        gross: &str,
    ) -> CompareArgs {
        CompareArgs {
            category: category.to_string(),
            gross: gross.to_string(),
            age: None,
            year: None,
            deductions: Vec::new(),
            rent_paid: None,
            basic_salary: None,
            hra_received: None,
            metro: false,
            source: RuleSourceArgs::default(),
            json: false,
        }
    }

    #[test]
    fn builtin_rule_book_without_sources() {
        let book = load_rule_book(&RuleSourceArgs::default()).unwrap();

        assert_eq!(
            book.available_years(),
            vec![FinancialYear::new(2024), FinancialYear::new(2025)]
        );
    }

    #[test]
    fn missing_rule_file_is_an_error() {
        let source = RuleSourceArgs {
            rules: Some(PathBuf::from("does/not/exist.toml")),
            slabs: None,
        };

        let err = load_rule_book(&source).unwrap_err();

        assert!(err.to_string().contains("does/not/exist.toml"), "{err}");
    }

    #[test]
    fn compare_json_reports_both_regimes() {
        let mut args = compare_args("freelancer", "₹20,00,000");
        args.deductions = vec![
            ("80C".to_string(), "1,50,000".to_string()),
            ("80D".to_string(), "25000".to_string()),
        ];
        args.json = true;

        let output = run(&Command::Compare(args)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let total = |regime: &str| {
            value[regime]["total_liability"]
                .as_str()
                .and_then(|s| s.parse::<Decimal>().ok())
        };
        assert_eq!(total("new"), Some(dec!(52000)));
        assert_eq!(total("old"), Some(dec!(80600)));
        assert_eq!(value["recommended"], "new");
    }

    #[test]
    fn compare_rejects_unsupported_year() {
        let mut args = compare_args("salaried", "800000");
        args.year = Some("2010-11".to_string());

        assert!(run(&Command::Compare(args)).is_err());
    }

    #[test]
    fn compare_rejects_malformed_amount() {
        let args = compare_args("salaried", "eight lakh");

        let err = run(&Command::Compare(args)).unwrap_err();

        assert!(err.to_string().contains("invalid taxpayer profile"), "{err}");
    }

    #[test]
    fn rules_prints_toml_for_requested_year() {
        let args = RulesArgs {
            year: Some("2025-26".to_string()),
            source: RuleSourceArgs::default(),
            toml: true,
        };

        let output = run(&Command::Rules(args)).unwrap();

        assert!(output.starts_with("financial_year = \"2025-26\""), "{output}");
    }
}

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::commands::batch_comparisons;
use tax_cli::report::batch_report;
use tax_core::{FinancialYear, Regime, RuleBook};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_batch_compares_every_row_in_order() {
    let book = RuleBook::builtin();

    let entries = batch_comparisons(&fixture("profiles.csv"), &book, RuleBook::DEFAULT_YEAR)
        .expect("batch should succeed");

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["meera", "kabir", "anil", "lata", "nisha"]);

    let totals: Vec<_> = entries
        .iter()
        .map(|e| {
            (
                e.comparison.new.total_liability,
                e.comparison.old.total_liability,
                e.comparison.recommended,
            )
        })
        .collect();
    assert_eq!(
        totals,
        vec![
            (dec!(31200), dec!(75400), Regime::New),
            (dec!(52000), dec!(80600), Regime::New),
            (dec!(75400), dec!(32760), Regime::Old),
            (dec!(0), dec!(0), Regime::New),
            (dec!(0), dec!(179400), Regime::New),
        ]
    );
}

#[test]
fn test_batch_derives_hra_and_clips_per_regime() {
    let book = RuleBook::builtin();

    let entries = batch_comparisons(&fixture("profiles.csv"), &book, RuleBook::DEFAULT_YEAR)
        .expect("batch should succeed");
    let anil = &entries[2].comparison;

    assert_eq!(anil.old.taxable_income, dec!(595000));
    assert_eq!(anil.new.taxable_income, dec!(1150000));
    assert_eq!(anil.old.section_map["rent_paid"].allowed, dec!(180000));
    assert_eq!(anil.new.section_map["rent_paid"].allowed, dec!(0));
    assert_eq!(anil.savings(), dec!(42640));
}

#[test]
fn test_batch_row_year_overrides_default() {
    let book = RuleBook::builtin();

    let entries = batch_comparisons(&fixture("profiles.csv"), &book, RuleBook::DEFAULT_YEAR)
        .expect("batch should succeed");

    assert_eq!(entries[0].profile.financial_year, FinancialYear::new(2024));
    assert_eq!(entries[4].profile.financial_year, FinancialYear::new(2025));
    assert!(entries[4].comparison.new.rebate_applied);
    assert_eq!(entries[4].comparison.new.base_tax, dec!(60000));
}

#[test]
fn test_batch_fails_for_unregistered_year() {
    let book = RuleBook::new();

    let err = batch_comparisons(&fixture("profiles.csv"), &book, RuleBook::DEFAULT_YEAR)
        .expect_err("empty rule book has no years");

    assert!(err.to_string().contains("row 1 (meera)"), "{err}");
}

#[test]
fn test_batch_report_renders_indian_grouping() {
    let book = RuleBook::builtin();
    let entries = batch_comparisons(&fixture("profiles.csv"), &book, RuleBook::DEFAULT_YEAR)
        .expect("batch should succeed");

    let report = batch_report(&entries);

    assert!(report.contains("meera"));
    assert!(report.contains("₹20,00,000"));
    assert!(report.contains("₹1,79,400"));
}

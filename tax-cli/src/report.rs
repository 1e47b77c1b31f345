//! Table and JSON rendering of engine results.

use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};
use tax_core::calculations::common::round_to_rupee;
use tax_core::{
    ComparisonResult, DeductionLimit, DeductionSection, Regime, RegimeRules, SlabTable, TaxRules,
    TaxpayerProfile,
};

/// Formats rupees with Indian digit grouping: `₹12,34,567`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_to_rupee(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().normalize().to_string();
    if digits.len() <= 3 {
        return format!("{sign}₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{sign}₹{},{tail}", groups.join(","))
}

/// `0.05` -> `5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Tabled)]
struct LineRow {
    #[tabled(rename = "")]
    line: &'static str,
    #[tabled(rename = "New Regime")]
    new: String,
    #[tabled(rename = "Old Regime")]
    old: String,
}

#[derive(Debug, Clone, Tabled)]
struct SectionRow {
    #[tabled(rename = "Input field")]
    field: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Claimed")]
    claimed: String,
    #[tabled(rename = "Allowed (New)")]
    allowed_new: String,
    #[tabled(rename = "Allowed (Old)")]
    allowed_old: String,
}

fn line_rows(comparison: &ComparisonResult) -> Vec<LineRow> {
    let (new, old) = (&comparison.new, &comparison.old);
    let money = |line, pick: fn(&tax_core::TaxResult) -> Decimal| LineRow {
        line,
        new: format_inr(pick(new)),
        old: format_inr(pick(old)),
    };
    let yes_no = |applied: bool| if applied { "yes" } else { "no" }.to_string();

    vec![
        money("Assessable income", |r| r.assessable_income),
        money("Deductions", |r| r.total_deductions),
        money("Taxable income", |r| r.taxable_income),
        money("Base tax", |r| r.base_tax),
        money("Surcharge", |r| r.surcharge),
        money("Cess", |r| r.cess),
        LineRow {
            line: "Rebate applied",
            new: yes_no(new.rebate_applied),
            old: yes_no(old.rebate_applied),
        },
        money("Total liability", |r| r.total_liability),
    ]
}

fn section_rows(comparison: &ComparisonResult) -> Vec<SectionRow> {
    comparison
        .old
        .section_map
        .iter()
        .map(|(field, old)| {
            let allowed_new = comparison
                .new
                .section_map
                .get(field)
                .map_or(Decimal::ZERO, |entry| entry.allowed);
            SectionRow {
                field: field.clone(),
                section: old.section.code().to_string(),
                claimed: format_inr(old.claimed),
                allowed_new: format_inr(allowed_new),
                allowed_old: format_inr(old.allowed),
            }
        })
        .collect()
}

/// Side-by-side regime table, recommendation, and the HR-portal section map.
pub fn comparison_report(
    profile: &TaxpayerProfile,
    comparison: &ComparisonResult,
) -> String {
    let mut out = format!(
        "FY {} | {} | gross {}\n\n",
        profile.financial_year,
        profile.category,
        format_inr(profile.gross_income)
    );
    out.push_str(&render(line_rows(comparison)));
    out.push('\n');

    let savings = comparison.savings();
    if savings.is_zero() {
        out.push_str(&format!(
            "\nRecommended: {} (both regimes cost the same)\n",
            comparison.recommended
        ));
    } else {
        out.push_str(&format!(
            "\nRecommended: {} (saves {})\n",
            comparison.recommended,
            format_inr(savings)
        ));
    }

    let sections = section_rows(comparison);
    if !sections.is_empty() {
        out.push_str("\nEnter in your HR portal:\n");
        out.push_str(&render(sections));
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// One compared row of a batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub profile: TaxpayerProfile,
    pub comparison: ComparisonResult,
}

#[derive(Debug, Clone, Tabled)]
struct BatchRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "New")]
    new: String,
    #[tabled(rename = "Old")]
    old: String,
    #[tabled(rename = "Recommended")]
    recommended: String,
    #[tabled(rename = "Saves")]
    savings: String,
}

pub fn batch_report(entries: &[BatchEntry]) -> String {
    if entries.is_empty() {
        return "No profiles found".to_string();
    }

    let rows = entries
        .iter()
        .map(|entry| BatchRow {
            name: entry.name.clone(),
            category: entry.profile.category.to_string(),
            gross: format_inr(entry.profile.gross_income),
            new: format_inr(entry.comparison.new.total_liability),
            old: format_inr(entry.comparison.old.total_liability),
            recommended: entry.comparison.recommended.as_str().to_string(),
            savings: format_inr(entry.comparison.savings()),
        })
        .collect();
    render(rows)
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Tabled)]
struct SlabRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Clone, Tabled)]
struct SurchargeRow {
    #[tabled(rename = "Income above")]
    threshold: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

fn slab_rows(table: &SlabTable) -> Vec<SlabRow> {
    table
        .slabs()
        .iter()
        .map(|slab| SlabRow {
            from: format_inr(slab.lower),
            to: slab.upper.map_or_else(|| "-".to_string(), format_inr),
            rate: format_rate(slab.rate),
        })
        .collect()
}

fn deduction_summary(rules: &RegimeRules) -> String {
    let allowed: Vec<String> = DeductionSection::ALL
        .into_iter()
        .filter_map(|section| match rules.deductions.limit(section) {
            DeductionLimit::NotAllowed => None,
            DeductionLimit::Capped(cap) => Some(format!("{} up to {}", section.code(), format_inr(cap))),
            DeductionLimit::Unlimited => Some(section.code().to_string()),
        })
        .collect();
    if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed.join(", ")
    }
}

fn regime_report(
    regime: Regime,
    rules: &RegimeRules,
) -> String {
    let mut out = format!("{regime}\n");
    out.push_str(&render(slab_rows(&rules.slabs)));
    out.push('\n');

    for (label, table) in [
        ("Senior citizens (60-79)", &rules.senior_slabs),
        ("Super senior citizens (80+)", &rules.super_senior_slabs),
    ] {
        if let Some(table) = table {
            out.push_str(&format!("{label}\n"));
            out.push_str(&render(slab_rows(table)));
            out.push('\n');
        }
    }

    let surcharge: Vec<SurchargeRow> = rules
        .surcharge
        .brackets()
        .iter()
        .map(|bracket| SurchargeRow {
            threshold: format_inr(bracket.threshold),
            rate: format_rate(bracket.rate),
        })
        .collect();
    if !surcharge.is_empty() {
        out.push_str("Surcharge\n");
        out.push_str(&render(surcharge));
        out.push('\n');
    }

    out.push_str(&format!(
        "Rebate: full up to taxable income {} (at most {})\n",
        format_inr(rules.rebate.income_threshold),
        format_inr(rules.rebate.max_rebate)
    ));
    out.push_str(&format!("Deductions: {}\n", deduction_summary(rules)));
    out
}

/// Human-readable dump of one financial year's tables.
pub fn rules_report(rules: &TaxRules) -> String {
    let mut out = format!(
        "FY {} | cess {} | presumptive income {} of receipts\n\n",
        rules.financial_year,
        format_rate(rules.cess_rate),
        format_rate(rules.presumptive_rate)
    );
    for regime in Regime::ALL {
        out.push_str(&regime_report(regime, rules.regime(regime)));
        out.push('\n');
    }
    out
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

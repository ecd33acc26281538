//! Ratios rebuilt from raw statements when the metrics snapshot lacks them.

use analysis_core::{finite, BalanceSheet, IncomeStatement, PeriodCadence, ScoringInput};

use crate::periods::detect_cadence;

/// Where a factor's raw value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Reported,
    Derived,
}

impl Source {
    /// Suffix appended to factor interpretations
    pub fn note(&self) -> &'static str {
        match self {
            Source::Reported => "",
            Source::Derived => " (derived from statements)",
        }
    }
}

/// Use the reported metric when it is present; derive it only when absent.
///
/// A reported value that later fails a plausibility guard is still returned
/// here, so a guard never silently swaps in a derived number.
pub fn reported_or_derived(
    reported: Option<f64>,
    derive: impl FnOnce() -> Option<f64>,
) -> Option<(f64, Source)> {
    match finite(reported) {
        Some(value) => Some((value, Source::Reported)),
        None => finite(derive()).map(|value| (value, Source::Derived)),
    }
}

fn latest_income<'a>(input: &ScoringInput<'a>) -> Option<&'a IncomeStatement> {
    input.income_statements.first()
}

fn latest_balance<'a>(input: &ScoringInput<'a>) -> Option<&'a BalanceSheet> {
    input.balance_sheets.first()
}

/// Net income over the trailing year: the sum of the four latest quarters,
/// or the latest annual/TTM figure.
pub fn trailing_net_income(statements: &[IncomeStatement]) -> Option<f64> {
    match detect_cadence(statements) {
        PeriodCadence::Quarterly => {
            if statements.len() < 4 {
                return None;
            }
            statements[..4]
                .iter()
                .map(|s| finite(s.net_income))
                .sum::<Option<f64>>()
        }
        PeriodCadence::Annual | PeriodCadence::Ttm => finite(statements.first()?.net_income),
        PeriodCadence::Unknown => None,
    }
}

pub fn gross_margin(input: &ScoringInput<'_>) -> Option<f64> {
    latest_income(input)?.gross_margin()
}

pub fn operating_margin(input: &ScoringInput<'_>) -> Option<f64> {
    latest_income(input)?.operating_margin()
}

pub fn net_margin(input: &ScoringInput<'_>) -> Option<f64> {
    latest_income(input)?.net_margin()
}

pub fn return_on_equity(input: &ScoringInput<'_>) -> Option<f64> {
    let equity = finite(latest_balance(input)?.shareholders_equity).filter(|e| *e > 0.0)?;
    Some(trailing_net_income(input.income_statements)? / equity)
}

pub fn return_on_assets(input: &ScoringInput<'_>) -> Option<f64> {
    let assets = finite(latest_balance(input)?.total_assets).filter(|a| *a > 0.0)?;
    Some(trailing_net_income(input.income_statements)? / assets)
}

fn debt(balance: &BalanceSheet) -> Option<f64> {
    finite(balance.total_debt).or_else(|| finite(balance.total_liabilities))
}

pub fn debt_to_equity(input: &ScoringInput<'_>) -> Option<f64> {
    let balance = latest_balance(input)?;
    let equity = finite(balance.shareholders_equity).filter(|e| *e > 0.0)?;
    Some(debt(balance)? / equity)
}

pub fn debt_to_assets(input: &ScoringInput<'_>) -> Option<f64> {
    let balance = latest_balance(input)?;
    let assets = finite(balance.total_assets).filter(|a| *a > 0.0)?;
    Some(debt(balance)? / assets)
}

pub fn current_ratio(input: &ScoringInput<'_>) -> Option<f64> {
    let balance = latest_balance(input)?;
    let liabilities = finite(balance.current_liabilities).filter(|l| *l > 0.0)?;
    Some(finite(balance.current_assets)? / liabilities)
}

/// Requires a reported inventory figure; a missing inventory is not zero.
pub fn quick_ratio(input: &ScoringInput<'_>) -> Option<f64> {
    let balance = latest_balance(input)?;
    let liabilities = finite(balance.current_liabilities).filter(|l| *l > 0.0)?;
    let quick_assets = finite(balance.current_assets)? - finite(balance.inventory)?;
    Some(quick_assets / liabilities)
}

pub fn interest_coverage(input: &ScoringInput<'_>) -> Option<f64> {
    let income = latest_income(input)?;
    let interest = finite(income.interest_expense).filter(|i| *i != 0.0)?;
    Some(finite(income.operating_income)? / interest.abs())
}

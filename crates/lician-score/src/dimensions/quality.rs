use analysis_core::{Dimension, DimensionScore, DimensionScorer, IncomeStatement, ScoreFactor, ScoringInput, SectorMedians};

use super::{pct, strongest_factors, FactorSet};
use crate::derived::{self, reported_or_derived, Source};
use crate::normalizer::{score_higher_is_better, score_optimal_range};

pub const MAX_DATA_POINTS: u32 = 7;

const ROE_GUARD: f64 = 2.0;
const ROA_GUARD: f64 = 1.0;
const ROA_BENCHMARK: f64 = 0.05;
/// Statements examined for the gross margin trend
const TREND_WINDOW: usize = 4;
/// Margin moves smaller than two percentage points count as flat
const TREND_THRESHOLD: f64 = 0.02;
const TREND_CONTRIBUTION: f64 = 3.0;

pub struct QualityScorer;

impl DimensionScorer for QualityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Quality
    }

    fn max_data_points(&self) -> u32 {
        MAX_DATA_POINTS
    }

    fn score(&self, input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
        score_quality(input, medians)
    }
}

/// Change in gross margin from the oldest to the latest statement in the
/// recent window. Needs at least two statements with a margin.
pub fn gross_margin_trend(statements: &[IncomeStatement]) -> Option<f64> {
    let margins: Vec<f64> = statements
        .iter()
        .take(TREND_WINDOW)
        .filter_map(|s| s.gross_margin())
        .collect();
    match margins.as_slice() {
        [latest, .., oldest] => Some(latest - oldest),
        _ => None,
    }
}

pub fn score_quality(input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
    let mut factors = FactorSet::new(Dimension::Quality, MAX_DATA_POINTS);
    let metrics = input.metrics;

    let roe = reported_or_derived(metrics.and_then(|m| m.return_on_equity), || {
        derived::return_on_equity(input)
    });
    if let Some((v, source)) = roe.filter(|(v, _)| v.abs() < ROE_GUARD) {
        let c = score_higher_is_better(Some(v), medians.roe, 1.0);
        factors.push("ROE", v, Some(medians.roe), c, relative("Return on equity", v, medians.roe, source));
    }

    let roa = reported_or_derived(metrics.and_then(|m| m.return_on_assets), || {
        derived::return_on_assets(input)
    });
    if let Some((v, source)) = roa.filter(|(v, _)| v.abs() < ROA_GUARD) {
        let c = score_higher_is_better(Some(v), ROA_BENCHMARK, 1.0);
        factors.push("ROA", v, Some(ROA_BENCHMARK), c, relative("Return on assets", v, ROA_BENCHMARK, source));
    }

    let margins = [
        (
            "Gross Margin",
            reported_or_derived(metrics.and_then(|m| m.gross_margin), || derived::gross_margin(input)),
            medians.gross_margin,
            0.8,
        ),
        (
            "Operating Margin",
            reported_or_derived(metrics.and_then(|m| m.operating_margin), || derived::operating_margin(input)),
            medians.operating_margin,
            1.0,
        ),
        (
            "Net Margin",
            reported_or_derived(metrics.and_then(|m| m.net_margin), || derived::net_margin(input)),
            medians.net_margin,
            1.0,
        ),
    ];
    for (name, value, benchmark, sensitivity) in margins {
        if let Some((v, source)) = value {
            let c = score_higher_is_better(Some(v), benchmark, sensitivity);
            factors.push(name, v, Some(benchmark), c, relative(name, v, benchmark, source));
        }
    }

    let leverage = reported_or_derived(metrics.and_then(|m| m.debt_to_equity), || {
        derived::debt_to_equity(input)
    });
    if let Some((v, source)) = leverage {
        let c = score_optimal_range(Some(v), 0.0, 1.0, 1.0);
        let verdict = if c >= 5.0 { "conservative" } else { "elevated" };
        factors.push(
            "Debt/Equity",
            v,
            Some(medians.debt_to_equity),
            c,
            format!("Debt/equity of {:.2} is {}{}", v, verdict, source.note()),
        );
    }

    if let Some(change) = gross_margin_trend(input.income_statements) {
        let (c, verdict) = if change > TREND_THRESHOLD {
            (TREND_CONTRIBUTION, "expanding")
        } else if change < -TREND_THRESHOLD {
            (-TREND_CONTRIBUTION, "contracting")
        } else {
            (0.0, "stable")
        };
        factors.push(
            "Margin Trend",
            change,
            None,
            c,
            format!("Gross margin {} ({:+.1}pp)", verdict, change * 100.0),
        );
    }

    factors.finish(explain)
}

fn relative(label: &str, value: f64, benchmark: f64, source: Source) -> String {
    let verdict = if value > benchmark { "above" } else if value < benchmark { "below" } else { "at" };
    format!("{} of {} is {} the {} benchmark{}", label, pct(value), verdict, pct(benchmark), source.note())
}

fn explain(score: u8, factors: &[ScoreFactor]) -> String {
    let leaders = strongest_factors(factors, 2);
    if score >= 7 {
        format!("High-quality business with strong profitability, led by {}.", leaders)
    } else if score <= 3 {
        format!("Profitability and balance sheet quality are weak, notably {}.", leaders)
    } else {
        format!("Business quality is around the sector norm ({}).", leaders)
    }
}

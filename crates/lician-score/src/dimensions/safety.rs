use analysis_core::{Dimension, DimensionScore, DimensionScorer, PriceBar, ScoreFactor, ScoringInput, SectorMedians};
use technical_analysis::{annualized_volatility, daily_returns};

use super::{pct, strongest_factors, FactorSet};
use crate::derived::{self, reported_or_derived};
use crate::normalizer::score_optimal_range;

pub const MAX_DATA_POINTS: u32 = 5;

const MIN_PRICE_ROWS: usize = 30;
const MAX_RETURNS: usize = 60;
const MIN_RETURNS: usize = 20;

pub struct SafetyScorer;

impl DimensionScorer for SafetyScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Safety
    }

    fn max_data_points(&self) -> u32 {
        MAX_DATA_POINTS
    }

    fn score(&self, input: &ScoringInput<'_>, _medians: &SectorMedians) -> DimensionScore {
        score_safety(input)
    }
}

fn interest_coverage_step(coverage: f64) -> (f64, &'static str) {
    if coverage > 10.0 {
        (4.0, "very comfortable")
    } else if coverage > 5.0 {
        (2.0, "comfortable")
    } else if coverage > 2.0 {
        (0.0, "adequate")
    } else {
        (-3.0, "thin")
    }
}

fn debt_to_assets_step(ratio: f64) -> (f64, &'static str) {
    if ratio < 0.3 {
        (3.0, "low")
    } else if ratio < 0.5 {
        (1.0, "moderate")
    } else if ratio < 0.7 {
        (-1.0, "elevated")
    } else {
        (-3.0, "high")
    }
}

fn volatility_step(volatility: f64) -> (f64, &'static str) {
    if volatility < 0.20 {
        (3.0, "low")
    } else if volatility < 0.30 {
        (1.0, "moderate")
    } else if volatility < 0.50 {
        (-1.0, "elevated")
    } else {
        (-3.0, "high")
    }
}

/// Annualized volatility of recent daily returns, when enough history exists.
pub fn recent_volatility(prices: &[PriceBar]) -> Option<f64> {
    if prices.len() < MIN_PRICE_ROWS {
        return None;
    }
    let returns = daily_returns(prices, MAX_RETURNS);
    if returns.len() < MIN_RETURNS {
        return None;
    }
    annualized_volatility(&returns)
}

pub fn score_safety(input: &ScoringInput<'_>) -> DimensionScore {
    let mut factors = FactorSet::new(Dimension::Safety, MAX_DATA_POINTS);
    let metrics = input.metrics;

    let coverage = reported_or_derived(metrics.and_then(|m| m.interest_coverage), || {
        derived::interest_coverage(input)
    });
    if let Some((v, source)) = coverage {
        let (c, verdict) = interest_coverage_step(v);
        factors.push(
            "Interest Coverage",
            v,
            None,
            c,
            format!("Interest coverage of {:.1}x is {}{}", v, verdict, source.note()),
        );
    }

    let liquidity = [
        (
            "Current Ratio",
            reported_or_derived(metrics.and_then(|m| m.current_ratio), || derived::current_ratio(input)),
            (1.2, 2.5),
        ),
        (
            "Quick Ratio",
            reported_or_derived(metrics.and_then(|m| m.quick_ratio), || derived::quick_ratio(input)),
            (0.8, 2.0),
        ),
    ];
    for (name, value, (low, high)) in liquidity {
        if let Some((v, source)) = value {
            let c = score_optimal_range(Some(v), low, high, 0.5);
            let verdict = if v < low {
                "below the healthy range"
            } else if v > high {
                "above the healthy range"
            } else {
                "within the healthy range"
            };
            factors.push(
                name,
                v,
                None,
                c,
                format!("{} of {:.2} is {} ({:.1}-{:.1}){}", name, v, verdict, low, high, source.note()),
            );
        }
    }

    let leverage = reported_or_derived(metrics.and_then(|m| m.debt_to_assets), || {
        derived::debt_to_assets(input)
    });
    if let Some((v, source)) = leverage {
        let (c, verdict) = debt_to_assets_step(v);
        factors.push(
            "Debt/Assets",
            v,
            None,
            c,
            format!("Debt is {} of assets, {} leverage{}", pct(v), verdict, source.note()),
        );
    }

    if let Some(volatility) = recent_volatility(input.prices) {
        let (c, verdict) = volatility_step(volatility);
        factors.push(
            "Volatility",
            volatility,
            None,
            c,
            format!("Annualized volatility of {} is {}", pct(volatility), verdict),
        );
    }

    factors.finish(explain)
}

fn explain(score: u8, factors: &[ScoreFactor]) -> String {
    let leaders = strongest_factors(factors, 2);
    if score >= 7 {
        format!("Financially conservative with low risk, supported by {}.", leaders)
    } else if score <= 3 {
        format!("Elevated financial or price risk, notably {}.", leaders)
    } else {
        format!("Risk profile is moderate ({}).", leaders)
    }
}

use analysis_core::{finite, Dimension, DimensionScore, DimensionScorer, IncomeStatement, ScoreFactor, ScoringInput, SectorMedians};

use super::{pct, strongest_factors, FactorSet};
use crate::normalizer::{calculate_growth, score_higher_is_better};
use crate::periods::year_ago_index;

pub const MAX_DATA_POINTS: u32 = 5;

/// Earnings growth benchmark shared by net income and EPS growth
const EARNINGS_GROWTH_BENCHMARK: f64 = 0.10;
/// Growth rates at or beyond 500% are treated as base effects
const GROWTH_GUARD: f64 = 5.0;
/// Most recent statements considered for revenue consistency
const CONSISTENCY_WINDOW: usize = 5;

pub struct GrowthScorer;

impl DimensionScorer for GrowthScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Growth
    }

    fn max_data_points(&self) -> u32 {
        MAX_DATA_POINTS
    }

    fn score(&self, input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
        score_growth(input, medians)
    }
}

fn describe(label: &str, value: f64, benchmark: f64) -> String {
    let verdict = if value > benchmark { "above" } else if value < benchmark { "below" } else { "at" };
    format!("{} of {} is {} the {} benchmark", label, pct(value), verdict, pct(benchmark))
}

/// Year-over-year revenue growth of the latest statement.
pub fn year_over_year_revenue_growth(statements: &[IncomeStatement]) -> Option<f64> {
    let year_ago = year_ago_index(statements)?;
    calculate_growth(statements.first()?.revenue, statements[year_ago].revenue)
}

/// Share of consecutive period-over-period comparisons in which revenue
/// grew, over the most recent statements in list order.
pub fn revenue_consistency(statements: &[IncomeStatement]) -> Option<f64> {
    let window = &statements[..statements.len().min(CONSISTENCY_WINDOW)];
    let (increases, comparisons) = window
        .windows(2)
        .filter_map(|pair| Some((finite(pair[0].revenue)?, finite(pair[1].revenue)?)))
        .fold((0u32, 0u32), |(up, total), (newer, older)| {
            (up + u32::from(newer > older), total + 1)
        });

    (comparisons > 0).then(|| increases as f64 / comparisons as f64)
}

pub fn score_growth(input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
    let mut factors = FactorSet::new(Dimension::Growth, MAX_DATA_POINTS);
    let sector_growth = medians.revenue_growth;

    if let Some(metrics) = input.metrics {
        if let Some(g) = finite(metrics.revenue_growth) {
            let c = score_higher_is_better(Some(g), sector_growth, 2.0);
            factors.push("Revenue Growth", g, Some(sector_growth), c, describe("Revenue growth", g, sector_growth));
        }

        let earnings = [
            ("Earnings Growth", "Earnings growth", metrics.earnings_growth),
            ("EPS Growth", "EPS growth", metrics.earnings_per_share_growth),
        ];
        for (name, label, value) in earnings {
            if let Some(g) = finite(value).filter(|g| g.abs() < GROWTH_GUARD) {
                let c = score_higher_is_better(Some(g), EARNINGS_GROWTH_BENCHMARK, 1.5);
                factors.push(
                    name,
                    g,
                    Some(EARNINGS_GROWTH_BENCHMARK),
                    c,
                    describe(label, g, EARNINGS_GROWTH_BENCHMARK),
                );
            }
        }
    }

    if let Some(g) = year_over_year_revenue_growth(input.income_statements).filter(|g| g.abs() < GROWTH_GUARD) {
        let c = score_higher_is_better(Some(g), sector_growth, 1.5);
        factors.push(
            "YoY Revenue Growth",
            g,
            Some(sector_growth),
            c,
            describe("Year-over-year revenue growth", g, sector_growth),
        );
    }

    if let Some(consistency) = revenue_consistency(input.income_statements) {
        let c = (consistency - 0.5) * 6.0;
        factors.push(
            "Revenue Consistency",
            consistency,
            None,
            c,
            format!("Revenue grew in {} of recent periods", pct(consistency)),
        );
    }

    factors.finish(explain)
}

fn explain(score: u8, factors: &[ScoreFactor]) -> String {
    let leaders = strongest_factors(factors, 2);
    if score >= 7 {
        format!("Growing faster than sector peers, led by {}.", leaders)
    } else if score <= 3 {
        format!("Growth is lagging sector peers, weighed down by {}.", leaders)
    } else {
        format!("Growth is roughly in line with sector peers ({}).", leaders)
    }
}

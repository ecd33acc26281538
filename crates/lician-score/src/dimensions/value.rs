use analysis_core::{finite, Dimension, DimensionScore, DimensionScorer, ScoreFactor, ScoringInput, SectorMedians};

use super::{strongest_factors, FactorSet};
use crate::normalizer::score_lower_is_better;

pub const MAX_DATA_POINTS: u32 = 5;

/// EV/EBITDA is compared against a market-wide multiple, not a sector one
const EV_EBITDA_BENCHMARK: f64 = 12.0;
/// Larger EV/EBITDA multiples are treated as data errors
const EV_EBITDA_CEILING: f64 = 100.0;
const PEG_BENCHMARK: f64 = 1.5;
const PEG_CEILING: f64 = 5.0;

/// Cheapness against sector multiples. Reads the metrics snapshot only.
pub struct ValueScorer;

impl DimensionScorer for ValueScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Value
    }

    fn max_data_points(&self) -> u32 {
        MAX_DATA_POINTS
    }

    fn score(&self, input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
        score_value(input, medians)
    }
}

fn describe(label: &str, value: f64, benchmark: f64, contribution: f64) -> String {
    let verdict = if value <= 0.0 {
        "non-positive multiple, treated as mildly favorable"
    } else if contribution > 0.0 {
        "cheaper than benchmark"
    } else if contribution < 0.0 {
        "richer than benchmark"
    } else {
        "in line with benchmark"
    };
    format!("{} of {:.1} vs {:.1}: {}", label, value, benchmark, verdict)
}

pub fn score_value(input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore {
    let mut factors = FactorSet::new(Dimension::Value, MAX_DATA_POINTS);

    if let Some(metrics) = input.metrics {
        let multiples = [
            ("P/E Ratio", metrics.price_to_earnings_ratio, medians.pe_ratio, 0.8),
            ("P/B Ratio", metrics.price_to_book_ratio, medians.pb_ratio, 0.6),
            ("P/S Ratio", metrics.price_to_sales_ratio, medians.ps_ratio, 0.5),
        ];
        for (name, value, benchmark, sensitivity) in multiples {
            if let Some(v) = finite(value) {
                let c = score_lower_is_better(Some(v), benchmark, sensitivity);
                factors.push(name, v, Some(benchmark), c, describe(name, v, benchmark, c));
            }
        }

        if let Some(ev) = finite(metrics.enterprise_value_to_ebitda_ratio)
            .filter(|v| *v > 0.0 && *v < EV_EBITDA_CEILING)
        {
            let c = score_lower_is_better(Some(ev), EV_EBITDA_BENCHMARK, 0.4);
            factors.push(
                "EV/EBITDA",
                ev,
                Some(EV_EBITDA_BENCHMARK),
                c,
                describe("EV/EBITDA", ev, EV_EBITDA_BENCHMARK, c),
            );
        }

        if let Some(peg) = finite(metrics.peg_ratio).filter(|v| *v > 0.0 && *v < PEG_CEILING) {
            let c = score_lower_is_better(Some(peg), PEG_BENCHMARK, 1.2);
            factors.push(
                "PEG Ratio",
                peg,
                Some(PEG_BENCHMARK),
                c,
                describe("PEG", peg, PEG_BENCHMARK, c),
            );
        }
    }

    factors.finish(explain)
}

fn explain(score: u8, factors: &[ScoreFactor]) -> String {
    let leaders = strongest_factors(factors, 2);
    if score >= 7 {
        format!("Appears undervalued relative to sector benchmarks, led by {}.", leaders)
    } else if score <= 3 {
        format!("Appears overvalued relative to sector benchmarks, driven by {}.", leaders)
    } else {
        format!("Valuation is broadly in line with sector benchmarks ({}).", leaders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::DEFAULT_MEDIANS;
    use analysis_core::FinancialMetrics;
    use approx::assert_relative_eq;

    fn score_metrics(metrics: FinancialMetrics) -> DimensionScore {
        let input = ScoringInput { metrics: Some(&metrics), ..Default::default() };
        score_value(&input, &DEFAULT_MEDIANS)
    }

    #[test]
    fn test_cheap_multiples_score_high() {
        let result = score_metrics(FinancialMetrics {
            price_to_earnings_ratio: Some(10.0),
            price_to_book_ratio: Some(1.0),
            ..Default::default()
        });

        assert_eq!(result.data_points, 2);
        assert_relative_eq!(result.factors[0].contribution, 4.0, epsilon = 1e-9);
        assert_eq!(result.factors[1].contribution, 5.0);
        assert_eq!(result.score, 10);
        assert_relative_eq!(result.confidence, 0.4, epsilon = 1e-12);
        assert!(result.explanation.starts_with("Appears undervalued"));
        assert!(result.explanation.contains("P/B Ratio and P/E Ratio"));
    }

    #[test]
    fn test_expensive_multiples_score_low() {
        let result = score_metrics(FinancialMetrics {
            price_to_earnings_ratio: Some(200.0),
            price_to_book_ratio: Some(40.0),
            price_to_sales_ratio: Some(50.0),
            ..Default::default()
        });
        assert!(result.score <= 3);
        assert!(result.explanation.starts_with("Appears overvalued"));
    }

    #[test]
    fn test_negative_pe_is_mildly_favorable() {
        let result = score_metrics(FinancialMetrics {
            price_to_earnings_ratio: Some(-12.0),
            ..Default::default()
        });
        assert_eq!(result.factors[0].contribution, 2.0);
        assert_eq!(result.score, 7);
    }

    #[test]
    fn test_ev_ebitda_and_peg_guards() {
        let result = score_metrics(FinancialMetrics {
            enterprise_value_to_ebitda_ratio: Some(150.0),
            peg_ratio: Some(7.0),
            ..Default::default()
        });
        assert_eq!(result.data_points, 0);
        assert_eq!(result.score, 5);

        let result = score_metrics(FinancialMetrics {
            enterprise_value_to_ebitda_ratio: Some(12.0),
            peg_ratio: Some(0.75),
            ..Default::default()
        });
        assert_eq!(result.data_points, 2);
        assert_eq!(result.factors[0].contribution, 0.0);
        // (1.5 / 0.75 - 1) * 1.2 * 5 = 6 -> clamped
        assert_eq!(result.factors[1].contribution, 5.0);
    }

    #[test]
    fn test_lower_pe_never_lowers_score() {
        let mut previous = 0u8;
        for pe in [80.0, 40.0, 25.0, 20.0, 15.0, 10.0, 5.0] {
            let result = score_metrics(FinancialMetrics {
                price_to_earnings_ratio: Some(pe),
                price_to_book_ratio: Some(3.0),
                ..Default::default()
            });
            assert!(result.score >= previous, "P/E {} lowered the score", pe);
            previous = result.score;
        }
    }

    #[test]
    fn test_no_metrics_is_neutral() {
        let result = score_value(&ScoringInput::default(), &DEFAULT_MEDIANS);
        assert_eq!(result.score, 5);
        assert_eq!(result.confidence, 0.0);
        assert!(result.factors.is_empty());
    }
}

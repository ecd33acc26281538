pub mod growth;
pub mod momentum;
pub mod quality;
pub mod safety;
pub mod value;

pub use growth::{score_growth, GrowthScorer};
pub use momentum::{score_momentum, MomentumScorer};
pub use quality::{score_quality, QualityScorer};
pub use safety::{score_safety, SafetyScorer};
pub use value::{score_value, ValueScorer};

use analysis_core::{Dimension, DimensionScore, ScoreFactor};

use crate::normalizer::{clamp_contribution, dimension_score_from, NEUTRAL_SCORE};

/// Collects the factors a scorer could compute and turns them into a
/// [`DimensionScore`].
pub(crate) struct FactorSet {
    dimension: Dimension,
    max_data_points: u32,
    factors: Vec<ScoreFactor>,
}

impl FactorSet {
    pub(crate) fn new(dimension: Dimension, max_data_points: u32) -> Self {
        Self {
            dimension,
            max_data_points,
            factors: Vec::with_capacity(max_data_points as usize),
        }
    }

    pub(crate) fn push(
        &mut self,
        name: &str,
        value: f64,
        benchmark: Option<f64>,
        contribution: f64,
        interpretation: String,
    ) {
        self.factors.push(ScoreFactor {
            name: name.to_string(),
            value,
            benchmark,
            contribution: clamp_contribution(contribution),
            interpretation,
        });
    }

    pub(crate) fn finish(self, explain: impl FnOnce(u8, &[ScoreFactor]) -> String) -> DimensionScore {
        let data_points = self.factors.len() as u32;

        if self.factors.is_empty() {
            return DimensionScore {
                dimension: self.dimension,
                score: NEUTRAL_SCORE,
                weight: self.dimension.weight(),
                data_points: 0,
                max_data_points: self.max_data_points,
                confidence: 0.0,
                explanation: format!(
                    "Insufficient data to evaluate {}.",
                    self.dimension.label().to_lowercase()
                ),
                factors: Vec::new(),
            };
        }

        let contributions: Vec<f64> = self.factors.iter().map(|f| f.contribution).collect();
        let score = dimension_score_from(&contributions);
        let confidence = if self.max_data_points > 0 {
            (data_points as f64 / self.max_data_points as f64).min(1.0)
        } else {
            0.0
        };

        tracing::debug!(
            dimension = self.dimension.label(),
            score,
            data_points,
            max_data_points = self.max_data_points,
            "dimension scored"
        );

        DimensionScore {
            dimension: self.dimension,
            score,
            weight: self.dimension.weight(),
            data_points,
            max_data_points: self.max_data_points,
            confidence,
            explanation: explain(score, &self.factors),
            factors: self.factors,
        }
    }
}

/// Names of the `n` factors with the largest absolute contribution,
/// joined for prose ("P/E Ratio and P/B Ratio").
pub(crate) fn strongest_factors(factors: &[ScoreFactor], n: usize) -> String {
    let mut ranked: Vec<&ScoreFactor> = factors.iter().collect();
    ranked.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let names: Vec<&str> = ranked.iter().take(n).map(|f| f.name.as_str()).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// "12.3%" from a fraction
pub(crate) fn pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(name: &str, contribution: f64) -> ScoreFactor {
        ScoreFactor {
            name: name.to_string(),
            value: 0.0,
            benchmark: None,
            contribution,
            interpretation: String::new(),
        }
    }

    #[test]
    fn test_empty_factor_set_is_neutral() {
        let result = FactorSet::new(Dimension::Growth, 5).finish(|_, _| unreachable!());
        assert_eq!(result.score, 5);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.data_points, 0);
        assert_eq!(result.max_data_points, 5);
        assert!(result.factors.is_empty());
        assert!(result.explanation.contains("Insufficient data"));
    }

    #[test]
    fn test_factor_set_clamps_and_scores() {
        let mut set = FactorSet::new(Dimension::Value, 5);
        set.push("A", 1.0, None, 9.0, String::new());
        set.push("B", 1.0, None, 4.0, String::new());
        let result = set.finish(|score, factors| format!("{} from {}", score, factors.len()));
        assert_eq!(result.factors[0].contribution, 5.0);
        assert_eq!(result.score, 10);
        assert_eq!(result.data_points, 2);
        assert!((result.confidence - 0.4).abs() < 1e-12);
        assert_eq!(result.explanation, "10 from 2");
        assert_eq!(result.weight, 0.20);
    }

    #[test]
    fn test_strongest_factors_ordering() {
        let factors = vec![factor("A", 0.5), factor("B", -4.0), factor("C", 2.0)];
        assert_eq!(strongest_factors(&factors, 2), "B and C");
        assert_eq!(strongest_factors(&factors, 3), "B, C and A");
        assert_eq!(strongest_factors(&factors[..1], 2), "A");
    }
}

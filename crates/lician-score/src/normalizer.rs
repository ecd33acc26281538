//! Scoring primitives that turn a raw metric and a benchmark into a bounded
//! contribution in [-5, +5].

use analysis_core::finite;

/// Largest magnitude a single factor may move a dimension
pub const MAX_CONTRIBUTION: f64 = 5.0;

/// Neutral dimension score, used as the baseline and when nothing is computable
pub const NEUTRAL_SCORE: u8 = 5;

/// Contribution awarded to a non-positive multiple (negative P/E and the like)
pub const NON_POSITIVE_MULTIPLE_CONTRIBUTION: f64 = 2.0;

pub fn clamp_contribution(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(-MAX_CONTRIBUTION, MAX_CONTRIBUTION)
}

/// Cheaper than the benchmark scores positive.
///
/// Absent or NaN values are neutral. A value at or below zero gets a fixed
/// +2 so a sign artifact is not punished.
pub fn score_lower_is_better(value: Option<f64>, benchmark: f64, sensitivity: f64) -> f64 {
    let Some(value) = finite(value) else {
        return 0.0;
    };
    if value <= 0.0 {
        return NON_POSITIVE_MULTIPLE_CONTRIBUTION;
    }
    let ratio = benchmark / value;
    if !ratio.is_finite() {
        return 0.0;
    }
    clamp_contribution((ratio - 1.0) * sensitivity * 5.0)
}

/// Above the benchmark scores positive. A zero benchmark is neutral.
pub fn score_higher_is_better(value: Option<f64>, benchmark: f64, sensitivity: f64) -> f64 {
    let Some(value) = finite(value) else {
        return 0.0;
    };
    let ratio = value / benchmark;
    if !ratio.is_finite() {
        return 0.0;
    }
    clamp_contribution((ratio - 1.0) * sensitivity * 5.0)
}

/// Anything inside `[low, high]` earns the full +5. Outside the band the
/// penalty grows with the fractional distance from the nearest bound,
/// divided by `tolerance`.
pub fn score_optimal_range(value: Option<f64>, low: f64, high: f64, tolerance: f64) -> f64 {
    let Some(value) = finite(value) else {
        return 0.0;
    };
    if (low..=high).contains(&value) {
        return MAX_CONTRIBUTION;
    }
    let bound = if value < low { low } else { high };
    // A zero bound has no scale of its own
    let scale = if bound.abs() > f64::EPSILON { bound.abs() } else { 1.0 };
    let distance = (value - bound).abs() / scale;
    let tolerance = if tolerance > 0.0 { tolerance } else { 1.0 };
    clamp_contribution(-(distance / tolerance) * MAX_CONTRIBUTION)
}

/// `clamp(round(5 + mean), 1, 10)`; neutral when there is nothing to average.
pub fn dimension_score_from(contributions: &[f64]) -> u8 {
    if contributions.is_empty() {
        return NEUTRAL_SCORE;
    }
    let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
    let raw = (NEUTRAL_SCORE as f64 + mean).round();
    if raw.is_nan() {
        return NEUTRAL_SCORE;
    }
    raw.clamp(1.0, 10.0) as u8
}

/// Period-over-period growth, or None when either side is missing or the
/// previous value is zero.
pub fn calculate_growth(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let current = finite(current)?;
    let previous = finite(previous)?;
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lower_is_better_cheap_multiple() {
        // Half the benchmark multiple: (20/10 - 1) * 0.8 * 5 = 4
        assert_relative_eq!(score_lower_is_better(Some(10.0), 20.0, 0.8), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lower_is_better_rich_multiple() {
        // (20/40 - 1) * 0.8 * 5 = -2
        assert_relative_eq!(score_lower_is_better(Some(40.0), 20.0, 0.8), -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lower_is_better_clamps() {
        assert_eq!(score_lower_is_better(Some(1.0), 3.0, 0.6), 5.0);
        assert_eq!(score_lower_is_better(Some(1_000.0), 20.0, 5.0), -5.0);
    }

    #[test]
    fn test_lower_is_better_non_positive_is_mildly_favorable() {
        assert_eq!(score_lower_is_better(Some(-15.0), 20.0, 0.8), 2.0);
        assert_eq!(score_lower_is_better(Some(0.0), 20.0, 0.8), 2.0);
    }

    #[test]
    fn test_missing_values_are_neutral() {
        assert_eq!(score_lower_is_better(None, 20.0, 0.8), 0.0);
        assert_eq!(score_lower_is_better(Some(f64::NAN), 20.0, 0.8), 0.0);
        assert_eq!(score_higher_is_better(None, 0.15, 1.0), 0.0);
        assert_eq!(score_optimal_range(Some(f64::NAN), 1.2, 2.5, 0.5), 0.0);
    }

    #[test]
    fn test_higher_is_better() {
        // (0.30 / 0.15 - 1) * 1.0 * 5 = 5
        assert_relative_eq!(score_higher_is_better(Some(0.30), 0.15, 1.0), 5.0, epsilon = 1e-9);
        // (0.12 / 0.15 - 1) * 1.0 * 5 = -1
        assert_relative_eq!(score_higher_is_better(Some(0.12), 0.15, 1.0), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_higher_is_better_zero_benchmark_is_neutral() {
        assert_eq!(score_higher_is_better(Some(0.2), 0.0, 1.0), 0.0);
        assert_eq!(score_higher_is_better(Some(0.0), 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_optimal_range_inside_band() {
        assert_eq!(score_optimal_range(Some(0.0), 0.0, 1.0, 1.0), 5.0);
        assert_eq!(score_optimal_range(Some(1.5), 1.2, 2.5, 0.5), 5.0);
    }

    #[test]
    fn test_optimal_range_penalty_above() {
        // D/E of 1.5: 50% beyond the upper bound with tolerance 1.0 -> -2.5
        assert_relative_eq!(score_optimal_range(Some(1.5), 0.0, 1.0, 1.0), -2.5, epsilon = 1e-9);
        assert_eq!(score_optimal_range(Some(5.0), 0.0, 1.0, 1.0), -5.0);
    }

    #[test]
    fn test_optimal_range_penalty_below() {
        // Current ratio 0.9: (1.2 - 0.9) / 1.2 = 0.25, / 0.5 tolerance = 0.5 -> -2.5
        assert_relative_eq!(score_optimal_range(Some(0.9), 1.2, 2.5, 0.5), -2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_optimal_range_zero_lower_bound() {
        // Negative D/E (negative equity) sits below a zero bound
        let c = score_optimal_range(Some(-0.5), 0.0, 1.0, 1.0);
        assert_relative_eq!(c, -2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_dimension_score_from_contributions() {
        assert_eq!(dimension_score_from(&[]), 5);
        assert_eq!(dimension_score_from(&[4.0, 5.0]), 10);
        assert_eq!(dimension_score_from(&[-5.0, -5.0]), 1); // 0 clamps to 1
        assert_eq!(dimension_score_from(&[1.2, 0.0]), 6); // 5.6 rounds up
        assert_eq!(dimension_score_from(&[-1.2]), 4);
    }

    #[test]
    fn test_calculate_growth() {
        assert_relative_eq!(calculate_growth(Some(120.0), Some(100.0)).unwrap(), 0.2, epsilon = 1e-12);
        // Negative base: growth measured against its magnitude
        assert_relative_eq!(calculate_growth(Some(-50.0), Some(-100.0)).unwrap(), 0.5, epsilon = 1e-12);
        assert!(calculate_growth(Some(100.0), Some(0.0)).is_none());
        assert!(calculate_growth(None, Some(100.0)).is_none());
        assert!(calculate_growth(Some(100.0), None).is_none());
    }
}

//! Combines the five dimension scores into the composite rating.

use analysis_core::{DataQuality, Dimension, DimensionScore, ScoringInput};

/// Dimension scores at or above this are listed as strengths
pub const STRENGTH_THRESHOLD: u8 = 7;
/// Dimension scores at or below this are listed as concerns
pub const CONCERN_THRESHOLD: u8 = 3;

/// `clamp(round(sum(score * weight)), 1, 10)`
pub fn overall_score(dimensions: &[DimensionScore]) -> u8 {
    let weighted: f64 = dimensions
        .iter()
        .map(|d| d.score as f64 * d.dimension.weight())
        .sum();
    let rounded = weighted.round();
    if rounded.is_nan() {
        return 1;
    }
    rounded.clamp(1.0, 10.0) as u8
}

/// Weighted mean of dimension confidences
pub fn overall_confidence(dimensions: &[DimensionScore]) -> f64 {
    dimensions
        .iter()
        .map(|d| d.confidence * d.dimension.weight())
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

fn labels(dimensions: &[DimensionScore], keep: impl Fn(u8) -> bool) -> Vec<&'static str> {
    Dimension::ALL
        .iter()
        .filter_map(|dim| dimensions.iter().find(|d| d.dimension == *dim))
        .filter(|d| keep(d.score))
        .map(|d| d.dimension.label())
        .collect()
}

pub fn build_summary(ticker: &str, overall: u8, dimensions: &[DimensionScore]) -> String {
    let strengths = labels(dimensions, |s| s >= STRENGTH_THRESHOLD);
    let concerns = labels(dimensions, |s| s <= CONCERN_THRESHOLD);

    if strengths.is_empty() && concerns.is_empty() {
        return format!(
            "{} scores {}/10 and shows average characteristics across all dimensions.",
            ticker, overall
        );
    }

    let mut summary = format!("{} scores {}/10.", ticker, overall);
    if !strengths.is_empty() {
        summary.push_str(&format!(" Strengths: {}.", strengths.join(", ")));
    }
    if !concerns.is_empty() {
        summary.push_str(&format!(" Areas of concern: {}.", concerns.join(", ")));
    }
    summary
}

pub fn data_quality(input: &ScoringInput<'_>) -> DataQuality {
    DataQuality {
        has_income_statements: !input.income_statements.is_empty(),
        has_balance_sheets: !input.balance_sheets.is_empty(),
        has_cash_flow_statements: !input.cash_flow_statements.is_empty(),
        has_metrics: input.metrics.is_some(),
        has_price_data: !input.prices.is_empty(),
        has_analyst_ratings: !input.analyst_ratings.is_empty(),
        quarters_of_data: input.income_statements.len().max(input.balance_sheets.len()),
    }
}

use analysis_core::{AnalystRating, Dimension, DimensionScore, DimensionScorer, ScoreFactor, ScoringInput, SectorMedians};
use technical_analysis::{effective_closes, pct_above, trailing_sma};

use super::{strongest_factors, FactorSet};
use crate::normalizer::score_higher_is_better;

pub const MAX_DATA_POINTS: u32 = 5;

/// Analyst actions considered, most recent first
const ANALYST_WINDOW: usize = 10;
const CROSS_CONTRIBUTION: f64 = 2.0;

/// (window, sensitivity) for each price-vs-average factor
const SMA_FACTORS: [(usize, f64); 3] = [(20, 3.0), (50, 2.5), (200, 2.0)];

pub struct MomentumScorer;

impl DimensionScorer for MomentumScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Momentum
    }

    fn max_data_points(&self) -> u32 {
        MAX_DATA_POINTS
    }

    fn score(&self, input: &ScoringInput<'_>, _medians: &SectorMedians) -> DimensionScore {
        score_momentum(input)
    }
}

/// Net analyst sentiment in [-1, 1] over the most recent actions.
pub fn analyst_sentiment(ratings: &[AnalystRating]) -> Option<f64> {
    let recent = &ratings[..ratings.len().min(ANALYST_WINDOW)];
    if recent.is_empty() {
        return None;
    }
    let net: i32 = recent.iter().map(|r| r.action.sentiment()).sum();
    Some(net as f64 / recent.len() as f64)
}

pub fn score_momentum(input: &ScoringInput<'_>) -> DimensionScore {
    let mut factors = FactorSet::new(Dimension::Momentum, MAX_DATA_POINTS);
    let closes = effective_closes(input.prices);

    if let Some(&price) = closes.first() {
        for (window, sensitivity) in SMA_FACTORS {
            if let Some(sma) = trailing_sma(&closes, window) {
                let c = score_higher_is_better(Some(price), sma, sensitivity);
                let distance = pct_above(price, sma).unwrap_or(0.0);
                let side = if distance >= 0.0 { "above" } else { "below" };
                factors.push(
                    &format!("Price vs SMA{}", window),
                    price,
                    Some(sma),
                    c,
                    format!("Price is {:.1}% {} its {}-day average", distance.abs(), side, window),
                );
            }
        }
    }

    if let (Some(sma50), Some(sma200)) = (trailing_sma(&closes, 50), trailing_sma(&closes, 200)) {
        let (c, interpretation) = if sma50 > sma200 {
            (CROSS_CONTRIBUTION, "Golden cross: 50-day average above 200-day")
        } else {
            (-CROSS_CONTRIBUTION, "Death cross: 50-day average at or below 200-day")
        };
        factors.push("SMA50/SMA200 Cross", sma50, Some(sma200), c, interpretation.to_string());
    }

    if let Some(net) = analyst_sentiment(input.analyst_ratings) {
        let count = input.analyst_ratings.len().min(ANALYST_WINDOW);
        let tone = if net > 0.0 {
            "net positive"
        } else if net < 0.0 {
            "net negative"
        } else {
            "mixed"
        };
        factors.push(
            "Analyst Sentiment",
            net,
            None,
            net * 5.0,
            format!("Recent analyst actions are {} ({} actions)", tone, count),
        );
    }

    factors.finish(explain)
}

fn explain(score: u8, factors: &[ScoreFactor]) -> String {
    let leaders = strongest_factors(factors, 2);
    if score >= 7 {
        format!("Strong positive momentum, driven by {}.", leaders)
    } else if score <= 3 {
        format!("Negative momentum, driven by {}.", leaders)
    } else {
        format!("Momentum is neutral ({}).", leaders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{AnalystAction, PriceBar};

    /// Most-recent-first bars with a constant daily change
    fn trending_bars(days: usize, daily_change: f64) -> Vec<PriceBar> {
        let mut bars: Vec<PriceBar> = (0..days)
            .map(|i| PriceBar {
                date: None,
                open: None,
                high: None,
                low: None,
                close: 100.0 * (1.0 + daily_change).powi(i as i32),
                adjusted_close: None,
                volume: None,
            })
            .collect();
        bars.reverse();
        bars
    }

    fn rating(action: AnalystAction) -> AnalystRating {
        AnalystRating { action, firm: None, rating: None, price_target: None, date: None }
    }

    #[test]
    fn test_uptrend_scores_above_neutral() {
        let bars = trending_bars(260, 0.001);
        let input = ScoringInput { prices: &bars, ..Default::default() };
        let result = score_momentum(&input);

        assert_eq!(result.data_points, 4);
        for factor in result.factors.iter().filter(|f| f.name.starts_with("Price vs")) {
            assert!(factor.contribution > 0.0, "{} not positive", factor.name);
        }
        let cross = result.factors.iter().find(|f| f.name == "SMA50/SMA200 Cross").unwrap();
        assert_eq!(cross.contribution, 2.0);
        assert!(result.score > 5);
    }

    #[test]
    fn test_downtrend_death_cross() {
        let bars = trending_bars(260, -0.002);
        let input = ScoringInput { prices: &bars, ..Default::default() };
        let result = score_momentum(&input);
        let cross = result.factors.iter().find(|f| f.name == "SMA50/SMA200 Cross").unwrap();
        assert_eq!(cross.contribution, -2.0);
        assert!(result.score < 5);
    }

    #[test]
    fn test_short_history_uses_available_averages() {
        let bars = trending_bars(60, 0.001);
        let input = ScoringInput { prices: &bars, ..Default::default() };
        let result = score_momentum(&input);
        let names: Vec<&str> = result.factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Price vs SMA20", "Price vs SMA50"]);
    }

    #[test]
    fn test_analyst_sentiment_window() {
        let mut ratings = vec![rating(AnalystAction::Upgraded); 6];
        ratings.extend(vec![rating(AnalystAction::Downgraded); 2]);
        ratings.extend(vec![rating(AnalystAction::Reiterated); 2]);
        // Beyond the ten most recent; ignored
        ratings.extend(vec![rating(AnalystAction::Downgraded); 5]);

        let net = analyst_sentiment(&ratings).unwrap();
        assert!((net - 0.4).abs() < 1e-12);

        let input = ScoringInput { analyst_ratings: &ratings, ..Default::default() };
        let result = score_momentum(&input);
        assert!((result.factors[0].contribution - 2.0).abs() < 1e-12);
        assert_eq!(result.score, 7);
    }

    #[test]
    fn test_no_prices_or_ratings_is_neutral() {
        let result = score_momentum(&ScoringInput::default());
        assert_eq!(result.score, 5);
        assert_eq!(result.confidence, 0.0);
        assert!(analyst_sentiment(&[]).is_none());
    }
}

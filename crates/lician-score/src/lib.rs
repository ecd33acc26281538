//! Lician Score: a 1-10 composite stock rating built from five weighted
//! dimensions (Value, Growth, Quality, Momentum, Safety).
//!
//! Scoring is pure and synchronous. Missing data lowers a dimension's
//! confidence instead of failing the request.

pub mod aggregator;
pub mod benchmarks;
pub mod derived;
pub mod dimensions;
pub mod normalizer;
pub mod periods;


use analysis_core::{AnalysisError, DimensionScorer, LicianScore, ScoreRequest, ScoringInput, SectorMedians};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub use benchmarks::{lookup_sector, sector_medians, DEFAULT_MEDIANS, SECTOR_MEDIANS};
pub use dimensions::{
    score_growth, score_momentum, score_quality, score_safety, score_value, GrowthScorer, MomentumScorer,
    QualityScorer, SafetyScorer, ValueScorer,
};

/// The five scorers in aggregation order
pub fn scorers() -> [&'static dyn DimensionScorer; 5] {
    [&ValueScorer, &GrowthScorer, &QualityScorer, &MomentumScorer, &SafetyScorer]
}

/// Score a ticker now. Falls back to [`DEFAULT_MEDIANS`] when no sector
/// benchmarks are given.
pub fn calculate_lician_score(
    ticker: &str,
    input: &ScoringInput<'_>,
    medians: Option<&SectorMedians>,
) -> LicianScore {
    calculate_lician_score_at(ticker, input, medians, Utc::now())
}

/// Same as [`calculate_lician_score`] with a caller-supplied timestamp, so
/// identical inputs produce identical results.
pub fn calculate_lician_score_at(
    ticker: &str,
    input: &ScoringInput<'_>,
    medians: Option<&SectorMedians>,
    timestamp: DateTime<Utc>,
) -> LicianScore {
    let medians = medians.copied().unwrap_or(DEFAULT_MEDIANS);
    warn_if_out_of_order(ticker, input);

    let dimensions = scorers().map(|scorer| scorer.score(input, &medians));
    let overall_score = aggregator::overall_score(&dimensions);
    let overall_confidence = aggregator::overall_confidence(&dimensions);
    let summary = aggregator::build_summary(ticker, overall_score, &dimensions);

    debug!(
        ticker,
        overall_score,
        overall_confidence,
        "Lician score computed"
    );

    let [value, growth, quality, momentum, safety] = dimensions;
    LicianScore {
        ticker: ticker.to_string(),
        overall_score,
        overall_confidence,
        timestamp,
        value,
        growth,
        quality,
        momentum,
        safety,
        summary,
        data_quality: aggregator::data_quality(input),
    }
}

fn warn_if_out_of_order(ticker: &str, input: &ScoringInput<'_>) {
    let checks = [
        ("income_statements", periods::is_reverse_chronological(input.income_statements)),
        ("balance_sheets", periods::is_reverse_chronological(input.balance_sheets)),
        ("cash_flow_statements", periods::is_reverse_chronological(input.cash_flow_statements)),
        ("prices", periods::is_reverse_chronological(input.prices)),
    ];
    for (series, ordered) in checks {
        if !ordered {
            warn!(ticker, series, "Rows are not most-recent-first; period comparisons may be wrong");
        }
    }
}

/// Scores tickers against a fixed set of sector benchmarks.
#[derive(Debug, Clone)]
pub struct LicianScoreEngine {
    medians: SectorMedians,
}

impl Default for LicianScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LicianScoreEngine {
    pub fn new() -> Self {
        Self { medians: DEFAULT_MEDIANS }
    }

    /// Engine using the benchmarks of the named sector (default when unmatched)
    pub fn for_sector(sector: &str) -> Self {
        Self { medians: sector_medians(sector) }
    }

    /// Engine using caller-supplied benchmarks. Every benchmark must be
    /// finite and positive.
    pub fn with_medians(medians: SectorMedians) -> Result<Self, AnalysisError> {
        medians.validate()?;
        Ok(Self { medians })
    }

    pub fn medians(&self) -> &SectorMedians {
        &self.medians
    }

    pub fn score(&self, ticker: &str, input: &ScoringInput<'_>) -> LicianScore {
        calculate_lician_score(ticker, input, Some(&self.medians))
    }

    pub fn score_at(&self, ticker: &str, input: &ScoringInput<'_>, timestamp: DateTime<Utc>) -> LicianScore {
        calculate_lician_score_at(ticker, input, Some(&self.medians), timestamp)
    }

    /// Score an owned request. A sector named on the request takes
    /// precedence over the engine's benchmarks.
    pub fn score_request(&self, request: &ScoreRequest) -> Result<LicianScore, AnalysisError> {
        self.score_request_at(request, Utc::now())
    }

    pub fn score_request_at(
        &self,
        request: &ScoreRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<LicianScore, AnalysisError> {
        request.validate()?;
        let medians = match request.sector.as_deref() {
            Some(sector) if !sector.trim().is_empty() => sector_medians(sector),
            _ => self.medians,
        };
        Ok(calculate_lician_score_at(
            request.ticker.trim(),
            &request.as_input(),
            Some(&medians),
            timestamp,
        ))
    }
}

use crate::{Dimension, DimensionScore, ScoringInput, SectorMedians};

/// A scorer for one rating dimension.
///
/// Implementations are pure: identical inputs always produce identical
/// output, and absent data degrades to a neutral score instead of an error.
pub trait DimensionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Number of factors the scorer can use when every input is present
    fn max_data_points(&self) -> u32;

    fn score(&self, input: &ScoringInput<'_>, medians: &SectorMedians) -> DimensionScore;
}

use super::dimension::Dimension;
use super::types::{HighCounts, RankedDimension, ScoreVector};

/// Order the four dimensions highest first. The comparator is a strict
/// total order, so the result is always a permutation with no tied ranks:
///
/// 1. higher raw score
/// 2. higher high-answer count (always equal in forced-choice mode)
/// 3. canonical order D < I < S < C
pub fn rank(scores: &ScoreVector, high_counts: &HighCounts) -> Vec<RankedDimension> {
    let mut ranked: Vec<RankedDimension> = Dimension::ALL
        .iter()
        .map(|&dimension| RankedDimension {
            dimension,
            score: scores.get(dimension),
            high_count: high_counts.get(dimension),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.high_count.cmp(&a.high_count))
            .then_with(|| a.dimension.cmp(&b.dimension))
    });

    ranked
}

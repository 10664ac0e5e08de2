//! Ranking of one similarity row.
//!
//! Kept separate from [`crate::Recommender`] so the ordering rules
//! can be checked without building a catalog.

use catalog::RowIndex;
use std::cmp::Ordering;

/// Rank every column of `row` except `exclude`, best first.
///
/// The sort is stable, so equal scores keep ascending column order.
/// Non-finite scores sort after every finite score.
pub fn rank_row(row: &[f32], exclude: RowIndex, limit: usize) -> Vec<(RowIndex, f32)> {
    let mut ranked: Vec<(RowIndex, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(idx, _)| *idx != exclude)
        .collect();

    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(limit);
    ranked
}

fn descending(a: f32, b: f32) -> Ordering {
    let key = |s: f32| if s.is_finite() { s } else { f32::NEG_INFINITY };
    key(b).total_cmp(&key(a))
}

/// Convert a raw similarity into a whole match percentage in `[0, 100]`.
///
/// Rounds half away from zero.
pub fn match_score(similarity: f32) -> u8 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

//! Output types for the recommender.

use catalog::{MovieId, RowIndex};
use serde::Serialize;

/// Default number of recommendations per query
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// One ranked neighbour of the queried movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub row_index: RowIndex,
    /// External id, used for poster lookups
    pub movie_id: MovieId,
    /// Raw similarity value from the matrix
    pub similarity: f32,
    /// Similarity as a 0-100 match percentage
    pub score: u8,
}

//! Content-based recommendations from the precomputed similarity matrix.
//!
//! ## Algorithm
//! 1. Resolve the title to its row index
//! 2. Read that row of the similarity matrix
//! 3. Drop the queried row itself
//! 4. Stable-sort the remaining rows by score, highest first
//! 5. Return the top `k` with titles and match percentages

use crate::ranking::{match_score, rank_row};
use crate::types::{DEFAULT_RECOMMENDATIONS, Recommendation};
use catalog::{Catalog, CatalogError, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Finds the movies most similar to a given title
#[derive(Clone)]
pub struct Recommender {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    /// Number of results when the caller does not ask for a specific count
    default_limit: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            default_limit: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Configure the default result count (default: 5)
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Top `default_limit` recommendations for `title`
    pub fn recommend_default(&self, title: &str) -> Result<Vec<Recommendation>> {
        self.recommend(title, self.default_limit)
    }

    /// Top `k` movies most similar to `title`, never including `title` itself.
    ///
    /// Returns `min(k, N - 1)` entries. Fails with
    /// [`CatalogError::TitleNotFound`] when the title is not in the catalog.
    #[instrument(skip(self), level = "debug")]
    pub fn recommend(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let row = self.catalog.resolve(title)?;
        let scores = self.catalog.similarity_row(row).ok_or_else(|| {
            CatalogError::ValidationError(format!("no similarity row for index {}", row))
        })?;

        let ranked = rank_row(scores, row, k);

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .filter_map(|(row_index, similarity)| {
                let movie = self.catalog.movie(row_index)?;
                Some(Recommendation {
                    title: movie.title.clone(),
                    row_index,
                    movie_id: movie.id,
                    similarity,
                    score: match_score(similarity),
                })
            })
            .collect();

        debug!(
            "Ranked {} recommendations for '{}' (row {})",
            recommendations.len(),
            title,
            row
        );
        Ok(recommendations)
    }
}

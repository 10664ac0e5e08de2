//! # Recommendation Orchestrator
//!
//! Coordinates one "recommend" interaction:
//! 1. Rank the most similar movies with the [`Recommender`]
//! 2. Look up a poster for each result concurrently
//! 3. Return the results in rank order, whatever order the posters arrive in

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use catalog::{Catalog, MovieId, RowIndex};
use posters::PosterLookup;
use recommender::{Recommendation, Recommender};

use crate::config::AppConfig;

/// Final recommendation handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub title: String,
    pub movie_id: MovieId,
    pub row_index: RowIndex,
    /// Match percentage, 0-100
    pub score: u8,
    pub similarity: f32,
    pub poster_url: String,
}

/// Main orchestrator tying the recommender to the poster service
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    recommender: Recommender,
    posters: Arc<dyn PosterLookup>,
}

impl RecommendationOrchestrator {
    pub fn new(catalog: Arc<Catalog>, posters: Arc<dyn PosterLookup>) -> Self {
        Self {
            recommender: Recommender::new(catalog),
            posters,
        }
    }

    /// Build an orchestrator with the poster lookup and result count from `config`
    pub fn from_config(catalog: Arc<Catalog>, config: &AppConfig) -> Result<Self> {
        let posters = config
            .poster_lookup()
            .context("Failed to set up poster lookup")?;
        Ok(Self {
            recommender: Recommender::new(catalog)
                .with_default_limit(config.recommendation_count),
            posters,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.recommender.catalog()
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Titles offered by the selection surface, in catalog order
    pub fn titles(&self) -> Vec<&str> {
        self.catalog().titles()
    }

    /// Recommendations for `title` with the configured default count
    pub async fn get_default_recommendations(&self, title: &str) -> Result<Vec<MovieRecommendation>> {
        self.get_recommendations(title, self.recommender.default_limit())
            .await
    }

    /// Main entry point: top `limit` movies similar to `title`, with posters.
    ///
    /// Unknown titles fail with [`catalog::CatalogError::TitleNotFound`]
    /// (reachable through `downcast_ref`). Poster failures never fail the call.
    pub async fn get_recommendations(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>> {
        let start_time = Instant::now();

        let ranked = self
            .recommender
            .recommend(title, limit)
            .with_context(|| format!("Failed to recommend movies for '{}'", title))?;
        info!("Ranked {} recommendations for '{}'", ranked.len(), title);

        let recommendations = self.attach_posters(ranked).await;

        info!(
            "Total time to get recommendations for '{}': {:.2?}",
            title,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Ranked results with every poster set to the placeholder
    pub fn get_recommendations_without_posters(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>> {
        let ranked = self
            .recommender
            .recommend(title, limit)
            .with_context(|| format!("Failed to recommend movies for '{}'", title))?;

        let placeholder = self.posters.placeholder_url();
        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(idx, rec)| to_movie_recommendation(idx + 1, rec, placeholder.to_string()))
            .collect())
    }

    /// Fetch posters concurrently, then collect them in rank order
    async fn attach_posters(&self, ranked: Vec<Recommendation>) -> Vec<MovieRecommendation> {
        let handles: Vec<_> = ranked
            .iter()
            .map(|rec| {
                let posters = self.posters.clone();
                let movie_id = rec.movie_id;
                tokio::spawn(async move { posters.poster_url(movie_id).await })
            })
            .collect();

        let mut recommendations = Vec::with_capacity(ranked.len());
        for (idx, (rec, handle)) in ranked.into_iter().zip(handles).enumerate() {
            let poster_url = match handle.await {
                Ok(url) => url,
                Err(e) => {
                    warn!("Poster task for movie {} failed: {}", rec.movie_id, e);
                    self.posters.placeholder_url().to_string()
                }
            };
            recommendations.push(to_movie_recommendation(idx + 1, rec, poster_url));
        }
        recommendations
    }
}

fn to_movie_recommendation(rank: usize, rec: Recommendation, poster_url: String) -> MovieRecommendation {
    MovieRecommendation {
        rank,
        title: rec.title,
        movie_id: rec.movie_id,
        row_index: rec.row_index,
        score: rec.score,
        similarity: rec.similarity,
        poster_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog::{CatalogError, Movie, SimilarityMatrix};
    use std::time::Duration;

    const PLACEHOLDER: &str = "https://placeholder.test/none.png";

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_catalog() -> Arc<Catalog> {
        let titles = ["Avatar", "Aliens", "Titanic", "The Abyss", "Terminator 2", "Up"];
        let movies = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Movie {
                id: (i as u32 + 1) * 10,
                title: title.to_string(),
                row_index: i,
            })
            .collect();

        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.3, 0.6, 0.7, 0.1],
            vec![0.8, 1.0, 0.2, 0.5, 0.6, 0.0],
            vec![0.3, 0.2, 1.0, 0.3, 0.1, 0.2],
            vec![0.6, 0.5, 0.3, 1.0, 0.4, 0.1],
            vec![0.7, 0.6, 0.1, 0.4, 1.0, 0.0],
            vec![0.1, 0.0, 0.2, 0.1, 0.0, 1.0],
        ])
        .unwrap();

        Arc::new(Catalog::from_parts(movies, matrix).unwrap())
    }

    /// Answers slower for lower movie ids, so results finish out of rank order
    struct SlowFirstPosters;

    #[async_trait]
    impl PosterLookup for SlowFirstPosters {
        async fn poster_url(&self, movie_id: MovieId) -> String {
            tokio::time::sleep(Duration::from_millis(200u64.saturating_sub(movie_id as u64 * 3))).await;
            format!("https://posters.test/{}.jpg", movie_id)
        }

        fn placeholder_url(&self) -> &str {
            PLACEHOLDER
        }
    }

    /// Lookup whose task panics, to exercise the join-error fallback
    struct PanickingPosters;

    #[async_trait]
    impl PosterLookup for PanickingPosters {
        async fn poster_url(&self, movie_id: MovieId) -> String {
            panic!("poster backend exploded for {}", movie_id);
        }

        fn placeholder_url(&self) -> &str {
            PLACEHOLDER
        }
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_results_keep_rank_order_with_posters() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_catalog(), Arc::new(SlowFirstPosters));

        let recs = orchestrator.get_recommendations("Avatar", 5).await.unwrap();

        let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Aliens", "Terminator 2", "The Abyss", "Titanic", "Up"]);

        let ranks: Vec<_> = recs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

        for rec in &recs {
            assert_eq!(rec.poster_url, format!("https://posters.test/{}.jpg", rec.movie_id));
        }
        assert_eq!(recs[0].score, 80);
    }

    #[tokio::test]
    async fn test_panicking_lookup_falls_back_to_placeholder() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_catalog(), Arc::new(PanickingPosters));

        let recs = orchestrator.get_recommendations("Titanic", 2).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.poster_url == PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_unknown_title_surfaces_not_found() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_catalog(), Arc::new(SlowFirstPosters));

        let err = orchestrator
            .get_recommendations("Avatar 2", 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::TitleNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_from_config_without_key_uses_placeholder() {
        let config = AppConfig {
            poster_placeholder_url: PLACEHOLDER.to_string(),
            recommendation_count: 3,
            ..AppConfig::default()
        };
        let orchestrator =
            RecommendationOrchestrator::from_config(build_test_catalog(), &config).unwrap();

        let recs = orchestrator.get_default_recommendations("Up").await.unwrap();
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().all(|r| r.poster_url == PLACEHOLDER));
        assert!(recs.iter().all(|r| r.title != "Up"));
    }

    #[test]
    fn test_without_posters() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_catalog(), Arc::new(SlowFirstPosters));

        let recs = orchestrator
            .get_recommendations_without_posters("Aliens", 10)
            .unwrap();
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].title, "Avatar");
        assert!(recs.iter().all(|r| r.poster_url == PLACEHOLDER));
    }

    #[test]
    fn test_titles_in_catalog_order() {
        let orchestrator =
            RecommendationOrchestrator::new(build_test_catalog(), Arc::new(SlowFirstPosters));
        assert_eq!(orchestrator.titles()[0], "Avatar");
        assert_eq!(orchestrator.titles().len(), 6);
    }
}

//! Core domain types for the movie catalog.
//!
//! The catalog is two artifacts joined by position: a table of movies and
//! a square similarity matrix whose rows and columns follow the same order.
//! Both are loaded once and never mutated afterwards.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of a movie (the metadata service's id)
pub type MovieId = u32;

/// Position of a movie in the catalog and in the similarity matrix
pub type RowIndex = usize;

// =============================================================================
// Movie
// =============================================================================

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// 0-based position, stable for the lifetime of the loaded data
    pub row_index: RowIndex,
}

// =============================================================================
// SimilarityMatrix
// =============================================================================

/// Square matrix of pairwise similarity scores, stored row-major.
///
/// Scores are conventionally in `[0, 1]` with higher meaning more similar.
/// Symmetry is not assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from a flat row-major buffer of `dim * dim` scores
    pub fn from_row_major(dim: usize, scores: Vec<f32>) -> Result<Self> {
        if dim.checked_mul(dim) != Some(scores.len()) {
            return Err(CatalogError::ValidationError(format!(
                "expected {} scores for a {}x{} matrix, found {}",
                dim.saturating_mul(dim),
                dim,
                dim,
                scores.len()
            )));
        }
        Ok(Self { dim, scores })
    }

    /// Build a matrix from nested rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        let mut scores = Vec::with_capacity(dim * dim);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(CatalogError::ValidationError(format!(
                    "row {} has {} scores but the matrix has {} rows",
                    idx,
                    row.len(),
                    dim
                )));
            }
            scores.extend(row);
        }
        Ok(Self { dim, scores })
    }

    /// Number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Borrow one row of scores
    pub fn row(&self, row: RowIndex) -> Option<&[f32]> {
        if row >= self.dim {
            return None;
        }
        let start = row * self.dim;
        Some(&self.scores[start..start + self.dim])
    }

    /// Score between two rows
    pub fn get(&self, row: RowIndex, col: RowIndex) -> Option<f32> {
        self.row(row)?.get(col).copied()
    }

    pub(crate) fn scores(&self) -> &[f32] {
        &self.scores
    }
}

// =============================================================================
// Catalog - The Read-Only Store
// =============================================================================

/// Movies, their title index, and the similarity matrix.
///
/// Built through [`Catalog::load_from_files`] or [`Catalog::from_parts`],
/// both of which validate that the matrix matches the movie table.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    /// Title -> first row carrying that title
    pub(crate) title_index: HashMap<String, RowIndex>,
    pub(crate) similarity: SimilarityMatrix,
}

impl Catalog {
    /// Resolve a title to its row index.
    ///
    /// Matching is exact and case-sensitive.
    pub fn resolve(&self, title: &str) -> Result<RowIndex> {
        self.title_index
            .get(title)
            .copied()
            .ok_or_else(|| CatalogError::TitleNotFound(title.to_string()))
    }

    /// All titles in catalog order
    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }

    /// External id used to query the poster service
    pub fn external_id(&self, row: RowIndex) -> Option<MovieId> {
        self.movies.get(row).map(|m| m.id)
    }

    pub fn movie(&self, row: RowIndex) -> Option<&Movie> {
        self.movies.get(row)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Similarity scores from `row` to every movie in the catalog
    pub fn similarity_row(&self, row: RowIndex) -> Option<&[f32]> {
        self.similarity.row(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches,
    /// each group in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Movie> {
        let query = query.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for movie in &self.movies {
            let title = movie.title.to_lowercase();
            if title == query {
                exact.push(movie);
            } else if title.contains(&query) {
                partial.push(movie);
            }
        }

        exact.extend(partial);
        exact
    }
}

//! Catalog building and validation.
//!
//! Loading parses both artifacts in parallel, joins them by row position,
//! builds the title index and checks that the matrix matches the table.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

impl Catalog {
    /// Load the catalog table and the similarity matrix from disk.
    ///
    /// Any failure here is a startup-time error: the returned error names
    /// the artifact that was missing or malformed.
    pub fn load_from_files(catalog_path: &Path, similarity_path: &Path) -> Result<Self> {
        info!(
            catalog = %catalog_path.display(),
            similarity = %similarity_path.display(),
            "Loading catalog artifacts"
        );
        let start = Instant::now();

        // The matrix is N*N and dominates load time, so parse both at once
        let (movies, similarity) = rayon::join(
            || parser::parse_catalog(catalog_path),
            || parser::parse_similarity(similarity_path),
        );
        let movies = movies?;
        let similarity = similarity?;

        info!(
            "Parsed {} movies and a {}x{} similarity matrix",
            movies.len(),
            similarity.dim(),
            similarity.dim()
        );

        let catalog = Self::from_parts(movies, similarity)?;

        info!("Catalog loaded and validated in {:.2?}", start.elapsed());
        Ok(catalog)
    }

    /// Assemble a catalog from already parsed parts.
    ///
    /// Movies are re-numbered by their position so `row_index` is always a
    /// bijection onto `[0, N)`.
    pub fn from_parts(movies: Vec<Movie>, similarity: SimilarityMatrix) -> Result<Self> {
        let movies: Vec<Movie> = movies
            .into_iter()
            .enumerate()
            .map(|(row_index, movie)| Movie { row_index, ..movie })
            .collect();

        let catalog = Self {
            title_index: build_title_index(&movies),
            movies,
            similarity,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - the matrix is N x N for N movies
    /// - every title is non-empty
    /// - every score is finite
    pub fn validate(&self) -> Result<()> {
        let dim = self.similarity.dim();
        if dim != self.movies.len() {
            return Err(CatalogError::DimensionMismatch {
                rows: dim,
                cols: dim,
                movies: self.movies.len(),
            });
        }

        if let Some(movie) = self.movies.iter().find(|m| m.title.trim().is_empty()) {
            return Err(CatalogError::InvalidValue {
                field: format!("title of movie {}", movie.id),
                value: movie.title.clone(),
            });
        }

        if let Some(pos) = self.similarity.scores().iter().position(|s| !s.is_finite()) {
            return Err(CatalogError::InvalidValue {
                field: format!("similarity[{}][{}]", pos / dim, pos % dim),
                value: self.similarity.scores()[pos].to_string(),
            });
        }

        Ok(())
    }
}

/// Map each title to the first row that carries it
fn build_title_index(movies: &[Movie]) -> HashMap<String, RowIndex> {
    let mut index = HashMap::with_capacity(movies.len());
    let mut duplicates = 0usize;

    for movie in movies {
        if index.contains_key(&movie.title) {
            duplicates += 1;
            continue;
        }
        index.insert(movie.title.clone(), movie.row_index);
    }

    if duplicates > 0 {
        warn!(
            "{} duplicate titles in catalog; lookups resolve to the first occurrence",
            duplicates
        );
    }

    index
}

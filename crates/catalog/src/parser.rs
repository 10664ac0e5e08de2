//! Parsers for the catalog and similarity artifacts.
//!
//! Catalog table formats (chosen by file extension):
//! - `.json`: array of records `[{"movie_id": 19995, "title": "Avatar"}]`,
//!   or the column-oriented table `{"movie_id": {"0": 19995}, "title": {"0": "Avatar"}}`
//! - `.dat`: one `movie_id::title` per line
//!
//! Similarity matrix formats:
//! - `.json`: array of N arrays of N numbers
//! - `.bin`: little-endian `f32`, row-major, N*N values

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const CATALOG_ARTIFACT: &str = "catalog";
const SIMILARITY_ARTIFACT: &str = "similarity";

/// Read a whole artifact, naming it in the error if it is missing
fn read_artifact(path: &Path, artifact: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::FileNotFound {
            artifact: artifact.to_string(),
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Catalog table
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogTable {
    Records(Vec<CatalogRecord>),
    Columns(CatalogColumns),
}

#[derive(Deserialize)]
struct CatalogRecord {
    movie_id: MovieId,
    title: String,
}

/// Column-oriented table keyed by row label
#[derive(Deserialize)]
struct CatalogColumns {
    movie_id: BTreeMap<String, MovieId>,
    title: BTreeMap<String, String>,
}

/// Parse the catalog table, choosing the decoder from the extension
pub fn parse_catalog(path: &Path) -> Result<Vec<Movie>> {
    match extension(path).as_deref() {
        Some("json") => parse_catalog_json(path),
        Some("dat") => parse_catalog_dat(path),
        _ => Err(CatalogError::UnsupportedFormat {
            artifact: CATALOG_ARTIFACT.to_string(),
            path: path.display().to_string(),
        }),
    }
}

/// Parse a JSON catalog (record list or column table)
pub fn parse_catalog_json(path: &Path) -> Result<Vec<Movie>> {
    let bytes = read_artifact(path, CATALOG_ARTIFACT)?;
    let file = file_label(path);
    let table: CatalogTable = serde_json::from_slice(&bytes).map_err(|source| {
        CatalogError::JsonError {
            file: file.clone(),
            source,
        }
    })?;

    let rows = match table {
        CatalogTable::Records(records) => records
            .into_iter()
            .map(|r| (r.movie_id, r.title))
            .collect(),
        CatalogTable::Columns(columns) => columns_to_rows(&file, columns)?,
    };

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(row_index, (id, title))| Movie {
            id,
            title,
            row_index,
        })
        .collect())
}

/// Flatten a column table into rows ordered by numeric row label
fn columns_to_rows(file: &str, columns: CatalogColumns) -> Result<Vec<(MovieId, String)>> {
    let mut ids: Vec<(usize, MovieId)> = columns
        .movie_id
        .into_iter()
        .map(|(label, id)| parse_row_label(file, &label).map(|pos| (pos, id)))
        .collect::<Result<_>>()?;
    ids.sort_unstable_by_key(|(pos, _)| *pos);

    let mut titles: BTreeMap<usize, String> = BTreeMap::new();
    for (label, title) in columns.title {
        titles.insert(parse_row_label(file, &label)?, title);
    }

    if ids.len() != titles.len() {
        return Err(CatalogError::ValidationError(format!(
            "{}: movie_id column has {} rows but title column has {}",
            file,
            ids.len(),
            titles.len()
        )));
    }

    ids.into_iter()
        .map(|(pos, id)| {
            titles
                .remove(&pos)
                .map(|title| (id, title))
                .ok_or_else(|| CatalogError::ValidationError(format!(
                    "{}: row {} has a movie_id but no title",
                    file, pos
                )))
        })
        .collect()
}

fn parse_row_label(file: &str, label: &str) -> Result<usize> {
    label.parse().map_err(|_| CatalogError::InvalidValue {
        field: format!("{} row label", file),
        value: label.to_string(),
    })
}

/// Parse a `movie_id::title` text catalog
///
/// Blank lines are skipped and do not consume a row index.
pub fn parse_catalog_dat(path: &Path) -> Result<Vec<Movie>> {
    let bytes = read_artifact(path, CATALOG_ARTIFACT)?;
    let file = file_label(path);
    let content = String::from_utf8(bytes).map_err(|e| CatalogError::ParseError {
        file: file.clone(),
        line: 0,
        reason: format!("not valid UTF-8: {}", e),
    })?;

    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let (movie_id, title) = line_trimmed
            .split_once("::")
            .ok_or_else(|| CatalogError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing '::' separator".to_string(),
            })?;

        if title.is_empty() {
            return Err(CatalogError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        movies.push(Movie {
            id: movie_id.parse().map_err(|e| CatalogError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid movieId: {}", e),
            })?,
            title: title.to_string(),
            row_index: movies.len(),
        });
    }

    Ok(movies)
}

// =============================================================================
// Similarity matrix
// =============================================================================

/// Parse the similarity matrix, choosing the decoder from the extension
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    match extension(path).as_deref() {
        Some("json") => parse_similarity_json(path),
        Some("bin") => parse_similarity_bin(path),
        _ => Err(CatalogError::UnsupportedFormat {
            artifact: SIMILARITY_ARTIFACT.to_string(),
            path: path.display().to_string(),
        }),
    }
}

/// Parse a JSON array-of-rows matrix
pub fn parse_similarity_json(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_artifact(path, SIMILARITY_ARTIFACT)?;
    let rows: Vec<Vec<f32>> =
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::JsonError {
            file: file_label(path),
            source,
        })?;
    SimilarityMatrix::from_rows(rows)
}

/// Parse a raw little-endian `f32` row-major matrix
pub fn parse_similarity_bin(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_artifact(path, SIMILARITY_ARTIFACT)?;
    decode_row_major_f32(&file_label(path), &bytes)
}

fn decode_row_major_f32(file: &str, bytes: &[u8]) -> Result<SimilarityMatrix> {
    if bytes.len() % 4 != 0 {
        return Err(CatalogError::ParseError {
            file: file.to_string(),
            line: 0,
            reason: format!("{} bytes is not a whole number of f32 values", bytes.len()),
        });
    }

    let scores: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    let dim = (scores.len() as f64).sqrt().round() as usize;
    if dim * dim != scores.len() {
        return Err(CatalogError::ParseError {
            file: file.to_string(),
            line: 0,
            reason: format!("{} values do not form a square matrix", scores.len()),
        });
    }

    SimilarityMatrix::from_row_major(dim, scores)
}

//! # Catalog Crate
//!
//! This crate loads the movie catalog and its precomputed similarity matrix
//! and answers read-only lookups against them.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, SimilarityMatrix, Catalog)
//! - **parser**: Decode the catalog table and similarity matrix artifacts
//! - **index**: Build and validate the Catalog
//! - **error**: Error types for catalog loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(
//!     Path::new("data/movie_dict.json"),
//!     Path::new("data/similarity.bin"),
//! )?;
//!
//! let row = catalog.resolve("Avatar")?;
//! let tmdb_id = catalog.external_id(row);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    MovieId,
    RowIndex,
    // Core types
    Catalog,
    Movie,
    SimilarityMatrix,
};

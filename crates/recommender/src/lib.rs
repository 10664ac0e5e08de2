//! # Recommender Crate
//!
//! Content-based "more like this" recommendations over a loaded
//! [`catalog::Catalog`]. All similarity work happened offline when the
//! matrix was built; this crate only ranks one row of it.
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use recommender::Recommender;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_files(catalog_path, similarity_path)?);
//! let recommender = Recommender::new(catalog.clone());
//!
//! for rec in recommender.recommend("Avatar", 5)? {
//!     println!("{} ({}% match)", rec.title, rec.score);
//! }
//! ```

pub mod types;
pub mod ranking;
pub mod similar;

// Re-export commonly used types
pub use types::{DEFAULT_RECOMMENDATIONS, Recommendation};
pub use ranking::{match_score, rank_row};
pub use similar::Recommender;

//! Errors from a single poster fetch.
//!
//! None of these reach the user: [`crate::PosterLookup::poster_url`]
//! turns every one of them into the placeholder URL.

use catalog::MovieId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosterError {
    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),

    /// The request did not complete within the configured timeout
    #[error("Metadata request for movie {0} timed out")]
    Timeout(MovieId),

    /// Connection or transport failure
    #[error("Metadata request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Metadata service returned status {status} for movie {movie_id}")]
    Status { movie_id: MovieId, status: u16 },

    /// The body was not the JSON we expected
    #[error("Invalid metadata response for movie {movie_id}: {reason}")]
    InvalidResponse { movie_id: MovieId, reason: String },

    /// The movie has no poster on record
    #[error("No poster_path for movie {0}")]
    MissingPoster(MovieId),
}

pub type Result<T> = std::result::Result<T, PosterError>;

//! Poster lookup against a TMDB-compatible metadata service.
//!
//! Posters are best-effort decoration for a recommendation: every failure
//! (timeout, refused connection, bad status, missing `poster_path`) ends in
//! the placeholder URL, never in an error for the caller.
//!
//! - [`TmdbPosterClient::fetch_poster`] is the typed fetch
//! - [`PosterLookup::poster_url`] applies the placeholder policy
//! - [`PlaceholderPosters`] is used when no API key is configured

pub mod error;

use async_trait::async_trait;
use catalog::MovieId;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use error::{PosterError, Result};

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_URL: &str = "https://image.tmdb.org";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Resolves a movie to a poster image URL. Never fails.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    /// Poster URL for `movie_id`, or the placeholder
    async fn poster_url(&self, movie_id: MovieId) -> String;

    /// URL returned whenever a real poster is unavailable
    fn placeholder_url(&self) -> &str;
}

/// Connection settings for the metadata service
#[derive(Debug, Clone)]
pub struct PosterConfig {
    pub api_key: String,
    /// Base URL of the metadata API, e.g. `https://api.themoviedb.org/3`
    pub api_url: String,
    /// Base URL of the image host, e.g. `https://image.tmdb.org`
    pub image_url: String,
    pub placeholder_url: String,
    pub timeout: Duration,
}

impl PosterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    pub fn with_placeholder_url(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The part of `/movie/{id}` we care about
#[derive(Debug, Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

/// HTTP client for `GET {api_url}/movie/{id}`
#[derive(Clone)]
pub struct TmdbPosterClient {
    http_client: HttpClient,
    config: PosterConfig,
}

impl TmdbPosterClient {
    pub fn new(config: PosterConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PosterError::ClientError(e.to_string()))?;

        info!(
            api_url = %config.api_url,
            timeout_ms = config.timeout.as_millis() as u64,
            "Poster client ready"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    /// Fetch the poster URL for one movie
    pub async fn fetch_poster(&self, movie_id: MovieId) -> Result<String> {
        let url = format!(
            "{}/movie/{}",
            self.config.api_url.trim_end_matches('/'),
            movie_id
        );
        debug!("Fetching poster metadata for movie {}", movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await
            .map_err(|e| classify(movie_id, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status {
                movie_id,
                status: status.as_u16(),
            });
        }

        let details: MovieDetails = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PosterError::Timeout(movie_id)
            } else {
                PosterError::InvalidResponse {
                    movie_id,
                    reason: e.to_string(),
                }
            }
        })?;

        match details.poster_path {
            Some(path) if !path.trim().is_empty() => Ok(self.image_url_for(&path)),
            _ => Err(PosterError::MissingPoster(movie_id)),
        }
    }

    /// Full w500 image URL for a `poster_path`
    fn image_url_for(&self, poster_path: &str) -> String {
        let base = self.config.image_url.trim_end_matches('/');
        if poster_path.starts_with('/') {
            format!("{}/t/p/w500{}", base, poster_path)
        } else {
            format!("{}/t/p/w500/{}", base, poster_path)
        }
    }
}

fn classify(movie_id: MovieId, err: reqwest::Error) -> PosterError {
    if err.is_timeout() {
        PosterError::Timeout(movie_id)
    } else {
        PosterError::RequestError(err)
    }
}

#[async_trait]
impl PosterLookup for TmdbPosterClient {
    async fn poster_url(&self, movie_id: MovieId) -> String {
        match self.fetch_poster(movie_id).await {
            Ok(url) => url,
            Err(PosterError::MissingPoster(_)) => {
                debug!("Movie {} has no poster, using placeholder", movie_id);
                self.config.placeholder_url.clone()
            }
            Err(e) => {
                warn!("Poster lookup failed, using placeholder: {}", e);
                self.config.placeholder_url.clone()
            }
        }
    }

    fn placeholder_url(&self) -> &str {
        &self.config.placeholder_url
    }
}

/// Lookup that never touches the network
#[derive(Debug, Clone)]
pub struct PlaceholderPosters {
    placeholder_url: String,
}

impl PlaceholderPosters {
    pub fn new(placeholder_url: impl Into<String>) -> Self {
        Self {
            placeholder_url: placeholder_url.into(),
        }
    }
}

impl Default for PlaceholderPosters {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_URL)
    }
}

#[async_trait]
impl PosterLookup for PlaceholderPosters {
    async fn poster_url(&self, _movie_id: MovieId) -> String {
        self.placeholder_url.clone()
    }

    fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }
}

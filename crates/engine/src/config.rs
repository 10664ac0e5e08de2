use posters::{
    DEFAULT_API_URL, DEFAULT_IMAGE_URL, DEFAULT_PLACEHOLDER_URL, PlaceholderPosters, PosterConfig,
    PosterLookup, TmdbPosterClient,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Prefix shared by every configuration variable
pub const ENV_PREFIX: &str = "CINEMATRIX_";

/// Application configuration loaded from `CINEMATRIX_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Catalog table artifact (`.json` or `.dat`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Similarity matrix artifact (`.json` or `.bin`)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// TMDB API key; posters fall back to the placeholder when unset
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_placeholder_url")]
    pub poster_placeholder_url: String,

    #[serde(default = "default_poster_timeout_ms")]
    pub poster_timeout_ms: u64,

    /// Number of recommendations shown per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movie_dict.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("data/similarity.bin")
}

fn default_tmdb_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_tmdb_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

fn default_placeholder_url() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

fn default_poster_timeout_ms() -> u64 {
    2000
}

fn default_recommendation_count() -> usize {
    recommender::DEFAULT_RECOMMENDATIONS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            similarity_path: default_similarity_path(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_image_url: default_tmdb_image_url(),
            poster_placeholder_url: default_placeholder_url(),
            poster_timeout_ms: default_poster_timeout_ms(),
            recommendation_count: default_recommendation_count(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_millis(self.poster_timeout_ms)
    }

    /// API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Build the poster lookup this configuration describes
    pub fn poster_lookup(&self) -> anyhow::Result<Arc<dyn PosterLookup>> {
        match self.api_key() {
            Some(key) => {
                let config = PosterConfig::new(key)
                    .with_api_url(&self.tmdb_api_url)
                    .with_image_url(&self.tmdb_image_url)
                    .with_placeholder_url(&self.poster_placeholder_url)
                    .with_timeout(self.poster_timeout());
                Ok(Arc::new(TmdbPosterClient::new(config)?))
            }
            None => {
                warn!(
                    "{}TMDB_API_KEY is not set; posters will use the placeholder",
                    ENV_PREFIX
                );
                Ok(self.placeholder_lookup())
            }
        }
    }

    pub fn placeholder_lookup(&self) -> Arc<dyn PosterLookup> {
        Arc::new(PlaceholderPosters::new(&self.poster_placeholder_url))
    }
}

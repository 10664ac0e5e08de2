//! Engine crate for the CineMatrix recommendation browser.
//!
//! This crate contains the configuration layer and the orchestrator that
//! combines the recommender with poster lookups.

pub mod config;
pub mod orchestrator;

pub use config::AppConfig;
pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};

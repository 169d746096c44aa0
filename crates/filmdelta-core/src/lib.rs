//! Filmdelta Scraper Core Library
//!
//! This crate resolves swedish movie metadata from filmdelta.se and cover
//! images from CDON.se, merging both onto a caller-owned movie record
//! alongside whatever the baseline and TV-series collaborators supply.
//!
//! # Features
//! - Content-identifier resolution from NFO text or a site-scoped search
//! - Best-effort detail-page field extraction (no DOM, substring scanning)
//! - Configurable rating reconciliation between sources
//! - Independent CDON cover lookup with season-refined searches
//! - Rate-limited HTTP client to avoid server overload

pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, HttpFetcher, PageFetcher, RateLimiter};
pub use error::{FilmdeltaError, Result};
pub use scraper::{FilmdeltaScraper, MetadataSource};
pub use types::{
    MovieRecord, RatingPolicy, ScraperConfig, FILMDELTA_SOURCE, IMDB_SOURCE, RATING_UNSET, UNKNOWN,
};

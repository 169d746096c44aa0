//! Data types for the Filmdelta scraper
//!
//! The central type is [`MovieRecord`], the mutable record a scan fills in.
//! Absent values are `None` inside the crate; at the serialization boundary
//! they become the historical `"UNKNOWN"` sentinel that the surrounding
//! plugin ecosystem expects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical absent-value marker used by external collaborators.
pub const UNKNOWN: &str = "UNKNOWN";

/// Identifier slot owned by filmdelta.se (the content site).
pub const FILMDELTA_SOURCE: &str = "filmdelta";

/// Identifier slot owned by the primary baseline source.
pub const IMDB_SOURCE: &str = "imdb";

/// Rating value meaning "never rated" (baseline-source convention).
pub const RATING_UNSET: i32 = -1;

/// Serialize `Option<String>` fields as the historical `"UNKNOWN"` string.
///
/// Collaborating plugins exchange records where every absent field carries
/// the sentinel, so `None` must round-trip through it.
mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNKNOWN;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(v),
            None => serializer.serialize_str(UNKNOWN),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw == UNKNOWN {
            Ok(None)
        } else {
            Ok(Some(raw))
        }
    }
}

/// How a freshly scraped rating is reconciled with the one already on the
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingPolicy {
    /// A nonzero scraped rating replaces the existing one.
    PreferNew,
    /// A nonzero scraped rating is averaged with the existing one; with no
    /// prior rating the scraped value is stored unchanged.
    Average,
}

/// Configuration for one scraper pipeline.
///
/// Passed in explicitly; there is no process-wide property store.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Plot truncation cutoff in characters (default: 400)
    pub max_plot_length: usize,
    /// Rating reconciliation strategy (default: prefer the scraped rating)
    pub rating_policy: RatingPolicy,
    /// Whether the CDON poster pipeline runs at all (default: true)
    pub fetch_poster: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_plot_length: 400,
            rating_policy: RatingPolicy::PreferNew,
            fetch_poster: true,
        }
    }
}

/// One movie being scanned.
///
/// Created by the caller, mutated by the pipeline, owned by neither. All
/// metadata fields follow overwrite-on-success: a failed extraction never
/// replaces a good prior value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Identifier namespace: source name to opaque identifier.
    pub ids: HashMap<String, String>,
    #[serde(with = "sentinel")]
    pub title: Option<String>,
    #[serde(with = "sentinel")]
    pub original_title: Option<String>,
    /// When set, title extraction must leave `title` alone.
    pub override_title: bool,
    #[serde(with = "sentinel")]
    pub year: Option<String>,
    /// Runtime in minutes, as text.
    #[serde(with = "sentinel")]
    pub runtime: Option<String>,
    /// 0-100 scale; [`RATING_UNSET`] when never rated.
    pub rating: i32,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    /// Multiple directors are joined with `" / "`.
    #[serde(with = "sentinel")]
    pub director: Option<String>,
    #[serde(with = "sentinel")]
    pub country: Option<String>,
    #[serde(with = "sentinel")]
    pub plot: Option<String>,
    #[serde(with = "sentinel")]
    pub poster_url: Option<String>,
    pub is_tv_show: bool,
    /// Season number; 0 means not applicable.
    pub season: u32,
}

impl Default for MovieRecord {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            title: None,
            original_title: None,
            override_title: false,
            year: None,
            runtime: None,
            rating: RATING_UNSET,
            genres: Vec::new(),
            cast: Vec::new(),
            director: None,
            country: None,
            plot: None,
            poster_url: None,
            is_tv_show: false,
            season: 0,
        }
    }
}

impl MovieRecord {
    /// Create an empty record with no resolved identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached identifier for a source.
    pub fn id(&self, source: &str) -> Option<&str> {
        self.ids.get(source).map(String::as_str)
    }

    /// Cache an identifier for a source, replacing any previous one.
    pub fn set_id(&mut self, source: &str, id: &str) {
        self.ids.insert(source.to_string(), id.to_string());
    }
}

//! Markup parsers for the scraped sites
//!
//! - `tags`: tag-scoped substring extraction primitive
//! - `nfo`: identifier extraction from free-form NFO text
//! - `search`: identifier resolution from search-result pages
//! - `detail`: filmdelta detail-page field extraction
//! - `poster`: CDON cover search and product-page extraction

pub mod detail;
pub mod nfo;
pub mod poster;
pub mod search;
pub mod tags;

// Re-export main parsing functions
pub use detail::apply_detail_page;
pub use nfo::filmdelta_id_from_nfo;
pub use poster::{extract_poster_url, movie_url_from_search, sanitize_movie_url};
pub use search::{content_id_from_search, is_valid_content_id, make_content_id};
pub use tags::{extract_tag, extract_tag_delimited, extract_tags};

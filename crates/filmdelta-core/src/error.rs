//! Error types for the Filmdelta scraper
//!
//! Only the fetch layer produces errors. Absent data is never an error in
//! this crate: extraction functions return `Option`/empty collections and
//! the orchestrator downgrades transport failures to "not found".

use thiserror::Error;

/// Error type for Filmdelta scraper operations
#[derive(Error, Debug)]
pub enum FilmdeltaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested page was not found (HTTP 404)
    #[error("Page not found: {0}")]
    NotFound(String),
}

/// Result type alias for Filmdelta scraper operations
pub type Result<T> = std::result::Result<T, FilmdeltaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_rate_limited() {
        let error = FilmdeltaError::RateLimited;
        assert_eq!(error.to_string(), "Rate limited - too many requests");
    }

    #[test]
    fn test_error_display_not_found() {
        let error = FilmdeltaError::NotFound("http://www.filmdelta.se/filmer/1/x/".to_string());
        assert_eq!(
            error.to_string(),
            "Page not found: http://www.filmdelta.se/filmer/1/x/"
        );
    }
}

//! Main Filmdelta scraper API
//!
//! [`FilmdeltaScraper`] sequences a full metadata scan for one movie record:
//! identifier resolution (cached, NFO-derived or search-based), delegation
//! to the baseline or TV-series collaborator, detail-page field extraction
//! and the independent CDON cover lookup. Every step degrades to partial
//! data; a scan always runs to completion.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::client::{HttpFetcher, PageFetcher};
use crate::error::Result;
use crate::parser::{detail, nfo, poster, search};
use crate::types::{MovieRecord, ScraperConfig, FILMDELTA_SOURCE, IMDB_SOURCE};

/// Search engine endpoint used to resolve filmdelta identifiers.
const SEARCH_ENGINE_URL: &str = "http://www.google.se/search?hl=sv&q=";

/// Site-scoping term appended (URL-encoded) to every identifier search.
const SEARCH_SITE_SCOPE: &str = "+site:filmdelta.se/filmer";

/// Base of filmdelta detail pages; the content identifier completes it.
const DETAIL_PAGE_URL: &str = "http://www.filmdelta.se/filmer/";

/// CDON search endpoint for the cover pipeline.
const CDON_SEARCH_URL: &str = "http://cdon.se/search?q=";

/// Localized term refining CDON searches for TV seasons.
const SEASON_TERM: &str = "säsong";

/// A competing metadata source this pipeline composes with.
///
/// The baseline source supplies title/rating/plot for regular movies before
/// detail extraction runs; the TV-series source replaces it for TV content.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fill the record from this source. Returns `true` when the scan ran
    /// to completion, partial data included.
    async fn scan(&self, record: &mut MovieRecord) -> bool;

    /// Pull this source's own identifier out of free-form NFO text.
    fn scan_nfo(&self, _nfo: &str, _record: &mut MovieRecord) {}
}

/// Metadata scraper for filmdelta.se with CDON cover lookup.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
///
/// use filmdelta_core::{FilmdeltaScraper, MetadataSource, MovieRecord};
///
/// # struct Baseline;
/// # #[async_trait::async_trait]
/// # impl MetadataSource for Baseline {
/// #     async fn scan(&self, _record: &mut MovieRecord) -> bool { true }
/// # }
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = FilmdeltaScraper::new(Arc::new(Baseline), Arc::new(Baseline))?;
///
///     let mut record = MovieRecord::new();
///     record.title = Some("Wall-E".to_string());
///     scraper.scan(&mut record).await;
///
///     Ok(())
/// }
/// ```
pub struct FilmdeltaScraper {
    fetcher: Arc<dyn PageFetcher>,
    baseline: Arc<dyn MetadataSource>,
    tv_source: Arc<dyn MetadataSource>,
    config: ScraperConfig,
}

impl FilmdeltaScraper {
    /// Create a scraper with the default HTTP fetcher and configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        baseline: Arc<dyn MetadataSource>,
        tv_source: Arc<dyn MetadataSource>,
    ) -> Result<Self> {
        Ok(Self::with_fetcher(
            Arc::new(HttpFetcher::new()?),
            baseline,
            tv_source,
            ScraperConfig::default(),
        ))
    }

    /// Create a scraper with an explicit fetcher and configuration.
    ///
    /// This is how tests substitute canned pages for the network.
    pub fn with_fetcher(
        fetcher: Arc<dyn PageFetcher>,
        baseline: Arc<dyn MetadataSource>,
        tv_source: Arc<dyn MetadataSource>,
        config: ScraperConfig,
    ) -> Self {
        Self {
            fetcher,
            baseline,
            tv_source,
            config,
        }
    }

    /// Replace the scraper's configuration.
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Run a full metadata scan for one record.
    ///
    /// Always returns a completion signal: partial metadata is preferable
    /// to none, so no failure along the way aborts the scan.
    pub async fn scan(&self, record: &mut MovieRecord) -> bool {
        let mut retval = true;
        let mut baseline_scanned = false;

        // A known primary-source id gives the baseline scan a chance to fix
        // up the title first, which improves the search hit rate below.
        if record.id(IMDB_SOURCE).is_some() {
            self.baseline.scan(record).await;
            baseline_scanned = true;
        }

        if record.id(FILMDELTA_SOURCE).is_none() {
            if let Some(title) = record.title.clone() {
                let year = record.year.clone();
                if let Some(id) = self.resolve_content_id(&title, year.as_deref()).await {
                    record.set_id(FILMDELTA_SOURCE, &id);
                }
            }
        } else {
            // Id came from the NFO; drop the placeholder title so the
            // detail page (or a collaborator) supplies the real one.
            record.title = None;
        }

        if record.is_tv_show {
            self.tv_source.scan(record).await;
        } else if !baseline_scanned {
            self.baseline.scan(record).await;
        }

        // Only scrape the detail page for movies with a resolved id.
        if let Some(id) = record.id(FILMDELTA_SOURCE).map(str::to_string) {
            if !record.is_tv_show {
                retval = self.update_media_info(record, &id).await;
            }
        }

        if self.config.fetch_poster {
            if let Some(title) = record.title.clone() {
                if let Some(url) = self.cdon_poster_url(&title, record.season).await {
                    record.poster_url = Some(url);
                }
            }
        }

        retval
    }

    /// Scan free-form NFO text for embedded identifiers.
    ///
    /// The baseline source always gets to read the same text for its own
    /// identifier pattern before the filmdelta URL shapes are tried.
    pub fn scan_nfo(&self, nfo: &str, record: &mut MovieRecord) {
        self.baseline.scan_nfo(nfo, record);

        trace!("scanning NFO for filmdelta id");
        match nfo::filmdelta_id_from_nfo(nfo) {
            Some(id) => {
                debug!(%id, "filmdelta id found in NFO");
                record.set_id(FILMDELTA_SOURCE, &id);
            }
            None => debug!("no filmdelta id found in NFO"),
        }
    }

    /// Resolve a content identifier for a title via the search engine.
    ///
    /// Transport failures and invalid extractions both come back as `None`;
    /// this never propagates a fetch error to its caller.
    pub async fn resolve_content_id(&self, title: &str, year: Option<&str>) -> Option<String> {
        let mut query = format!("{}{}", SEARCH_ENGINE_URL, urlencoding::encode(title));
        if let Some(year) = year {
            query.push('+');
            query.push_str(year);
        }
        query.push_str(&urlencoding::encode(SEARCH_SITE_SCOPE));

        match self.fetcher.fetch(&query).await {
            Ok(html) => {
                let id = search::content_id_from_search(&html);
                match &id {
                    Some(id) => debug!(%id, "resolved filmdelta id"),
                    None => info!(title, "no filmdelta matches found"),
                }
                id
            }
            Err(error) => {
                warn!(title, %error, "failed retrieving filmdelta id");
                None
            }
        }
    }

    /// Fetch the detail page for a resolved id and extract all fields.
    ///
    /// A failed fetch skips extraction but still counts as success: the
    /// record keeps whatever the collaborators already filled in.
    async fn update_media_info(&self, record: &mut MovieRecord, id: &str) -> bool {
        let url = format!("{}{}/", DETAIL_PAGE_URL, id);
        trace!(%url, "fetching detail page");

        match self.fetcher.fetch(&url).await {
            Ok(html) => detail::apply_detail_page(record, &html, &self.config),
            Err(error) => {
                warn!(id, %error, "failed retrieving movie data from filmdelta.se");
            }
        }
        true
    }

    /// Resolve a cover URL from CDON for a title.
    ///
    /// Three steps - search, product page fetch, image extraction - each of
    /// which reports not-found instead of failing the scan.
    pub async fn cdon_poster_url(&self, title: &str, season: u32) -> Option<String> {
        let raw_link = self.cdon_movie_url(title, season).await?;
        let page = self.cdon_movie_details_page(title, &raw_link).await?;

        let url = poster::extract_poster_url(&page);
        match &url {
            Some(url) => debug!(%url, "found CDON cover"),
            None => info!(title, "no CDON cover found"),
        }
        url
    }

    /// Search CDON and extract the raw product link of the first movie row.
    async fn cdon_movie_url(&self, title: &str, season: u32) -> Option<String> {
        let mut query = format!("{}{}", CDON_SEARCH_URL, urlencoding::encode(title));
        if season != 0 {
            query.push('+');
            query.push_str(&urlencoding::encode(SEASON_TERM));
            query.push('+');
            query.push_str(&season.to_string());
        }

        match self.fetcher.fetch(&query).await {
            Ok(html) => {
                let raw = poster::movie_url_from_search(&html);
                if raw.is_none() {
                    debug!(title, "no movie link in CDON search result");
                }
                raw
            }
            Err(error) => {
                warn!(title, %error, "failed searching CDON");
                None
            }
        }
    }

    /// Sanitize the raw product link and fetch the product page.
    async fn cdon_movie_details_page(&self, title: &str, raw_link: &str) -> Option<String> {
        let url = poster::sanitize_movie_url(raw_link)?;
        trace!(%url, "fetching CDON product page");

        match self.fetcher.fetch(&url).await {
            Ok(html) => Some(html),
            Err(error) => {
                warn!(title, %error, "failed retrieving CDON product page");
                None
            }
        }
    }
}

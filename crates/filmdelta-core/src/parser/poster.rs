//! CDON poster page extraction
//!
//! The cover pipeline is independent of the filmdelta identifier: a CDON
//! search leads to a product page, and the product page carries either a
//! "larger front cover" link or a plain product image. These functions are
//! the pure parsing steps; the orchestrator drives the fetches between them.

use tracing::debug;

use super::tags::extract_tag;

/// Origin prefixed onto relative image paths.
const CDON_ORIGIN: &str = "http://cdon.se";

/// Icon that marks a movie-type row in CDON search results.
const MOVIE_ICON_MARKER: &str = "/section-movie.gif\" alt=\"\" />";

/// The product link lives in the title cell following the icon.
const TITLE_CELL_MARKER: &str = "<td class=\"title\">";

/// Label on the anchor pointing at the full-size cover.
const LARGE_COVER_LABEL: &str = "St&#246;rre framsida";

/// Fallback: any product image under the dynamic media path.
const IMAGE_PATH_PREFIX: &str = "/media-dynamic/images/product/";

/// Pull the raw product-page link out of CDON search-result markup.
///
/// The returned token is the anchor's raw attribute text and must go through
/// [`sanitize_movie_url`] before it can be fetched. `None` when the page has
/// no movie-type result row.
pub fn movie_url_from_search(html: &str) -> Option<String> {
    let at = html.find(MOVIE_ICON_MARKER)?;
    extract_tag(&html[at + MOVIE_ICON_MARKER.len()..], TITLE_CELL_MARKER, 0)
}

/// Turn a raw search-result link token into a fetchable absolute URL.
///
/// The raw form looks like `a href="http://cdon.se/film/..." rel="..."`:
/// split on whitespace, take the second token, strip the attribute markup
/// (`href`, `=`, quotes). Anything that does not end up looking like an
/// absolute address is not-found.
pub fn sanitize_movie_url(raw: &str) -> Option<String> {
    if raw.is_empty() || !raw.contains("http") {
        debug!("search result link is not an absolute address");
        return None;
    }
    let token = raw.split_whitespace().nth(1)?;
    let url = token.replace("href", "").replace('=', "").replace('"', "");
    if url.starts_with("http") {
        Some(url)
    } else {
        None
    }
}

/// Extract the absolute poster URL from a CDON product page.
///
/// Prefers the full-size cover link, falls back to the inline product image,
/// and reports not-found when neither marker is present or the candidate
/// token is not a `.jpg` path.
pub fn extract_poster_url(page: &str) -> Option<String> {
    let marker = if page.contains(LARGE_COVER_LABEL) {
        LARGE_COVER_LABEL
    } else if page.contains(IMAGE_PATH_PREFIX) {
        IMAGE_PATH_PREFIX
    } else {
        debug!("no cover markers on product page");
        return None;
    };
    let path = find_image_path(page, marker)?;
    Some(format!("{}{}", CDON_ORIGIN, path))
}

/// Scan tag fragments for the one carrying `marker` and read its image path.
///
/// Product pages differ in structure, so this works on `<`-split fragments
/// rather than on a fixed layout: the path sits at token position 2 once the
/// fragment is split on quotes and whitespace, and must end in `.jpg`.
fn find_image_path(page: &str, marker: &str) -> Option<String> {
    let fragment = page.split('<').find(|fragment| fragment.contains(marker))?;
    let token = fragment
        .split(|c: char| c == '"' || c.is_whitespace())
        .nth(2)?;
    if token.ends_with(".jpg") {
        Some(token.to_string())
    } else {
        debug!(token, "cover candidate is not a jpg path");
        None
    }
}

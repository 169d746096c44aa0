//! Search-result identifier extraction
//!
//! Resolves a filmdelta content identifier (`<digits>/<slug>`) out of a web
//! search result page. The page either carries a no-match marker or embeds
//! filmdelta detail-page links whose first occurrence names the best match.

use tracing::debug;

/// Marker present only on result pages without any match.
const NO_MATCH_MARKER: &str = "<ul><li>";

/// Path prefix of filmdelta detail-page links in result markup.
const CONTENT_PATH_MARKER: &str = "www.filmdelta.se/filmer/";

/// Resolve a content identifier from search-result markup.
///
/// Returns `None` when the page carries the no-match marker, contains no
/// detail-page link, or the derived identifier fails the shape check.
pub fn content_id_from_search(html: &str) -> Option<String> {
    if html.contains(NO_MATCH_MARKER) {
        return None;
    }

    let at = html.find(CONTENT_PATH_MARKER)?;
    let id = make_content_id(&html[at + CONTENT_PATH_MARKER.len()..], 0)?;

    if is_valid_content_id(&id) {
        Some(id)
    } else {
        // Garbage extracted from unexpected markup is not worth storing.
        debug!(%id, "found a filmdelta id but it is not valid");
        None
    }
}

/// Build a `<digits>/<slug>` identifier from `/`-separated URL text.
///
/// Skips `skip` leading path segments, then joins the next two with `/`.
///
/// # Examples
/// ```
/// use filmdelta_core::parser::make_content_id;
///
/// assert_eq!(
///     make_content_id("146410/lat_den_ratte_komma_in/\" class=l", 0),
///     Some("146410/lat_den_ratte_komma_in".to_string())
/// );
/// assert_eq!(make_content_id("146410", 0), None);
/// ```
pub fn make_content_id(text: &str, skip: usize) -> Option<String> {
    let mut segments = text.split('/').filter(|s| !s.is_empty()).skip(skip);
    let digits = segments.next()?;
    let slug = segments.next()?;
    Some(format!("{}/{}", digits, slug))
}

/// Check an identifier against the historical shape
/// `<at least 3 digits>/<word chars, dashes, entity residue>`.
pub fn is_valid_content_id(id: &str) -> bool {
    regex_lite::Regex::new(r"^\d{3,}/[\w\-&;]+$")
        .map(|re| re.is_match(id))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_content_id_from_search_basic() {
        let html = "<h2 class=hd>Search Results</h2><div><ol><li class=g><h3 class=r>\
                    <a href=\"http://www.filmdelta.se/filmer/146410/lat_den_ratte_komma_in/\" \
                    class=l onmousedown=\"return clk(this.href,'','','res','1','')\"><em>";
        assert_eq!(
            content_id_from_search(html),
            Some("146410/lat_den_ratte_komma_in".to_string())
        );
    }

    #[test]
    fn test_content_id_from_search_dashed_slug() {
        let html = "<div id=res class=med><h2 class=hd>Search Results</h2><div><ol>\
                    <li class=g><h3 class=r>\
                    <a href=\"http://www.filmdelta.se/filmer/145614/wall-e/\" class=l ";
        assert_eq!(content_id_from_search(html), Some("145614/wall-e".to_string()));
    }

    #[test]
    fn test_content_id_from_search_no_match_marker() {
        let html = "<b>apo panda site:filmdelta.se/filmer</b> - did not match any documents.  \
                    <p style=margin-top:1em>Suggestions:<ul><li>Make sure all words are spelled \
                    correctly.<li>Try";
        assert_eq!(content_id_from_search(html), None);
    }

    #[test]
    fn test_content_id_from_search_no_link() {
        assert_eq!(content_id_from_search("<html><body>ingenting</body></html>"), None);
    }

    #[test]
    fn test_content_id_from_search_rejects_bad_shape() {
        // Too few digits before the slug.
        let html = "<a href=\"http://www.filmdelta.se/filmer/42/x/\">";
        assert_eq!(content_id_from_search(html), None);
    }

    #[test]
    fn test_make_content_id_skip() {
        assert_eq!(
            make_content_id("/den+lilla/filmer/15353/den_lilla_sjojungfrun", 2),
            Some("15353/den_lilla_sjojungfrun".to_string())
        );
        assert_eq!(make_content_id("/15353/den_lilla_sjojungfrun/", 0),
            Some("15353/den_lilla_sjojungfrun".to_string()));
        assert_eq!(make_content_id("/15353", 0), None);
        assert_eq!(make_content_id("", 0), None);
    }

    #[test]
    fn test_is_valid_content_id() {
        assert!(is_valid_content_id("146410/lat_den_ratte_komma_in"));
        assert!(is_valid_content_id("145614/wall-e"));
        // Entity residue in slugs is accepted for compatibility with
        // previously stored identifiers.
        assert!(is_valid_content_id("127907/barbie_&amp;_tiggarflickan"));
        assert!(!is_valid_content_id("42/x"));
        assert!(!is_valid_content_id("146410"));
        assert!(!is_valid_content_id("146410/"));
        assert!(!is_valid_content_id("146410/slug with spaces"));
    }

    proptest! {
        #[test]
        fn generated_ids_validate(digits in "[0-9]{3,8}", slug in "[a-z0-9_-]{1,24}") {
            let id = format!("{}/{}", digits, slug);
            prop_assert!(is_valid_content_id(&id));
        }
    }
}

//! NFO identifier parsing
//!
//! An NFO is free-form prior-metadata text that may embed a filmdelta URL in
//! one of two shapes:
//!
//! - direct: `http://www.filmdelta.se/filmer/<digits>/<slug>/`
//! - via search: `http://www.filmdelta.se/prevsearch/<text>/filmer/<digits>/<slug>`
//!
//! Deriving the identifier from either shape needs no network call.

use super::search::make_content_id;

const PREVSEARCH_MARKER: &str = "www.filmdelta.se/prevsearch";
const DIRECT_MARKER: &str = "www.filmdelta.se/filmer";

/// Number of path segments between the prevsearch marker and the identifier.
const PREVSEARCH_SKIP: usize = 2;

/// Derive a filmdelta content identifier from NFO text.
///
/// The via-search shape wins when both markers are present (its URL contains
/// the direct marker as a substring). Returns `None` when neither marker
/// appears or the URL carries too few path segments; the caller keeps
/// whatever identifier the record already has.
///
/// # Examples
/// ```
/// use filmdelta_core::parser::filmdelta_id_from_nfo;
///
/// let nfo = "http://www.filmdelta.se/filmer/145614/wall-e/";
/// assert_eq!(filmdelta_id_from_nfo(nfo), Some("145614/wall-e".to_string()));
/// assert_eq!(filmdelta_id_from_nfo("bara text"), None);
/// ```
pub fn filmdelta_id_from_nfo(nfo: &str) -> Option<String> {
    if let Some(at) = nfo.find(PREVSEARCH_MARKER) {
        make_content_id(&nfo[at + PREVSEARCH_MARKER.len()..], PREVSEARCH_SKIP)
    } else if let Some(at) = nfo.find(DIRECT_MARKER) {
        make_content_id(&nfo[at + DIRECT_MARKER.len()..], 0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevsearch_shape() {
        let nfo = "Hittad via http://www.filmdelta.se/prevsearch/den+lilla+sjojungfrun/\
                   filmer/15353/den_lilla_sjojungfrun";
        assert_eq!(
            filmdelta_id_from_nfo(nfo),
            Some("15353/den_lilla_sjojungfrun".to_string())
        );
    }

    #[test]
    fn test_direct_shape() {
        let nfo = "Den lilla sjöjungfrun (1989)\n\
                   http://www.filmdelta.se/filmer/15353/den_lilla_sjojungfrun/\n";
        assert_eq!(
            filmdelta_id_from_nfo(nfo),
            Some("15353/den_lilla_sjojungfrun".to_string())
        );
    }

    #[test]
    fn test_no_marker_leaves_id_unresolved() {
        let nfo = "Wall-E (2008)\nhttp://www.imdb.com/title/tt0910970/";
        assert_eq!(filmdelta_id_from_nfo(nfo), None);
    }

    #[test]
    fn test_truncated_url() {
        assert_eq!(filmdelta_id_from_nfo("http://www.filmdelta.se/filmer/15353"), None);
        assert_eq!(filmdelta_id_from_nfo("http://www.filmdelta.se/prevsearch/x/filmer"), None);
    }
}

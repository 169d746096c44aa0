//! Tag-scoped substring extraction
//!
//! The site parsers in this crate never build a DOM. They locate a marker
//! string and read tokens around it, accepting that restructured markup
//! degrades to "nothing found" instead of failing a scan. These helpers are
//! the whole extraction primitive: everything else is per-field rules.

/// Default delimiter set: tokens are bounded by tag brackets.
const TAG_DELIMITERS: &str = "><";

/// Extract the `skip`-th text token following `marker`, using the default
/// tag-bracket delimiters.
///
/// # Examples
/// ```
/// use filmdelta_core::parser::extract_tag;
///
/// let html = "<h4>Genre</h4>\n<h5>Drama</h5>";
/// assert_eq!(extract_tag(html, "<h4>Genre</h4>", 2), Some("Drama".to_string()));
/// assert_eq!(extract_tag(html, "<h4>Betyg</h4>", 0), None);
/// ```
pub fn extract_tag(src: &str, marker: &str, skip: usize) -> Option<String> {
    extract_tag_delimited(src, marker, skip, TAG_DELIMITERS)
}

/// Extract the `skip`-th token following `marker`, with an explicit
/// delimiter set.
///
/// The text after the first occurrence of `marker` is tokenized on any of
/// the `delimiters` characters; empty tokens are dropped, whitespace-only
/// tokens still count toward `skip`. Returns the selected token trimmed, or
/// `None` when the marker or the requested occurrence does not exist.
pub fn extract_tag_delimited(
    src: &str,
    marker: &str,
    skip: usize,
    delimiters: &str,
) -> Option<String> {
    let start = src.find(marker)? + marker.len();
    let token = src[start..]
        .split(|c: char| delimiters.contains(c))
        .filter(|token| !token.is_empty())
        .nth(skip)?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extract every item between `item_start` and `item_end` inside the block
/// bounded by `section_start` and `section_end`.
///
/// An absent section or section end yields an empty vec, not an error. Items
/// are returned with leading complete tags skipped (so an item wrapped in an
/// anchor starts at its text); trailing markup remnants are kept for the
/// caller's per-field stripping rules.
pub fn extract_tags(
    src: &str,
    section_start: &str,
    section_end: &str,
    item_start: &str,
    item_end: &str,
) -> Vec<String> {
    let mut items = Vec::new();

    let Some(start) = src.find(section_start) else {
        return items;
    };
    let section = &src[start + section_start.len()..];
    let Some(end) = section.find(section_end) else {
        return items;
    };
    let mut rest = &section[..end];

    while let Some(at) = rest.find(item_start) {
        let after = &rest[at + item_start.len()..];
        let (raw, next) = match after.find(item_end) {
            Some(close) => (&after[..close], &after[close + item_end.len()..]),
            None => (after, ""),
        };
        let item = strip_leading_tags(raw);
        if !item.is_empty() {
            items.push(item.to_string());
        }
        rest = next;
    }

    items
}

/// Skip complete opening tags at the start of an item so it begins at text.
fn strip_leading_tags(mut item: &str) -> &str {
    loop {
        item = item.trim_start();
        let Some(rest) = item.strip_prefix('<') else {
            return item;
        };
        match rest.find('>') {
            Some(close) => item = &rest[close + 1..],
            None => return item,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_extract_tag_skips_markup_tokens() {
        let html = "<h4>Originaltitel</h4>\n<h5>The Little Mermaid</h5>";
        assert_eq!(
            extract_tag(html, "riginaltitel</h4>", 2),
            Some("The Little Mermaid".to_string())
        );
    }

    #[test]
    fn test_extract_tag_missing_marker() {
        assert_eq!(extract_tag("<h5>Drama</h5>", "<h4>Genre</h4>", 0), None);
    }

    #[test]
    fn test_extract_tag_occurrence_out_of_range() {
        let html = "<h4>Genre</h4><h5>Drama</h5>";
        assert_eq!(extract_tag(html, "<h4>Genre</h4>", 9), None);
    }

    #[test]
    fn test_extract_tag_delimited_single_delimiter() {
        let html = "<title>Wall-E - Filmdelta - filmdatabas</title>";
        assert_eq!(
            extract_tag_delimited(html, "title>", 0, "<"),
            Some("Wall-E - Filmdelta - filmdatabas".to_string())
        );
    }

    #[test]
    fn test_extract_tag_whitespace_token_counts() {
        // The newline between ">" and "<" is a token of its own.
        let html = "<h4>Land</h4>\n<h5>USA</h5>";
        assert_eq!(extract_tag(html, "<h4>Land</h4>", 0), None);
        assert_eq!(extract_tag(html, "<h4>Land</h4>", 2), Some("USA".to_string()));
    }

    #[test]
    fn test_extract_tags_items_in_section() {
        let html = "<h4>Genre</h4>\
                    <h5><a href=\"/kategori/20\">Animerat</a></h5>\
                    <h5><a href=\"/kategori/7\">Familj</a></h5></div><h5>utanför</h5>";
        let items = extract_tags(html, "<h4>Genre</h4>", "</div>", "<h5>", "</h5>");
        assert_eq!(items, vec!["Animerat</a>", "Familj</a>"]);
    }

    #[test]
    fn test_extract_tags_missing_section() {
        let items = extract_tags("<p>inget</p>", "<h4>Genre</h4>", "</div>", "<h5>", "</h5>");
        assert!(items.is_empty());
    }

    #[test]
    fn test_extract_tags_unterminated_section() {
        let html = "<h4>Genre</h4><h5>Drama</h5>";
        let items = extract_tags(html, "<h4>Genre</h4>", "</div>", "<h5>", "</h5>");
        assert!(items.is_empty());
    }

    #[test]
    fn test_strip_leading_tags_keeps_trailing_remnant() {
        assert_eq!(strip_leading_tags("<a href=\"/x\">John Musker</a>"), "John Musker</a>");
        assert_eq!(strip_leading_tags("\n<a href=\"/x\">Jodi Benson</a> (röst)"), "Jodi Benson</a> (röst)");
        assert_eq!(strip_leading_tags("plain text"), "plain text");
    }

    proptest! {
        #[test]
        fn extract_tag_never_panics(src in ".{0,200}", marker in ".{1,12}", skip in 0usize..6) {
            let _ = extract_tag(&src, &marker, skip);
            let _ = extract_tag_delimited(&src, &marker, skip, "<");
        }

        #[test]
        fn extract_tags_never_panics(src in ".{0,200}") {
            let _ = extract_tags(&src, "<h4>", "</div>", "<h5>", "</h5>");
        }
    }
}

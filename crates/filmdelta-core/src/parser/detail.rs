//! Detail-page field extraction
//!
//! Pulls the structured fields out of a filmdelta detail page. Every field
//! rule runs independently: one field failing to extract never blocks the
//! others, and a failed extraction leaves the record's prior value alone.
//! The marker strings are the site's exact entity-encoded headings.

use regex_lite::Regex;
use tracing::{debug, trace};

use crate::types::{MovieRecord, RatingPolicy, ScraperConfig};

use super::tags::{extract_tag, extract_tag_delimited, extract_tags};

/// The page `<title>` carries the movie title followed by the site name.
const TITLE_SITE_SEPARATOR: &str = r"-\sFilmdelta";

/// Heading of the shared country/year/runtime block.
const SHARED_FACTS_MARKER: &str = "Land, &aring;r, l&auml;ngd";

/// Inline style attribute that anchors the rating block.
const RATING_STYLE_MARKER: &str = "style=\"margin-top:2px; font-weight:bold;\">";

/// A rating token is only trusted when it carries the average label.
const RATING_AVERAGE_LABEL: &str = "Snitt";

/// Markup remnant widths trailing list items.
const GENRE_REMNANT_LEN: usize = 5;
const DIRECTOR_REMNANT_LEN: usize = 4;

const DIRECTOR_SEPARATOR: &str = " / ";
const PLOT_ELLIPSIS: &str = "...";

/// Apply every field rule of a fetched detail page to the record.
///
/// Genres are only taken when the record has none yet: the baseline source's
/// genre list has priority.
pub fn apply_detail_page(record: &mut MovieRecord, html: &str, config: &ScraperConfig) {
    update_title(record, html);
    update_plot(record, html, config.max_plot_length);
    if record.genres.is_empty() {
        update_genres(record, html);
    }
    update_director(record, html);
    update_cast(record, html);
    update_country(record, html);
    update_year(record, html);
    update_rating(record, html, config.rating_policy);
    update_runtime(record, html);
}

fn update_title(record: &mut MovieRecord, html: &str) {
    if record.override_title {
        return;
    }

    if let Some(raw) = extract_tag_delimited(html, "title>", 0, "<") {
        let title = match Regex::new(TITLE_SITE_SEPARATOR)
            .ok()
            .and_then(|re| re.find(&raw))
        {
            // Keep only the segment before the site name.
            Some(site) => raw[..site.start()].to_string(),
            None => raw,
        };
        let title = title.trim();
        if !title.is_empty() {
            trace!(title, "scraped title");
            record.title = Some(title.to_string());
        }
    }

    if let Some(original) = extract_tag(html, "riginaltitel</h4>", 2) {
        trace!(%original, "scraped original title");
        record.original_title = Some(original);
    }
}

fn update_plot(record: &mut MovieRecord, html: &str, max_length: usize) {
    let Some(plot) = extract_tag(html, "<div class=\"text\">", 2) else {
        return;
    };
    let plot = if plot.chars().count() > max_length {
        let mut truncated: String = plot.chars().take(max_length).collect();
        truncated.push_str(PLOT_ELLIPSIS);
        truncated
    } else {
        plot
    };
    record.plot = Some(plot);
}

fn update_genres(record: &mut MovieRecord, html: &str) {
    let genres: Vec<String> = extract_tags(html, "<h4>Genre</h4>", "</div>", "<h5>", "</h5>")
        .iter()
        .filter_map(|item| strip_remnant(item, GENRE_REMNANT_LEN))
        .map(str::to_string)
        .collect();
    if !genres.is_empty() {
        trace!(?genres, "scraped genres");
        record.genres = genres;
    }
}

fn update_director(record: &mut MovieRecord, html: &str) {
    let items = extract_tags(html, "<h4>Regiss&ouml;r</h4>", "</div>", "<h5>", "</h5>");
    let directors: Vec<&str> = items
        .iter()
        .filter_map(|item| strip_remnant(item, DIRECTOR_REMNANT_LEN))
        .collect();
    if !directors.is_empty() {
        let director = directors.join(DIRECTOR_SEPARATOR);
        trace!(%director, "scraped director");
        record.director = Some(director);
    }
}

fn update_cast(record: &mut MovieRecord, html: &str) {
    let cast: Vec<String> =
        extract_tags(html, "<h4>Sk&aring;despelare</h4>", "</div>", "<h5>", "</h5>")
            .iter()
            .filter_map(|item| item.split("</a>").next())
            .map(|actor| actor.trim().to_string())
            .filter(|actor| !actor.is_empty())
            .collect();
    if !cast.is_empty() {
        trace!(?cast, "scraped cast");
        record.cast = cast;
    }
}

fn update_country(record: &mut MovieRecord, html: &str) {
    if let Some(country) = extract_tag(html, SHARED_FACTS_MARKER, 3) {
        trace!(%country, "scraped country");
        record.country = Some(country);
    }
}

fn update_year(record: &mut MovieRecord, html: &str) {
    let Some(raw) = extract_tag(html, SHARED_FACTS_MARKER, 5) else {
        return;
    };
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() > 1 {
        trace!(year = words[1], "scraped year");
        record.year = Some(words[1].to_string());
    } else {
        debug!(%raw, "year value has unexpected shape");
    }
}

fn update_runtime(record: &mut MovieRecord, html: &str) {
    let Some(raw) = extract_tag(html, SHARED_FACTS_MARKER, 7) else {
        return;
    };
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() > 2 {
        trace!(runtime = words[1], "scraped runtime");
        record.runtime = Some(words[1].to_string());
    }
}

fn update_rating(record: &mut MovieRecord, html: &str, policy: RatingPolicy) {
    let scraped = scraped_rating(html);
    if let Some(merged) = merge_rating(scraped, record.rating, policy) {
        record.rating = merged;
    }
}

/// Read the site's average rating and rescale it to 0-100.
///
/// Returns 0 (meaning "no new rating") when the styled token is absent,
/// lacks the average label, or does not parse as a decimal.
fn scraped_rating(html: &str) -> i32 {
    let Some(raw) = extract_tag_delimited(html, RATING_STYLE_MARKER, 8, "<") else {
        return 0;
    };
    if !raw.contains(RATING_AVERAGE_LABEL) {
        debug!("no average label in rating block");
        return 0;
    }
    let value = raw.rsplit(':').next().unwrap_or_default().trim();
    match value.parse::<f32>() {
        // Site ratings are 0-5; rescale to the 0-100 convention.
        Ok(rating) => (rating * 20.0) as i32,
        Err(_) => {
            debug!(value, "rating value did not parse");
            0
        }
    }
}

/// Reconcile a freshly scraped rating with the record's current one.
///
/// `None` means keep the current rating. With no prior rating (negative
/// current value) the `Average` policy stores the scraped value unchanged
/// instead of averaging against the unset sentinel.
pub(crate) fn merge_rating(scraped: i32, current: i32, policy: RatingPolicy) -> Option<i32> {
    if scraped == 0 {
        return None;
    }
    match policy {
        RatingPolicy::PreferNew => Some(scraped),
        RatingPolicy::Average if current < 0 => Some(scraped),
        RatingPolicy::Average => Some((scraped + current) / 2),
    }
}

fn strip_remnant(item: &str, width: usize) -> Option<&str> {
    let end = item.len().checked_sub(width)?;
    let kept = item.get(..end)?;
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

//! Note extraction from rendered search-results markup.
//!
//! Parses one markup snapshot with the `scraper` crate and runs a fixed
//! set of CSS selectors against each note container. Selector misses never
//! fail a record; the affected field is left empty.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// One search result as exported.
///
/// All four fields are display text taken from the page, and any of them
/// may be empty when the corresponding node is missing. The like count is
/// kept raw (e.g. "1.2万"), never parsed to a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub title: String,
    pub link: String,
    pub like: String,
    pub author: String,
}

/// Extract every note on the page, in DOM order.
///
/// Relative note links are resolved against `page_url`, matching what the
/// browser would report for the anchor's `href` property. Duplicate
/// containers produce duplicate records; nothing is deduplicated.
pub fn extract_notes(html: &str, page_url: &str) -> Vec<NoteRecord> {
    let container_sel = Selector::parse("div.note-item").unwrap();
    let title_sel = Selector::parse("div.title").unwrap();
    let link_sel = Selector::parse("a").unwrap();
    let like_sel = Selector::parse("span.like-count").unwrap();
    let author_sel = Selector::parse("div.author-info span.name").unwrap();

    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    document
        .select(&container_sel)
        .map(|card| NoteRecord {
            title: lookup_or_default(|| first_text(&card, &title_sel), "title"),
            link: lookup_or_default(|| first_href(&card, &link_sel, base.as_ref()), "link"),
            like: lookup_or_default(|| first_text(&card, &like_sel), "like"),
            author: lookup_or_default(|| first_text(&card, &author_sel), "author"),
        })
        .collect()
}

/// Run one field lookup, substituting an empty string when it misses.
///
/// Every field goes through here so a miss in one lookup cannot disturb
/// the other three.
fn lookup_or_default(lookup: impl FnOnce() -> Option<String>, field: &str) -> String {
    match lookup() {
        Some(value) => value,
        None => {
            debug!(field, "selector miss, leaving field empty");
            String::new()
        }
    }
}

/// Trimmed text of the first node matching `sel` inside `card`.
fn first_text(card: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    card.select(sel)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
}

/// `href` of the first anchor inside `card`, resolved against the page URL.
fn first_href(card: &ElementRef<'_>, sel: &Selector, base: Option<&Url>) -> Option<String> {
    let href = card.select(sel).next()?.value().attr("href")?;
    let resolved = match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    };
    Some(resolved)
}

use scraper::ElementRef;

use crate::app::Result;
use crate::domain::{ListingEntry, ListingKind, ListingStats, SCORE_UNAVAILABLE};
use crate::extract::dom::{
    all_texts, first_attr, first_text, numeric_segment, parse_count, parse_document, select,
    select_first, texts, trimmed_text,
};
use crate::extract::work::WORK_ID_SEGMENT;

/// Parse a best-rated listing or a search results page, one entry per card.
pub fn parse_listing_document(markup: &str, kind: ListingKind) -> Result<Vec<ListingEntry>> {
    let document = parse_document(markup)?;

    let entries = select(document.root_element(), "div.fiction-list-item")
        .into_iter()
        .map(|card| parse_card(card, kind))
        .collect();

    Ok(entries)
}

fn parse_card(card: ElementRef<'_>, kind: ListingKind) -> ListingEntry {
    let mut entry = ListingEntry::new(kind);

    if let Some(link) = select_first(card, "h2.fiction-title a") {
        entry.title = trimmed_text(link);
        entry.id = link
            .value()
            .attr("href")
            .and_then(|href| numeric_segment(href, WORK_ID_SEGMENT))
            .unwrap_or(0);
    }

    entry.image = first_attr(card, "img", "src");
    entry.author = first_text(card, ".author");
    entry.tags = all_texts(card, ".tags .label");
    entry.stats = parse_card_stats(card);

    if kind == ListingKind::Search {
        let badges = texts(card, "span.label");
        if badges.len() >= 2 {
            entry.fiction_type = badges[0].clone();
            entry.status = badges[1].clone();
        }
        entry.description = first_text(card, r#"div[id^="description-"]"#);
    }

    entry
}

/// Card stats are "1,234 Followers"-style spans; the keyword names the field.
fn parse_card_stats(card: ElementRef<'_>) -> ListingStats {
    let mut stats = ListingStats::default();

    for span in select(card, "div.stats span") {
        let label = trimmed_text(span).to_lowercase();
        let Some((number, keyword)) = label.split_once(char::is_whitespace) else {
            continue;
        };
        let value = parse_count(number);

        if keyword.contains("follower") {
            stats.followers = value;
        } else if keyword.contains("favorite") {
            stats.favorites = value;
        } else if keyword.contains("page") {
            stats.pages = value;
        } else if keyword.contains("view") {
            stats.views = value;
        } else if keyword.contains("chapter") {
            stats.chapters = value;
        }
    }

    stats.rating = select_first(card, ".star[title]")
        .and_then(|star| star.value().attr("title"))
        .and_then(|title| title.trim().parse().ok())
        .unwrap_or(SCORE_UNAVAILABLE);

    stats
}

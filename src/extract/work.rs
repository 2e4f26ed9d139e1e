use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};

use crate::app::Result;
use crate::domain::{Author, ChapterRef, Work};
use crate::extract::dom::{
    all_texts, first_attr, first_text, numeric_segment, parse_document, select, select_first, text,
    texts, trimmed_text,
};
use crate::extract::stats::parse_stats_block;
use crate::extract::time::{parse_absolute_timestamp, parse_relative_timestamp};

/// Path position of the numeric id in `/profile/{id}` and `/fiction/{id}/...`.
pub(crate) const WORK_ID_SEGMENT: usize = 2;
/// Path position of the numeric id in `/fiction/{id}/{slug}/chapter/{id}/{slug}`.
pub(crate) const CHAPTER_ID_SEGMENT: usize = 5;

/// Parse a fiction detail page.
///
/// Only an unparseable document is an error; every missing piece of the page
/// leaves its field at the zero value.
pub fn parse_work_document(markup: &str, id: u64) -> Result<Work> {
    let document = parse_document(markup)?;
    let root = document.root_element();

    let mut work = Work {
        id,
        title: first_text(root, "div.fic-title h1"),
        image: first_attr(root, "div.fic-header img", "src"),
        ..Default::default()
    };

    let badges = select(root, "span.bg-blue-hoki");
    if badges.len() >= 2 {
        work.kind = trimmed_text(badges[0]);
        work.status = trimmed_text(badges[1]);
    }

    work.tags = all_texts(root, "span.tags a.label");
    work.warnings = texts(root, "ul.list-inline li");
    work.description = first_text(root, "div.description > div.hidden-content");
    work.author = select_first(root, ".portlet-body")
        .map(parse_author)
        .unwrap_or_default();
    work.stats = parse_stats_block(&document);
    work.chapters = parse_chapter_table(&document, Utc::now());

    tracing::debug!(
        "Parsed work {} ({:?}) with {} chapters",
        id,
        work.title,
        work.chapters.len()
    );

    Ok(work)
}

fn parse_author(card: ElementRef<'_>) -> Author {
    let link = select_first(card, ".mt-card-content a");

    Author {
        id: link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| numeric_segment(href, WORK_ID_SEGMENT))
            .unwrap_or(0),
        name: link.map(trimmed_text).unwrap_or_default(),
        title: first_text(card, ".mt-card-desc"),
        avatar: first_attr(card, r#"img[data-type="avatar"]"#, "src"),
    }
}

/// Table of contents rows in document order. A row is never dropped; a row
/// with a bad link gets id 0 and a row with an unreadable date gets `now`.
pub fn parse_chapter_table(document: &Html, now: DateTime<Utc>) -> Vec<ChapterRef> {
    select(document.root_element(), "tbody tr")
        .into_iter()
        .map(|row| {
            let cells = select(row, "td");
            let link = cells.first().and_then(|cell| select_first(*cell, "a"));

            ChapterRef {
                id: link
                    .and_then(|a| a.value().attr("href"))
                    .and_then(|href| numeric_segment(href, CHAPTER_ID_SEGMENT))
                    .unwrap_or(0),
                title: link.map(trimmed_text).unwrap_or_default(),
                release: cells
                    .get(1)
                    .and_then(|cell| select_first(*cell, "time"))
                    .map(|time| release_time(time, now))
                    .unwrap_or(now),
            }
        })
        .collect()
}

fn release_time(time: ElementRef<'_>, now: DateTime<Utc>) -> DateTime<Utc> {
    time.value()
        .attr("datetime")
        .and_then(parse_absolute_timestamp)
        .unwrap_or_else(|| parse_relative_timestamp(&text(time), now))
}

use scraper::ElementRef;

use crate::app::Result;
use crate::domain::{ChapterContent, NO_CHAPTER};
use crate::extract::dom::{numeric_segment, parse_document, select, select_first, text};
use crate::extract::work::CHAPTER_ID_SEGMENT;

const NEXT_ICON: &str = "i.fa-chevron-double-right";
const PREVIOUS_ICON: &str = "i.fa-chevron-double-left";

/// Parse a chapter page: body markup, author notes and sibling links.
pub fn parse_chapter_document(markup: &str) -> Result<ChapterContent> {
    let document = parse_document(markup)?;
    let root = document.root_element();

    let notes = select(root, "div.author-note");

    let content = select_first(root, "div.chapter-inner.chapter-content")
        .map(|body| body.inner_html().trim().to_string())
        .unwrap_or_default();

    Ok(ChapterContent {
        content,
        pre_note: notes.first().and_then(|note| note_text(*note)),
        post_note: notes.get(1).and_then(|note| note_text(*note)),
        next: sibling_id(root, NEXT_ICON),
        previous: sibling_id(root, PREVIOUS_ICON),
    })
}

fn note_text(note: ElementRef<'_>) -> Option<String> {
    let joined: String = select(note, "p").into_iter().map(text).collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The navigation anchor wraps a directional icon; its href carries the chapter id.
fn sibling_id(root: ElementRef<'_>, icon: &str) -> i64 {
    select_first(root, icon)
        .and_then(|icon| icon.parent())
        .and_then(ElementRef::wrap)
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| numeric_segment(href, CHAPTER_ID_SEGMENT))
        .and_then(|id| i64::try_from(id).ok())
        .unwrap_or(NO_CHAPTER)
}

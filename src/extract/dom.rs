//! Small, forgiving accessors over a parsed document.
//!
//! Every helper here degrades to an empty value instead of failing: a bad
//! selector, a missing element or a missing attribute all read as "absent".

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{FolioError, Result};

pub fn parse_document(markup: &str) -> Result<Html> {
    if markup.trim().is_empty() {
        return Err(FolioError::Document("empty document".into()));
    }
    Ok(Html::parse_document(markup))
}

pub fn select<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => {
            tracing::debug!("Invalid selector: {}", css);
            Vec::new()
        }
    }
}

pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// All descendant text, concatenated as-is.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn trimmed_text(element: ElementRef<'_>) -> String {
    text(element).trim().to_string()
}

/// Trimmed text of the first match, or an empty string.
pub fn first_text(scope: ElementRef<'_>, css: &str) -> String {
    select_first(scope, css)
        .map(trimmed_text)
        .unwrap_or_default()
}

/// Attribute of the first match, or an empty string.
pub fn first_attr(scope: ElementRef<'_>, css: &str, name: &str) -> String {
    select_first(scope, css)
        .and_then(|el| el.value().attr(name))
        .map(String::from)
        .unwrap_or_default()
}

/// Trimmed texts of every match in document order, blanks included.
pub fn all_texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    select(scope, css).into_iter().map(trimmed_text).collect()
}

/// Trimmed, non-empty texts of every match in document order.
pub fn texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    select(scope, css)
        .into_iter()
        .map(trimmed_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// The `index`-th `/`-separated piece of a link's path.
///
/// Index 0 is the empty piece before the leading slash, so for
/// `/fiction/123/slug/chapter/456/slug` index 2 is `123` and index 5 is `456`.
/// Absolute URLs are reduced to their path first.
pub fn path_segment(href: &str, index: usize) -> Option<String> {
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.to_string(),
    };
    path.split('/').nth(index).map(String::from)
}

pub fn numeric_segment(href: &str, index: usize) -> Option<u64> {
    path_segment(href, index)?.trim().parse().ok()
}

/// Integer display text such as "12,345" or " 7 "; anything unparseable is 0.
pub fn parse_count(raw: &str) -> u64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse().unwrap_or(0)
}

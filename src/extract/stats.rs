//! Statistics block of a fiction page.
//!
//! The block is two `.list-unstyled` lists inside `div.stats-content`. Values
//! sit at fixed ordinal positions (labels occupy the even slots), so the whole
//! index table lives here. A list shorter than its highest index leaves its
//! entire group unset rather than half-filled.

use scraper::{ElementRef, Html};

use crate::domain::{Score, Views, WorkStats, SCORE_UNAVAILABLE};
use crate::extract::dom::{parse_count, select, select_first};

/// Scores list (first `.list-unstyled`).
mod ratings {
    pub const OVERALL: usize = 1;
    pub const STYLE: usize = 3;
    pub const STORY: usize = 5;
    pub const CHARACTER: usize = 7;
    pub const GRAMMAR: usize = 9;
    pub const REQUIRED: usize = GRAMMAR + 1;
}

/// Counts list (second `.list-unstyled`).
mod counts {
    pub const TOTAL_VIEWS: usize = 1;
    pub const AVERAGE_VIEWS: usize = 3;
    pub const FOLLOWERS: usize = 5;
    pub const FAVORITES: usize = 7;
    pub const RATINGS: usize = 9;
    pub const PAGES: usize = 11;
    pub const REQUIRED: usize = PAGES + 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Counts {
    total_views: u64,
    average_views: u64,
    followers: u64,
    favorites: u64,
    ratings: u64,
    pages: u64,
}

pub fn parse_stats_block(document: &Html) -> WorkStats {
    let mut stats = WorkStats::default();

    let Some(block) = select_first(document.root_element(), "div.stats-content") else {
        tracing::debug!("No stats block found");
        return stats;
    };
    let lists = select(block, ".list-unstyled");

    if let Some(counts) = lists.get(1).and_then(|list| read_counts(*list)) {
        stats.views = Views {
            total: counts.total_views,
            average: counts.average_views,
        };
        stats.followers = counts.followers;
        stats.favorites = counts.favorites;
        stats.ratings = counts.ratings;
        stats.pages = counts.pages;
    }

    if let Some(score) = lists.first().and_then(|list| read_scores(*list)) {
        stats.score = score;
    }

    stats
}

fn read_counts(list: ElementRef<'_>) -> Option<Counts> {
    let items = select(list, "li");
    if items.len() < counts::REQUIRED {
        tracing::debug!("Counts list has {} items, need {}", items.len(), counts::REQUIRED);
        return None;
    }

    let count_at = |index: usize| parse_count(&items[index].text().collect::<String>());

    Some(Counts {
        total_views: count_at(counts::TOTAL_VIEWS),
        average_views: count_at(counts::AVERAGE_VIEWS),
        followers: count_at(counts::FOLLOWERS),
        favorites: count_at(counts::FAVORITES),
        ratings: count_at(counts::RATINGS),
        pages: count_at(counts::PAGES),
    })
}

fn read_scores(list: ElementRef<'_>) -> Option<Score> {
    let items = select(list, "li");
    if items.len() < ratings::REQUIRED {
        tracing::debug!("Ratings list has {} items, need {}", items.len(), ratings::REQUIRED);
        return None;
    }

    let score_at = |index: usize| parse_score(&score_attribute(items[index]));

    Some(Score {
        overall: score_at(ratings::OVERALL),
        style: score_at(ratings::STYLE),
        story: score_at(ratings::STORY),
        character: score_at(ratings::CHARACTER),
        grammar: score_at(ratings::GRAMMAR),
    })
}

/// Scores are read from the star span's `data-content`, not its display text.
fn score_attribute(item: ElementRef<'_>) -> String {
    select_first(item, "span")
        .and_then(|span| span.value().attr("data-content"))
        .map(String::from)
        .unwrap_or_default()
}

/// Left-hand side of "4.52 / 5"; `SCORE_UNAVAILABLE` when it is not a number.
pub fn parse_score(raw: &str) -> f64 {
    raw.split('/')
        .next()
        .and_then(|lhs| lhs.trim().parse::<f64>().ok())
        .unwrap_or(SCORE_UNAVAILABLE)
}

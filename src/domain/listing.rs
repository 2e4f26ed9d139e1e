use serde::{Deserialize, Serialize};

use crate::domain::work::SCORE_UNAVAILABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingKind {
    /// Best-rated listing page.
    Popular,
    /// Title search results page.
    Search,
}

/// Lightweight summary of a work as shown on a listing or search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub kind: ListingKind,
    pub id: u64,
    pub title: String,
    pub image: String,
    pub author: String,
    pub tags: Vec<String>,
    /// Search results only.
    pub fiction_type: String,
    /// Search results only.
    pub status: String,
    /// Search results only.
    pub description: String,
    pub stats: ListingStats,
}

impl ListingEntry {
    pub fn new(kind: ListingKind) -> Self {
        Self {
            kind,
            id: 0,
            title: String::new(),
            image: String::new(),
            author: String::new(),
            tags: Vec::new(),
            fiction_type: String::new(),
            status: String::new(),
            description: String::new(),
            stats: ListingStats::default(),
        }
    }

    /// One-line summary: author, type, status, compact stats and the first two tags.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.author.is_empty() {
            parts.push(format!("by {}", self.author));
        }
        if !self.fiction_type.is_empty() {
            parts.push(self.fiction_type.clone());
        }
        if !self.status.is_empty() {
            parts.push(self.status.clone());
        }

        let mut stats = Vec::new();
        if self.stats.rating > 0.0 {
            stats.push(format!("{:.1}★", self.stats.rating));
        }
        if self.stats.pages > 0 {
            stats.push(format!("{} pages", compact_count(self.stats.pages)));
        }
        if self.stats.followers > 0 {
            stats.push(format!("{} followers", compact_count(self.stats.followers)));
        }
        if !stats.is_empty() {
            parts.push(stats.join(" • "));
        }

        if !self.tags.is_empty() {
            let shown = self.tags.len().min(2);
            parts.push(self.tags[..shown].join(", "));
        }

        parts.join(" • ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListingStats {
    pub followers: u64,
    pub favorites: u64,
    pub pages: u64,
    pub views: u64,
    pub chapters: u64,
    /// `SCORE_UNAVAILABLE` when the card shows no rating.
    pub rating: f64,
}

impl Default for ListingStats {
    fn default() -> Self {
        Self {
            followers: 0,
            favorites: 0,
            pages: 0,
            views: 0,
            chapters: 0,
            rating: SCORE_UNAVAILABLE,
        }
    }
}

fn compact_count(n: u64) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

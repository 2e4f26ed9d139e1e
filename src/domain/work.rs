use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sibling chapter id meaning "there is no such chapter".
pub const NO_CHAPTER: i64 = -1;

/// Score value meaning "the site did not expose this rating".
pub const SCORE_UNAVAILABLE: f64 = -1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub id: u64,
    pub title: String,
    pub image: String,
    /// Classification badge, e.g. "Original" or "Fan Fiction".
    pub kind: String,
    pub status: String,
    pub tags: Vec<String>,
    pub warnings: Vec<String>,
    pub description: String,
    pub author: Author,
    pub stats: WorkStats,
    /// Table of contents order. Indices into this vector address chapters everywhere else.
    pub chapters: Vec<ChapterRef>,
}

impl Work {
    pub fn chapter(&self, index: usize) -> Option<&ChapterRef> {
        self.chapters.get(index)
    }

    pub fn chapter_title(&self, index: usize) -> &str {
        self.chapter(index).map(|c| c.title.as_str()).unwrap_or("")
    }

    pub fn last_chapter_index(&self) -> Option<usize> {
        self.chapters.len().checked_sub(1)
    }

    /// Clamp a requested start index into the chapter range.
    pub fn clamp_chapter_index(&self, index: usize) -> usize {
        index.min(self.last_chapter_index().unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// 0 when the profile link is missing or not numeric.
    pub id: u64,
    pub name: String,
    pub title: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkStats {
    pub pages: u64,
    pub ratings: u64,
    pub followers: u64,
    pub favorites: u64,
    pub views: Views,
    pub score: Score,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Views {
    pub total: u64,
    pub average: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub overall: f64,
    pub style: f64,
    pub story: f64,
    pub character: f64,
    pub grammar: f64,
}

impl Default for Score {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl Score {
    pub fn unavailable() -> Self {
        Self {
            overall: SCORE_UNAVAILABLE,
            style: SCORE_UNAVAILABLE,
            story: SCORE_UNAVAILABLE,
            character: SCORE_UNAVAILABLE,
            grammar: SCORE_UNAVAILABLE,
        }
    }

    /// A legitimate 0.0 is available; only the sentinel is not.
    pub fn is_available(value: f64) -> bool {
        value != SCORE_UNAVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterRef {
    pub id: u64,
    pub title: String,
    pub release: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterContent {
    /// Raw inner markup of the chapter body.
    pub content: String,
    pub pre_note: Option<String>,
    pub post_note: Option<String>,
    pub next: i64,
    pub previous: i64,
}

impl Default for ChapterContent {
    fn default() -> Self {
        Self {
            content: String::new(),
            pre_note: None,
            post_note: None,
            next: NO_CHAPTER,
            previous: NO_CHAPTER,
        }
    }
}

impl ChapterContent {
    pub fn next_chapter(&self) -> Option<u64> {
        sibling(self.next)
    }

    pub fn previous_chapter(&self) -> Option<u64> {
        sibling(self.previous)
    }
}

fn sibling(id: i64) -> Option<u64> {
    u64::try_from(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_with_chapters(n: usize) -> Work {
        Work {
            chapters: (0..n)
                .map(|i| ChapterRef {
                    id: 100 + i as u64,
                    title: format!("Chapter {}", i + 1),
                    release: Utc::now(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sentinel_sibling_is_not_an_identity() {
        let chapter = ChapterContent::default();
        assert_eq!(chapter.next, NO_CHAPTER);
        assert_eq!(chapter.next_chapter(), None);
        assert_eq!(chapter.previous_chapter(), None);

        let chapter = ChapterContent {
            next: 42,
            previous: 0,
            ..Default::default()
        };
        assert_eq!(chapter.next_chapter(), Some(42));
        assert_eq!(chapter.previous_chapter(), Some(0));
    }

    #[test]
    fn test_score_sentinel_distinct_from_zero() {
        assert!(Score::is_available(0.0));
        assert!(!Score::is_available(SCORE_UNAVAILABLE));
        assert_eq!(Score::default().overall, SCORE_UNAVAILABLE);
    }

    #[test]
    fn test_clamp_chapter_index() {
        let work = work_with_chapters(3);
        assert_eq!(work.clamp_chapter_index(0), 0);
        assert_eq!(work.clamp_chapter_index(2), 2);
        assert_eq!(work.clamp_chapter_index(10), 2);
        assert_eq!(work.chapter_title(1), "Chapter 2");
        assert_eq!(work.chapter_title(9), "");
    }

    #[test]
    fn test_empty_work_has_no_last_chapter() {
        let work = Work::default();
        assert_eq!(work.last_chapter_index(), None);
        assert_eq!(work.clamp_chapter_index(5), 0);
    }
}

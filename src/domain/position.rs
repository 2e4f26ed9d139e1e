use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a reader left off in a work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPosition {
    pub work_id: u64,
    pub title: String,
    pub author: String,
    /// 0-based index into the work's chapter list.
    pub chapter_index: usize,
    pub chapter_title: String,
    /// Page position within the chapter, in `[0.0, 1.0]`.
    pub chapter_progress: f64,
    pub last_read: DateTime<Utc>,
    pub total_chapters: usize,
}

impl ReadingPosition {
    /// "(3/20, 45% through chapter)" or "(3/20)" when at the start of a chapter.
    pub fn progress_label(&self) -> String {
        let mut label = format!("({}/{}", self.chapter_index + 1, self.total_chapters);
        if self.chapter_progress > 0.0 {
            label.push_str(&format!(
                ", {:.0}% through chapter)",
                self.chapter_progress * 100.0
            ));
        } else {
            label.push(')');
        }
        label
    }
}

pub fn clamp_progress(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

/// An explicit saved spot, one per (work, chapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub work_id: u64,
    pub work_title: String,
    pub chapter_index: usize,
    pub chapter_title: String,
    /// Line offset into the chapter's reflowed text.
    pub position: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<ReadingPosition>,
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice a most-recent-first history into 1-based pages.
///
/// Out-of-range pages are clamped into `[1, total_pages]`. An empty history
/// yields no entries and zero pages.
pub fn paginate(positions: &[ReadingPosition], page: usize, page_size: usize) -> HistoryPage {
    let total = positions.len();
    let page_size = page_size.max(1);

    if total == 0 {
        return HistoryPage {
            entries: Vec::new(),
            page: 1,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        };
    }

    let total_pages = total.div_ceil(page_size);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);

    HistoryPage {
        entries: positions[start..end].to_vec(),
        page,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

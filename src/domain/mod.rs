pub mod listing;
pub mod position;
pub mod work;

pub use listing::{ListingEntry, ListingKind, ListingStats};
pub use position::{clamp_progress, paginate, Bookmark, HistoryPage, ReadingPosition};
pub use work::{
    Author, ChapterContent, ChapterRef, Score, Views, Work, WorkStats, NO_CHAPTER,
    SCORE_UNAVAILABLE,
};

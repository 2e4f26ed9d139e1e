pub mod sqlite;

use crate::app::Result;
use crate::domain::{paginate, Bookmark, HistoryPage, ReadingPosition};

pub use sqlite::SqliteStore;

/// Everything the progress store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Most recently read first.
    pub positions: Vec<ReadingPosition>,
    pub bookmarks: Vec<Bookmark>,
}

pub trait ProgressStore {
    fn load(&self) -> Result<Snapshot>;
    /// Replace the whole contents with `positions` (most recent first) and `bookmarks`.
    fn save(&self, positions: &[ReadingPosition], bookmarks: &[Bookmark]) -> Result<()>;

    // Positions
    /// Insert or replace the entry for its work and make it the most recent.
    fn upsert_position(&self, entry: &ReadingPosition) -> Result<()>;
    fn position(&self, work_id: u64) -> Result<Option<ReadingPosition>>;
    fn positions(&self) -> Result<Vec<ReadingPosition>>;

    fn last_read(&self) -> Result<Option<ReadingPosition>> {
        Ok(self.positions()?.into_iter().next())
    }

    fn history_page(&self, page: usize, page_size: usize) -> Result<HistoryPage> {
        Ok(paginate(&self.positions()?, page, page_size))
    }

    // Bookmarks
    /// Insert or replace by (work, chapter).
    fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()>;
    /// Returns whether a bookmark was removed.
    fn remove_bookmark(&self, work_id: u64, chapter_index: usize) -> Result<bool>;
    fn bookmarks(&self) -> Result<Vec<Bookmark>>;
}

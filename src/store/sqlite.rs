use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{FolioError, Result};
use crate::domain::{clamp_progress, Bookmark, ReadingPosition};
use crate::store::{ProgressStore, Snapshot};

const POSITION_COLUMNS: &str = "work_id, title, author, chapter_index, chapter_title,
     chapter_progress, last_read, total_chapters";

const BOOKMARK_COLUMNS: &str =
    "work_id, work_title, chapter_index, chapter_title, position, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| FolioError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            FolioError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    fn position_from_row(row: &Row<'_>) -> rusqlite::Result<ReadingPosition> {
        Ok(ReadingPosition {
            work_id: row.get::<_, i64>(0)? as u64,
            title: row.get(1)?,
            author: row.get(2)?,
            chapter_index: row.get::<_, i64>(3)? as usize,
            chapter_title: row.get(4)?,
            chapter_progress: clamp_progress(row.get(5)?),
            last_read: row
                .get::<_, String>(6)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            total_chapters: row.get::<_, i64>(7)? as usize,
        })
    }

    fn bookmark_from_row(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            work_id: row.get::<_, i64>(0)? as u64,
            work_title: row.get(1)?,
            chapter_index: row.get::<_, i64>(2)? as usize,
            chapter_title: row.get(3)?,
            position: row.get::<_, i64>(4)? as usize,
            created_at: row
                .get::<_, String>(5)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }

    fn insert_position(conn: &Connection, entry: &ReadingPosition, seq: i64) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO positions
             (work_id, title, author, chapter_index, chapter_title,
              chapter_progress, last_read, total_chapters, seq)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.work_id as i64,
                entry.title,
                entry.author,
                entry.chapter_index as i64,
                entry.chapter_title,
                clamp_progress(entry.chapter_progress),
                entry.last_read.to_rfc3339(),
                entry.total_chapters as i64,
                seq
            ],
        )?;
        Ok(())
    }

    fn insert_bookmark(conn: &Connection, bookmark: &Bookmark) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO bookmarks
             (work_id, work_title, chapter_index, chapter_title, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                bookmark.work_id as i64,
                bookmark.work_title,
                bookmark.chapter_index as i64,
                bookmark.chapter_title,
                bookmark.position as i64,
                bookmark.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }
}

impl ProgressStore for SqliteStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            positions: self.positions()?,
            bookmarks: self.bookmarks()?,
        })
    }

    fn save(&self, positions: &[ReadingPosition], bookmarks: &[Bookmark]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM positions", [])?;
        tx.execute("DELETE FROM bookmarks", [])?;

        // first entry gets the highest seq so it reads back first
        let count = positions.len() as i64;
        for (i, entry) in positions.iter().enumerate() {
            Self::insert_position(&tx, entry, count - i as i64)?;
        }
        for bookmark in bookmarks {
            Self::insert_bookmark(&tx, bookmark)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn upsert_position(&self, entry: &ReadingPosition) -> Result<()> {
        let conn = self.conn()?;

        let seq: i64 = conn.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM positions",
            [],
            |row| row.get(0),
        )?;
        Self::insert_position(&conn, entry, seq)?;

        tracing::debug!(
            "Saved position for work {}: chapter {} at {:.2}",
            entry.work_id,
            entry.chapter_index + 1,
            entry.chapter_progress
        );
        Ok(())
    }

    fn position(&self, work_id: u64) -> Result<Option<ReadingPosition>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                &format!("SELECT {} FROM positions WHERE work_id = ?1", POSITION_COLUMNS),
                params![work_id as i64],
                Self::position_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn positions(&self) -> Result<Vec<ReadingPosition>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM positions ORDER BY seq DESC",
            POSITION_COLUMNS
        ))?;
        let positions = stmt
            .query_map([], Self::position_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(positions)
    }

    fn add_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        let conn = self.conn()?;
        Self::insert_bookmark(&conn, bookmark)
    }

    fn remove_bookmark(&self, work_id: u64, chapter_index: usize) -> Result<bool> {
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM bookmarks WHERE work_id = ?1 AND chapter_index = ?2",
            params![work_id as i64, chapter_index as i64],
        )?;

        Ok(removed > 0)
    }

    fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bookmarks ORDER BY created_at, work_id, chapter_index",
            BOOKMARK_COLUMNS
        ))?;
        let bookmarks = stmt
            .query_map([], Self::bookmark_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bookmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn position(work_id: u64, chapter_index: usize) -> ReadingPosition {
        ReadingPosition {
            work_id,
            title: format!("Work {}", work_id),
            author: "Author".into(),
            chapter_index,
            chapter_title: format!("Chapter {}", chapter_index + 1),
            chapter_progress: 0.5,
            last_read: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            total_chapters: 20,
        }
    }

    fn bookmark(work_id: u64, chapter_index: usize, position: usize) -> Bookmark {
        Bookmark {
            work_id,
            work_title: format!("Work {}", work_id),
            chapter_index,
            chapter_title: format!("Chapter {}", chapter_index + 1),
            position,
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
                + Duration::minutes(chapter_index as i64),
        }
    }

    #[test]
    fn test_upsert_and_get_position() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_position(&position(1, 3)).unwrap();

        let retrieved = store.position(1).unwrap().unwrap();
        assert_eq!(retrieved, position(1, 3));
        assert!(store.position(2).unwrap().is_none());
    }

    #[test]
    fn test_upsert_promotes_to_most_recent() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_position(&position(1, 0)).unwrap();
        store.upsert_position(&position(2, 0)).unwrap();
        store.upsert_position(&position(3, 0)).unwrap();

        store.upsert_position(&position(1, 5)).unwrap();

        let order: Vec<u64> = store.positions().unwrap().iter().map(|p| p.work_id).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert_eq!(store.last_read().unwrap().unwrap().chapter_index, 5);
        // replaced, not duplicated
        assert_eq!(store.positions().unwrap().len(), 3);
    }

    #[test]
    fn test_progress_is_clamped_on_write() {
        let store = SqliteStore::in_memory().unwrap();
        let mut entry = position(1, 0);
        entry.chapter_progress = 1.7;
        store.upsert_position(&entry).unwrap();

        assert_eq!(store.position(1).unwrap().unwrap().chapter_progress, 1.0);
    }

    #[test]
    fn test_empty_store() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.last_read().unwrap().is_none());
        assert_eq!(store.load().unwrap(), Snapshot::default());

        let page = store.history_page(1, 10).unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_history_page() {
        let store = SqliteStore::in_memory().unwrap();
        for id in 1..=25 {
            store.upsert_position(&position(id, 0)).unwrap();
        }

        let page = store.history_page(3, 10).unwrap();
        assert_eq!(page.entries.len(), 5);
        assert!(!page.has_next);
        assert!(page.has_prev);
        // most recent first, so the oldest five land on the last page
        assert_eq!(page.entries[0].work_id, 5);
        assert_eq!(page.entries[4].work_id, 1);
    }

    #[test]
    fn test_bookmark_upsert_by_work_and_chapter() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_bookmark(&bookmark(1, 2, 10)).unwrap();
        store.add_bookmark(&bookmark(1, 3, 0)).unwrap();
        store.add_bookmark(&bookmark(1, 2, 40)).unwrap();

        let bookmarks = store.bookmarks().unwrap();
        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].chapter_index, 2);
        assert_eq!(bookmarks[0].position, 40);
    }

    #[test]
    fn test_remove_bookmark() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_bookmark(&bookmark(1, 2, 10)).unwrap();

        assert!(store.remove_bookmark(1, 2).unwrap());
        assert!(!store.remove_bookmark(1, 2).unwrap());
        assert!(store.bookmarks().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_everything() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_position(&position(9, 0)).unwrap();
        store.add_bookmark(&bookmark(9, 0, 0)).unwrap();

        let positions = vec![position(1, 0), position(2, 1)];
        let bookmarks = vec![bookmark(2, 1, 7)];
        store.save(&positions, &bookmarks).unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.positions, positions);
        assert_eq!(snapshot.bookmarks, bookmarks);

        // upserts after a save still go to the front
        store.upsert_position(&position(2, 4)).unwrap();
        assert_eq!(store.last_read().unwrap().unwrap().work_id, 2);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.upsert_position(&position(21220, 7)).unwrap();
            store.add_bookmark(&bookmark(21220, 7, 120)).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.positions, vec![position(21220, 7)]);
        assert_eq!(snapshot.bookmarks[0].position, 120);
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{FolioError, Result};
use crate::config::Config;
use crate::domain::ReadingPosition;
use crate::fetcher::{Fetcher, HttpFetcher, SiteClient};
use crate::reader::PageDirective;
use crate::store::{ProgressStore, SqliteStore};

/// Everything one run of folio works against.
pub struct SessionContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub client: SiteClient,
}

impl SessionContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.network)?);

        Ok(Self {
            config,
            store,
            client: SiteClient::new(fetcher),
        })
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.network)?);
        Self::with_fetcher(config, fetcher)
    }

    /// In-memory store with a caller-supplied fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        Ok(Self {
            config,
            store: Arc::new(SqliteStore::in_memory()?),
            client: SiteClient::new(fetcher),
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FolioError::Config("Could not find data directory".into()))?;
        let folio_dir = data_dir.join("folio");
        std::fs::create_dir_all(&folio_dir)?;
        Ok(folio_dir.join("folio.db"))
    }
}

/// Parse a work identity; anything but a plain decimal number is rejected.
pub fn parse_work_id(work_id: &str) -> Result<u64> {
    let trimmed = work_id.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FolioError::InvalidInput(format!(
            "work id must be numeric, got {:?}",
            work_id
        )));
    }
    trimmed
        .parse()
        .map_err(|_| FolioError::InvalidInput(format!("work id out of range: {}", work_id)))
}

/// Chapter index and landing page for a session, given what was saved last time.
///
/// Without an explicit start the saved chapter is reopened. The saved page is
/// restored only when the start chapter is the saved one and reading had
/// moved past its first page.
pub fn resume_plan(saved: Option<&ReadingPosition>, start_chapter: Option<usize>) -> (usize, PageDirective) {
    let chapter = start_chapter
        .or_else(|| saved.map(|s| s.chapter_index))
        .unwrap_or(0);

    match saved {
        Some(saved) if saved.chapter_index == chapter && saved.chapter_progress > 0.0 => {
            (chapter, PageDirective::RestoreFraction(saved.chapter_progress))
        }
        _ => (chapter, PageDirective::FirstPage),
    }
}

/// Open a work in the terminal reader, picking up where it was left.
pub async fn open_reader(ctx: &SessionContext, work_id: &str, start_chapter: Option<usize>) -> Result<()> {
    let work_id = parse_work_id(work_id)?;
    let saved = ctx.store.position(work_id)?;
    let (chapter, directive) = resume_plan(saved.as_ref(), start_chapter);

    tracing::info!(
        "Opening work {} at chapter {} ({:?})",
        work_id,
        chapter + 1,
        directive
    );
    crate::tui::run(ctx, work_id, chapter, directive).await
}

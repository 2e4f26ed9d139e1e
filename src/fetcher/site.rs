use std::sync::Arc;

use url::form_urlencoded::byte_serialize;

use crate::app::Result;
use crate::domain::{ChapterContent, ListingEntry, ListingKind, Work};
use crate::extract::{parse_chapter_document, parse_listing_document, parse_work_document};
use crate::fetcher::Fetcher;
use crate::reader::{LoadOutcome, LoadRequest};

pub const POPULAR_PATH: &str = "/fictions/best-rated";

pub fn work_path(id: u64) -> String {
    format!("/fiction/{}", id)
}

/// The site resolves a chapter by id alone; the work and slug segments are placeholders.
pub fn chapter_path(id: u64) -> String {
    format!("/fiction/0/_/chapter/{}/_", id)
}

pub fn search_path(query: &str) -> String {
    let encoded: String = byte_serialize(query.as_bytes()).collect();
    format!("/fictions/search?title={}", encoded)
}

/// Pairs each document kind with its path and extractor.
#[derive(Clone)]
pub struct SiteClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl SiteClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self { fetcher }
    }

    pub async fn work(&self, id: u64) -> Result<Work> {
        let markup = self.fetcher.fetch(&work_path(id)).await?;
        parse_work_document(&markup, id)
    }

    pub async fn chapter(&self, id: u64) -> Result<ChapterContent> {
        let markup = self.fetcher.fetch(&chapter_path(id)).await?;
        parse_chapter_document(&markup)
    }

    pub async fn popular(&self) -> Result<Vec<ListingEntry>> {
        let markup = self.fetcher.fetch(POPULAR_PATH).await?;
        parse_listing_document(&markup, ListingKind::Popular)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ListingEntry>> {
        let markup = self.fetcher.fetch(&search_path(query)).await?;
        parse_listing_document(&markup, ListingKind::Search)
    }

    /// Perform a reader request, folding any failure into the outcome.
    pub async fn load(&self, request: LoadRequest) -> LoadOutcome {
        let outcome = match request {
            LoadRequest::Work { work_id, .. } => self.work(work_id).await.map(LoadOutcome::WorkLoaded),
            LoadRequest::Chapter {
                chapter_id, index, ..
            } => self
                .chapter(chapter_id)
                .await
                .map(|content| LoadOutcome::ChapterLoaded { content, index }),
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!("Load failed: {}", e);
            LoadOutcome::Failed(e.kind())
        })
    }
}

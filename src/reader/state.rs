use chrono::{DateTime, Utc};

use crate::app::{ErrorKind, FolioError, Result};
use crate::domain::{clamp_progress, ChapterContent, ReadingPosition, Work};
use crate::reader::pagination::Pagination;
use crate::reader::Viewport;
use crate::reflow::FormattedChapter;

/// Sequence number tying a completion back to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Where to land once a chapter arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageDirective {
    FirstPage,
    LastPage,
    RestoreFraction(f64),
}

/// A fetch the reader wants performed. The reader never does I/O itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    Work {
        work_id: u64,
        ticket: Ticket,
    },
    Chapter {
        chapter_id: u64,
        index: usize,
        ticket: Ticket,
    },
}

impl LoadRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            LoadRequest::Work { ticket, .. } | LoadRequest::Chapter { ticket, .. } => *ticket,
        }
    }
}

/// Result of a [`LoadRequest`], delivered back through [`Reader::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    WorkLoaded(Work),
    ChapterLoaded {
        content: ChapterContent,
        index: usize,
    },
    Failed(ErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Work { work_id: u64 },
    Chapter { chapter_id: u64, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InFlight {
    ticket: Ticket,
    target: Target,
    directive: PageDirective,
}

/// One reading session: the open work, the current chapter and its pages.
///
/// Every transition runs to completion and, when content is needed, returns a
/// [`LoadRequest`] instead of fetching. While a request is in flight no other
/// chapter request is issued, and a completion whose ticket is not the latest
/// one issued is dropped.
#[derive(Debug)]
pub struct Reader {
    work: Option<Work>,
    chapter: Option<ChapterContent>,
    formatted: Option<FormattedChapter>,
    pagination: Pagination,
    chapter_index: usize,
    viewport: Viewport,
    loading: bool,
    error: Option<ErrorKind>,
    start_chapter: usize,
    start_directive: PageDirective,
    issued: u64,
    in_flight: Option<InFlight>,
    last_issued: Option<InFlight>,
}

impl Reader {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            work: None,
            chapter: None,
            formatted: None,
            pagination: Pagination::new(viewport.lines_per_page()),
            chapter_index: 0,
            viewport,
            loading: false,
            error: None,
            start_chapter: 0,
            start_directive: PageDirective::FirstPage,
            issued: 0,
            in_flight: None,
            last_issued: None,
        }
    }

    /// Start a session on `work_id`. Once the work arrives, `start_chapter`
    /// (clamped into range) is requested with `directive`.
    pub fn open(&mut self, work_id: u64, start_chapter: usize, directive: PageDirective) -> LoadRequest {
        self.work = None;
        self.chapter = None;
        self.formatted = None;
        self.pagination = Pagination::new(self.viewport.lines_per_page());
        self.chapter_index = 0;
        self.error = None;
        self.start_chapter = start_chapter;
        self.start_directive = directive;

        self.issue(Target::Work { work_id }, directive)
    }

    /// Request chapter `index`. Out-of-range indices are rejected before any
    /// fetch; `Ok(None)` means a load is already in flight.
    pub fn load_chapter(&mut self, index: usize, directive: PageDirective) -> Result<Option<LoadRequest>> {
        let count = self.chapter_count();
        if index >= count {
            return Err(FolioError::InvalidInput(format!(
                "chapter {} out of range (work has {} chapters)",
                index + 1,
                count
            )));
        }
        Ok(self.request_chapter(index, directive))
    }

    pub fn advance_page(&mut self) -> Option<LoadRequest> {
        if self.chapter.is_none() || self.pagination.next() {
            return None;
        }
        if self.has_next_chapter() {
            return self.request_chapter(self.chapter_index + 1, PageDirective::FirstPage);
        }
        None
    }

    pub fn retreat_page(&mut self) -> Option<LoadRequest> {
        if self.chapter.is_none() || self.pagination.prev() {
            return None;
        }
        if self.has_previous_chapter() {
            return self.request_chapter(self.chapter_index - 1, PageDirective::LastPage);
        }
        None
    }

    pub fn advance_chapter(&mut self) -> Option<LoadRequest> {
        if !self.has_next_chapter() {
            return None;
        }
        self.request_chapter(self.chapter_index + 1, PageDirective::FirstPage)
    }

    pub fn retreat_chapter(&mut self) -> Option<LoadRequest> {
        if !self.has_previous_chapter() {
            return None;
        }
        self.request_chapter(self.chapter_index - 1, PageDirective::FirstPage)
    }

    /// Previous chapter, landing on its last page.
    pub fn retreat_chapter_to_end(&mut self) -> Option<LoadRequest> {
        if !self.has_previous_chapter() {
            return None;
        }
        self.request_chapter(self.chapter_index - 1, PageDirective::LastPage)
    }

    /// Indices past the end of the work are ignored.
    pub fn jump_to_chapter(&mut self, index: usize) -> Option<LoadRequest> {
        if index >= self.chapter_count() {
            return None;
        }
        self.request_chapter(index, PageDirective::FirstPage)
    }

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn last_page(&mut self) {
        self.pagination.last();
    }

    /// Re-wrap the current chapter for a new terminal size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let lines = self
            .formatted
            .as_ref()
            .map(|formatted| formatted.lines(viewport.text_width()))
            .unwrap_or_default();
        self.pagination.reflow(lines, viewport.lines_per_page());
    }

    /// Re-issue the most recent request, e.g. after a network failure.
    pub fn retry(&mut self) -> Option<LoadRequest> {
        if self.loading {
            return None;
        }
        let last = self.last_issued?;
        self.error = None;
        Some(self.issue(last.target, last.directive))
    }

    /// Feed a completion back in. Returns a follow-up request when the
    /// outcome needs one (a loaded work asks for its first chapter).
    pub fn apply(&mut self, ticket: Ticket, outcome: LoadOutcome) -> Option<LoadRequest> {
        let Some(in_flight) = self.in_flight.filter(|pending| pending.ticket == ticket) else {
            tracing::debug!("Discarding stale completion for ticket {}", ticket.0);
            return None;
        };
        self.in_flight = None;
        self.loading = false;

        match outcome {
            LoadOutcome::WorkLoaded(work) => {
                if work.chapters.is_empty() {
                    self.error = Some(ErrorKind::NoChapters);
                    self.work = Some(work);
                    return None;
                }
                let index = work.clamp_chapter_index(self.start_chapter);
                self.work = Some(work);
                self.error = None;
                self.request_chapter(index, self.start_directive)
            }
            LoadOutcome::ChapterLoaded { content, index } => {
                let formatted = FormattedChapter::from_content(&content);
                let lines = formatted.lines(self.viewport.text_width());

                self.chapter_index = index;
                self.pagination.reflow(lines, self.viewport.lines_per_page());
                match in_flight.directive {
                    PageDirective::FirstPage => self.pagination.first(),
                    PageDirective::LastPage => self.pagination.last(),
                    PageDirective::RestoreFraction(f) => self.pagination.restore_fraction(f),
                }
                self.chapter = Some(content);
                self.formatted = Some(formatted);
                self.error = None;
                None
            }
            LoadOutcome::Failed(kind) => {
                tracing::debug!("Load failed: {}", kind);
                self.error = Some(kind);
                None
            }
        }
    }

    /// `current_page / total_pages`, clamped to `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        self.pagination.fraction()
    }

    /// What to persist for this session, once a chapter is on screen.
    pub fn position(&self, now: DateTime<Utc>) -> Option<ReadingPosition> {
        let work = self.work.as_ref()?;
        self.chapter.as_ref()?;

        Some(ReadingPosition {
            work_id: work.id,
            title: work.title.clone(),
            author: work.author.name.clone(),
            chapter_index: self.chapter_index,
            chapter_title: work.chapter_title(self.chapter_index).to_string(),
            chapter_progress: clamp_progress(self.progress_fraction()),
            last_read: now,
            total_chapters: work.chapters.len(),
        })
    }

    pub fn page_lines(&self) -> Vec<String> {
        self.pagination.visible()
    }

    pub fn work(&self) -> Option<&Work> {
        self.work.as_ref()
    }

    pub fn chapter(&self) -> Option<&ChapterContent> {
        self.chapter.as_ref()
    }

    pub fn chapter_index(&self) -> usize {
        self.chapter_index
    }

    pub fn chapter_count(&self) -> usize {
        self.work.as_ref().map(|w| w.chapters.len()).unwrap_or(0)
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        self.error.as_ref()
    }

    pub fn has_next_chapter(&self) -> bool {
        self.chapter_index + 1 < self.chapter_count()
    }

    pub fn has_previous_chapter(&self) -> bool {
        self.chapter_index > 0 && self.chapter_count() > 0
    }

    /// Last page of the last chapter.
    pub fn is_at_end(&self) -> bool {
        self.chapter.is_some() && self.pagination.is_last() && !self.has_next_chapter()
    }

    fn request_chapter(&mut self, index: usize, directive: PageDirective) -> Option<LoadRequest> {
        if self.loading {
            tracing::debug!("Load in flight, ignoring request for chapter {}", index + 1);
            return None;
        }
        let chapter_id = self.work.as_ref()?.chapter(index)?.id;
        Some(self.issue(Target::Chapter { chapter_id, index }, directive))
    }

    fn issue(&mut self, target: Target, directive: PageDirective) -> LoadRequest {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let in_flight = InFlight {
            ticket,
            target,
            directive,
        };

        self.loading = true;
        self.in_flight = Some(in_flight);
        self.last_issued = Some(in_flight);

        match target {
            Target::Work { work_id } => LoadRequest::Work { work_id, ticket },
            Target::Chapter { chapter_id, index } => LoadRequest::Chapter {
                chapter_id,
                index,
                ticket,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, ChapterRef};

    const VIEWPORT: Viewport = Viewport {
        width: 84,
        height: 15,
    };

    fn work(chapters: usize) -> Work {
        Work {
            id: 42,
            title: "Test Work".to_string(),
            author: Author {
                name: "Jane".to_string(),
                ..Default::default()
            },
            chapters: (0..chapters)
                .map(|i| ChapterRef {
                    id: 1000 + i as u64,
                    title: format!("Chapter {}", i + 1),
                    release: Utc::now(),
                })
                .collect(),
            ..Default::default()
        }
    }

    /// A body that wraps to exactly `lines` lines at the test viewport: each
    /// word fills a whole 80-column line.
    fn content(lines: usize) -> ChapterContent {
        let body = vec!["x".repeat(80); lines].join(" ");
        ChapterContent {
            content: body,
            ..Default::default()
        }
    }

    /// Open a work of `chapters` chapters and land on `start` with pages of
    /// `lines_per_chapter` lines (10 per page in the test viewport).
    fn opened(chapters: usize, start: usize, lines_per_chapter: usize) -> Reader {
        let mut reader = Reader::new(VIEWPORT);
        let open = reader.open(42, start, PageDirective::FirstPage);
        let request = reader
            .apply(open.ticket(), LoadOutcome::WorkLoaded(work(chapters)))
            .unwrap();
        deliver(&mut reader, request, lines_per_chapter);
        reader
    }

    fn deliver(reader: &mut Reader, request: LoadRequest, lines: usize) {
        match request {
            LoadRequest::Chapter { index, ticket, .. } => {
                let follow = reader.apply(
                    ticket,
                    LoadOutcome::ChapterLoaded {
                        content: content(lines),
                        index,
                    },
                );
                assert!(follow.is_none());
            }
            other => panic!("expected chapter request, got {:?}", other),
        }
    }

    fn assert_page_invariant(reader: &Reader) {
        assert!(reader.total_pages() >= 1);
        assert!(reader.current_page() < reader.total_pages());
    }

    #[test]
    fn test_viewport_dimensions() {
        assert_eq!(VIEWPORT.lines_per_page(), 10);
        assert_eq!(VIEWPORT.text_width(), 80);

        let tiny = Viewport {
            width: 10,
            height: 3,
        };
        assert_eq!(tiny.lines_per_page(), 10);
        assert_eq!(tiny.text_width(), 40);
    }

    #[test]
    fn test_open_requests_work_then_start_chapter() {
        let mut reader = Reader::new(VIEWPORT);
        let open = reader.open(42, 2, PageDirective::FirstPage);
        assert!(matches!(open, LoadRequest::Work { work_id: 42, .. }));
        assert!(reader.is_loading());

        let next = reader.apply(open.ticket(), LoadOutcome::WorkLoaded(work(5)));
        assert!(matches!(
            next,
            Some(LoadRequest::Chapter {
                chapter_id: 1002,
                index: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_open_clamps_start_chapter() {
        let mut reader = Reader::new(VIEWPORT);
        let open = reader.open(42, 99, PageDirective::FirstPage);
        let next = reader.apply(open.ticket(), LoadOutcome::WorkLoaded(work(3)));

        assert!(matches!(next, Some(LoadRequest::Chapter { index: 2, .. })));
    }

    #[test]
    fn test_work_without_chapters_is_an_error() {
        let mut reader = Reader::new(VIEWPORT);
        let open = reader.open(42, 0, PageDirective::FirstPage);
        let next = reader.apply(open.ticket(), LoadOutcome::WorkLoaded(work(0)));

        assert!(next.is_none());
        assert_eq!(reader.error(), Some(&ErrorKind::NoChapters));
        assert!(!reader.is_loading());
    }

    #[test]
    fn test_advance_page_crosses_into_next_chapter() {
        let mut reader = opened(3, 0, 25);
        assert_eq!(reader.total_pages(), 3);

        assert!(reader.advance_page().is_none());
        assert!(reader.advance_page().is_none());
        assert_eq!(reader.current_page(), 2);

        let request = reader.advance_page().unwrap();
        assert!(matches!(request, LoadRequest::Chapter { index: 1, .. }));
        deliver(&mut reader, request, 25);

        assert_eq!(reader.chapter_index(), 1);
        assert_eq!(reader.current_page(), 0);
        assert_page_invariant(&reader);
    }

    #[test]
    fn test_advance_page_at_end_of_work_is_noop() {
        let mut reader = opened(2, 1, 15);
        reader.last_page();

        assert!(reader.is_at_end());
        assert!(reader.advance_page().is_none());
        assert!(!reader.is_loading());
        assert_eq!(reader.chapter_index(), 1);
        assert_eq!(reader.current_page(), 1);
    }

    #[test]
    fn test_retreat_page_lands_on_last_page_of_previous_chapter() {
        let mut reader = opened(3, 1, 12);
        assert_eq!(reader.current_page(), 0);

        let request = reader.retreat_page().unwrap();
        assert!(matches!(request, LoadRequest::Chapter { index: 0, .. }));
        deliver(&mut reader, request, 35);

        assert_eq!(reader.chapter_index(), 0);
        assert_eq!(reader.total_pages(), 4);
        assert_eq!(reader.current_page(), 3);
    }

    #[test]
    fn test_retreat_page_at_start_of_work_is_noop() {
        let mut reader = opened(3, 0, 30);
        assert!(reader.retreat_page().is_none());
        assert_eq!(reader.current_page(), 0);
        assert!(!reader.is_loading());
    }

    #[test]
    fn test_chapter_moves_are_bounded() {
        let mut reader = opened(2, 0, 10);
        assert!(reader.retreat_chapter().is_none());
        assert!(reader.retreat_chapter_to_end().is_none());

        let request = reader.advance_chapter().unwrap();
        deliver(&mut reader, request, 10);
        assert_eq!(reader.chapter_index(), 1);
        assert!(reader.advance_chapter().is_none());
        assert!(reader.jump_to_chapter(2).is_none());

        let request = reader.jump_to_chapter(0).unwrap();
        assert!(matches!(request, LoadRequest::Chapter { index: 0, .. }));
    }

    #[test]
    fn test_retreat_chapter_to_end() {
        let mut reader = opened(2, 1, 10);
        let request = reader.retreat_chapter_to_end().unwrap();
        deliver(&mut reader, request, 45);

        assert_eq!(reader.chapter_index(), 0);
        assert_eq!(reader.current_page(), 4);
    }

    #[test]
    fn test_load_chapter_out_of_range_is_invalid_input() {
        let mut reader = opened(2, 0, 10);
        let err = reader.load_chapter(5, PageDirective::FirstPage).unwrap_err();

        assert!(matches!(err, FolioError::InvalidInput(_)));
        assert!(!reader.is_loading());
    }

    #[test]
    fn test_loading_gates_new_requests() {
        let mut reader = opened(3, 0, 10);
        let first = reader.advance_chapter();
        assert!(first.is_some());

        assert!(reader.advance_chapter().is_none());
        assert!(reader.load_chapter(2, PageDirective::FirstPage).unwrap().is_none());
    }

    #[test]
    fn test_restore_fraction_round_trip() {
        let mut reader = Reader::new(VIEWPORT);
        let open = reader.open(42, 0, PageDirective::RestoreFraction(0.5));
        let request = reader
            .apply(open.ticket(), LoadOutcome::WorkLoaded(work(1)))
            .unwrap();
        deliver(&mut reader, request, 75);

        assert_eq!(reader.total_pages(), 8);
        assert_eq!(reader.current_page(), 4);
        assert_eq!(reader.progress_fraction(), 0.5);
    }

    #[test]
    fn test_failure_keeps_last_good_state_and_retry_reissues() {
        let mut reader = opened(3, 0, 30);
        reader.advance_page();
        let request = reader.advance_chapter().unwrap();

        reader.apply(
            request.ticket(),
            LoadOutcome::Failed(ErrorKind::Transport("timed out".to_string())),
        );
        assert!(reader.error().is_some_and(ErrorKind::is_retryable));
        assert_eq!(reader.chapter_index(), 0);
        assert_eq!(reader.current_page(), 1);

        let retry = reader.retry().unwrap();
        assert_ne!(retry.ticket(), request.ticket());
        assert!(matches!(retry, LoadRequest::Chapter { index: 1, .. }));
        assert!(reader.error().is_none());

        deliver(&mut reader, retry, 10);
        assert_eq!(reader.chapter_index(), 1);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut reader = Reader::new(VIEWPORT);
        let stale = reader.open(1, 0, PageDirective::FirstPage);
        let fresh = reader.open(42, 0, PageDirective::FirstPage);

        assert!(reader
            .apply(stale.ticket(), LoadOutcome::WorkLoaded(work(9)))
            .is_none());
        assert!(reader.work().is_none());
        assert!(reader.is_loading());

        assert!(reader
            .apply(fresh.ticket(), LoadOutcome::WorkLoaded(work(2)))
            .is_some());
        assert_eq!(reader.chapter_count(), 2);
    }

    #[test]
    fn test_resize_rewraps_and_clamps() {
        let mut reader = opened(1, 0, 40);
        reader.last_page();
        assert_eq!(reader.current_page(), 3);

        reader.resize(Viewport {
            width: 84,
            height: 45,
        });
        assert_eq!(reader.total_pages(), 1);
        assert_eq!(reader.current_page(), 0);
        assert_eq!(reader.page_lines().len(), 40);
        assert_page_invariant(&reader);
    }

    #[test]
    fn test_position_descriptor() {
        let mut reader = opened(4, 2, 40);
        reader.advance_page();
        let now = Utc::now();
        let position = reader.position(now).unwrap();

        assert_eq!(position.work_id, 42);
        assert_eq!(position.title, "Test Work");
        assert_eq!(position.author, "Jane");
        assert_eq!(position.chapter_index, 2);
        assert_eq!(position.chapter_title, "Chapter 3");
        assert_eq!(position.chapter_progress, 0.25);
        assert_eq!(position.total_chapters, 4);
        assert_eq!(position.last_read, now);
    }

    #[test]
    fn test_no_position_before_first_chapter() {
        let mut reader = Reader::new(VIEWPORT);
        assert!(reader.position(Utc::now()).is_none());
        reader.open(42, 0, PageDirective::FirstPage);
        assert!(reader.position(Utc::now()).is_none());
    }

    #[test]
    fn test_page_invariant_across_transitions() {
        let mut reader = opened(3, 0, 23);
        for _ in 0..20 {
            if let Some(request) = reader.advance_page() {
                deliver(&mut reader, request, 23);
            }
            assert_page_invariant(&reader);
        }
        assert!(reader.is_at_end());
        for _ in 0..20 {
            if let Some(request) = reader.retreat_page() {
                deliver(&mut reader, request, 23);
            }
            assert_page_invariant(&reader);
        }
        assert_eq!(reader.chapter_index(), 0);
        assert_eq!(reader.current_page(), 0);
    }
}

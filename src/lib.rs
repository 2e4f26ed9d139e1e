//! # Folio
//!
//! A terminal reader for serialized web fiction.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Extract → Reflow → Reader → TUI
//!                                 ↓
//!                               Store
//! ```
//!
//! - [`fetcher`]: HTTP transport and the site's path scheme
//! - [`extract`]: Turns work, chapter and listing pages into domain records
//! - [`reflow`]: Cleans chapter markup into wrapped plain-text lines
//! - [`reader`]: Pagination and the reading state machine
//! - [`store`]: SQLite reading history and bookmarks
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # See what's popular
//! folio browse
//!
//! # Find something
//! folio search mother of learning
//!
//! # Read it, starting at chapter 3
//! folio read 21220 --chapter 3
//!
//! # Pick up where you left off
//! folio continue
//! ```

/// Session context and error types.
///
/// [`SessionContext`](app::SessionContext) wires together config, store and
/// site client; [`open_reader`](app::context::open_reader) restores a saved
/// position and starts the reader.
pub mod app;

/// Command-line interface using clap.
///
/// - `read <work-id> [--chapter N]` - Read a work
/// - `continue` - Reopen the last work read
/// - `history [--page N] [--print]` - Reading history
/// - `browse [--print]` - Best-rated works
/// - `search <query> [--print]` - Search by title
///
/// Lists open in a picker where Enter starts the reader; `--print` writes
/// them to stdout instead.
/// - `bookmarks` - Saved bookmarks
pub mod cli;

/// Configuration loaded from `~/.config/folio/config.toml`:
/// colors, keybindings, reading and network settings.
pub mod config;

/// Core domain models.
///
/// - [`Work`](domain::Work): metadata, stats and table of contents
/// - [`ChapterContent`](domain::ChapterContent): chapter body, notes, siblings
/// - [`ListingEntry`](domain::ListingEntry): browse and search results
/// - [`ReadingPosition`](domain::ReadingPosition), [`Bookmark`](domain::Bookmark)
pub mod domain;

/// Page extraction.
///
/// Missing or malformed fields degrade to defaults; only an empty document
/// is an error.
pub mod extract;

/// Document fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for raw document transport
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`SiteClient`](fetcher::SiteClient): Paths plus extractors per document kind
pub mod fetcher;

/// Pagination and reading state.
pub mod reader;

/// Chapter text cleanup and word wrapping.
pub mod reflow;

/// SQLite persistence layer.
///
/// - [`ProgressStore`](store::ProgressStore): Trait defining progress operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal user interface.
///
/// Header, page body and footer, with help and table of contents overlays.
/// Keybindings: Space/j next page, k previous page, n/p chapters, t contents,
/// B bookmark, r retry, ? help, q quits.
pub mod tui;

//! Paginated reading state for one open work.
//!
//! [`Reader`] holds the current chapter as wrapped lines split into
//! fixed-height pages. Navigation past either end of a chapter turns into a
//! chapter load, and every load goes out as a [`LoadRequest`] value that the
//! caller performs and answers with a [`LoadOutcome`].

pub mod pagination;
pub mod state;

pub use pagination::Pagination;
pub use state::{LoadOutcome, LoadRequest, PageDirective, Reader, Ticket};

use crate::reflow::MIN_TEXT_WIDTH;

/// Rows taken by the header above the page.
pub const HEADER_ROWS: u16 = 4;
/// Rows taken by the footer below the page.
pub const FOOTER_ROWS: u16 = 1;
/// Fewest text lines a page ever holds.
pub const MIN_LINES_PER_PAGE: usize = 10;
/// Columns of horizontal padding around the text.
pub const HORIZONTAL_PADDING: u16 = 4;

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn lines_per_page(&self) -> usize {
        (self.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS) as usize).max(MIN_LINES_PER_PAGE)
    }

    pub fn text_width(&self) -> usize {
        (self.width.saturating_sub(HORIZONTAL_PADDING) as usize).max(MIN_TEXT_WIDTH)
    }
}

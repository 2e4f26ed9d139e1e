/// Fixed-height pages over a chapter's wrapped lines.
///
/// `current_page` stays in `[0, total_pages - 1]` after every operation, and
/// there is always at least one page, even for an empty chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    lines: Vec<String>,
    lines_per_page: usize,
    current_page: usize,
    total_pages: usize,
}

impl Pagination {
    pub fn new(lines_per_page: usize) -> Self {
        Self {
            lines: Vec::new(),
            lines_per_page: lines_per_page.max(1),
            current_page: 0,
            total_pages: 1,
        }
    }

    pub fn total_pages_for(line_count: usize, lines_per_page: usize) -> usize {
        line_count.div_ceil(lines_per_page.max(1)).max(1)
    }

    /// Replace the lines (and page height), keeping the current page if it still exists.
    pub fn reflow(&mut self, lines: Vec<String>, lines_per_page: usize) {
        self.lines = lines;
        self.lines_per_page = lines_per_page.max(1);
        self.total_pages = Self::total_pages_for(self.lines.len(), self.lines_per_page);
        self.go_to(self.current_page);
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.min(self.total_pages - 1);
    }

    pub fn first(&mut self) {
        self.current_page = 0;
    }

    pub fn last(&mut self) {
        self.current_page = self.total_pages - 1;
    }

    /// Returns false when already on the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Returns false when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current_page == 0 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn restore_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let page = (self.total_pages as f64 * fraction).floor() as usize;
        self.go_to(page);
    }

    /// `current_page / total_pages`, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.current_page as f64 / self.total_pages as f64).clamp(0.0, 1.0)
    }

    pub fn is_last(&self) -> bool {
        self.current_page + 1 >= self.total_pages
    }

    /// Lines of the current page, padded with blanks to a full page.
    pub fn visible(&self) -> Vec<String> {
        let start = (self.current_page * self.lines_per_page).min(self.lines.len());
        let end = (start + self.lines_per_page).min(self.lines.len());

        let mut page = self.lines[start..end].to_vec();
        page.resize(self.lines_per_page, String::new());
        page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Toc,
    Help,
}

/// Screen state that lives outside the reader itself.
pub struct ReaderApp {
    pub overlay: Overlay,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl ReaderApp {
    pub fn new() -> Self {
        Self {
            overlay: Overlay::None,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn toggle(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

impl Default for ReaderApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Table of contents digit keys "1".."9" map to chapter indices 0..8.
pub fn toc_digit(c: char) -> Option<usize> {
    c.to_digit(10)
        .filter(|d| (1..=9).contains(d))
        .map(|d| d as usize - 1)
}

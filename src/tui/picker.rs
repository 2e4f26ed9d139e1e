//! Scrollable list of works; Enter picks one to open in the reader.

use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{FolioError, Result};
use crate::config::{Config, KeybindingConfig};
use crate::domain::{ListingEntry, ReadingPosition};
use crate::tui::event::{Action, AppEvent, EventHandler};
use crate::tui::{restore_terminal, setup_terminal};

#[derive(Debug, Clone, PartialEq)]
pub struct PickerItem {
    pub work_id: u64,
    pub title: String,
    pub detail: String,
}

impl From<&ListingEntry> for PickerItem {
    fn from(entry: &ListingEntry) -> Self {
        Self {
            work_id: entry.id,
            title: entry.title.clone(),
            detail: entry.summary(),
        }
    }
}

impl From<&ReadingPosition> for PickerItem {
    fn from(position: &ReadingPosition) -> Self {
        Self {
            work_id: position.work_id,
            title: position.title.clone(),
            detail: format!(
                "by {} {} · {}",
                position.author,
                position.progress_label(),
                position.chapter_title
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub title: String,
    pub items: Vec<PickerItem>,
    pub index: usize,
}

impl Picker {
    pub fn new(title: impl Into<String>, items: Vec<PickerItem>) -> Self {
        Self {
            title: title.into(),
            items,
            index: 0,
        }
    }

    pub fn move_up(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() && self.index < self.items.len() - 1 {
            self.index += 1;
        }
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self) {
        self.index = self.items.len().saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&PickerItem> {
        self.items.get(self.index)
    }

    /// Apply one action. `Some(Some(id))` picks a work, `Some(None)` cancels,
    /// `None` keeps the list open.
    pub fn handle(&mut self, action: Action) -> Option<Option<u64>> {
        match action {
            Action::NextPage => self.move_down(),
            Action::PrevPage => self.move_up(),
            Action::FirstPage => self.first(),
            Action::LastPage => self.last(),
            Action::Select => {
                if let Some(item) = self.selected() {
                    return Some(Some(item.work_id));
                }
            }
            Action::Quit | Action::Close => return Some(None),
            _ => {}
        }
        None
    }
}

/// Show `picker` full screen until a work is picked or the list is dismissed.
pub fn pick(mut picker: Picker, config: &Config) -> Result<Option<u64>> {
    let mut terminal = setup_terminal()?;
    let event_handler = EventHandler::new(Duration::from_millis(100));

    let result = loop {
        if let Err(e) = terminal.draw(|frame| render(frame, &picker, config)) {
            break Err(FolioError::from(e));
        }

        match event_handler.next() {
            Ok(AppEvent::Key(key)) => {
                let action = config.keybindings.get_action(&key);
                if let Some(choice) = picker.handle(action) {
                    break Ok(choice);
                }
            }
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };

    restore_terminal(&mut terminal)?;
    result
}

fn render(frame: &mut Frame, picker: &Picker, config: &Config) {
    let colors = &config.colors;
    let keys = &config.keybindings;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let items: Vec<ListItem> = picker
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = i == picker.index;
            let marker = if selected { "▶ " } else { "  " };
            let title_style = if selected {
                Style::default()
                    .fg(colors.toc_highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.title)
            };

            ListItem::new(vec![
                Line::from(Span::styled(format!("{}{}", marker, item.title), title_style)),
                Line::from(Span::styled(
                    format!("    {}", item.detail),
                    Style::default().fg(colors.author),
                )),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ({}) ", picker.title, picker.items.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let mut state = ListState::default().with_selected(Some(picker.index));
    frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);

    let hints = format!(
        "{}/{}:Move  {}:Open  {}:Quit",
        KeybindingConfig::hint(&keys.next_page),
        KeybindingConfig::hint(&keys.prev_page),
        KeybindingConfig::hint(&keys.select),
        KeybindingConfig::hint(&keys.quit)
    );
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(colors.status_fg).bg(colors.status_bg)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(n: u64) -> Picker {
        Picker::new(
            "Best rated",
            (1..=n)
                .map(|id| PickerItem {
                    work_id: id * 10,
                    title: format!("Work {}", id),
                    detail: String::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_movement_is_bounded() {
        let mut p = picker(3);
        p.move_up();
        assert_eq!(p.index, 0);
        p.move_down();
        p.move_down();
        p.move_down();
        assert_eq!(p.index, 2);
        p.first();
        assert_eq!(p.index, 0);
        p.last();
        assert_eq!(p.index, 2);
    }

    #[test]
    fn test_select_picks_highlighted_work() {
        let mut p = picker(3);
        assert_eq!(p.handle(Action::NextPage), None);
        assert_eq!(p.handle(Action::Select), Some(Some(20)));
    }

    #[test]
    fn test_quit_and_close_cancel() {
        let mut p = picker(2);
        assert_eq!(p.handle(Action::Quit), Some(None));
        assert_eq!(p.handle(Action::Close), Some(None));
        assert_eq!(p.handle(Action::Bookmark), None);
    }

    #[test]
    fn test_empty_list_cannot_select() {
        let mut p = picker(0);
        p.move_down();
        p.last();
        assert_eq!(p.index, 0);
        assert_eq!(p.handle(Action::Select), None);
    }

    #[test]
    fn test_item_from_listing_entry() {
        let mut entry = ListingEntry::new(crate::domain::ListingKind::Popular);
        entry.id = 21220;
        entry.title = "Mother of Learning".into();
        entry.author = "nobody103".into();

        let item = PickerItem::from(&entry);
        assert_eq!(item.work_id, 21220);
        assert_eq!(item.title, "Mother of Learning");
        assert!(item.detail.starts_with("by nobody103"));
    }
}

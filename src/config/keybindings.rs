//! Keybinding configuration for the reader.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_chapter: Vec<String>,
    pub prev_chapter: Vec<String>,
    pub first_page: Vec<String>,
    pub last_page: Vec<String>,
    pub toggle_toc: Vec<String>,
    pub toggle_help: Vec<String>,
    pub close: Vec<String>,
    pub retry: Vec<String>,
    pub bookmark: Vec<String>,
    pub select: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            next_page: keys(&["Space", "f", "l", "j", "Right", "Down", "PageDown"]),
            prev_page: keys(&["h", "k", "Left", "Up", "PageUp"]),
            next_chapter: keys(&["n", "b"]),
            prev_chapter: keys(&["p"]),
            first_page: keys(&["g", "Home"]),
            last_page: keys(&["G", "End"]),
            toggle_toc: keys(&["t"]),
            toggle_help: keys(&["?"]),
            close: keys(&["Esc"]),
            retry: keys(&["r"]),
            bookmark: keys(&["B"]),
            select: keys(&["Enter"]),
        }
    }
}

impl KeybindingConfig {
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let bindings = [
            (&self.quit, Action::Quit),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.next_chapter, Action::NextChapter),
            (&self.prev_chapter, Action::PrevChapter),
            (&self.first_page, Action::FirstPage),
            (&self.last_page, Action::LastPage),
            (&self.toggle_toc, Action::ToggleToc),
            (&self.toggle_help, Action::ToggleHelp),
            (&self.close, Action::Close),
            (&self.retry, Action::Retry),
            (&self.bookmark, Action::Bookmark),
            (&self.select, Action::Select),
        ];

        bindings
            .into_iter()
            .find(|(list, _)| matches_key(key, list))
            .map(|(_, action)| action)
            .unwrap_or(Action::None)
    }

    /// First binding of `keys`, for hints in the footer and help screen.
    pub fn hint(keys: &[String]) -> &str {
        keys.first().map(String::as_str).unwrap_or("?")
    }
}

fn matches_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored on the event side so "G" and "?" match however the
    /// terminal reports them.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse "j", "G", "Space", "PageDown", "Ctrl+c", "Shift+Tab" and similar.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();

    // "+" alone is a key, not a separator
    let parts: Vec<&str> = if s == "+" { vec![s] } else { s.split('+').collect() };

    let mut modifiers = KeyModifiers::NONE;
    let (key_part, modifier_parts) = parts
        .split_last()
        .ok_or_else(|| format!("Empty key binding: {:?}", s))?;

    for part in modifier_parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F)
            .ok_or_else(|| format!("Unknown key: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_single_char() {
        let binding = parse_key_string("j").unwrap();
        assert_eq!(binding.code, KeyCode::Char('j'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);

        let binding = parse_key_string("?").unwrap();
        assert_eq!(binding.code, KeyCode::Char('?'));
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_string("Space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_string("PageDown").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_string("home").unwrap().code, KeyCode::Home);
        assert_eq!(parse_key_string("F12").unwrap().code, KeyCode::F(12));
        assert!(parse_key_string("F13").is_err());
        assert!(parse_key_string("Hyper").is_err());
    }

    #[test]
    fn test_parse_modifiers() {
        let binding = parse_key_string("Ctrl+c").unwrap();
        assert_eq!(binding.code, KeyCode::Char('c'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL);

        let binding = parse_key_string("Ctrl+Shift+a").unwrap();
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);

        assert!(parse_key_string("Super+a").is_err());
        assert_eq!(parse_key_string("+").unwrap().code, KeyCode::Char('+'));
    }

    #[test]
    fn test_shifted_event_matches_plain_binding() {
        let binding = parse_key_string("G").unwrap();
        let key = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(binding.matches(&key));

        let ctrl = parse_key_string("Ctrl+c").unwrap();
        assert!(!ctrl.matches(&press(KeyCode::Char('c'))));
    }

    #[test]
    fn test_default_reader_actions() {
        let config = KeybindingConfig::default();

        assert_eq!(config.get_action(&press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            config.get_action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(config.get_action(&press(KeyCode::Char(' '))), Action::NextPage);
        assert_eq!(config.get_action(&press(KeyCode::Right)), Action::NextPage);
        assert_eq!(config.get_action(&press(KeyCode::Char('k'))), Action::PrevPage);
        assert_eq!(config.get_action(&press(KeyCode::Char('b'))), Action::NextChapter);
        assert_eq!(config.get_action(&press(KeyCode::Char('p'))), Action::PrevChapter);
        assert_eq!(config.get_action(&press(KeyCode::Char('g'))), Action::FirstPage);
        assert_eq!(
            config.get_action(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::LastPage
        );
        assert_eq!(config.get_action(&press(KeyCode::Char('t'))), Action::ToggleToc);
        assert_eq!(config.get_action(&press(KeyCode::Char('r'))), Action::Retry);
        assert_eq!(config.get_action(&press(KeyCode::Char('B'))), Action::Bookmark);
        assert_eq!(config.get_action(&press(KeyCode::Enter)), Action::Select);
        assert_eq!(config.get_action(&press(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_custom_binding_overrides_default() {
        let config = KeybindingConfig {
            next_page: keys(&["Enter"]),
            ..Default::default()
        };

        assert_eq!(config.get_action(&press(KeyCode::Enter)), Action::NextPage);
        assert_eq!(config.get_action(&press(KeyCode::Char(' '))), Action::None);
    }
}

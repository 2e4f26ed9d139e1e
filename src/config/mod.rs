//! Configuration for folio.
//!
//! Configuration is read from `~/.config/folio/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
    pub reading: ReadingConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    /// Show the page and chapter position in the footer.
    pub show_progress: bool,
    pub history_page_size: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.royalroad.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load from the default path, writing a commented default file on first run.
    ///
    /// Missing fields fall back to their defaults; a file that is not valid
    /// TOML is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/folio/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("folio").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    fn default_config_content() -> String {
        r##"# folio configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "G", "?"
# - Special keys: Enter, Tab, Backspace, Delete, Home, End, PageUp, PageDown,
#   Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Alt+Enter"

[colors]
title = "Magenta"
author = "Gray"
chapter = "Cyan"
text = "Reset"
# Author's notes before and after a chapter
note = "DarkGray"
border = "DarkGray"
toc_highlight = "Magenta"
error = "Red"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
next_page = ["Space", "f", "l", "j", "Right", "Down", "PageDown"]
prev_page = ["h", "k", "Left", "Up", "PageUp"]
next_chapter = ["n", "b"]
# Lands on the last page of the previous chapter
prev_chapter = ["p"]
first_page = ["g", "Home"]
last_page = ["G", "End"]
toggle_toc = ["t"]
toggle_help = ["?"]
close = ["Esc"]
retry = ["r"]
bookmark = ["B"]
# Open the highlighted work in browse, search and history lists
select = ["Enter"]

[reading]
# Show "Page x/y" and chapter hints in the footer
show_progress = true
# Entries per page for `folio history`
history_page_size = 10

[network]
base_url = "https://www.royalroad.com"
timeout_secs = 30
# user_agent = "folio/0.1.0"
"##
        .to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

//! Turns chapter body markup into wrapped lines for the reader.

use html_escape::decode_html_entities;

use crate::domain::ChapterContent;

/// Narrowest column count text is ever wrapped to.
pub const MIN_TEXT_WIDTH: usize = 40;

const NOTE_GUTTER: &str = "│ ";
const NOTE_LABEL: &str = "Author's Note: ";

/// Plain text from body markup, with paragraphs rebuilt at sentence ends.
///
/// The site's body markup does not survive as block structure, so paragraphs
/// are approximated by splitting on ". " and separating the pieces with a
/// blank line.
pub fn clean_body(raw: &str) -> String {
    let decoded = decode_html_entities(raw);
    let flat = strip_tags(&decoded);

    let pieces: Vec<&str> = flat.split(". ").collect();
    if pieces.len() < 2 {
        return flat;
    }

    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .filter_map(|(i, piece)| {
            let piece = piece.trim();
            if piece.is_empty() {
                None
            } else if i < last && !piece.ends_with('.') {
                Some(format!("{}.", piece))
            } else {
                Some(piece.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Drop every complete `<...>` run, collapsing whitespace runs to one space.
///
/// A `<` with no `>` anywhere after it is text, not a tag.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut last_was_space = false;
    let last_close = html.rfind('>');

    for (i, c) in html.char_indices() {
        match c {
            '<' if !in_tag && last_close.is_some_and(|close| close > i) => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        result.push(' ');
                        last_was_space = true;
                    }
                } else {
                    result.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    result.trim().to_string()
}

/// Greedy word wrap, paragraph by paragraph.
///
/// Paragraphs are separated by blank lines in both input and output. Width is
/// counted in characters and never drops below [`MIN_TEXT_WIDTH`]; a word
/// longer than the width gets a line of its own.
pub fn wrap_to_width(text: &str, width: usize) -> String {
    wrap_paragraphs(text, width.max(MIN_TEXT_WIDTH))
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrap_paragraphs(text: &str, width: usize) -> Vec<Vec<String>> {
    text.split("\n\n")
        .map(|paragraph| wrap_words(paragraph, width))
        .filter(|lines| !lines.is_empty())
        .collect()
}

fn wrap_words(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// A chapter's cleaned text, kept so it can be re-wrapped on every resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedChapter {
    pub pre_note: Option<String>,
    pub body: String,
    pub post_note: Option<String>,
}

impl FormattedChapter {
    pub fn from_content(content: &ChapterContent) -> Self {
        let note = |raw: &Option<String>| {
            raw.as_deref()
                .map(clean_note)
                .filter(|note| !note.is_empty())
        };

        Self {
            pre_note: note(&content.pre_note),
            body: clean_body(&content.content),
            post_note: note(&content.post_note),
        }
    }

    /// Screen lines at `width`: pre-note block, body, post-note block.
    pub fn lines(&self, width: usize) -> Vec<String> {
        let width = width.max(MIN_TEXT_WIDTH);
        let mut lines = Vec::new();

        if let Some(note) = &self.pre_note {
            lines.extend(note_lines(note, width));
            lines.push(String::new());
        }

        for (i, paragraph) in wrap_paragraphs(&self.body, width).into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(paragraph);
        }

        if let Some(note) = &self.post_note {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(note_lines(note, width));
        }

        lines
    }
}

/// Whether a rendered line belongs to an author note block.
pub fn is_note_line(line: &str) -> bool {
    line.starts_with(NOTE_GUTTER)
}

fn clean_note(raw: &str) -> String {
    strip_tags(&decode_html_entities(raw))
}

fn note_lines(note: &str, width: usize) -> Vec<String> {
    let inner = width.saturating_sub(NOTE_GUTTER.chars().count()).max(1);
    wrap_words(&format!("{}{}", NOTE_LABEL, note), inner)
        .into_iter()
        .map(|line| format!("{}{}", NOTE_GUTTER, line))
        .collect()
}

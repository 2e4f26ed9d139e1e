use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::config::{Config, KeybindingConfig};
use crate::reader::{Reader, FOOTER_ROWS, HEADER_ROWS, HORIZONTAL_PADDING};
use crate::reflow::is_note_line;
use crate::tui::app::{Overlay, ReaderApp};

pub fn render(frame: &mut Frame, reader: &Reader, app: &ReaderApp, config: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(1),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(frame.area());

    render_header(frame, reader, chunks[0], config);

    if reader.chapter().is_some() {
        render_page(frame, reader, chunks[1], config);
    } else if let Some(error) = reader.error() {
        render_message(frame, chunks[1], &error.to_string(), Style::default().fg(config.colors.error));
    } else {
        render_message(frame, chunks[1], "Loading...", Style::default().fg(config.colors.chapter));
    }

    render_footer(frame, reader, app, chunks[2], config);

    match app.overlay {
        Overlay::Toc => render_toc(frame, reader, config),
        Overlay::Help => render_help(frame, config),
        Overlay::None => {}
    }
}

fn render_header(frame: &mut Frame, reader: &Reader, area: Rect, config: &Config) {
    let colors = &config.colors;

    let lines = match reader.work() {
        Some(work) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    work.title.clone(),
                    Style::default().fg(colors.title).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("by {}", work.author.name),
                    Style::default().fg(colors.author),
                )),
            ];
            if !work.chapters.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "Chapter {}/{}: {}",
                        reader.chapter_index() + 1,
                        work.chapters.len(),
                        work.chapter_title(reader.chapter_index())
                    ),
                    Style::default().fg(colors.chapter),
                )));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(colors.title),
        ))],
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(colors.border))
        .padding(Padding::horizontal(HORIZONTAL_PADDING / 2));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_page(frame: &mut Frame, reader: &Reader, area: Rect, config: &Config) {
    let text_style = Style::default().fg(config.colors.text);
    let note_style = Style::default()
        .fg(config.colors.note)
        .add_modifier(Modifier::ITALIC);

    let lines: Vec<Line> = reader
        .page_lines()
        .into_iter()
        .map(|line| {
            let style = if is_note_line(&line) { note_style } else { text_style };
            Line::from(Span::styled(line, style))
        })
        .collect();

    let block = Block::default().padding(Padding::horizontal(HORIZONTAL_PADDING / 2));
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, reader: &Reader, app: &ReaderApp, area: Rect, config: &Config) {
    let colors = &config.colors;
    let keys = &config.keybindings;
    let mut style = Style::default().fg(colors.status_fg).bg(colors.status_bg);

    let status = if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if let Some(error) = reader.error() {
        style = style.fg(colors.error);
        if error.is_retryable() {
            format!("{}  {}:Retry  {}:Quit", error, KeybindingConfig::hint(&keys.retry), KeybindingConfig::hint(&keys.quit))
        } else {
            format!("{}  {}:Quit", error, KeybindingConfig::hint(&keys.quit))
        }
    } else if reader.is_loading() {
        "Loading...".to_string()
    } else if !config.reading.show_progress {
        format!("{}:Help", KeybindingConfig::hint(&keys.toggle_help))
    } else {
        footer_hints(reader, keys)
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

fn footer_hints(reader: &Reader, keys: &KeybindingConfig) -> String {
    let mut parts = vec![format!(
        "Page {}/{}",
        reader.current_page() + 1,
        reader.total_pages()
    )];

    if reader.is_at_end() {
        parts.push("[end of book]".to_string());
    }
    if reader.has_next_chapter() {
        parts.push(format!("{}:Next chapter", KeybindingConfig::hint(&keys.next_chapter)));
    }
    if reader.has_previous_chapter() {
        parts.push(format!("{}:Prev chapter", KeybindingConfig::hint(&keys.prev_chapter)));
    }
    parts.push(format!("{}:Contents", KeybindingConfig::hint(&keys.toggle_toc)));
    parts.push(format!("{}:Help", KeybindingConfig::hint(&keys.toggle_help)));

    parts.join("  ")
}

fn render_toc(frame: &mut Frame, reader: &Reader, config: &Config) {
    let area = centered_rect(70, 80, frame.area());
    let highlight = Style::default()
        .fg(config.colors.toc_highlight)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = match reader.work() {
        Some(work) if !work.chapters.is_empty() => {
            // keep the current chapter in view
            let visible = area.height.saturating_sub(4) as usize;
            let skip = reader
                .chapter_index()
                .saturating_sub(visible / 2)
                .min(work.chapters.len().saturating_sub(visible));

            work.chapters
                .iter()
                .enumerate()
                .skip(skip)
                .take(visible)
                .map(|(i, chapter)| {
                    let current = i == reader.chapter_index();
                    let prefix = if current { "▶" } else { " " };
                    let line = format!("{} {:>3}. {}", prefix, i + 1, chapter.title);
                    if current {
                        Line::from(Span::styled(line, highlight))
                    } else {
                        Line::from(line)
                    }
                })
                .collect()
        }
        _ => vec![Line::from("No chapters available")],
    };

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "1-9: jump to chapter  {}: close",
            KeybindingConfig::hint(&config.keybindings.toggle_toc)
        ),
        Style::default().fg(config.colors.author),
    )));

    let block = Block::default()
        .title(" Table of Contents ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.colors.border));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_help(frame: &mut Frame, config: &Config) {
    let area = centered_rect(60, 70, frame.area());
    let keys = &config.keybindings;
    let heading = Style::default()
        .fg(config.colors.title)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled("Pages", heading)),
        help_row(&keys.next_page, "Next page (continues into the next chapter)"),
        help_row(&keys.prev_page, "Previous page (back to the previous chapter's end)"),
        help_row(&keys.first_page, "First page of chapter"),
        help_row(&keys.last_page, "Last page of chapter"),
        Line::from(""),
        Line::from(Span::styled("Chapters", heading)),
        help_row(&keys.next_chapter, "Next chapter"),
        help_row(&keys.prev_chapter, "Previous chapter"),
        help_row(&keys.toggle_toc, "Table of contents"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        help_row(&keys.bookmark, "Bookmark this page"),
        help_row(&keys.retry, "Retry / reload"),
        help_row(&keys.toggle_help, "Toggle this help"),
        help_row(&keys.quit, "Save progress and quit"),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.colors.border));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn help_row(bindings: &[String], description: &str) -> Line<'static> {
    Line::from(format!("  {:<24} {}", bindings.join(" / "), description))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub mod app;
pub mod event;
pub mod layout;
pub mod picker;

use std::io::{self, Stdout};
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::{Result, SessionContext};
use crate::domain::Bookmark;
use crate::fetcher::SiteClient;
use crate::reader::{LoadOutcome, LoadRequest, PageDirective, Reader, Ticket, Viewport};
use crate::store::ProgressStore;

use self::app::{toc_digit, Overlay, ReaderApp};
use self::event::{Action, AppEvent, EventHandler};

pub(crate) type Tui = Terminal<CrosstermBackend<Stdout>>;
type Completion = (Ticket, LoadOutcome);

/// Open `work_id` in the terminal reader and block until the user quits.
pub async fn run(
    ctx: &SessionContext,
    work_id: u64,
    start_chapter: usize,
    directive: PageDirective,
) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, work_id, start_chapter, directive).await;
    restore_terminal(&mut terminal)?;
    result
}

pub(crate) fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub(crate) fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Perform `request` on a background task; the outcome comes back tagged with its ticket.
fn dispatch(client: &SiteClient, tx: &UnboundedSender<Completion>, request: LoadRequest) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.load(request).await;
        // receiver is gone once the reader has quit
        let _ = tx.send((request.ticket(), outcome));
    });
}

async fn run_app(
    terminal: &mut Tui,
    ctx: &SessionContext,
    work_id: u64,
    start_chapter: usize,
    directive: PageDirective,
) -> Result<()> {
    let (width, height) = terminal::size()?;
    let mut reader = Reader::new(Viewport::new(width, height));
    let mut tui_app = ReaderApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    let request = reader.open(work_id, start_chapter, directive);
    dispatch(&ctx.client, &tx, request);

    loop {
        drain_completions(&mut reader, ctx, &tx, &mut rx);

        terminal.draw(|frame| layout::render(frame, &reader, &tui_app, &ctx.config))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                tui_app.clear_status();

                if tui_app.overlay == Overlay::Toc {
                    if let KeyCode::Char(c) = key.code {
                        if let Some(index) = toc_digit(c) {
                            tui_app.close_overlay();
                            match reader.load_chapter(index, PageDirective::FirstPage) {
                                Ok(Some(request)) => dispatch(&ctx.client, &tx, request),
                                Ok(None) => {}
                                Err(e) => tui_app.set_status(e.to_string()),
                            }
                            continue;
                        }
                    }
                }

                let action = ctx.config.keybindings.get_action(&key);
                let request = match action {
                    Action::Quit => {
                        tui_app.should_quit = true;
                        None
                    }
                    Action::NextPage => reader.advance_page(),
                    Action::PrevPage => reader.retreat_page(),
                    Action::NextChapter => reader.advance_chapter(),
                    Action::PrevChapter => reader.retreat_chapter_to_end(),
                    Action::FirstPage => {
                        reader.first_page();
                        None
                    }
                    Action::LastPage => {
                        reader.last_page();
                        None
                    }
                    Action::ToggleToc => {
                        tui_app.toggle(Overlay::Toc);
                        None
                    }
                    Action::ToggleHelp => {
                        tui_app.toggle(Overlay::Help);
                        None
                    }
                    Action::Close => {
                        tui_app.close_overlay();
                        None
                    }
                    Action::Retry => reader.retry(),
                    Action::Bookmark => {
                        add_bookmark(&mut tui_app, &reader, ctx);
                        None
                    }
                    Action::Select | Action::None => None,
                };

                if let Some(request) = request {
                    dispatch(&ctx.client, &tx, request);
                }
            }
            AppEvent::Resize(width, height) => {
                reader.resize(Viewport::new(width, height));
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            save_progress(&reader, ctx);
            break;
        }
    }

    Ok(())
}

fn drain_completions(
    reader: &mut Reader,
    ctx: &SessionContext,
    tx: &UnboundedSender<Completion>,
    rx: &mut UnboundedReceiver<Completion>,
) {
    while let Ok((ticket, outcome)) = rx.try_recv() {
        let chapter_loaded = matches!(outcome, LoadOutcome::ChapterLoaded { .. });

        if let Some(follow_up) = reader.apply(ticket, outcome) {
            dispatch(&ctx.client, tx, follow_up);
        }

        if chapter_loaded {
            save_progress(reader, ctx);
        }
    }
}

fn save_progress(reader: &Reader, ctx: &SessionContext) {
    let Some(position) = reader.position(Utc::now()) else {
        return;
    };
    if let Err(e) = ctx.store.upsert_position(&position) {
        tracing::warn!("Failed to save reading position: {}", e);
    }
}

fn add_bookmark(tui_app: &mut ReaderApp, reader: &Reader, ctx: &SessionContext) {
    let Some(work) = reader.work() else {
        return;
    };
    if reader.chapter().is_none() {
        return;
    }

    let bookmark = Bookmark {
        work_id: work.id,
        work_title: work.title.clone(),
        chapter_index: reader.chapter_index(),
        chapter_title: work.chapter_title(reader.chapter_index()).to_string(),
        position: reader.current_page() * reader.viewport().lines_per_page(),
        created_at: Utc::now(),
    };

    match ctx.store.add_bookmark(&bookmark) {
        Ok(()) => tui_app.set_status(format!(
            "Bookmarked chapter {}, page {}",
            reader.chapter_index() + 1,
            reader.current_page() + 1
        )),
        Err(e) => {
            tracing::warn!("Failed to save bookmark: {}", e);
            tui_app.set_status(format!("Could not save bookmark: {}", e));
        }
    }
}

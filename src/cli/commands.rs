use crate::app::context::open_reader;
use crate::app::{FolioError, Result, SessionContext};
use crate::domain::{HistoryPage, ListingEntry};
use crate::store::ProgressStore;
use crate::tui::picker::{pick, Picker, PickerItem};

/// Turn a 1-based `--chapter` argument into a chapter index.
pub fn chapter_index_from_arg(chapter: Option<usize>) -> Result<Option<usize>> {
    match chapter {
        Some(0) => Err(FolioError::InvalidInput(
            "chapters are numbered from 1".to_string(),
        )),
        Some(n) => Ok(Some(n - 1)),
        None => Ok(None),
    }
}

pub async fn read(ctx: &SessionContext, work_id: &str, chapter: Option<usize>) -> Result<()> {
    let start = chapter_index_from_arg(chapter)?;
    open_reader(ctx, work_id, start).await
}

pub async fn continue_reading(ctx: &SessionContext) -> Result<()> {
    let Some(last) = ctx.store.last_read()? else {
        println!("Nothing read yet. Try `folio browse` or `folio read <work-id>`.");
        return Ok(());
    };

    println!(
        "Continuing: {} by {} {}",
        last.title,
        last.author,
        last.progress_label()
    );
    open_reader(ctx, &last.work_id.to_string(), None).await
}

/// Let the user choose from `picker` and open the chosen work.
async fn pick_and_read(ctx: &SessionContext, picker: Picker, empty: &str) -> Result<()> {
    if picker.items.is_empty() {
        println!("{}", empty);
        return Ok(());
    }

    if let Some(work_id) = pick(picker, &ctx.config)? {
        open_reader(ctx, &work_id.to_string(), None).await?;
    }
    Ok(())
}

pub async fn history(ctx: &SessionContext, page: usize, print: bool) -> Result<()> {
    if !print {
        let items = ctx.store.positions()?.iter().map(PickerItem::from).collect();
        return pick_and_read(ctx, Picker::new("History", items), "No reading history").await;
    }

    let page = ctx
        .store
        .history_page(page, ctx.config.reading.history_page_size)?;

    for line in history_lines(&page) {
        println!("{}", line);
    }
    Ok(())
}

fn history_lines(page: &HistoryPage) -> Vec<String> {
    if page.entries.is_empty() {
        return vec!["No reading history".to_string()];
    }

    let mut lines = vec![format!("History (page {}/{})", page.page, page.total_pages)];
    for entry in &page.entries {
        lines.push(format!(
            "{:>8}  {} by {} {}\n          {} · last read {}",
            entry.work_id,
            entry.title,
            entry.author,
            entry.progress_label(),
            entry.chapter_title,
            entry.last_read.format("%Y-%m-%d %H:%M")
        ));
    }

    let mut nav = Vec::new();
    if page.has_prev {
        nav.push(format!("previous: folio history --page {}", page.page - 1));
    }
    if page.has_next {
        nav.push(format!("next: folio history --page {}", page.page + 1));
    }
    if !nav.is_empty() {
        lines.push(nav.join("  |  "));
    }
    lines
}

pub async fn browse(ctx: &SessionContext, print: bool) -> Result<()> {
    let entries = ctx.client.popular().await?;
    if !print {
        let items = entries.iter().map(PickerItem::from).collect();
        return pick_and_read(ctx, Picker::new("Best rated", items), "No works found").await;
    }

    print_listing(&entries, "No works found");
    Ok(())
}

pub async fn search(ctx: &SessionContext, query: &[String], print: bool) -> Result<()> {
    let query = query.join(" ");
    if query.trim().is_empty() {
        return Err(FolioError::InvalidInput("empty search query".to_string()));
    }

    let entries = ctx.client.search(&query).await?;
    let empty = format!("No results for {:?}", query);
    if !print {
        let items = entries.iter().map(PickerItem::from).collect();
        let title = format!("Search: {}", query);
        return pick_and_read(ctx, Picker::new(title, items), &empty).await;
    }

    print_listing(&entries, &empty);
    Ok(())
}

fn print_listing(entries: &[ListingEntry], empty: &str) {
    if entries.is_empty() {
        println!("{}", empty);
        return;
    }

    for entry in entries {
        println!("{:>8}  {}", entry.id, entry.title);
        let summary = entry.summary();
        if !summary.is_empty() {
            println!("          {}", summary);
        }
    }
    println!("\nOpen one with: folio read <id>");
}

pub fn bookmarks(ctx: &SessionContext) -> Result<()> {
    let bookmarks = ctx.store.bookmarks()?;

    if bookmarks.is_empty() {
        println!("No bookmarks");
        return Ok(());
    }

    for bookmark in bookmarks {
        println!(
            "{} - chapter {}: {}\n  line {}, saved {}  (folio read {} --chapter {})",
            bookmark.work_title,
            bookmark.chapter_index + 1,
            bookmark.chapter_title,
            bookmark.position,
            bookmark.created_at.format("%Y-%m-%d %H:%M"),
            bookmark.work_id,
            bookmark.chapter_index + 1
        );
    }

    Ok(())
}

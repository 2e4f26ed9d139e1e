use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use folio::app::SessionContext;
use folio::cli::{commands, Cli, Commands};
use folio::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the reader screen
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = SessionContext::new(config, cli.db)?;

    match cli.command {
        Commands::Read { work_id, chapter } => {
            commands::read(&ctx, &work_id, chapter).await?;
        }
        Commands::Continue => {
            commands::continue_reading(&ctx).await?;
        }
        Commands::History { page, print } => {
            commands::history(&ctx, page, print).await?;
        }
        Commands::Browse { print } => {
            commands::browse(&ctx, print).await?;
        }
        Commands::Search { query, print } => {
            commands::search(&ctx, &query, print).await?;
        }
        Commands::Bookmarks => {
            commands::bookmarks(&ctx)?;
        }
    }

    Ok(())
}

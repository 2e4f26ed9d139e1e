pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "A terminal reader for serialized web fiction", long_about = None)]
pub struct Cli {
    /// Path to the progress database
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a work in the terminal
    Read {
        /// Numeric id of the work, as in /fiction/<id>
        work_id: String,

        /// Chapter to start at (1-based); defaults to where you left off
        #[arg(short, long)]
        chapter: Option<usize>,
    },
    /// Reopen the most recently read work
    Continue,
    /// Show reading history
    History {
        /// Page of history to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Print the list instead of opening it for selection
        #[arg(long)]
        print: bool,
    },
    /// List the best-rated works
    Browse {
        /// Print the list instead of opening it for selection
        #[arg(long)]
        print: bool,
    },
    /// Search works by title
    Search {
        /// Words to search for
        #[arg(required = true)]
        query: Vec<String>,

        /// Print the list instead of opening it for selection
        #[arg(long)]
        print: bool,
    },
    /// List saved bookmarks
    Bookmarks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_with_chapter() {
        let cli = Cli::try_parse_from(["folio", "read", "21220", "--chapter", "3"]).unwrap();
        match cli.command {
            Commands::Read { work_id, chapter } => {
                assert_eq!(work_id, "21220");
                assert_eq!(chapter, Some(3));
            }
            _ => panic!("expected read"),
        }
    }

    #[test]
    fn test_parse_search_joins_words() {
        let cli = Cli::try_parse_from(["folio", "search", "mother", "of", "learning"]).unwrap();
        match cli.command {
            Commands::Search { query, print } => {
                assert_eq!(query.join(" "), "mother of learning");
                assert!(!print);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_history_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["folio", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                page: 1,
                print: false
            }
        ));
    }

    #[test]
    fn test_print_flag() {
        let cli = Cli::try_parse_from(["folio", "browse", "--print"]).unwrap();
        assert!(matches!(cli.command, Commands::Browse { print: true }));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["folio", "search"]).is_err());
    }
}

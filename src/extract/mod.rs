//! Extraction of domain values from the site's HTML pages.
//!
//! Every parser is lenient: a missing element leaves its field at the zero
//! value (or a sentinel), and only a document that cannot be parsed at all is
//! reported as an error. Parsing is synchronous; callers fetch first, then
//! hand the markup over.

pub mod chapter;
pub mod dom;
pub mod listing;
pub mod stats;
pub mod time;
pub mod work;

pub use chapter::parse_chapter_document;
pub use listing::parse_listing_document;
pub use stats::{parse_score, parse_stats_block};
pub use time::parse_relative_timestamp;
pub use work::{parse_chapter_table, parse_work_document};

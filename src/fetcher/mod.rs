pub mod http_fetcher;
pub mod site;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;
pub use site::SiteClient;

/// Raw document transport. Paths are site-relative, e.g. `/fiction/21220`.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, path: &str) -> Result<String>;
}

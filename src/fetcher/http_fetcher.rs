use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::{FolioError, Result};
use crate::config::NetworkConfig;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FolioError::Config(format!("invalid base_url {:?}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FolioError::InvalidInput(format!("bad path {:?}: {}", path, e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        tracing::info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base_url: &str) -> Result<HttpFetcher> {
        HttpFetcher::new(&NetworkConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_url_for_joins_site_paths() {
        let fetcher = fetcher("https://www.royalroad.com").unwrap();

        assert_eq!(
            fetcher.url_for("/fiction/21220").unwrap().as_str(),
            "https://www.royalroad.com/fiction/21220"
        );
        assert_eq!(
            fetcher
                .url_for("/fictions/search?title=mother+of")
                .unwrap()
                .as_str(),
            "https://www.royalroad.com/fictions/search?title=mother+of"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(fetcher("not a url"), Err(FolioError::Config(_))));
    }
}
